use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::Instant;

use winit::event::ElementState;
pub use winit::keyboard::KeyCode;

use super::game::{GameError, GameOptions, TickState};
use super::level::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyState {
    Pressed,
    Released,
}

impl From<ElementState> for KeyState {
    fn from(state: ElementState) -> Self {
        match state {
            ElementState::Pressed => KeyState::Pressed,
            ElementState::Released => KeyState::Released,
        }
    }
}

/// A source of player intent. Inputs tick before any actor, paused or not.
pub trait Input<O: GameOptions> {
    fn tick(&mut self, _ctx: &mut InputContext<'_, O>) -> Result<(), GameError> {
        Ok(())
    }

    fn handle_key(&mut self, _key: KeyCode, _state: KeyState) {}
}

pub struct InputContext<'a, O: GameOptions> {
    delta_seconds: f32,
    now: Instant,
    tick_state: &'a mut TickState,
    options: &'a mut O,
    level: &'a mut Level<O>,
}

impl<'a, O: GameOptions> InputContext<'a, O> {
    pub(crate) fn new(
        delta_seconds: f32,
        now: Instant,
        tick_state: &'a mut TickState,
        options: &'a mut O,
        level: &'a mut Level<O>,
    ) -> Self {
        Self {
            delta_seconds,
            now,
            tick_state,
            options,
            level,
        }
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta_seconds
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn tick_state(&self) -> &TickState {
        &*self.tick_state
    }

    pub fn tick_state_mut(&mut self) -> &mut TickState {
        &mut *self.tick_state
    }

    pub fn options(&self) -> &O {
        &*self.options
    }

    pub fn options_mut(&mut self) -> &mut O {
        &mut *self.options
    }

    pub fn current_level(&self) -> &Level<O> {
        &*self.level
    }

    pub fn current_level_mut(&mut self) -> &mut Level<O> {
        &mut *self.level
    }
}

type KeyCallback = Box<dyn FnMut()>;
type TickCallback = Box<dyn FnMut(f32, &TickState)>;

/// Keyboard state fed by platform key events and read on tick.
#[derive(Default)]
pub struct KeyboardInput {
    pressed_keys: HashSet<KeyCode>,
    on_press: HashMap<KeyCode, KeyCallback>,
    on_release: HashMap<KeyCode, KeyCallback>,
    on_tick: Option<TickCallback>,
}

impl fmt::Debug for KeyboardInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardInput")
            .field("pressed_keys", &self.pressed_keys)
            .field("on_press", &self.on_press.len())
            .field("on_release", &self.on_release.len())
            .field("on_tick", &self.on_tick.is_some())
            .finish()
    }
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_key(&mut self, key: KeyCode, state: KeyState) {
        match state {
            KeyState::Pressed => {
                self.pressed_keys.insert(key);
                if let Some(callback) = self.on_press.get_mut(&key) {
                    callback();
                }
            }
            KeyState::Released => {
                self.pressed_keys.remove(&key);
                if let Some(callback) = self.on_release.get_mut(&key) {
                    callback();
                }
            }
        }
    }

    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Clears a held key so it only registers once.
    pub fn consume(&mut self, key: KeyCode) -> bool {
        self.pressed_keys.remove(&key)
    }

    pub fn on_press(&mut self, key: KeyCode, callback: impl FnMut() + 'static) {
        self.on_press.insert(key, Box::new(callback));
    }

    pub fn on_release(&mut self, key: KeyCode, callback: impl FnMut() + 'static) {
        self.on_release.insert(key, Box::new(callback));
    }

    pub fn on_tick(&mut self, callback: impl FnMut(f32, &TickState) + 'static) {
        self.on_tick = Some(Box::new(callback));
    }

    pub fn run_tick_callback(&mut self, delta_seconds: f32, tick_state: &TickState) {
        if let Some(callback) = self.on_tick.as_mut() {
            callback(delta_seconds, tick_state);
        }
    }
}

impl<O: GameOptions> Input<O> for KeyboardInput {
    fn tick(&mut self, ctx: &mut InputContext<'_, O>) -> Result<(), GameError> {
        self.run_tick_callback(ctx.delta_seconds(), ctx.tick_state());
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, state: KeyState) {
        self.record_key(key, state);
    }
}
