use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::actor::GameEvent;
use super::input::{Input, InputContext, KeyCode, KeyState};
use super::level::{Level, LevelId};
use super::rendering::{RecordingRenderer, RenderError, Renderer, Viewport};

pub const DEFAULT_TARGET_FPS: f32 = 60.0;

/// Shared, mutable configuration of a running game.
pub trait GameOptions: 'static {
    fn is_paused(&self) -> bool;

    fn set_paused(&mut self, is_paused: bool);

    /// Despite the name this is used verbatim as the tick loop's
    /// rescheduling delay in milliseconds.
    fn target_fps(&self) -> f32;

    fn tick_delay(&self) -> Duration {
        let millis = self.target_fps();
        if millis.is_finite() && millis > 0.0 {
            Duration::from_micros((f64::from(millis) * 1000.0).round() as u64)
        } else {
            Duration::ZERO
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseOptions {
    pub is_paused: bool,
    pub target_fps: f32,
}

impl Default for BaseOptions {
    fn default() -> Self {
        Self {
            is_paused: false,
            target_fps: DEFAULT_TARGET_FPS,
        }
    }
}

impl GameOptions for BaseOptions {
    fn is_paused(&self) -> bool {
        self.is_paused
    }

    fn set_paused(&mut self, is_paused: bool) {
        self.is_paused = is_paused;
    }

    fn target_fps(&self) -> f32 {
        self.target_fps
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickState {
    last_time: Instant,
}

impl TickState {
    pub fn new(last_time: Instant) -> Self {
        Self { last_time }
    }

    pub fn last_time(&self) -> Instant {
        self.last_time
    }

    pub fn set_last_time(&mut self, last_time: Instant) {
        self.last_time = last_time;
    }

    pub fn delta_seconds(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.last_time).as_secs_f32()
    }
}

/// Requests raised by actors for the host running the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCommand {
    Notify(String),
    Restart,
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("no input was defined")]
    NoInputs,
    #[error("start level was not defined")]
    NoStartLevel,
    #[error("no playable levels were defined")]
    NoLevels,
    #[error("game option `{name}` is not defined")]
    MissingOption { name: &'static str },
    #[error("actor `{name}` is not in the current level")]
    MissingActor { name: String },
    #[error("level width or height is not defined")]
    LevelSizeUndefined,
    #[error("game has not been started")]
    NotStarted,
    #[error(transparent)]
    Render(#[from] RenderError),
}

type OptionsObserver<O> = Box<dyn FnMut(&O)>;

pub struct Game<O: GameOptions> {
    tick_state: TickState,
    options: O,
    renderer: Box<dyn Renderer>,
    inputs: Vec<Box<dyn Input<O>>>,
    levels: Vec<Level<O>>,
    start_level: Option<LevelId>,
    current_level: Option<LevelId>,
    pause_observers: Vec<OptionsObserver<O>>,
    resume_observers: Vec<OptionsObserver<O>>,
    commands: Vec<GameCommand>,
    running: bool,
}

impl<O: GameOptions> Game<O> {
    pub fn new(options: O, renderer: Box<dyn Renderer>) -> Self {
        Self {
            tick_state: TickState::new(Instant::now()),
            options,
            renderer,
            inputs: Vec::new(),
            levels: Vec::new(),
            start_level: None,
            current_level: None,
            pause_observers: Vec::new(),
            resume_observers: Vec::new(),
            commands: Vec::new(),
            running: false,
        }
    }

    pub fn add_level(&mut self, level: Level<O>, is_start_level: bool) -> LevelId {
        let id = LevelId(self.levels.len());
        self.levels.push(level);
        if is_start_level {
            self.start_level = Some(id);
        }
        id
    }

    pub fn add_input(&mut self, input: impl Input<O> + 'static) {
        self.inputs.push(Box::new(input));
    }

    pub fn on_pause(&mut self, observer: impl FnMut(&O) + 'static) {
        self.pause_observers.push(Box::new(observer));
    }

    pub fn on_resume(&mut self, observer: impl FnMut(&O) + 'static) {
        self.resume_observers.push(Box::new(observer));
    }

    /// Activates the start level and arms both loops.
    pub fn start(&mut self, now: Instant) -> Result<(), GameError> {
        if self.running {
            warn!("game_start_ignored_already_running");
            return Ok(());
        }
        if self.inputs.is_empty() {
            return Err(GameError::NoInputs);
        }
        if self.levels.is_empty() {
            return Err(GameError::NoLevels);
        }
        let level_id = self.start_level.ok_or(GameError::NoStartLevel)?;
        let level = self
            .levels
            .get_mut(level_id.index())
            .ok_or(GameError::NoStartLevel)?;

        self.current_level = Some(level_id);
        let viewport = self.renderer.viewport();
        level.begin_play(
            viewport,
            &mut self.tick_state,
            &mut self.options,
            &mut self.commands,
        )?;
        self.tick_state.set_last_time(now);
        self.running = true;

        info!(
            level = level.name(),
            actor_count = level.actor_count(),
            tickable_count = level.tickable_actor_ids().len(),
            input_count = self.inputs.len(),
            width = viewport.width,
            height = viewport.height,
            "game_started"
        );
        Ok(())
    }

    pub fn pause(&mut self) {
        self.options.set_paused(true);
        if let Some(level) = self.current_level_slot_mut() {
            level.dispatch_event(GameEvent::Paused);
        }
        for observer in &mut self.pause_observers {
            observer(&self.options);
        }
        info!("game_paused");
    }

    pub fn resume(&mut self, now: Instant) {
        self.tick_state.set_last_time(now);
        self.options.set_paused(false);
        if let Some(level) = self.current_level_slot_mut() {
            level.dispatch_event(GameEvent::Resumed);
        }
        for observer in &mut self.resume_observers {
            observer(&self.options);
        }
        info!("game_resumed");
    }

    /// One iteration of the tick loop: inputs first, then tickable actors
    /// unless the game is paused.
    pub fn tick(&mut self, now: Instant) -> Result<(), GameError> {
        if !self.running {
            return Ok(());
        }
        let level_id = self.current_level.ok_or(GameError::NotStarted)?;
        let level = self
            .levels
            .get_mut(level_id.index())
            .ok_or(GameError::NotStarted)?;

        let delta_seconds = self.tick_state.delta_seconds(now);
        level.add_elapsed(delta_seconds);

        for input in &mut self.inputs {
            let mut ctx = InputContext::new(
                delta_seconds,
                now,
                &mut self.tick_state,
                &mut self.options,
                level,
            );
            input.tick(&mut ctx)?;
        }

        if self.options.is_paused() {
            self.tick_state.set_last_time(now);
            return Ok(());
        }

        level.tick_actors(
            delta_seconds,
            &mut self.tick_state,
            &mut self.options,
            &mut self.commands,
        )?;
        self.tick_state.set_last_time(now);
        Ok(())
    }

    /// Draws every actor of the current level, paused or not.
    pub fn render_frame(&mut self) -> Result<(), GameError> {
        if !self.running {
            return Ok(());
        }
        let level_id = self.current_level.ok_or(GameError::NotStarted)?;
        let level = self
            .levels
            .get(level_id.index())
            .ok_or(GameError::NotStarted)?;
        level.render_actors(self.renderer.as_mut(), &self.options)?;
        self.renderer.present()?;
        Ok(())
    }

    /// Empty sizes (a minimised window) are ignored.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), GameError> {
        if viewport.is_empty() {
            debug!("game_resize_ignored_empty");
            return Ok(());
        }
        self.renderer.resize(viewport)?;
        if let Some(level) = self.current_level_slot_mut() {
            level.set_size(viewport);
            level.dispatch_event(GameEvent::Resized(viewport));
        }
        debug!(
            width = viewport.width,
            height = viewport.height,
            "game_resized"
        );
        Ok(())
    }

    pub fn dispatch_key(&mut self, key: KeyCode, state: KeyState) {
        for input in &mut self.inputs {
            input.handle_key(key, state);
        }
    }

    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            info!("game_stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn take_commands(&mut self) -> Vec<GameCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn tick_delay(&self) -> Duration {
        self.options.tick_delay()
    }

    /// Stops the game and hands its rendering surface to the caller, leaving a
    /// headless stand-in behind. Resize observers do not survive the hand-over.
    pub fn detach_renderer(&mut self) -> Box<dyn Renderer> {
        self.stop();
        let viewport = self.renderer.viewport();
        let mut renderer = std::mem::replace(
            &mut self.renderer,
            Box::new(RecordingRenderer::new(viewport)),
        );
        renderer.resize_observers().clear();
        renderer
    }

    pub fn options(&self) -> &O {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut O {
        &mut self.options
    }

    pub fn tick_state(&self) -> &TickState {
        &self.tick_state
    }

    pub fn renderer(&self) -> &(dyn Renderer + 'static) {
        self.renderer.as_ref()
    }

    pub fn renderer_mut(&mut self) -> &mut (dyn Renderer + 'static) {
        self.renderer.as_mut()
    }

    pub fn levels(&self) -> &[Level<O>] {
        &self.levels
    }

    pub fn level(&self, id: LevelId) -> Option<&Level<O>> {
        self.levels.get(id.index())
    }

    pub fn level_mut(&mut self, id: LevelId) -> Option<&mut Level<O>> {
        self.levels.get_mut(id.index())
    }

    pub fn start_level_id(&self) -> Option<LevelId> {
        self.start_level
    }

    pub fn current_level_id(&self) -> Option<LevelId> {
        self.current_level
    }

    pub fn current_level(&self) -> Option<&Level<O>> {
        self.current_level.and_then(|id| self.levels.get(id.index()))
    }

    pub fn current_level_mut(&mut self) -> Option<&mut Level<O>> {
        self.current_level_slot_mut()
    }

    fn current_level_slot_mut(&mut self) -> Option<&mut Level<O>> {
        let id = self.current_level?;
        self.levels.get_mut(id.index())
    }
}
