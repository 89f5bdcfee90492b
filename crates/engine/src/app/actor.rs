use std::any::Any;
use std::fmt;

use rand::Rng;

use super::game::{GameCommand, GameError, GameOptions, TickState};
use super::level::LevelInfo;
use super::rendering::{Renderer, Viewport};

/// Random version-4 UUID. Collisions are not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(u128);

impl ActorId {
    pub fn new_v4() -> Self {
        Self::from_random_bits(rand::rng().random())
    }

    pub const fn from_random_bits(bits: u128) -> Self {
        let versioned = (bits & !(0xFu128 << 76)) | (0x4u128 << 76);
        Self((versioned & !(0x3u128 << 62)) | (0x2u128 << 62))
    }

    pub const fn as_u128(self) -> u128 {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
            (value >> 96) as u32,
            (value >> 80) as u16,
            (value >> 64) as u16,
            (value >> 48) as u16,
            value & 0xFFFF_FFFF_FFFF
        )
    }
}

pub const DEFAULT_ACTOR_NAME: &str = "Actor";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorMeta {
    id: ActorId,
    name: String,
    can_tick: bool,
    can_be_rendered: bool,
}

impl Default for ActorMeta {
    fn default() -> Self {
        Self::new(DEFAULT_ACTOR_NAME)
    }
}

impl ActorMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ActorId::new_v4(),
            name: name.into(),
            can_tick: false,
            can_be_rendered: false,
        }
    }

    pub fn with_tick(mut self, can_tick: bool) -> Self {
        self.can_tick = can_tick;
        self
    }

    pub fn with_render(mut self, can_be_rendered: bool) -> Self {
        self.can_be_rendered = can_be_rendered;
        self
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn can_tick(&self) -> bool {
        self.can_tick
    }

    /// Only read when the owning level begins play.
    pub fn set_can_tick(&mut self, can_tick: bool) {
        self.can_tick = can_tick;
    }

    pub fn can_be_rendered(&self) -> bool {
        self.can_be_rendered
    }

    pub fn set_can_be_rendered(&mut self, can_be_rendered: bool) {
        self.can_be_rendered = can_be_rendered;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Paused,
    Resumed,
    Resized(Viewport),
}

pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A unit of game logic owned by a [`Level`](super::Level).
///
/// Every hook is optional. `tick` only runs for actors whose `can_tick` flag
/// was set when their level began play; `render` runs for every actor of the
/// current level on every frame.
pub trait Actor<O: GameOptions>: AsAny {
    fn meta(&self) -> &ActorMeta;

    fn meta_mut(&mut self) -> &mut ActorMeta;

    fn begin_play(&mut self, _ctx: &mut ActorContext<'_, O>) -> Result<(), GameError> {
        Ok(())
    }

    fn tick(&mut self, _ctx: &mut ActorContext<'_, O>) -> Result<(), GameError> {
        Ok(())
    }

    fn render(
        &self,
        _renderer: &mut dyn Renderer,
        _ctx: &RenderContext<'_, O>,
    ) -> Result<(), GameError> {
        Ok(())
    }

    fn on_game_event(&mut self, _event: GameEvent) {}
}

impl<O: GameOptions> dyn Actor<O> {
    pub fn id(&self) -> ActorId {
        self.meta().id()
    }

    pub fn name(&self) -> &str {
        self.meta().name()
    }

    pub fn downcast_ref<T: Actor<O>>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Actor<O>>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Everything an actor can reach while it begins play or ticks: the shared
/// options and tick state, the level it lives in, and the level's other
/// actors.
pub struct ActorContext<'a, O: GameOptions> {
    delta_seconds: f32,
    tick_state: &'a mut TickState,
    options: &'a mut O,
    level: LevelInfo,
    before: &'a mut [Box<dyn Actor<O>>],
    after: &'a mut [Box<dyn Actor<O>>],
    commands: &'a mut Vec<GameCommand>,
}

impl<'a, O: GameOptions> ActorContext<'a, O> {
    pub(crate) fn new(
        delta_seconds: f32,
        tick_state: &'a mut TickState,
        options: &'a mut O,
        level: LevelInfo,
        before: &'a mut [Box<dyn Actor<O>>],
        after: &'a mut [Box<dyn Actor<O>>],
        commands: &'a mut Vec<GameCommand>,
    ) -> Self {
        Self {
            delta_seconds,
            tick_state,
            options,
            level,
            before,
            after,
            commands,
        }
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta_seconds
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

    pub fn level(&self) -> &LevelInfo {
        &self.level
    }

    pub fn other_actors(&self) -> impl Iterator<Item = &(dyn Actor<O> + 'static)> + '_ {
        self.before
            .iter()
            .chain(self.after.iter())
            .map(|actor| actor.as_ref())
    }

    pub fn actor_by_name(&self, name: &str) -> Option<&(dyn Actor<O> + 'static)> {
        self.other_actors().find(|actor| actor.name() == name)
    }

    pub fn actor_by_id(&self, id: ActorId) -> Option<&(dyn Actor<O> + 'static)> {
        self.other_actors().find(|actor| actor.id() == id)
    }

    pub fn find_actor_mut<T: Actor<O>>(&mut self, name: &str) -> Option<&mut T> {
        self.before
            .iter_mut()
            .chain(self.after.iter_mut())
            .find(|actor| actor.meta().name() == name)
            .and_then(|actor| actor.as_mut().downcast_mut::<T>())
    }

    pub fn request(&mut self, command: GameCommand) {
        self.commands.push(command);
    }
}

pub struct RenderContext<'a, O: GameOptions> {
    options: &'a O,
    level: &'a LevelInfo,
}

impl<'a, O: GameOptions> RenderContext<'a, O> {
    pub(crate) fn new(options: &'a O, level: &'a LevelInfo) -> Self {
        Self { options, level }
    }

    pub fn options(&self) -> &O {
        self.options
    }

    pub fn level(&self) -> &LevelInfo {
        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::game::BaseOptions;

    struct Marker {
        meta: ActorMeta,
        value: u32,
    }

    impl Actor<BaseOptions> for Marker {
        fn meta(&self) -> &ActorMeta {
            &self.meta
        }

        fn meta_mut(&mut self) -> &mut ActorMeta {
            &mut self.meta
        }
    }

    struct Other {
        meta: ActorMeta,
    }

    impl Actor<BaseOptions> for Other {
        fn meta(&self) -> &ActorMeta {
            &self.meta
        }

        fn meta_mut(&mut self) -> &mut ActorMeta {
            &mut self.meta
        }
    }

    #[test]
    fn actor_id_is_formatted_as_version_four_uuid() {
        let text = ActorId::new_v4().to_string();
        let chars: Vec<char> = text.chars().collect();

        assert_eq!(chars.len(), 36);
        for dash in [8, 13, 18, 23] {
            assert_eq!(chars[dash], '-');
        }
        assert_eq!(chars[14], '4');
        assert!(matches!(chars[19], '8' | '9' | 'a' | 'b'));
    }

    #[test]
    fn version_and_variant_bits_override_random_input() {
        let all_ones = ActorId::from_random_bits(u128::MAX).to_string();
        let all_zeros = ActorId::from_random_bits(0).to_string();

        assert_eq!(all_ones, "ffffffff-ffff-4fff-bfff-ffffffffffff");
        assert_eq!(all_zeros, "00000000-0000-4000-8000-000000000000");
    }

    #[test]
    fn fresh_ids_differ() {
        assert_ne!(ActorId::new_v4(), ActorId::new_v4());
    }

    #[test]
    fn meta_defaults_to_inert_actor() {
        let meta = ActorMeta::default();

        assert_eq!(meta.name(), DEFAULT_ACTOR_NAME);
        assert!(!meta.can_tick());
        assert!(!meta.can_be_rendered());
    }

    #[test]
    fn downcast_resolves_only_the_concrete_type() {
        let mut actor: Box<dyn Actor<BaseOptions>> = Box::new(Marker {
            meta: ActorMeta::new("marker"),
            value: 7,
        });

        assert_eq!(
            actor.as_ref().downcast_ref::<Marker>().map(|m| m.value),
            Some(7)
        );
        assert!(actor.as_ref().downcast_ref::<Other>().is_none());

        if let Some(marker) = actor.as_mut().downcast_mut::<Marker>() {
            marker.value = 9;
        }
        assert_eq!(
            actor.as_ref().downcast_ref::<Marker>().map(|m| m.value),
            Some(9)
        );
        assert_eq!(actor.as_ref().name(), "marker");
    }
}
