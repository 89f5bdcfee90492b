use std::fmt;

use tracing::debug;

use super::actor::{Actor, ActorContext, ActorId, GameEvent, RenderContext};
use super::game::{GameCommand, GameError, GameOptions, TickState};
use super::rendering::{Renderer, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelId(pub(crate) usize);

impl LevelId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Read-only view of a level handed to actor hooks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LevelInfo {
    size: Option<Viewport>,
    time_since_level_start: f64,
}

impl LevelInfo {
    pub fn size(&self) -> Option<Viewport> {
        self.size
    }

    pub fn require_size(&self) -> Result<Viewport, GameError> {
        match self.size {
            Some(size) if !size.is_empty() => Ok(size),
            _ => Err(GameError::LevelSizeUndefined),
        }
    }

    pub fn time_since_level_start(&self) -> f64 {
        self.time_since_level_start
    }
}

pub struct Level<O: GameOptions> {
    name: String,
    actors: Vec<Box<dyn Actor<O>>>,
    tickable: Vec<ActorId>,
    time_since_level_start: f64,
    size: Option<Viewport>,
    has_begun_play: bool,
}

impl<O: GameOptions> fmt::Debug for Level<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Level")
            .field("name", &self.name)
            .field("actor_count", &self.actors.len())
            .field("tickable", &self.tickable)
            .field("time_since_level_start", &self.time_since_level_start)
            .field("size", &self.size)
            .field("has_begun_play", &self.has_begun_play)
            .finish()
    }
}

impl<O: GameOptions> Level<O> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actors: Vec::new(),
            tickable: Vec::new(),
            time_since_level_start: 0.0,
            size: None,
            has_begun_play: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Actors added after play began are rendered but never begun or ticked.
    pub fn add_actor(&mut self, actor: impl Actor<O> + 'static) -> ActorId {
        self.push_actor(Box::new(actor))
    }

    pub fn add_actors(&mut self, actors: impl IntoIterator<Item = Box<dyn Actor<O>>>) {
        for actor in actors {
            self.push_actor(actor);
        }
    }

    fn push_actor(&mut self, actor: Box<dyn Actor<O>>) -> ActorId {
        let id = actor.id();
        if self.has_begun_play {
            debug!(level = %self.name, actor = actor.name(), "actor_added_after_begin_play");
        }
        self.actors.push(actor);
        id
    }

    pub fn actors(&self) -> impl Iterator<Item = &(dyn Actor<O> + 'static)> + '_ {
        self.actors.iter().map(|actor| actor.as_ref())
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn actor_by_id(&self, id: ActorId) -> Option<&(dyn Actor<O> + 'static)> {
        self.actors().find(|actor| actor.id() == id)
    }

    pub fn actor_by_id_mut(&mut self, id: ActorId) -> Option<&mut (dyn Actor<O> + 'static)> {
        self.actors
            .iter_mut()
            .find(|actor| actor.id() == id)
            .map(|actor| actor.as_mut())
    }

    /// First actor carrying `name`, in insertion order.
    pub fn actor_by_name(&self, name: &str) -> Option<&(dyn Actor<O> + 'static)> {
        self.actors().find(|actor| actor.name() == name)
    }

    pub fn actor_by_name_mut(&mut self, name: &str) -> Option<&mut (dyn Actor<O> + 'static)> {
        self.actors
            .iter_mut()
            .find(|actor| actor.name() == name)
            .map(|actor| actor.as_mut())
    }

    pub fn find_actor<T: Actor<O>>(&self, name: &str) -> Option<&T> {
        self.actor_by_name(name)
            .and_then(|actor| actor.downcast_ref::<T>())
    }

    pub fn find_actor_mut<T: Actor<O>>(&mut self, name: &str) -> Option<&mut T> {
        self.actor_by_name_mut(name)
            .and_then(|actor| actor.downcast_mut::<T>())
    }

    pub fn tickable_actor_ids(&self) -> &[ActorId] {
        &self.tickable
    }

    pub fn has_begun_play(&self) -> bool {
        self.has_begun_play
    }

    pub fn time_since_level_start(&self) -> f64 {
        self.time_since_level_start
    }

    pub fn size(&self) -> Option<Viewport> {
        self.size
    }

    pub fn info(&self) -> LevelInfo {
        LevelInfo {
            size: self.size,
            time_since_level_start: self.time_since_level_start,
        }
    }

    pub(crate) fn set_size(&mut self, size: Viewport) {
        self.size = Some(size);
    }

    pub(crate) fn add_elapsed(&mut self, delta_seconds: f32) {
        self.time_since_level_start += f64::from(delta_seconds);
    }

    pub(crate) fn begin_play(
        &mut self,
        viewport: Viewport,
        tick_state: &mut TickState,
        options: &mut O,
        commands: &mut Vec<GameCommand>,
    ) -> Result<(), GameError> {
        self.size = Some(viewport);
        self.tickable.clear();
        self.has_begun_play = true;

        for index in 0..self.actors.len() {
            let info = self.info();
            let (before, rest) = self.actors.split_at_mut(index);
            let Some((actor, after)) = rest.split_first_mut() else {
                break;
            };
            let mut ctx = ActorContext::new(0.0, tick_state, options, info, before, after, commands);
            actor.begin_play(&mut ctx)?;
            if actor.meta().can_tick() {
                self.tickable.push(actor.id());
            }
        }

        debug!(
            level = %self.name,
            actor_count = self.actors.len(),
            tickable_count = self.tickable.len(),
            "level_begin_play"
        );
        Ok(())
    }

    pub(crate) fn tick_actors(
        &mut self,
        delta_seconds: f32,
        tick_state: &mut TickState,
        options: &mut O,
        commands: &mut Vec<GameCommand>,
    ) -> Result<(), GameError> {
        for tick_index in 0..self.tickable.len() {
            let id = self.tickable[tick_index];
            let Some(index) = self.actors.iter().position(|actor| actor.id() == id) else {
                continue;
            };
            let info = self.info();
            let (before, rest) = self.actors.split_at_mut(index);
            let Some((actor, after)) = rest.split_first_mut() else {
                continue;
            };
            let mut ctx =
                ActorContext::new(delta_seconds, tick_state, options, info, before, after, commands);
            actor.tick(&mut ctx)?;
        }
        Ok(())
    }

    pub(crate) fn render_actors(
        &self,
        renderer: &mut dyn Renderer,
        options: &O,
    ) -> Result<(), GameError> {
        let info = self.info();
        let ctx = RenderContext::new(options, &info);
        for actor in &self.actors {
            actor.render(renderer, &ctx)?;
        }
        Ok(())
    }

    pub(crate) fn dispatch_event(&mut self, event: GameEvent) {
        for actor in &mut self.actors {
            actor.on_game_event(event);
        }
    }
}
