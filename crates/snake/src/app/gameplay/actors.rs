use std::collections::VecDeque;

use engine::{
    Actor, ActorContext, ActorMeta, GameCommand, GameError, GameEvent, RenderContext, Renderer,
    Vec2, DEFAULT_STROKE_WIDTH,
};
use rand_pcg::Pcg32;
use tracing::{debug, info};

use super::grid::{random_cell, step_cell, wrap_cell, Direction};
use super::options::SnakeOptions;
use super::{BACKGROUND_ACTOR_NAME, PICKUPS_ACTOR_NAME, SNAKE_ACTOR_NAME};

pub(crate) struct BackgroundActor {
    meta: ActorMeta,
}

impl BackgroundActor {
    pub(crate) fn new() -> Self {
        Self {
            meta: ActorMeta::new(BACKGROUND_ACTOR_NAME).with_render(true),
        }
    }
}

impl Actor<SnakeOptions> for BackgroundActor {
    fn meta(&self) -> &ActorMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ActorMeta {
        &mut self.meta
    }

    fn render(
        &self,
        renderer: &mut dyn Renderer,
        ctx: &RenderContext<'_, SnakeOptions>,
    ) -> Result<(), GameError> {
        let size = ctx.level().require_size()?;
        renderer.fill_rectangle(
            0.0,
            0.0,
            size.width as f32,
            size.height as f32,
            ctx.options().background_color,
        );
        Ok(())
    }
}

pub(crate) struct PickupsActor {
    meta: ActorMeta,
    pickups: Vec<Vec2>,
    rng: Pcg32,
}

impl PickupsActor {
    pub(crate) fn new(rng: Pcg32) -> Self {
        Self::with_pickups(Vec::new(), rng)
    }

    /// Pre-placed pickups count towards `pickups_count` when play begins.
    pub(crate) fn with_pickups(pickups: Vec<Vec2>, rng: Pcg32) -> Self {
        Self {
            meta: ActorMeta::new(PICKUPS_ACTOR_NAME),
            pickups,
            rng,
        }
    }

    #[cfg(test)]
    pub(crate) fn pickups(&self) -> &[Vec2] {
        &self.pickups
    }

    /// Removes the pickup lying on `cell`, if any.
    pub(crate) fn take_pickup_at(&mut self, cell: Vec2) -> bool {
        match self.pickups.iter().position(|pickup| *pickup == cell) {
            Some(index) => {
                self.pickups.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn spawn_pickup(&mut self, cell: Vec2) {
        self.pickups.push(cell);
    }
}

impl Actor<SnakeOptions> for PickupsActor {
    fn meta(&self) -> &ActorMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ActorMeta {
        &mut self.meta
    }

    fn begin_play(&mut self, ctx: &mut ActorContext<'_, SnakeOptions>) -> Result<(), GameError> {
        let count = ctx.options().pickups_count()? as usize;
        let cell_size = ctx.options().cell_size()?;
        let size = ctx.level().require_size()?;
        while self.pickups.len() < count {
            let cell = random_cell(size, cell_size, &mut self.rng);
            self.pickups.push(cell);
        }
        debug!(count = self.pickups.len(), "pickups_placed");
        Ok(())
    }

    fn render(
        &self,
        renderer: &mut dyn Renderer,
        ctx: &RenderContext<'_, SnakeOptions>,
    ) -> Result<(), GameError> {
        let options = ctx.options();
        let cell_size = options.cell_size as f32;
        for pickup in &self.pickups {
            renderer.fill_square(pickup.x, pickup.y, cell_size, options.pickup_color);
            renderer.stroke_square(
                pickup.x,
                pickup.y,
                cell_size,
                options.background_color,
                DEFAULT_STROKE_WIDTH,
            );
        }
        Ok(())
    }
}

pub(crate) struct SnakeActor {
    meta: ActorMeta,
    body: VecDeque<Vec2>,
    direction: Direction,
    queued_direction: Option<Direction>,
    time_since_last_update: f32,
    is_dead: bool,
    rng: Pcg32,
}

impl SnakeActor {
    pub(crate) fn new(rng: Pcg32) -> Self {
        Self::from_parts(Vec::new(), Direction::Right, rng)
    }

    /// A snake with a given body keeps it when play begins.
    pub(crate) fn from_parts(
        body: impl IntoIterator<Item = Vec2>,
        direction: Direction,
        rng: Pcg32,
    ) -> Self {
        Self {
            meta: ActorMeta::new(SNAKE_ACTOR_NAME).with_tick(true),
            body: body.into_iter().collect(),
            direction,
            queued_direction: None,
            time_since_last_update: 0.0,
            is_dead: false,
            rng,
        }
    }

    #[cfg(test)]
    pub(crate) fn body(&self) -> &VecDeque<Vec2> {
        &self.body
    }

    pub(crate) fn head(&self) -> Option<Vec2> {
        self.body.front().copied()
    }

    #[cfg(test)]
    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    #[cfg(test)]
    pub(crate) fn is_dead(&self) -> bool {
        self.is_dead
    }

    #[cfg(test)]
    pub(crate) fn time_since_last_update(&self) -> f32 {
        self.time_since_last_update
    }

    pub(crate) fn queue_direction(&mut self, direction: Direction) {
        self.queued_direction = Some(direction);
    }

    fn advance(&mut self, ctx: &mut ActorContext<'_, SnakeOptions>) -> Result<(), GameError> {
        let cell_size = ctx.options().cell_size()?;
        let size = ctx.level().require_size()?;

        if let Some(next) = self.queued_direction {
            if self.direction.accepts_turn_to(next) {
                self.direction = next;
            }
        }

        let Some(head) = self.head() else {
            return Ok(());
        };
        let Some(tail) = self.body.pop_back() else {
            return Ok(());
        };
        let next_head = wrap_cell(step_cell(head, self.direction, cell_size), size, cell_size);

        if self.body.iter().skip(1).any(|cell| *cell == next_head) {
            let score =
                self.body.len() as i64 - i64::from(ctx.options().starting_snake_length) + 1;
            self.is_dead = true;
            info!(score, "snake_died");
            ctx.request(GameCommand::Notify(format!(
                "You have died. Your score is {score}."
            )));
            ctx.request(GameCommand::Restart);
            return Ok(());
        }

        self.body.push_front(next_head);

        let pickups = ctx
            .find_actor_mut::<PickupsActor>(PICKUPS_ACTOR_NAME)
            .ok_or_else(|| GameError::MissingActor {
                name: PICKUPS_ACTOR_NAME.to_string(),
            })?;
        if !pickups.take_pickup_at(next_head) {
            return Ok(());
        }
        pickups.spawn_pickup(random_cell(size, cell_size, &mut self.rng));
        self.body.push_back(tail);
        ctx.options_mut().increase_speed();
        debug!(
            length = self.body.len(),
            snake_speed = ctx.options().snake_speed,
            "pickup_eaten"
        );
        Ok(())
    }
}

impl Actor<SnakeOptions> for SnakeActor {
    fn meta(&self) -> &ActorMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ActorMeta {
        &mut self.meta
    }

    fn begin_play(&mut self, ctx: &mut ActorContext<'_, SnakeOptions>) -> Result<(), GameError> {
        let cell_size = ctx.options().cell_size()?;
        let size = ctx.level().require_size()?;
        if !self.body.is_empty() {
            return Ok(());
        }

        let start = random_cell(size, cell_size, &mut self.rng);
        self.direction = Direction::random(&mut self.rng);
        let behind = self.direction.vector();
        let cell_size = cell_size as f32;
        for index in 0..ctx.options().starting_snake_length {
            let offset = index as f32 * cell_size;
            self.body.push_back(Vec2::new(
                start.x - behind.x * offset,
                start.y - behind.y * offset,
            ));
        }
        debug!(
            x = start.x,
            y = start.y,
            direction = ?self.direction,
            length = self.body.len(),
            "snake_spawned"
        );
        Ok(())
    }

    fn tick(&mut self, ctx: &mut ActorContext<'_, SnakeOptions>) -> Result<(), GameError> {
        if self.is_dead {
            return Ok(());
        }
        let interval = ctx.options().step_interval();
        self.time_since_last_update += ctx.delta_seconds();
        if self.time_since_last_update < interval {
            return Ok(());
        }
        self.time_since_last_update -= interval;
        self.advance(ctx)
    }

    fn render(
        &self,
        renderer: &mut dyn Renderer,
        ctx: &RenderContext<'_, SnakeOptions>,
    ) -> Result<(), GameError> {
        let options = ctx.options();
        let cell_size = options.cell_size as f32;
        for cell in self.body.iter().skip(1) {
            renderer.fill_rectangle(cell.x, cell.y, cell_size, cell_size, options.snake_color);
        }
        if let Some(head) = self.head() {
            renderer.fill_square(head.x, head.y, cell_size, options.head_color);
        }
        Ok(())
    }

    fn on_game_event(&mut self, event: GameEvent) {
        if event == GameEvent::Resumed {
            self.time_since_last_update = 0.0;
        }
    }
}
