use engine::{
    GameError, GameOptions, Input, InputContext, KeyCode, KeyState, KeyboardInput,
};
use tracing::debug;

use super::actors::SnakeActor;
use super::grid::Direction;
use super::options::SnakeOptions;
use super::SNAKE_ACTOR_NAME;

// Checked in this order; the first held key wins.
const STEERING_KEYS: [(KeyCode, Direction); 4] = [
    (KeyCode::ArrowUp, Direction::Up),
    (KeyCode::ArrowDown, Direction::Down),
    (KeyCode::ArrowLeft, Direction::Left),
    (KeyCode::ArrowRight, Direction::Right),
];

#[derive(Debug, Default)]
pub(crate) struct SnakeInput {
    keyboard: KeyboardInput,
}

impl SnakeInput {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn held_direction(&self) -> Option<Direction> {
        STEERING_KEYS
            .iter()
            .find(|(key, _)| self.keyboard.is_pressed(*key))
            .map(|(_, direction)| *direction)
    }
}

impl Input<SnakeOptions> for SnakeInput {
    fn tick(&mut self, ctx: &mut InputContext<'_, SnakeOptions>) -> Result<(), GameError> {
        self.keyboard
            .run_tick_callback(ctx.delta_seconds(), ctx.tick_state());

        if self.keyboard.consume(KeyCode::Space) {
            let is_paused = !ctx.options().is_paused();
            ctx.options_mut().set_paused(is_paused);
            debug!(is_paused, "pause_toggled");
            if is_paused {
                return Ok(());
            }
            let now = ctx.now();
            ctx.tick_state_mut().set_last_time(now);
        }

        let Some(direction) = self.held_direction() else {
            return Ok(());
        };
        let snake = ctx
            .current_level_mut()
            .find_actor_mut::<SnakeActor>(SNAKE_ACTOR_NAME)
            .ok_or_else(|| GameError::MissingActor {
                name: SNAKE_ACTOR_NAME.to_string(),
            })?;
        snake.queue_direction(direction);
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, state: KeyState) {
        self.keyboard.record_key(key, state);
    }
}
