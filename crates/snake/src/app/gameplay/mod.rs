mod actors;
mod grid;
mod input;
mod options;

use engine::{Game, Level, Renderer};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use tracing::debug;

use self::actors::{BackgroundActor, PickupsActor, SnakeActor};
use self::input::SnakeInput;

pub(crate) use self::options::{load_options_file, SnakeOptions};

pub(crate) const LEVEL_NAME: &str = "Snake";
pub(crate) const BACKGROUND_ACTOR_NAME: &str = "Background";
pub(crate) const PICKUPS_ACTOR_NAME: &str = "Pickups";
pub(crate) const SNAKE_ACTOR_NAME: &str = "Snake";

// Offsets the snake's stream from the pickups' stream for the same seed.
const SNAKE_STREAM: u64 = 0x5eed_5a4e;

/// Wires one round of Snake onto `renderer`: a single start level holding
/// the background, the pickups and the snake, driven by the keyboard.
pub(crate) fn build_game(
    renderer: Box<dyn Renderer>,
    options: SnakeOptions,
    seed: u64,
) -> Game<SnakeOptions> {
    let mut level = Level::new(LEVEL_NAME);
    level.add_actor(BackgroundActor::new());
    level.add_actor(PickupsActor::new(Pcg32::seed_from_u64(seed)));
    level.add_actor(SnakeActor::new(Pcg32::seed_from_u64(seed ^ SNAKE_STREAM)));

    let mut game = Game::new(options, renderer);
    game.add_level(level, true);
    game.add_input(SnakeInput::new());
    debug!(seed, "snake_game_built");
    game
}
