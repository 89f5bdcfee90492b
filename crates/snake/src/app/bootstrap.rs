use std::env;
use std::path::PathBuf;

use engine::LoopConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::gameplay::{load_options_file, SnakeOptions};

const OPTIONS_ENV_VAR: &str = "SNAKE_OPTIONS";
const SEED_ENV_VAR: &str = "SNAKE_SEED";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) options: SnakeOptions,
    pub(crate) seed: u64,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== Snake Startup ===");

    let options = resolve_options(env::var_os(OPTIONS_ENV_VAR).map(PathBuf::from));
    let seed = resolve_seed(env::var(SEED_ENV_VAR).ok()).unwrap_or_else(rand::random);
    info!(
        seed,
        cell_size = options.cell_size,
        snake_speed = options.snake_speed,
        pickups_count = options.pickups_count,
        "snake_configured"
    );

    let config = LoopConfig {
        window_title: "Snake".to_string(),
        ..LoopConfig::default()
    };

    AppWiring {
        config,
        options,
        seed,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn resolve_options(path: Option<PathBuf>) -> SnakeOptions {
    let Some(path) = path else {
        return SnakeOptions::default();
    };
    match load_options_file(&path) {
        Ok(options) => {
            info!(path = %path.display(), "options_loaded");
            options
        }
        Err(error) => {
            warn!(error = %error, "options_invalid_using_defaults");
            SnakeOptions::default()
        }
    }
}

fn resolve_seed(raw: Option<String>) -> Option<u64> {
    let raw = raw?;
    match raw.trim().parse::<u64>() {
        Ok(seed) => Some(seed),
        Err(error) => {
            warn!(var = SEED_ENV_VAR, value = %raw, error = %error, "seed_invalid_using_random");
            None
        }
    }
}
