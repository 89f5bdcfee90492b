use std::process::ExitCode;

use engine::run_app;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tracing::{error, info};

use super::bootstrap::AppWiring;
use super::gameplay;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let AppWiring {
        config,
        options,
        seed,
    } = app;
    let mut rounds = Pcg32::seed_from_u64(seed);
    let mut round = 0u32;

    let result = run_app(config, move |renderer| {
        round += 1;
        let round_seed = rounds.random::<u64>();
        info!(round, seed = round_seed, "round_starting");
        Ok(gameplay::build_game(renderer, options.clone(), round_seed))
    });

    if let Err(err) = result {
        error!(error = %err, "startup_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
