use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use feedwatch::{log::setup_logger, run_feed, Config};

fn main() -> ExitCode {
    let config = Config::parse();

    let _guard = match setup_logger(&config.log_dir, &config.log_level, config.headless) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("feedwatch: failed to set up logging: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(version = env!("CARGO_PKG_VERSION"), "feedwatch starting");

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "failed to build runtime");
            eprintln!("feedwatch: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run_feed(config)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "feedwatch stopped");
            eprintln!("feedwatch: {e}");
            ExitCode::FAILURE
        }
    }
}
