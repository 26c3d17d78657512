use aioget_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; fall back to stderr if the state dir is unusable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    // Parse CLI and dispatch. Per-file failures are shown on their rows and
    // do not change the exit code.
    if let Err(err) = Cli::run_from_args().await {
        eprintln!("aioget error: {:#}", err);
        std::process::exit(1);
    }
}
