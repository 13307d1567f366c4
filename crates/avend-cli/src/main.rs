use avend_core::logging;
use std::process::ExitCode;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging as early as possible.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    // Parse CLI and dispatch.
    match Cli::run_from_args().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("avend error: {:#}", err);
            ExitCode::from(1)
        }
    }
}
