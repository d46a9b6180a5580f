use std::process::ExitCode;

use engine::run_app;
use tracing::error;

mod bootstrap;
mod gameplay;

pub(crate) fn run() -> ExitCode {
    let wiring = match bootstrap::build_app() {
        Ok(wiring) => wiring,
        Err(message) => {
            error!(error = message.as_str(), "startup_failed");
            eprintln!("casewalk: {message}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = run_app(wiring.config, wiring.session) {
        error!(error = %err, "startup_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
