//! brevoza binary entry point.

use std::process::ExitCode;

use brevoza::core::CoreError;
use brevoza::ui::output;

fn main() -> ExitCode {
    match brevoza::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CoreError>() {
                Some(core) => output::error(format!("[{}] {}", core.kind(), core.message())),
                None => output::error(format!("{:#}", err)),
            }
            ExitCode::FAILURE
        }
    }
}
