//! Command execution.

mod build;
mod handle;
mod inspect;

use crate::cli::{Args, Command, OutputManager, RuntimeConfig};
use crate::error::Result;

use build::execute_build;
use handle::execute_handle;
use inspect::execute_inspect;

/// Execute the command selected by `args` and return the process exit code.
///
/// Configuration load failures are returned as errors; command failures are
/// reported here and turned into exit code 1.
pub async fn execute_command(args: Args) -> Result<i32> {
    if let Err(validation_error) = args.validate() {
        OutputManager::new(false, false).error(&format!("Invalid arguments: {}", validation_error));
        return Ok(1);
    }

    let config = RuntimeConfig::from_args(&args)?;

    let result = match &args.command {
        Command::Build(build) => execute_build(build, &config).await,
        Command::Handle(handle) => execute_handle(handle, &config).await,
        Command::Inspect(inspect) => execute_inspect(inspect, &config).await,
    };

    match result {
        Ok(exit_code) => Ok(exit_code),
        Err(e) => {
            let output = config.output();
            output.error(&format!("Command '{}' failed: {}", args.command.name(), e));

            if !output.is_quiet() {
                let suggestions = e.recovery_suggestions();
                if !suggestions.is_empty() {
                    let _ = output.println("\n💡 Recovery suggestions:");
                    for suggestion in suggestions {
                        let _ = output.println(&format!("  • {}", suggestion));
                    }
                }
            }

            Ok(1)
        }
    }
}
