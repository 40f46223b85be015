mod probe;
mod session;

use serde::Serialize;
use tracing::{debug, error};

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use crate::output::{self, CommandResult, OutputFormat, ResultBuilder};

pub async fn dispatch(cli: Cli, format: OutputFormat) -> Result<()> {
	let endpoint = cli.endpoint.resolve()?;
	debug!(target = "node_ui", command = cli.command.name(), url = %endpoint.url(), "dispatching");

	match cli.command {
		Commands::Status => probe::status(&endpoint, format).await,
		Commands::WaitUp(budget) => probe::wait(&endpoint, probe::Expect::Up, budget.timeout(), format).await,
		Commands::WaitDown(budget) => probe::wait(&endpoint, probe::Expect::Down, budget.timeout(), format).await,
		Commands::Descriptor { timeout_ms } => session::descriptor(&endpoint, timeout_ms, format).await,
		Commands::Shutdown => session::shutdown(&endpoint, format).await,
		Commands::Off(budget) => session::off(&endpoint, budget.timeout(), format).await,
	}
}

fn emit<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) {
	output::print_result(result, format);
}

/// Prints a failure envelope that still carries `data`, then reports
/// [`CliError::OutputAlreadyPrinted`] so the caller only sets the exit code.
fn emit_failure<T: Serialize>(builder: ResultBuilder<T>, err: CliError, format: OutputFormat) -> CliError {
	let cmd_error = err.to_command_error();
	error!(target = "node_ui", code = %cmd_error.code, "{}", cmd_error.message);
	let result = builder.error(cmd_error.code, cmd_error.message).build();
	emit(&result, format);
	CliError::OutputAlreadyPrinted
}
