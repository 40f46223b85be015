use clap::Parser;
use node_ui_cli::{
	cli::Cli,
	commands,
	error::CliError,
	logging,
	output::{self, OutputFormat, ResultBuilder},
};
use tracing::error;

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let format = cli.format;
	let command = cli.command.name();

	if let Err(err) = commands::dispatch(cli, format).await {
		// Failures that carry data have already printed their envelope
		if !err.is_output_already_printed() {
			handle_error(command, err, format);
		}
		std::process::exit(1);
	}
}

fn handle_error(command: &'static str, err: CliError, format: OutputFormat) {
	let cmd_error = err.to_command_error();
	error!(target = "node_ui", command, code = %cmd_error.code, "{}", cmd_error.message);

	let result: output::CommandResult<()> = ResultBuilder::new(command)
		.error(cmd_error.code, cmd_error.message)
		.build();
	output::print_result(&result, format);
}
