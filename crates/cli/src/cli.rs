use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use node_ui_runtime::UiEndpoint;

use crate::error::Result;
use crate::output::OutputFormat;
use crate::styles::cli_styles;

/// Verification budget used when `--timeout-ms` is not given.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Parser, Debug)]
#[command(name = "node-ui")]
#[command(about = "Control channel for a locally running node")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: json (default), ndjson, or text
	#[arg(short = 'f', long, global = true, value_enum, default_value = "json")]
	pub format: OutputFormat,

	#[command(flatten)]
	pub endpoint: EndpointArgs,

	#[command(subcommand)]
	pub command: Commands,
}

/// Gateway address overrides. Each flag wins over its environment variable.
#[derive(Args, Debug, Clone, Default)]
pub struct EndpointArgs {
	/// Gateway host [env: NODE_UI_HOST] [default: 127.0.0.1]
	#[arg(long, global = true, value_name = "HOST")]
	pub host: Option<String>,

	/// Gateway port [env: NODE_UI_PORT] [default: 5333]
	#[arg(long, global = true, value_name = "PORT")]
	pub port: Option<u16>,

	/// WebSocket sub-protocol [env: NODE_UI_PROTOCOL] [default: SubstratumNode-UI]
	#[arg(long, global = true, value_name = "NAME")]
	pub protocol: Option<String>,
}

impl EndpointArgs {
	/// Resolves the endpoint from the environment, then applies flags.
	pub fn resolve(&self) -> Result<UiEndpoint> {
		let endpoint = UiEndpoint::from_env()?;
		Ok(self.apply(endpoint))
	}

	pub fn apply(&self, mut endpoint: UiEndpoint) -> UiEndpoint {
		if let Some(host) = &self.host {
			endpoint.host = host.clone();
		}
		if let Some(port) = self.port {
			endpoint.port = port;
		}
		if let Some(protocol) = &self.protocol {
			endpoint.protocol = protocol.clone();
		}
		endpoint
	}
}

#[derive(Args, Debug, Clone, Copy)]
pub struct BudgetArgs {
	/// Verification budget in milliseconds
	#[arg(long, value_name = "MS", default_value_t = DEFAULT_TIMEOUT_MS)]
	pub timeout_ms: u64,
}

impl BudgetArgs {
	pub fn timeout(&self) -> Duration {
		Duration::from_millis(self.timeout_ms)
	}
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Report whether the node accepts a control session
	Status,

	/// Wait until the node accepts connections
	#[command(name = "wait-up")]
	WaitUp(BudgetArgs),

	/// Wait until the node stops accepting connections
	#[command(name = "wait-down")]
	WaitDown(BudgetArgs),

	/// Ask the node for its descriptor
	Descriptor {
		/// Give up waiting for the reply after this many milliseconds
		#[arg(long, value_name = "MS")]
		timeout_ms: Option<u64>,
	},

	/// Tell the node to shut down (no acknowledgement is awaited)
	Shutdown,

	/// Turn the node off and confirm it went down; prints Off or Invalid
	Off(BudgetArgs),
}

impl Commands {
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Status => "status",
			Commands::WaitUp(_) => "wait-up",
			Commands::WaitDown(_) => "wait-down",
			Commands::Descriptor { .. } => "descriptor",
			Commands::Shutdown => "shutdown",
			Commands::Off(_) => "off",
		}
	}
}
