use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	/// Command failed but its result envelope has already been printed.
	/// Used to signal exit code 1 without additional output.
	#[error("")]
	OutputAlreadyPrinted,

	#[error("timeout after {ms}ms waiting for: {condition}")]
	Timeout { ms: u64, condition: String },

	#[error(transparent)]
	Runtime(#[from] node_ui_runtime::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}

impl CliError {
	pub fn is_output_already_printed(&self) -> bool {
		matches!(self, CliError::OutputAlreadyPrinted)
	}

	pub fn to_command_error(&self) -> CommandError {
		let (code, message) = match self {
			CliError::OutputAlreadyPrinted => (ErrorCode::InternalError, String::new()),
			CliError::Timeout { .. } => (ErrorCode::Timeout, self.to_string()),
			CliError::Runtime(err) => (runtime_error_code(err), err.to_string()),
			CliError::Json(err) => (ErrorCode::InternalError, err.to_string()),
			// Alternate formatting keeps the whole context chain on one line.
			CliError::Anyhow(err) => {
				let code = err
					.chain()
					.find_map(|cause| cause.downcast_ref::<node_ui_runtime::Error>())
					.map_or(ErrorCode::InternalError, runtime_error_code);
				(code, format!("{err:#}"))
			}
		};
		CommandError { code, message }
	}
}

/// Maps a runtime failure to its stable output code.
pub fn runtime_error_code(err: &node_ui_runtime::Error) -> ErrorCode {
	use node_ui_runtime::Error;

	match err {
		Error::ConnectionFailed { .. } => ErrorCode::NodeUnreachable,
		Error::NotConnected => ErrorCode::NotConnected,
		Error::CallAlreadyInProgress => ErrorCode::CallInProgress,
		Error::SessionLost(_) | Error::Transport(_) => ErrorCode::SessionLost,
		Error::InvalidEndpoint(_) => ErrorCode::InvalidInput,
		Error::Json(_) | Error::ChannelClosed => ErrorCode::InternalError,
	}
}
