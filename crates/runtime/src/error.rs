//! Error types for the node control channel.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Result type alias for control channel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur on the node control channel.
#[derive(Debug, Error)]
pub enum Error {
	/// The endpoint configuration cannot be turned into a connection request.
	#[error("Invalid UI endpoint: {0}")]
	InvalidEndpoint(String),

	/// The transport reported an error instead of opening.
	#[error("Failed to connect to node at {url}: {source}")]
	ConnectionFailed {
		url: String,
		#[source]
		source: Box<tungstenite::Error>,
	},

	/// Operation requires a session but none is held.
	#[error("Not connected to node")]
	NotConnected,

	/// A descriptor request is already outstanding.
	#[error("CallAlreadyInProgress: a node descriptor request is already pending")]
	CallAlreadyInProgress,

	/// The session ended while a request was waiting on it.
	#[error("Session lost: {0}")]
	SessionLost(String),

	/// A frame could not be written to the session.
	#[error("Transport error: {0}")]
	Transport(String),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// Completion handle dropped without an outcome.
	#[error("Channel closed unexpectedly")]
	ChannelClosed,
}

impl Error {
	/// Returns true for the single-flight rejection.
	pub fn is_call_in_progress(&self) -> bool {
		matches!(self, Error::CallAlreadyInProgress)
	}

	/// Returns true if the error means the node could not be reached or was lost.
	pub fn is_disconnect(&self) -> bool {
		matches!(
			self,
			Error::ConnectionFailed { .. } | Error::NotConnected | Error::SessionLost(_) | Error::Transport(_)
		)
	}
}
