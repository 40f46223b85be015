//! Control channel endpoint configuration.
//!
//! The endpoint defaults to the node's well-known loopback address and
//! sub-protocol. Runtime environment variables take precedence over the
//! defaults so test rigs and alternate builds can point elsewhere:
//!
//! 1. `NODE_UI_HOST` - host name or address
//! 2. `NODE_UI_PORT` - TCP port
//! 3. `NODE_UI_PROTOCOL` - WebSocket sub-protocol name

use std::fmt;

use node_ui_protocol::{DEFAULT_UI_PORT, UI_INTERFACE_HOST, UI_PROTOCOL};

use crate::error::{Error, Result};

pub const HOST_ENV: &str = "NODE_UI_HOST";
pub const PORT_ENV: &str = "NODE_UI_PORT";
pub const PROTOCOL_ENV: &str = "NODE_UI_PROTOCOL";

/// Where and how to reach the node's UI gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiEndpoint {
	pub host: String,
	pub port: u16,
	pub protocol: String,
}

impl Default for UiEndpoint {
	fn default() -> Self {
		Self {
			host: UI_INTERFACE_HOST.to_string(),
			port: DEFAULT_UI_PORT,
			protocol: UI_PROTOCOL.to_string(),
		}
	}
}

impl UiEndpoint {
	/// Default endpoint with environment overrides applied.
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Builds an endpoint from an arbitrary variable lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut endpoint = Self::default();
		if let Some(host) = lookup(HOST_ENV).filter(|v| !v.trim().is_empty()) {
			endpoint.host = host.trim().to_string();
		}
		if let Some(port) = lookup(PORT_ENV).filter(|v| !v.trim().is_empty()) {
			endpoint.port = port
				.trim()
				.parse()
				.map_err(|e| Error::InvalidEndpoint(format!("{PORT_ENV}={port}: {e}")))?;
		}
		if let Some(protocol) = lookup(PROTOCOL_ENV).filter(|v| !v.trim().is_empty()) {
			endpoint.protocol = protocol.trim().to_string();
		}
		Ok(endpoint)
	}

	/// Same endpoint on another port.
	pub fn with_port(mut self, port: u16) -> Self {
		self.port = port;
		self
	}

	/// WebSocket URL of the gateway.
	pub fn url(&self) -> String {
		if self.host.contains(':') && !self.host.starts_with('[') {
			format!("ws://[{}]:{}", self.host, self.port)
		} else {
			format!("ws://{}:{}", self.host, self.port)
		}
	}
}

impl fmt::Display for UiEndpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.url(), self.protocol)
	}
}
