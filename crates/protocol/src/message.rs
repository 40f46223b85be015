//! Command and response envelopes.
//!
//! 1. UI sends [`Command::GetNodeDescriptor`] and the node answers with
//!    `{"NodeDescriptor": "..."}`, parsed as [`Response::NodeDescriptor`]
//! 2. UI sends [`Command::Shutdown`]; the node does not acknowledge it

use serde::Serialize;
use serde_json::Value;

/// Command sent from the UI to the node.
///
/// Serializes as a bare JSON string, e.g. `"GetNodeDescriptor"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Command {
	/// Ask the node for its public descriptor.
	GetNodeDescriptor,
	/// Ask the node to exit. Never acknowledged.
	#[serde(rename = "ShutdownMessage")]
	Shutdown,
}

impl Command {
	/// Encodes the command as a text frame payload.
	pub fn to_frame(self) -> serde_json::Result<String> {
		serde_json::to_string(&self)
	}
}

/// Message received from the node.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
	/// The node's descriptor, answering [`Command::GetNodeDescriptor`].
	NodeDescriptor(String),
	/// Any other well-formed JSON message. Ignored by the UI.
	Unknown(Value),
}

impl Response {
	const NODE_DESCRIPTOR_KEY: &'static str = "NodeDescriptor";

	/// Parses a text frame from the node.
	///
	/// A frame is a descriptor response only when it is a JSON object whose
	/// `NodeDescriptor` field holds a non-empty string.
	pub fn parse(frame: &str) -> serde_json::Result<Self> {
		let value: Value = serde_json::from_str(frame)?;
		let descriptor = value
			.get(Self::NODE_DESCRIPTOR_KEY)
			.and_then(Value::as_str)
			.filter(|descriptor| !descriptor.is_empty())
			.map(str::to_string);

		Ok(match descriptor {
			Some(descriptor) => Response::NodeDescriptor(descriptor),
			None => Response::Unknown(value),
		})
	}
}
