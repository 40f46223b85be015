use std::fmt;

use serde::{Deserialize, Serialize};

/// Status label reported to the front end after a lifecycle action.
///
/// Any failed action collapses to [`NodeStatus::Invalid`]; the underlying
/// error is never exposed through the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeStatus {
	Off,
	Serving,
	Consuming,
	Invalid,
}

impl NodeStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			NodeStatus::Off => "Off",
			NodeStatus::Serving => "Serving",
			NodeStatus::Consuming => "Consuming",
			NodeStatus::Invalid => "Invalid",
		}
	}
}

impl fmt::Display for NodeStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn labels_match_front_end_names() {
		assert_eq!(NodeStatus::Off.to_string(), "Off");
		assert_eq!(NodeStatus::Serving.to_string(), "Serving");
		assert_eq!(NodeStatus::Consuming.to_string(), "Consuming");
		assert_eq!(NodeStatus::Invalid.to_string(), "Invalid");
	}

	#[test]
	fn serializes_as_label() {
		assert_eq!(serde_json::to_string(&NodeStatus::Serving).unwrap(), r#""Serving""#);
	}

	#[test]
	fn deserializes_from_label() {
		let status: NodeStatus = serde_json::from_str(r#""Invalid""#).unwrap();
		assert_eq!(status, NodeStatus::Invalid);
	}
}
