//! Orchestrator boundary: lifecycle outcomes become status labels.

use std::fmt::Display;

use node_ui_protocol::NodeStatus;
use tracing::warn;

/// Collapses a lifecycle outcome to the label shown to the front end.
///
/// A successful action reports its own label. Any failure is reported as
/// [`NodeStatus::Invalid`]; the error itself is only logged.
pub fn assign_status<E: Display>(outcome: Result<NodeStatus, E>) -> NodeStatus {
	match outcome {
		Ok(status) => status,
		Err(err) => {
			warn!(target = "node_ui", error = %err, "lifecycle action failed");
			NodeStatus::Invalid
		}
	}
}
