//! Commands that drive a control session: `descriptor`, `shutdown`, `off`.

use std::time::Duration;

use anyhow::{Context, bail};
use node_ui_protocol::NodeStatus;
use node_ui_runtime::{UiEndpoint, UiInterface};
use tracing::info;

use super::{emit, emit_failure};
use crate::error::{CliError, Result};
use crate::output::{DescriptorData, OutputFormat, ResultBuilder, ShutdownData, StatusData};
use crate::status::assign_status;

async fn open_session(endpoint: &UiEndpoint) -> Result<UiInterface> {
	let ui = UiInterface::new(endpoint.clone());
	ui.connect().await?;
	Ok(ui)
}

/// Requests the descriptor, optionally abandoning the wait after `timeout_ms`.
pub async fn descriptor(endpoint: &UiEndpoint, timeout_ms: Option<u64>, format: OutputFormat) -> Result<()> {
	let builder = ResultBuilder::new("descriptor").endpoint(endpoint.url());
	let ui = open_session(endpoint).await?;

	let outcome = request_descriptor(&ui, timeout_ms).await;
	ui.disconnect().await;

	let descriptor = outcome?;
	info!(target = "node_ui", descriptor = %descriptor, "node descriptor received");
	emit(&builder.data(DescriptorData { descriptor }).build(), format);
	Ok(())
}

/// Abandoning the request on timeout drops it, which frees the pending slot.
async fn request_descriptor(ui: &UiInterface, timeout_ms: Option<u64>) -> Result<String> {
	let request = ui.get_node_descriptor();
	match timeout_ms {
		Some(ms) => match tokio::time::timeout(Duration::from_millis(ms), request).await {
			Ok(outcome) => outcome.map_err(CliError::from),
			Err(_) => Err(CliError::Timeout {
				ms,
				condition: "node descriptor".into(),
			}),
		},
		None => request.await.map_err(CliError::from),
	}
}

pub async fn shutdown(endpoint: &UiEndpoint, format: OutputFormat) -> Result<()> {
	let builder = ResultBuilder::new("shutdown").endpoint(endpoint.url());
	let ui = open_session(endpoint).await?;

	ui.shutdown().await?;
	emit(&builder.data(ShutdownData { sent: true }).build(), format);
	Ok(())
}

/// Lifecycle action `off`: the label is `Off` on success and `Invalid` otherwise.
pub async fn off(endpoint: &UiEndpoint, budget: Duration, format: OutputFormat) -> Result<()> {
	let builder = ResultBuilder::new("off").endpoint(endpoint.url());

	let outcome = power_off(endpoint, budget).await;
	let status = assign_status(outcome.as_ref().copied());
	let builder = builder.data(StatusData { status });

	match outcome {
		Ok(_) => {
			emit(&builder.build(), format);
			Ok(())
		}
		Err(err) => Err(emit_failure(builder, err.into(), format)),
	}
}

async fn power_off(endpoint: &UiEndpoint, budget: Duration) -> anyhow::Result<NodeStatus> {
	let ui = UiInterface::new(endpoint.clone());
	ui.connect().await.context("opening control session")?;
	ui.shutdown().await.context("sending shutdown")?;
	info!(
		target = "node_ui",
		url = %ui.endpoint().url(),
		budget_ms = budget.as_millis() as u64,
		"shutdown sent; waiting for node to go down"
	);

	if !ui.verify_node_down(budget).await {
		bail!("node still accepting connections after {}ms", budget.as_millis());
	}
	Ok(NodeStatus::Off)
}

#[cfg(test)]
mod tests {
	use node_ui_runtime::testing::FakeNode;

	use super::*;

	const GET_DESCRIPTOR: &str = r#""GetNodeDescriptor""#;

	#[tokio::test]
	async fn power_off_reports_off_once_node_goes_down() {
		let mut node = FakeNode::start().await;

		let status = power_off(&node.endpoint(), Duration::from_secs(3)).await.unwrap();

		assert_eq!(status, NodeStatus::Off);
		assert_eq!(node.next_frame().await, r#""ShutdownMessage""#);
	}

	#[tokio::test]
	async fn power_off_against_unreachable_node_is_invalid() {
		let node = FakeNode::start().await;
		let endpoint = node.endpoint();
		node.stop().await;

		let outcome = power_off(&endpoint, Duration::from_millis(500)).await;

		assert!(format!("{:#}", outcome.as_ref().unwrap_err()).starts_with("opening control session"));
		assert_eq!(assign_status(outcome), NodeStatus::Invalid);
	}

	#[tokio::test]
	async fn descriptor_timeout_abandons_request_and_frees_slot() {
		let mut node = FakeNode::start().await;
		let ui = open_session(&node.endpoint()).await.unwrap();

		let err = request_descriptor(&ui, Some(150)).await.unwrap_err();
		match err {
			CliError::Timeout { ms, ref condition } => {
				assert_eq!(ms, 150);
				assert_eq!(condition, "node descriptor");
			}
			other => panic!("expected Timeout, got {other:?}"),
		}
		assert_eq!(node.next_frame().await, GET_DESCRIPTOR);

		let (outcome, ()) = tokio::join!(request_descriptor(&ui, Some(5_000)), async {
			assert_eq!(node.next_frame().await, GET_DESCRIPTOR);
			node.push(r#"{"NodeDescriptor":"node-42"}"#);
		});
		assert_eq!(outcome.unwrap(), "node-42");
	}

	#[tokio::test]
	async fn descriptor_without_timeout_waits_for_reply() {
		let mut node = FakeNode::start().await;
		let ui = open_session(&node.endpoint()).await.unwrap();

		let (outcome, ()) = tokio::join!(request_descriptor(&ui, None), async {
			assert_eq!(node.next_frame().await, GET_DESCRIPTOR);
			node.push(r#"{"NodeDescriptor":"abc123"}"#);
		});
		assert_eq!(outcome.unwrap(), "abc123");
	}
}
