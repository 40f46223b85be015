//! Reachability commands: `status`, `wait-up`, `wait-down`.
//!
//! None of these keep a session open. `status` opens one and closes it
//! straight away; the wait commands only use probe connections.

use std::time::Duration;

use node_ui_runtime::{UiEndpoint, UiInterface};
use tracing::info;

use super::{emit, emit_failure};
use crate::error::{CliError, Result};
use crate::output::{OutputFormat, ReachabilityData, ResultBuilder, VerifyData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
	Up,
	Down,
}

impl Expect {
	fn as_str(self) -> &'static str {
		match self {
			Expect::Up => "up",
			Expect::Down => "down",
		}
	}

	fn condition(self) -> &'static str {
		match self {
			Expect::Up => "node to accept connections",
			Expect::Down => "node to stop accepting connections",
		}
	}
}

pub async fn status(endpoint: &UiEndpoint, format: OutputFormat) -> Result<()> {
	let builder = ResultBuilder::new("status").endpoint(endpoint.url());
	let ui = UiInterface::new(endpoint.clone());

	let reachable = match ui.connect().await {
		Ok(()) => {
			ui.disconnect().await;
			true
		}
		Err(err) if err.is_disconnect() => {
			info!(target = "node_ui", url = %ui.endpoint().url(), error = %err, "node unreachable");
			false
		}
		Err(err) => return Err(err.into()),
	};

	emit(&builder.data(ReachabilityData { reachable }).build(), format);
	Ok(())
}

pub async fn wait(endpoint: &UiEndpoint, expect: Expect, budget: Duration, format: OutputFormat) -> Result<()> {
	let builder = ResultBuilder::new(if expect == Expect::Up { "wait-up" } else { "wait-down" }).endpoint(endpoint.url());
	let budget_ms = budget.as_millis() as u64;

	let confirmed = match expect {
		Expect::Up => node_ui_runtime::verify_node_up(endpoint, budget).await,
		Expect::Down => node_ui_runtime::verify_node_down(endpoint, budget).await,
	};
	info!(target = "node_ui", expected = expect.as_str(), confirmed, budget_ms, "verification finished");

	let builder = builder.data(VerifyData {
		expected: expect.as_str().to_string(),
		confirmed,
		budget_ms,
	});
	if confirmed {
		emit(&builder.build(), format);
		return Ok(());
	}

	let err = CliError::Timeout {
		ms: budget_ms,
		condition: expect.condition().to_string(),
	};
	Err(emit_failure(builder, err, format))
}
