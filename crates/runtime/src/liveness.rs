//! Bounded liveness polling.
//!
//! Both verifiers probe the gateway with brand-new connections at a fixed
//! cadence until they can answer or their deadline passes. They never fail:
//! every transport error is folded into the polling decision.
//!
//! - [`verify_node_up`]: an open probe means up; errors are retried.
//! - [`verify_node_down`]: a failed probe means down; open probes are retried.
//!
//! The deadline is fixed when the call starts. Each probe is bounded by the
//! remaining budget and no probe starts once the deadline has passed.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::endpoint::UiEndpoint;
use crate::transport;

/// Delay between consecutive probes.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Deadline used when the budget does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
	Open,
	Failed,
	TimedOut,
}

/// Opens a probe connection and immediately closes it.
async fn probe(endpoint: &UiEndpoint, budget: Duration) -> Probe {
	match tokio::time::timeout(budget, transport::connect(endpoint)).await {
		Ok(Ok((mut sender, _receiver))) => {
			let _ = sender.close().await;
			Probe::Open
		}
		Ok(Err(e)) => {
			debug!(target = "node_ui", error = %e, "probe failed");
			Probe::Failed
		}
		Err(_) => Probe::TimedOut,
	}
}

/// Waits for the node to accept a connection.
///
/// Returns `true` as soon as a probe opens, `false` if `timeout` elapses
/// first. A zero timeout returns `false` without probing.
pub async fn verify_node_up(endpoint: &UiEndpoint, timeout: Duration) -> bool {
	poll(endpoint, timeout, Probe::Open).await
}

/// Waits for the node to stop accepting connections.
///
/// Returns `true` as soon as a probe fails to open, `false` if the node is
/// still accepting connections when `timeout` elapses. A zero timeout returns
/// `false` without probing.
pub async fn verify_node_down(endpoint: &UiEndpoint, timeout: Duration) -> bool {
	poll(endpoint, timeout, Probe::Failed).await
}

async fn poll(endpoint: &UiEndpoint, timeout: Duration, wanted: Probe) -> bool {
	let now = Instant::now();
	let deadline = now.checked_add(timeout).unwrap_or(now + FAR_FUTURE);
	let mut attempts = 0u32;

	loop {
		let remaining = deadline.saturating_duration_since(Instant::now());
		if remaining.is_zero() {
			debug!(target = "node_ui", url = %endpoint.url(), ?wanted, attempts, "verification budget exhausted");
			return false;
		}

		attempts += 1;
		let outcome = probe(endpoint, remaining).await;
		debug!(target = "node_ui", url = %endpoint.url(), attempt = attempts, ?outcome, "probe finished");
		if outcome == wanted {
			return true;
		}

		tokio::time::sleep_until((Instant::now() + POLL_INTERVAL).min(deadline)).await;
	}
}
