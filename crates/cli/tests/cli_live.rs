//! Integration tests for the `node-ui` binary against an in-process gateway.

use std::path::PathBuf;
use std::process::Command;

use node_ui_runtime::testing::FakeNode;
use serde_json::Value;

fn node_ui_binary() -> PathBuf {
	let mut path = std::env::current_exe().unwrap();
	path.pop();
	path.pop();
	path.push("node-ui");
	path
}

struct Run {
	json: Value,
	stdout: String,
	code: Option<i32>,
}

/// Runs the binary off the async runtime so the gateway keeps serving.
async fn run(args: Vec<String>) -> Run {
	tokio::task::spawn_blocking(move || {
		let output = Command::new(node_ui_binary())
			.env_remove("NODE_UI_HOST")
			.env_remove("NODE_UI_PORT")
			.env_remove("NODE_UI_PROTOCOL")
			.env_remove("RUST_LOG")
			.args(&args)
			.output()
			.expect("failed to execute node-ui");
		let stdout = String::from_utf8_lossy(&output.stdout).to_string();
		Run {
			json: serde_json::from_str(&stdout).unwrap_or(Value::Null),
			stdout,
			code: output.status.code(),
		}
	})
	.await
	.unwrap()
}

fn args(list: &[&str], port: u16) -> Vec<String> {
	list.iter()
		.map(|s| s.to_string())
		.chain(["--port".to_string(), port.to_string()])
		.collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn off_reports_off_when_node_goes_down() {
	let mut node = FakeNode::start().await;
	let port = node.endpoint().port;

	let out = run(args(&["off", "--timeout-ms", "3000"], port)).await;

	assert_eq!(out.code, Some(0), "stdout: {}", out.stdout);
	assert_eq!(out.json["ok"], true);
	assert_eq!(out.json["command"], "off");
	assert_eq!(out.json["data"]["status"], "Off");
	assert_eq!(node.next_frame().await, r#""ShutdownMessage""#);
}

#[tokio::test(flavor = "multi_thread")]
async fn off_text_output_prints_off() {
	let node = FakeNode::start().await;
	let port = node.endpoint().port;

	let out = run(args(&["-f", "text", "off"], port)).await;

	assert_eq!(out.code, Some(0), "stdout: {}", out.stdout);
	assert_eq!(out.stdout, "status: Off\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn status_reports_reachable_node() {
	let node = FakeNode::start().await;
	let port = node.endpoint().port;

	let out = run(args(&["status"], port)).await;

	assert_eq!(out.code, Some(0), "stdout: {}", out.stdout);
	assert_eq!(out.json["data"]["reachable"], true);
	assert_eq!(node.accepted(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn descriptor_times_out_when_node_stays_silent() {
	let mut node = FakeNode::start().await;
	let port = node.endpoint().port;

	let out = run(args(&["descriptor", "--timeout-ms", "200"], port)).await;

	assert_eq!(out.code, Some(1), "stdout: {}", out.stdout);
	assert_eq!(out.json["ok"], false);
	assert_eq!(out.json["error"]["code"], "TIMEOUT");
	assert_eq!(node.next_frame().await, r#""GetNodeDescriptor""#);
}
