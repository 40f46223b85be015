//! Integration tests for the `node-ui` binary against a gateway that is not running.

use std::net::TcpListener;
use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

fn node_ui_binary() -> PathBuf {
	let mut path = std::env::current_exe().unwrap();
	path.pop();
	path.pop();
	path.push("node-ui");
	path
}

fn unused_port() -> u16 {
	let listener = TcpListener::bind("127.0.0.1:0").unwrap();
	listener.local_addr().unwrap().port()
}

struct Run {
	json: Value,
	stdout: String,
	code: Option<i32>,
}

fn run(args: &[&str], env: &[(&str, &str)]) -> Run {
	let mut cmd = Command::new(node_ui_binary());
	cmd.env_remove("NODE_UI_HOST")
		.env_remove("NODE_UI_PORT")
		.env_remove("NODE_UI_PROTOCOL")
		.env_remove("RUST_LOG")
		.args(args);
	for (key, value) in env {
		cmd.env(key, value);
	}
	let output = cmd.output().expect("failed to execute node-ui");

	let stdout = String::from_utf8_lossy(&output.stdout).to_string();
	let json = serde_json::from_str(&stdout).unwrap_or(Value::Null);
	Run {
		json,
		stdout,
		code: output.status.code(),
	}
}

#[test]
fn status_reports_unreachable_node() {
	let port = unused_port().to_string();
	let out = run(&["status", "--port", &port], &[]);

	assert_eq!(out.code, Some(0), "stdout: {}", out.stdout);
	assert_eq!(out.json["ok"], true);
	assert_eq!(out.json["command"], "status");
	assert_eq!(out.json["data"]["reachable"], false);
	assert_eq!(out.json["endpoint"], format!("ws://127.0.0.1:{port}"));
}

#[test]
fn wait_up_times_out() {
	let port = unused_port().to_string();
	let out = run(&["wait-up", "--timeout-ms", "300", "--port", &port], &[]);

	assert_eq!(out.code, Some(1), "stdout: {}", out.stdout);
	assert_eq!(out.json["ok"], false);
	assert_eq!(out.json["data"]["confirmed"], false);
	assert_eq!(out.json["data"]["budgetMs"], 300);
	assert_eq!(out.json["error"]["code"], "TIMEOUT");
}

#[test]
fn wait_down_confirms_immediately() {
	let port = unused_port().to_string();
	let out = run(&["wait-down", "--timeout-ms", "5000", "--port", &port], &[]);

	assert_eq!(out.code, Some(0), "stdout: {}", out.stdout);
	assert_eq!(out.json["ok"], true);
	assert_eq!(out.json["data"]["expected"], "down");
	assert_eq!(out.json["data"]["confirmed"], true);
}

#[test]
fn descriptor_fails_when_node_unreachable() {
	let port = unused_port().to_string();
	let out = run(&["descriptor", "--port", &port], &[]);

	assert_eq!(out.code, Some(1));
	assert_eq!(out.json["ok"], false);
	assert_eq!(out.json["command"], "descriptor");
	assert_eq!(out.json["error"]["code"], "NODE_UNREACHABLE");
}

#[test]
fn shutdown_fails_when_node_unreachable() {
	let port = unused_port().to_string();
	let out = run(&["shutdown", "--port", &port], &[]);

	assert_eq!(out.code, Some(1));
	assert_eq!(out.json["error"]["code"], "NODE_UNREACHABLE");
}

#[test]
fn off_collapses_failure_to_invalid() {
	let port = unused_port().to_string();
	let out = run(&["off", "--timeout-ms", "500", "--port", &port], &[]);

	assert_eq!(out.code, Some(1), "stdout: {}", out.stdout);
	assert_eq!(out.json["ok"], false);
	assert_eq!(out.json["data"]["status"], "Invalid");
	assert_eq!(out.json["error"]["code"], "NODE_UNREACHABLE");
	let message = out.json["error"]["message"].as_str().unwrap_or_default();
	assert!(message.starts_with("opening control session"), "got: {message}");
}

#[test]
fn off_text_output_prints_label() {
	let port = unused_port().to_string();
	let out = run(&["-f", "text", "off", "--timeout-ms", "500", "--port", &port], &[]);

	assert_eq!(out.code, Some(1));
	assert!(out.stdout.contains("status: Invalid"), "stdout: {}", out.stdout);
	assert!(out.stdout.contains("Error [NODE_UNREACHABLE]"), "stdout: {}", out.stdout);
}

#[test]
fn port_is_read_from_environment() {
	let port = unused_port().to_string();
	let out = run(&["status"], &[("NODE_UI_PORT", &port)]);

	assert_eq!(out.code, Some(0));
	assert_eq!(out.json["endpoint"], format!("ws://127.0.0.1:{port}"));
}

#[test]
fn flag_overrides_environment() {
	let env_port = unused_port().to_string();
	let flag_port = unused_port().to_string();
	let out = run(&["status", "--port", &flag_port], &[("NODE_UI_PORT", &env_port)]);

	assert_eq!(out.json["endpoint"], format!("ws://127.0.0.1:{flag_port}"));
}

#[test]
fn invalid_port_in_environment_is_rejected() {
	let out = run(&["status"], &[("NODE_UI_PORT", "not-a-port")]);

	assert_eq!(out.code, Some(1));
	assert_eq!(out.json["ok"], false);
	assert_eq!(out.json["error"]["code"], "INVALID_INPUT");
	let message = out.json["error"]["message"].as_str().unwrap_or_default();
	assert!(message.contains("NODE_UI_PORT"), "got: {message}");
}
