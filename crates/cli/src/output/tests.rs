use serde_json::json;

use super::*;

#[test]
fn result_builder_success() {
	let result: CommandResult<DescriptorData> = ResultBuilder::new("descriptor")
		.endpoint("ws://127.0.0.1:5333")
		.data(DescriptorData {
			descriptor: "node-42".into(),
		})
		.build();

	assert!(result.ok);
	assert_eq!(result.command, "descriptor");
	assert_eq!(result.endpoint.as_deref(), Some("ws://127.0.0.1:5333"));
	assert!(result.error.is_none());
	assert_eq!(result.schema_version, Some(SCHEMA_VERSION));
}

#[test]
fn result_builder_error_keeps_data() {
	let result: CommandResult<StatusData> = ResultBuilder::new("off")
		.data(StatusData {
			status: NodeStatus::Invalid,
		})
		.error(ErrorCode::NodeUnreachable, "connection refused")
		.build();

	assert!(!result.ok);
	assert_eq!(result.data.as_ref().unwrap().status, NodeStatus::Invalid);
	assert_eq!(result.error.as_ref().unwrap().code, ErrorCode::NodeUnreachable);
}

#[test]
fn result_without_data_is_not_ok() {
	let result: CommandResult<()> = ResultBuilder::new("status").build();
	assert!(!result.ok);
}

#[test]
fn envelope_uses_camel_case_and_screaming_codes() {
	let result: CommandResult<VerifyData> = ResultBuilder::new("wait-up")
		.data(VerifyData {
			expected: "up".into(),
			confirmed: false,
			budget_ms: 500,
		})
		.error(ErrorCode::Timeout, "node not up within 500ms")
		.build();

	let value = serde_json::to_value(&result).unwrap();
	assert_eq!(value["schemaVersion"], 1);
	assert_eq!(value["data"]["budgetMs"], 500);
	assert_eq!(value["error"]["code"], "TIMEOUT");
	assert!(value["timings"]["durationMs"].is_u64());
}

#[test]
fn status_label_serializes_as_name() {
	let value = serde_json::to_value(StatusData { status: NodeStatus::Off }).unwrap();
	assert_eq!(value, json!({ "status": "Off" }));
}

#[test]
fn error_code_display_matches_serde() {
	for code in [
		ErrorCode::NodeUnreachable,
		ErrorCode::NotConnected,
		ErrorCode::CallInProgress,
		ErrorCode::SessionLost,
		ErrorCode::Timeout,
		ErrorCode::InvalidInput,
		ErrorCode::InternalError,
	] {
		assert_eq!(serde_json::to_value(code).unwrap(), json!(code.to_string()));
	}
}

#[test]
fn output_format_parse() {
	assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
	assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
	assert!("toon".parse::<OutputFormat>().is_err());
}

#[test]
fn text_rendering_lists_fields_then_error() {
	let result: CommandResult<StatusData> = ResultBuilder::new("off")
		.data(StatusData {
			status: NodeStatus::Invalid,
		})
		.error(ErrorCode::NodeUnreachable, "connection refused")
		.build();

	let mut buf = Vec::new();
	write_result_text(&mut buf, &result).unwrap();
	let text = String::from_utf8(buf).unwrap();

	assert_eq!(text, "status: Invalid\nError [NODE_UNREACHABLE]: connection refused\n");
}
