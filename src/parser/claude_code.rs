//! Claude Code transcript flattener
//!
//! Turns JSONL transcript records into flat 19-column rows, one row per
//! content block (or one default row when a record carries no block list).

use super::common::{bool_field, fmt_ts, is_truthy, json_inline, str_field, truncate_chars};
use super::types::{ContentBlock, RecordKind, Row};
use serde_json::Value;

/// Character limit for text, tool inputs, and tool results.
const TEXT_LIMIT: usize = 2000;
/// Character limit for thinking text and whole-block JSON fallbacks.
const RAW_LIMIT: usize = 500;

/// Flatten JSONL lines into rows. Lines that fail to decode contribute
/// zero rows and never abort the run.
pub fn flatten_lines(lines: &[String]) -> Vec<Row> {
    let mut rows = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let record: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(err) => {
                tracing::debug!("skipping unparseable line {}: {}", index, err);
                continue;
            }
        };
        flatten_record(&record, &mut rows);
    }

    rows
}

/// Flatten one decoded record, appending its rows in order.
pub fn flatten_record(record: &Value, rows: &mut Vec<Row>) {
    let base = base_row(record);
    match RecordKind::classify(record) {
        RecordKind::Assistant => flatten_assistant(record, base, rows),
        RecordKind::Human => flatten_human(record, base, rows),
        RecordKind::Other => rows.push(other_row(record, base)),
    }
}

/// Build the metadata base every row of a record starts from. All 19 fields
/// are set here; content fields stay blank until the block dispatch fills
/// them.
fn base_row(record: &Value) -> Row {
    Row {
        time: fmt_ts(record.get("timestamp").unwrap_or(&Value::Null)),
        record_type: str_field(record, "type"),
        uuid: str_field(record, "uuid"),
        parent_uuid: str_field(record, "parentUuid"),
        request_id: str_field(record, "requestId"),
        session_id: str_field(record, "sessionId"),
        is_api_error_message: bool_field(record, "isApiErrorMessage"),
        is_sidechain: bool_field(record, "isSidechain"),
        user_type: str_field(record, "userType"),
        cwd: str_field(record, "cwd"),
        version: str_field(record, "version"),
        git_branch: str_field(record, "gitBranch"),
        slug: str_field(record, "slug"),
        ..Row::default()
    }
}

fn flatten_assistant(record: &Value, base: Row, rows: &mut Vec<Row>) {
    let message = record.get("message");
    let role = message.map(|m| str_field(m, "role")).unwrap_or_default();
    let content = message
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_array());

    let blocks = match content {
        Some(arr) if role == "assistant" && !arr.is_empty() => arr,
        _ => {
            rows.push(Row {
                message_role: role,
                ..base
            });
            return;
        }
    };

    for block in blocks {
        let mut row = base.clone();
        row.message_role = role.clone();

        match ContentBlock::classify(block) {
            ContentBlock::Text { text } => {
                row.content_type = "text".to_string();
                row.content = truncate_chars(&text, TEXT_LIMIT);
            }
            ContentBlock::ToolUse { name, id, input } => {
                row.content_type = "tool_use".to_string();
                row.tool_name = name;
                row.tool_use_id = id;
                row.content = truncate_chars(&json_inline(&input), TEXT_LIMIT);
            }
            ContentBlock::Thinking { thinking } => {
                row.content_type = "thinking".to_string();
                row.content = truncate_chars(&thinking, RAW_LIMIT);
            }
            ContentBlock::ToolResult { .. }
            | ContentBlock::PlainString(_)
            | ContentBlock::Unrecognized { .. } => {
                row.content_type = str_field(block, "type");
                row.content = truncate_chars(&json_inline(block), RAW_LIMIT);
            }
        }

        rows.push(row);
    }
}

fn flatten_human(record: &Value, base: Row, rows: &mut Vec<Row>) {
    let message = record.get("message");
    let role = message.map(|m| str_field(m, "role")).unwrap_or_default();
    let content = message
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_array());

    let entries = match content {
        Some(arr) if !arr.is_empty() => arr,
        _ => {
            rows.push(Row {
                message_role: role,
                ..base
            });
            return;
        }
    };

    for entry in entries {
        // Only string and object entries produce rows; numbers, nulls, and
        // nested arrays contribute nothing.
        if !entry.is_string() && !entry.is_object() {
            continue;
        }

        let mut row = base.clone();
        row.message_role = role.clone();

        match ContentBlock::classify(entry) {
            ContentBlock::PlainString(s) => {
                row.content_type = "text".to_string();
                row.content = truncate_chars(&s, TEXT_LIMIT);
            }
            ContentBlock::Text { text } => {
                row.content_type = "text".to_string();
                row.content = truncate_chars(&text, TEXT_LIMIT);
            }
            ContentBlock::ToolResult {
                tool_use_id,
                is_error,
                content,
            } => {
                row.content_type = "tool_result".to_string();
                row.tool_use_id = tool_use_id;
                row.is_error = is_error.to_string();
                row.content = match &content {
                    Value::Array(_) => truncate_chars(&json_inline(&content), TEXT_LIMIT),
                    Value::String(s) => truncate_chars(s, TEXT_LIMIT),
                    Value::Null => String::new(),
                    other => truncate_chars(&json_inline(other), TEXT_LIMIT),
                };
            }
            ContentBlock::Thinking { .. }
            | ContentBlock::ToolUse { .. }
            | ContentBlock::Unrecognized { .. } => {
                row.content_type = str_field(entry, "type");
                row.content = truncate_chars(&json_inline(entry), RAW_LIMIT);
            }
        }

        rows.push(row);
    }
}

/// Rows for progress, system, file-history-snapshot, queue-operation and any
/// other record kind: exactly one row, `tool_use_id` from the top-level
/// `toolUseID`, content from `data`.
fn other_row(record: &Value, mut row: Row) -> Row {
    row.tool_use_id = str_field(record, "toolUseID");

    if let Some(data) = record.get("data") {
        if is_truthy(data) {
            row.content = match data {
                Value::String(s) => truncate_chars(s, RAW_LIMIT),
                other => truncate_chars(&json_inline(other), RAW_LIMIT),
            };
        }
    }

    row
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten_one(line: &str) -> Vec<Row> {
        flatten_lines(&[line.to_string()])
    }

    #[test]
    fn test_human_text_block() {
        let rows = flatten_one(
            r#"{"type":"human","message":{"role":"user","content":[{"type":"text","text":"hello"}]},"timestamp":"2024-01-01T00:00:00Z"}"#,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record_type, "human");
        assert_eq!(rows[0].message_role, "user");
        assert_eq!(rows[0].content_type, "text");
        assert_eq!(rows[0].content, "hello");
        assert_eq!(rows[0].time.len(), 19);
    }

    #[test]
    fn test_assistant_tool_use_block() {
        let rows = flatten_one(
            r#"{"type":"assistant","message":{"role":"assistant","content":[{"type":"tool_use","name":"Bash","id":"tu_1","input":{"command":"ls"}}]}}"#,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].content_type, "tool_use");
        assert_eq!(rows[0].tool_name, "Bash");
        assert_eq!(rows[0].tool_use_id, "tu_1");
        assert_eq!(rows[0].content, r#"{"command": "ls"}"#);
    }

    #[test]
    fn test_assistant_multiple_blocks_multiple_rows() {
        let rows = flatten_one(
            r#"{"type":"assistant","message":{"role":"assistant","content":[{"type":"thinking","thinking":"hmm"},{"type":"text","text":"done"},{"type":"tool_use","name":"Read","id":"tu_2","input":{"file_path":"/a"}}]}}"#,
        );
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].content_type, "thinking");
        assert_eq!(rows[0].content, "hmm");
        assert_eq!(rows[1].content_type, "text");
        assert_eq!(rows[2].tool_name, "Read");
    }

    #[test]
    fn test_assistant_role_mismatch_yields_single_blank_row() {
        let rows = flatten_one(
            r#"{"type":"assistant","message":{"role":"user","content":[{"type":"text","text":"x"}]}}"#,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].message_role, "user");
        assert_eq!(rows[0].content_type, "");
        assert_eq!(rows[0].content, "");
    }

    #[test]
    fn test_assistant_empty_content_yields_single_row() {
        let rows = flatten_one(r#"{"type":"assistant","message":{"role":"assistant","content":[]}}"#);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].message_role, "assistant");
        assert_eq!(rows[0].content, "");
    }

    #[test]
    fn test_assistant_thinking_truncates_to_500() {
        let long = "t".repeat(600);
        let line = format!(
            r#"{{"type":"assistant","message":{{"role":"assistant","content":[{{"type":"thinking","thinking":"{}"}}]}}}}"#,
            long
        );
        let rows = flatten_one(&line);
        assert_eq!(rows[0].content.chars().count(), 500);
    }

    #[test]
    fn test_assistant_text_truncates_to_2000() {
        let long = "x".repeat(2500);
        let line = format!(
            r#"{{"type":"assistant","message":{{"role":"assistant","content":[{{"type":"text","text":"{}"}}]}}}}"#,
            long
        );
        let rows = flatten_one(&line);
        assert_eq!(rows[0].content.chars().count(), 2000);
    }

    #[test]
    fn test_assistant_unrecognized_block_serialized_whole() {
        let rows = flatten_one(
            r#"{"type":"assistant","message":{"role":"assistant","content":[{"type":"image","source":"s3://x"}]}}"#,
        );
        assert_eq!(rows[0].content_type, "image");
        assert_eq!(rows[0].content, r#"{"type": "image", "source": "s3://x"}"#);
    }

    #[test]
    fn test_human_plain_string_entry() {
        let rows =
            flatten_one(r#"{"type":"human","message":{"role":"user","content":["raw prompt"]}}"#);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].content_type, "text");
        assert_eq!(rows[0].content, "raw prompt");
    }

    #[test]
    fn test_human_tool_result_string_content() {
        let rows = flatten_one(
            r#"{"type":"human","message":{"role":"user","content":[{"type":"tool_result","tool_use_id":"tu_1","is_error":false,"content":"ok"}]}}"#,
        );
        assert_eq!(rows[0].content_type, "tool_result");
        assert_eq!(rows[0].tool_use_id, "tu_1");
        assert_eq!(rows[0].is_error, "false");
        assert_eq!(rows[0].content, "ok");
    }

    #[test]
    fn test_human_tool_result_list_content_serialized() {
        let rows = flatten_one(
            r#"{"type":"human","message":{"role":"user","content":[{"type":"tool_result","tool_use_id":"tu_1","is_error":true,"content":[{"type":"text","text":"boom"}]}]}}"#,
        );
        assert_eq!(rows[0].is_error, "true");
        assert_eq!(rows[0].content, r#"[{"type": "text", "text": "boom"}]"#);
    }

    #[test]
    fn test_human_scalar_entries_contribute_no_rows() {
        let rows = flatten_one(
            r#"{"type":"human","message":{"role":"user","content":[42, null, [1,2], {"type":"text","text":"hi"}]}}"#,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].content_type, "text");
        assert_eq!(rows[0].content, "hi");
    }

    #[test]
    fn test_human_empty_content_yields_blank_row() {
        let rows = flatten_one(r#"{"type":"human","message":{"role":"user","content":[]}}"#);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].message_role, "user");
        assert_eq!(rows[0].content, "");
    }

    #[test]
    fn test_human_non_list_content_yields_default_row() {
        let rows =
            flatten_one(r#"{"type":"human","message":{"role":"user","content":"plain string"}}"#);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].content, "");
        assert_eq!(rows[0].content_type, "");
    }

    #[test]
    fn test_other_record_with_structured_data() {
        let rows = flatten_one(
            r#"{"type":"progress","toolUseID":"tu_9","data":{"status":"running"},"timestamp":"2024-01-01T00:00:00Z"}"#,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record_type, "progress");
        assert_eq!(rows[0].tool_use_id, "tu_9");
        assert_eq!(rows[0].content, r#"{"status": "running"}"#);
    }

    #[test]
    fn test_other_record_with_string_data_truncates_to_500() {
        let long = "d".repeat(700);
        let line = format!(r#"{{"type":"system","data":"{}"}}"#, long);
        let rows = flatten_one(&line);
        assert_eq!(rows[0].content.chars().count(), 500);
    }

    #[test]
    fn test_other_record_with_falsy_data_stays_blank() {
        for line in [
            r#"{"type":"system"}"#,
            r#"{"type":"system","data":""}"#,
            r#"{"type":"system","data":{}}"#,
            r#"{"type":"system","data":false}"#,
        ] {
            let rows = flatten_one(line);
            assert_eq!(rows.len(), 1, "line: {}", line);
            assert_eq!(rows[0].content, "", "line: {}", line);
        }
    }

    #[test]
    fn test_metadata_flows_into_every_row() {
        let rows = flatten_one(
            r#"{"type":"human","uuid":"u1","parentUuid":"p1","requestId":"req_123","sessionId":"s1","isSidechain":true,"userType":"external","cwd":"/work","version":"1.0.0","gitBranch":"main","slug":"fix-bug","message":{"role":"user","content":[{"type":"text","text":"a"},{"type":"text","text":"b"}]}}"#,
        );
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.uuid, "u1");
            assert_eq!(row.parent_uuid, "p1");
            assert_eq!(row.request_id, "req_123");
            assert_eq!(row.session_id, "s1");
            assert!(row.is_sidechain);
            assert!(!row.is_api_error_message);
            assert_eq!(row.cwd, "/work");
            assert_eq!(row.git_branch, "main");
            assert_eq!(row.slug, "fix-bug");
        }
    }

    #[test]
    fn test_null_parent_uuid_tolerated() {
        let rows = flatten_one(
            r#"{"type":"human","parentUuid":null,"message":{"role":"user","content":[{"type":"text","text":"hi"}]}}"#,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].parent_uuid, "");
    }

    #[test]
    fn test_malformed_line_skipped_without_abort() {
        let lines = vec![
            r#"{"type":"human","message":{"role":"user","content":[{"type":"text","text":"kept"}]}}"#
                .to_string(),
            r#"{"type":"human","message":{"truncated"#.to_string(),
            "".to_string(),
        ];
        let rows = flatten_lines(&lines);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].content, "kept");
    }

    #[test]
    fn test_row_count_matches_parseable_lines() {
        let lines = vec![
            r#"{"type":"assistant","message":{"role":"assistant","content":[{"type":"text","text":"a"},{"type":"text","text":"b"}]}}"#.to_string(),
            r#"not json"#.to_string(),
            r#"{"type":"progress","data":"tick"}"#.to_string(),
        ];
        let rows = flatten_lines(&lines);
        // Two blocks from the assistant record plus one from progress.
        assert_eq!(rows.len(), 3);
    }
}
