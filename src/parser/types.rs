//! Parser types for transcript flattening

use serde_json::Value;

use super::common::{bool_field, str_field};

/// Column names of the flat row schema, in output order. Shared by the CSV
/// header, the row value accessor, and the tests.
pub const FIELD_NAMES: [&str; 19] = [
    "time",
    "type",
    "uuid",
    "parentUuid",
    "requestId",
    "sessionId",
    "isApiErrorMessage",
    "isSidechain",
    "userType",
    "cwd",
    "version",
    "gitBranch",
    "slug",
    "message_role",
    "content_type",
    "tool_name",
    "tool_use_id",
    "is_error",
    "content",
];

/// One flat output row.
///
/// Every field is always populated; blanks are empty strings. Rows are built
/// from a fully-formed base so no column can be accidentally omitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub time: String,
    pub record_type: String,
    pub uuid: String,
    pub parent_uuid: String,
    pub request_id: String,
    pub session_id: String,
    pub is_api_error_message: bool,
    pub is_sidechain: bool,
    pub user_type: String,
    pub cwd: String,
    pub version: String,
    pub git_branch: String,
    pub slug: String,
    pub message_role: String,
    pub content_type: String,
    pub tool_name: String,
    pub tool_use_id: String,
    /// Blank when absent, `"true"`/`"false"` when a tool_result carries it.
    pub is_error: String,
    pub content: String,
}

impl Row {
    /// Field values in [`FIELD_NAMES`] order.
    pub fn values(&self) -> [String; 19] {
        [
            self.time.clone(),
            self.record_type.clone(),
            self.uuid.clone(),
            self.parent_uuid.clone(),
            self.request_id.clone(),
            self.session_id.clone(),
            self.is_api_error_message.to_string(),
            self.is_sidechain.to_string(),
            self.user_type.clone(),
            self.cwd.clone(),
            self.version.clone(),
            self.git_branch.clone(),
            self.slug.clone(),
            self.message_role.clone(),
            self.content_type.clone(),
            self.tool_name.clone(),
            self.tool_use_id.clone(),
            self.is_error.clone(),
            self.content.clone(),
        ]
    }
}

/// Record classification on the top-level `type` discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Assistant,
    Human,
    /// progress, system, file-history-snapshot, queue-operation, ...
    Other,
}

impl RecordKind {
    pub fn classify(record: &Value) -> Self {
        match record.get("type").and_then(|t| t.as_str()) {
            Some("assistant") => RecordKind::Assistant,
            Some("human") => RecordKind::Human,
            _ => RecordKind::Other,
        }
    }
}

/// One element of a message's `content` sequence, classified by its own
/// `type` tag. [`ContentBlock::Unrecognized`] is the named fallback for
/// block shapes this tool does not know.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        name: String,
        id: String,
        input: Value,
    },
    Thinking {
        thinking: String,
    },
    ToolResult {
        tool_use_id: String,
        is_error: bool,
        content: Value,
    },
    /// Human content entries may be bare JSON strings.
    PlainString(String),
    Unrecognized {
        block_type: String,
    },
}

impl ContentBlock {
    pub fn classify(block: &Value) -> Self {
        if let Some(s) = block.as_str() {
            return ContentBlock::PlainString(s.to_string());
        }

        match block.get("type").and_then(|t| t.as_str()).unwrap_or("") {
            "text" => ContentBlock::Text {
                text: str_field(block, "text"),
            },
            "tool_use" => ContentBlock::ToolUse {
                name: str_field(block, "name"),
                id: str_field(block, "id"),
                // Absent input serializes as an empty object, not null.
                input: block
                    .get("input")
                    .cloned()
                    .unwrap_or_else(|| Value::Object(serde_json::Map::new())),
            },
            "thinking" => ContentBlock::Thinking {
                thinking: str_field(block, "thinking"),
            },
            "tool_result" => ContentBlock::ToolResult {
                tool_use_id: str_field(block, "tool_use_id"),
                is_error: bool_field(block, "is_error"),
                content: block.get("content").cloned().unwrap_or(Value::Null),
            },
            other => ContentBlock::Unrecognized {
                block_type: other.to_string(),
            },
        }
    }
}
