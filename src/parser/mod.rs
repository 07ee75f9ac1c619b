//! Transcript record flattening
//!
//! Classifies each JSONL record on its `type` discriminant and builds the
//! fixed 19-column rows the renderers consume.

pub mod claude_code;
pub mod common;
pub mod types;

pub use claude_code::{flatten_lines, flatten_record};
pub use common::{fmt_ts, short_ts};
pub use types::{ContentBlock, RecordKind, Row, FIELD_NAMES};

/// Keep only the last `count` rows, in produced order.
pub fn limit_rows(mut rows: Vec<Row>, count: Option<usize>) -> Vec<Row> {
    if let Some(k) = count {
        if rows.len() > k {
            rows.drain(..rows.len() - k);
        }
    }
    rows
}
