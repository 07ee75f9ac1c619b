//! Tflat - flatten AI coding session transcripts into tables or CSV
//!
//! This crate turns a newline-delimited JSON transcript (conversational
//! turns, tool invocations, tool results) into flat 19-column rows and
//! renders them either as an aligned terminal table or as a CSV file:
//! - Tail-limited or whole-file line reading
//! - Record classification and per-content-block row building
//! - Row limiting to the last N rows
//! - Table and CSV rendering
//!
//! # Usage
//!
//! As a library:
//! ```ignore
//! use std::path::Path;
//!
//! let lines = tflat::read_lines(Path::new("session.jsonl"), false)?;
//! let rows = tflat::limit_rows(tflat::flatten_lines(&lines), Some(50));
//! print!("{}", tflat::render::csv_string(&rows));
//! ```
//!
//! As a CLI:
//! ```text
//! tflat session.jsonl 50
//! tflat session.jsonl --csv session.csv
//! ```

pub mod error;
pub mod parser;
pub mod reader;
pub mod render;

// Re-export main types for convenience
pub use error::{FlattenError, Result};
pub use parser::{
    flatten_lines, flatten_record, limit_rows, ContentBlock, RecordKind, Row, FIELD_NAMES,
};
pub use reader::{read_lines, TAIL_BYTES};
