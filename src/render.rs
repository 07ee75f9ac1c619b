//! Row rendering: fixed-width terminal table and CSV export

use crate::parser::common::truncate_chars;
use crate::parser::{Row, FIELD_NAMES};
use crate::Result;
use std::io::{self, Write};
use std::path::Path;

/// Widths of the table columns: TIME, TYPE, ROLE, C_TYPE, TOOL, RID. The
/// CONTENT column is unbounded.
const COL_WIDTHS: [usize; 6] = [9, 12, 10, 12, 10, 18];
const SEPARATOR_LEN: usize = 130;

/// Characters of `content` kept in table mode.
const TABLE_CONTENT_LIMIT: usize = 100;
/// Characters of `requestId` kept in table mode.
const TABLE_RID_LIMIT: usize = 16;

/// Print rows as a left-justified fixed-width table.
///
/// Over-width values overflow their column rather than being clipped; only
/// `content`, `requestId`, and the date prefix of `time` are cut down.
pub fn render_table(rows: &[Row], out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "{:<w0$} {:<w1$} {:<w2$} {:<w3$} {:<w4$} {:<w5$} CONTENT",
        "TIME",
        "TYPE",
        "ROLE",
        "C_TYPE",
        "TOOL",
        "RID",
        w0 = COL_WIDTHS[0],
        w1 = COL_WIDTHS[1],
        w2 = COL_WIDTHS[2],
        w3 = COL_WIDTHS[3],
        w4 = COL_WIDTHS[4],
        w5 = COL_WIDTHS[5],
    )?;
    writeln!(out, "{}", "-".repeat(SEPARATOR_LEN))?;

    for row in rows {
        let content = truncate_chars(&row.content.replace('\n', " | "), TABLE_CONTENT_LIMIT);
        let rid = truncate_chars(&row.request_id, TABLE_RID_LIMIT);
        let time = time_of_day(&row.time);

        writeln!(
            out,
            "{:<w0$} {:<w1$} {:<w2$} {:<w3$} {:<w4$} {:<w5$} {}",
            time,
            row.record_type,
            row.message_role,
            row.content_type,
            row.tool_name,
            rid,
            content,
            w0 = COL_WIDTHS[0],
            w1 = COL_WIDTHS[1],
            w2 = COL_WIDTHS[2],
            w3 = COL_WIDTHS[3],
            w4 = COL_WIDTHS[4],
            w5 = COL_WIDTHS[5],
        )?;
    }

    Ok(())
}

/// Drop the `YYYY-MM-DD ` prefix from a formatted timestamp. Values of 11
/// characters or fewer pass through unchanged.
fn time_of_day(time: &str) -> String {
    if time.chars().count() > 11 {
        time.chars().skip(11).collect()
    } else {
        time.to_string()
    }
}

/// Build the full CSV document: one header row of the 19 field names, one
/// line per row, RFC 4180 quoting, CRLF line endings.
pub fn csv_string(rows: &[Row]) -> String {
    let mut csv = String::new();

    csv.push_str(&FIELD_NAMES.join(","));
    csv.push_str("\r\n");

    for row in rows {
        let values = row.values();
        let line = values
            .iter()
            .map(|v| escape_csv_field(v))
            .collect::<Vec<_>>()
            .join(",");
        csv.push_str(&line);
        csv.push_str("\r\n");
    }

    csv
}

/// Write rows as CSV to `path`.
pub fn write_csv(rows: &[Row], path: &Path) -> Result<()> {
    std::fs::write(path, csv_string(rows))?;
    tracing::debug!("wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Escape a CSV field per RFC 4180: quote when the field contains a comma,
/// double quote, or line break, doubling any embedded quotes.
fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
