//! Fallback CSV parser
//!
//! Used when the upload endpoint does not hand back structured rows and
//! the original file text has to be read on the client. Deliberately
//! permissive: ragged rows are kept, nothing is rejected.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::RawRow;

/// Split one CSV line into fields.
///
/// A `"` toggles quoted mode, `""` inside quotes is a literal quote, and
/// `,` only separates fields outside quotes. The trailing field is always
/// flushed, so `a,` yields `["a", ""]`.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Parse raw CSV text into rows keyed by lower-cased header names.
///
/// - Lines split on `\n` / `\r\n`, trimmed, blank lines dropped
/// - First remaining line is the header (fields trimmed + lower-cased)
/// - Rows whose fields are all blank are dropped
/// - Short rows get `""` for the missing trailing columns, extra fields are ignored
///
/// Fewer than two non-blank lines means there is no data: the result is empty.
/// A leading UTF-8 byte-order mark is dropped.
#[instrument(skip(text), fields(bytes = text.len()))]
pub fn parse_csv(text: &str) -> Vec<RawRow> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let lines: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.len() < 2 {
        debug!(lines = lines.len(), "CSV has no data rows");
        return Vec::new();
    }

    let headers: Vec<String> = parse_csv_line(lines[0])
        .into_iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut rows = Vec::with_capacity(lines.len() - 1);
    for line in &lines[1..] {
        let values: Vec<String> = parse_csv_line(line)
            .into_iter()
            .map(|v| v.trim().to_string())
            .collect();

        if values.iter().all(|v| v.is_empty()) {
            continue;
        }

        let mut row = RawRow::new();
        for (i, header) in headers.iter().enumerate() {
            let value = values.get(i).cloned().unwrap_or_default();
            row.insert(header.clone(), Value::String(value));
        }
        rows.push(row);
    }

    debug!(rows = rows.len(), columns = headers.len(), "Parsed CSV fallback");
    rows
}
