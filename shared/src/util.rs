use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Display form of a date-valued field: `yyyy-mm-dd`
///
/// Accepts RFC 3339 timestamps, `yyyy-mm-dd[ T]hh:mm:ss` and plain
/// `yyyy-mm-dd`. Anything else is returned unchanged so odd backend
/// values still show up in the table.
pub fn display_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return dt.date().format("%Y-%m-%d").to_string();
        }
    }
    if let Some(prefix) = raw.get(..10)
        && let Ok(d) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
    {
        return d.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}
