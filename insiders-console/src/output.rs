//! Plain-text rendering for stdout

use std::fmt::Write;

use insiders_tabular::ExportTable;
use shared::models::FIXED_COLUMNS;
use shared::util::display_date;
use shared::{CustomerRecord, InsiderTier};

/// Widest a column is allowed to get before cells are cut
const MAX_WIDTH: usize = 32;

fn clip(text: &str) -> String {
    if text.chars().count() <= MAX_WIDTH {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_WIDTH - 1).collect();
    cut.push('…');
    cut
}

/// Aligned text table with a header rule
pub fn render_table(table: &ExportTable) -> String {
    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|c| clip(&c.to_text())).collect())
        .collect();
    let headers: Vec<String> = table.headers.iter().map(|h| clip(h)).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |values: &[String]| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{v:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", line(&headers));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", line(&rule));
    for row in &cells {
        let _ = writeln!(out, "{}", line(row));
    }
    out
}

/// One record as `label: value` lines
pub fn render_record(record: &CustomerRecord) -> String {
    let mut out = String::new();
    match record {
        CustomerRecord::Fixed(f) => {
            for column in FIXED_COLUMNS {
                let label = format!("{}:", column.label());
                let text = f.column_text(*column);
                let value = if column.is_date() {
                    display_date(&text)
                } else {
                    text
                };
                let _ = writeln!(out, "{label:<28} {value}");
            }
        }
        CustomerRecord::Dynamic(d) => {
            let _ = writeln!(out, "{:<28} {}", "ID:", d.id);
            for (key, value) in d.dynamic_fields.iter() {
                let label = format!("{key}:");
                let _ = writeln!(out, "{label:<28} {value}");
            }
        }
    }
    out
}

/// Profile card for the signed-in customer
pub fn render_profile(record: &CustomerRecord) -> String {
    let Some(f) = record.as_fixed() else {
        return render_record(record);
    };
    let tier = f.tier();
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", f.name, f.email);
    if !f.phone.is_empty() {
        let _ = writeln!(out, "Phone:        {}", f.phone);
    }
    if !f.sign_up_date.is_empty() {
        let _ = writeln!(out, "Member since: {}", display_date(&f.sign_up_date));
    }
    let _ = writeln!(out, "Tier:         {tier}");
    let _ = writeln!(out, "Points:       {}", f.earned_points);
    match InsiderTier::points_to_next(f.earned_points) {
        Some(n) => {
            let _ = writeln!(out, "Next tier in: {n} points");
        }
        None => {
            let _ = writeln!(out, "Top tier reached");
        }
    }
    let _ = writeln!(out, "Visits:       {}", f.total_visits);
    let _ = writeln!(out, "Total spend:  {:.2}", f.total_spend);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{CustomerId, FixedFields};

    fn ann(points: u64) -> CustomerRecord {
        let mut f = FixedFields::new(CustomerId::Int(1));
        f.name = "Ann".into();
        f.email = "ann@x.com".into();
        f.earned_points = points;
        f.into()
    }

    #[test]
    fn test_table_alignment() {
        let table = ExportTable::from_records(&[ann(5)]);
        let text = render_table(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID  Display ID  Name"));
        assert!(lines[1].starts_with("--  ----------  ----"));
        assert!(lines[2].starts_with("1               Ann"));
    }

    #[test]
    fn test_clip_long_cells() {
        let long = "x".repeat(50);
        assert_eq!(clip(&long).chars().count(), MAX_WIDTH);
        assert_eq!(clip("short"), "short");
    }

    #[test]
    fn test_profile_tier() {
        let text = render_profile(&ann(1200));
        assert!(text.contains("Tier:         Gold"));
        assert!(text.contains("Next tier in: 800 points"));
        assert!(render_profile(&ann(2500)).contains("Top tier reached"));
    }

    #[test]
    fn test_record_dates_shortened() {
        let mut f = FixedFields::new(CustomerId::Int(1));
        f.sign_up_date = "2024-03-05T10:11:12.000Z".into();
        f.end_date = "someday".into();
        let record: CustomerRecord = f.into();

        let text = render_record(&record);
        let sign_up = text
            .lines()
            .find(|l| l.starts_with("Sign Up Date:"))
            .unwrap();
        assert!(sign_up.ends_with(" 2024-03-05"));
        assert!(!text.contains("10:11:12"));
        assert!(text.lines().any(|l| l.starts_with("End Date:") && l.ends_with(" someday")));

        assert!(render_profile(&record).contains("Member since: 2024-03-05"));
    }
}
