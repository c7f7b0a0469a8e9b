//! CSV / XLSX export of the loaded customer table

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use shared::models::{FIXED_COLUMNS, FixedColumn, SchemaKind};
use shared::util::display_date;
use shared::{CustomerId, CustomerRecord, FixedFields};
use tracing::{debug, instrument};

use crate::error::{TabularError, TabularResult};

/// One exported cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn to_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
        }
    }
}

impl From<&CustomerId> for Cell {
    fn from(id: &CustomerId) -> Self {
        match id {
            CustomerId::Int(i) => Cell::Number(*i as f64),
            CustomerId::Text(s) => Cell::Text(s.clone()),
        }
    }
}

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    /// Default download name
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Csv => "customers.csv",
            Self::Xlsx => "customers.xlsx",
        }
    }

    pub fn render(self, table: &ExportTable) -> TabularResult<Vec<u8>> {
        match self {
            Self::Csv => Ok(to_csv(table).into_bytes()),
            Self::Xlsx => to_xlsx(table),
        }
    }
}

/// Header row plus cells, column set decided by the record shape
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ExportTable {
    /// Build from a table snapshot.
    ///
    /// Fixed records use the canonical columns; dynamic records use `ID`
    /// followed by every dynamic key in first-seen order. The first record
    /// decides; an empty table gets the canonical headers.
    pub fn from_records(records: &[CustomerRecord]) -> Self {
        let kind = records
            .first()
            .map(CustomerRecord::kind)
            .unwrap_or(SchemaKind::Fixed);
        match kind {
            SchemaKind::Fixed => Self::fixed(records),
            SchemaKind::Dynamic => Self::dynamic(records),
        }
    }

    fn fixed(records: &[CustomerRecord]) -> Self {
        let headers = FIXED_COLUMNS.iter().map(|c| c.label().to_string()).collect();
        let rows = records
            .iter()
            .map(|record| match record {
                CustomerRecord::Fixed(f) => FIXED_COLUMNS.iter().map(|c| fixed_cell(f, *c)).collect(),
                CustomerRecord::Dynamic(d) => {
                    let mut row = vec![Cell::Text(String::new()); FIXED_COLUMNS.len()];
                    row[0] = Cell::from(&d.id);
                    row
                }
            })
            .collect();
        Self { headers, rows }
    }

    fn dynamic(records: &[CustomerRecord]) -> Self {
        let mut keys: Vec<&str> = Vec::new();
        for record in records {
            if let CustomerRecord::Dynamic(d) = record {
                for key in d.dynamic_fields.keys() {
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                let mut row = Vec::with_capacity(keys.len() + 1);
                row.push(Cell::from(record.id()));
                for key in &keys {
                    let value = record
                        .as_dynamic()
                        .and_then(|d| d.dynamic_fields.get(key))
                        .unwrap_or_default();
                    row.push(Cell::Text(value.to_string()));
                }
                row
            })
            .collect();

        let mut headers = vec!["ID".to_string()];
        headers.extend(keys.iter().map(|k| k.to_string()));
        Self { headers, rows }
    }
}

fn fixed_cell(f: &FixedFields, column: FixedColumn) -> Cell {
    match column {
        FixedColumn::Id => Cell::from(&f.id),
        FixedColumn::EarnedPoints => Cell::Number(f.earned_points as f64),
        FixedColumn::TotalVisits => Cell::Number(f.total_visits as f64),
        FixedColumn::TotalSpend => Cell::Number(f.total_spend),
        FixedColumn::IsEmployee => Cell::Bool(f.is_employee),
        c if c.is_date() => Cell::Text(display_date(&f.column_text(c))),
        c => Cell::Text(f.column_text(c)),
    }
}

/// Quote a CSV field when it contains a comma, quote or line break
fn escape_csv(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render the table as CSV text (header row first, `\n` line endings)
pub fn to_csv(table: &ExportTable) -> String {
    let mut out = String::new();
    let header: Vec<String> = table.headers.iter().map(|h| escape_csv(h)).collect();
    out.push_str(&header.join(","));
    out.push('\n');
    for row in &table.rows {
        let line: Vec<String> = row.iter().map(|c| escape_csv(&c.to_text())).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

/// Render the table as an XLSX workbook with a single "Customers" sheet
#[instrument(skip(table), fields(rows = table.rows.len()))]
pub fn to_xlsx(table: &ExportTable) -> TabularResult<Vec<u8>> {
    if table.headers.is_empty() {
        return Err(TabularError::NoColumns);
    }

    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    worksheet.set_name("Customers")?;

    let bold = Format::new().set_bold();
    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header.as_str(), &bold)?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let r = (r + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(s) => worksheet.write_string(r, col, s.as_str())?,
                Cell::Number(n) => worksheet.write_number(r, col, *n)?,
                Cell::Bool(b) => worksheet.write_boolean(r, col, *b)?,
            };
        }
    }

    workbook.push_worksheet(worksheet);
    let buffer = workbook.save_to_buffer()?;
    debug!(bytes = buffer.len(), "Rendered XLSX");
    Ok(buffer)
}
