// insiders-tabular/tests/ingest_pipeline.rs
// CSV text → canonical records, end to end

use insiders_tabular::{ExportTable, Reconciler, normalize_key, parse_csv, to_csv};
use shared::CustomerId;

#[test]
fn test_jane_doe_upload() {
    let rows = parse_csv("ID,Name,Phone,Points\n1,Jane Doe,555-1234,150\n");
    let records = Reconciler::new().reconcile_rows(&rows);
    assert_eq!(records.len(), 1);

    let jane = records[0].as_fixed().expect("fixed record");
    assert_eq!(jane.id, CustomerId::Text("1".into()));
    assert_eq!(jane.name, "Jane Doe");
    assert_eq!(jane.phone, "555-1234");
    assert_eq!(jane.earned_points, 150);
    assert_eq!(jane.total_visits, 0);
    assert_eq!(jane.total_spend, 0.0);
    assert!(!jane.is_employee);
}

#[test]
fn test_excel_utf8_bom_keeps_first_column() {
    let rows = parse_csv("\u{feff}Name,Phone,Points\nJane Doe,555-1234,150\n");
    let records = Reconciler::new().reconcile_rows(&rows);
    let jane = records[0].as_fixed().expect("fixed record");
    assert_eq!(jane.name, "Jane Doe");
    assert_eq!(jane.earned_points, 150);
}

#[test]
fn test_only_non_blank_rows_survive_in_order() {
    let text = "Name,Email\r\n\
                Ann,ann@x.com\r\n\
                ,\r\n\
                \"Smith, John\",john@x.com\r\n\
                \r\n\
                ,late@x.com\r\n";
    let rows = parse_csv(text);
    let names: Vec<&str> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Ann", "Smith, John", ""]);
    for row in &rows {
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "email"]);
    }
}

#[test]
fn test_rows_without_ids_get_ordinals() {
    let rows = parse_csv("name\na\nb\nc\n");
    let records = Reconciler::new().reconcile_rows(&rows);
    let ids: Vec<CustomerId> = records.iter().map(|r| r.id().clone()).collect();
    assert_eq!(ids, vec![CustomerId::Int(1), CustomerId::Int(2), CustomerId::Int(3)]);
}

#[test]
fn test_unparsable_metrics_default_to_zero() {
    let rows = parse_csv(
        "name,points,total visits,total spend,is employee\n\
         a,N/A,,abc,no\n\
         b,-20,3 visits,$4,TRUE\n",
    );
    let records = Reconciler::new().reconcile_rows(&rows);
    let a = records[0].as_fixed().unwrap();
    assert_eq!((a.earned_points, a.total_visits, a.total_spend, a.is_employee), (0, 0, 0.0, false));
    let b = records[1].as_fixed().unwrap();
    assert_eq!((b.earned_points, b.total_visits, b.total_spend, b.is_employee), (0, 3, 0.0, true));
}

#[test]
fn test_reconcile_is_idempotent_over_a_batch() {
    let rows = parse_csv(
        "Customer Name,Phone No,Points Earned,Last Purchase,Employee\n\
         Ann,555,10,2024-05-01,yes\n\
         Bob,,x,,\n",
    );
    let reconciler = Reconciler::new();
    let once = reconciler.reconcile_rows(&rows);
    let again_rows: Vec<_> = once.iter().map(|r| r.to_row()).collect();
    let twice = reconciler.reconcile_rows(&again_rows);
    assert_eq!(once, twice);
}

#[test]
fn test_header_normalization_collapses_variants() {
    let keys = ["Phone No", "phone_no", "PhoneNo"].map(normalize_key);
    assert!(keys.iter().all(|k| k == "phoneno"));
}

#[test]
fn test_upload_then_export_round() {
    let rows = parse_csv("id,name,points\n7,\"Lee, Ann\",20\n");
    let records = Reconciler::new().reconcile_rows(&rows);
    let csv = to_csv(&ExportTable::from_records(&records));
    let data = csv.lines().nth(1).unwrap();
    assert!(data.starts_with("7,,\"Lee, Ann\","));
}
