#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn expense(title: &str, amount: Option<rust_decimal::Decimal>, recurring: bool) -> Expense {
    Expense {
        id: 1,
        user_id: 1,
        title: title.into(),
        amount,
        category: "Bills & Utilities".into(),
        date: NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
        is_recurring: recurring,
        created_at: String::new(),
        updated_at: String::new(),
    }
}

#[test]
fn test_export_writes_header_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let rows = vec![
        expense("Power, water", Some(dec!(80.25)), true),
        expense("Broken row", None, false),
    ];

    let count = export_csv(&path, &rows).unwrap();
    assert_eq!(count, 2);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "date,title,category,amount,recurring");
    assert_eq!(lines[1], "2024-05-03,\"Power, water\",Bills & Utilities,80.25,true");
    assert_eq!(lines[2], "2024-05-03,Broken row,Bills & Utilities,,false");
}

#[test]
fn test_export_empty_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    assert_eq!(export_csv(&path, &[]).unwrap(), 0);
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.trim_end(), "date,title,category,amount,recurring");
}

#[test]
fn test_export_to_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope").join("out.csv");
    assert!(export_csv(&path, &[]).is_err());
}

#[test]
fn test_default_export_path() {
    let today = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
    let path = default_export_path(Path::new("/tmp"), today);
    assert_eq!(path, PathBuf::from("/tmp/spendwise-export-2024-01-09.csv"));
}
