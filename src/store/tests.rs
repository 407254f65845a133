#![allow(clippy::unwrap_used)]

use super::*;
use crate::models::{Amount, TransactionType, NOT_AVAILABLE};
use chrono::NaiveDate;

fn amt(s: &str) -> Amount {
    Amount::parse(s).unwrap()
}

fn make_txn(code: &str) -> ParsedTransaction {
    ParsedTransaction {
        transaction_code: Some(code.into()),
        amount: amt("250.00"),
        transaction_type: TransactionType::SendMoney,
        counterparty: Some("Antony Kiumbe".into()),
        date: Some("20/8/25".into()),
        time: Some("10:15 AM".into()),
        new_balance: Some(amt("93.09")),
        transaction_cost: amt("7.00"),
        daily_limit_remaining: None,
        raw_message: format!("{code} Confirmed. Ksh250.00 sent, with \"quotes\"\nand a newline"),
        processed_at: NaiveDate::from_ymd_opt(2025, 8, 20)
            .unwrap()
            .and_hms_opt(10, 16, 0)
            .unwrap(),
    }
}

// ── ensure_schema ─────────────────────────────────────────────

#[test]
fn test_ensure_schema_creates_header() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("ledger.csv"));
    assert!(store.ensure_schema().unwrap());

    let rows = store.load().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0], header());
    assert_eq!(rows[0][0], "TransactionCode");
    assert_eq!(rows[0][10], "ProcessedDateTime");
}

#[test]
fn test_ensure_schema_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.csv");
    let store = RecordStore::new(&path);

    store.ensure_schema().unwrap();
    let once = fs::read(&path).unwrap();
    assert!(!store.ensure_schema().unwrap());
    let twice = fs::read(&path).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_ensure_schema_keeps_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("ledger.csv"));
    store.ensure_schema().unwrap();
    store.append(&make_txn("AAAAAAAAA1")).unwrap();

    store.ensure_schema().unwrap();
    assert_eq!(store.load().unwrap().len(), 2);
}

#[test]
fn test_ensure_schema_fills_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.csv");
    fs::write(&path, "").unwrap();

    let store = RecordStore::new(&path);
    assert!(store.ensure_schema().unwrap());
    assert_eq!(store.load().unwrap(), vec![header()]);
}

#[test]
fn test_ensure_schema_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("nested/deeper/ledger.csv"));
    store.ensure_schema().unwrap();
    assert!(store.path().exists());
}

// ── append ────────────────────────────────────────────────────

#[test]
fn test_append_n_rows_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("ledger.csv"));
    store.ensure_schema().unwrap();

    let codes = ["AAAAAAAAA1", "BBBBBBBBB2", "CCCCCCCCC3", "DDDDDDDDD4"];
    for code in codes {
        store.append(&make_txn(code)).unwrap();
    }

    let rows = store.load().unwrap();
    assert_eq!(rows.len(), codes.len() + 1);
    let stored: Vec<&str> = rows[1..].iter().map(|r| r[0].as_str()).collect();
    assert_eq!(stored, codes);
}

#[test]
fn test_append_round_trips_cells() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("ledger.csv"));
    store.ensure_schema().unwrap();

    let txn = make_txn("THK04TF1W4");
    store.append(&txn).unwrap();

    let rows = store.load().unwrap();
    assert_eq!(rows[1], txn.to_row().to_vec());
    assert_eq!(rows[1][1], "250.00");
    assert_eq!(rows[1][8], NOT_AVAILABLE);
    assert!(rows[1][9].contains('\n'));
}

#[test]
fn test_append_rewrites_whole_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.csv");
    let store = RecordStore::new(&path);
    store.ensure_schema().unwrap();

    store.append(&make_txn("AAAAAAAAA1")).unwrap();
    let first_len = fs::metadata(&path).unwrap().len();
    store.append(&make_txn("BBBBBBBBB2")).unwrap();
    let second_len = fs::metadata(&path).unwrap().len();

    // Each row is the same size, so the file grows linearly and the prefix survives
    assert!(second_len > first_len);
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("TransactionCode,Amount,TransactionType"));
}

#[test]
fn test_append_without_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("missing.csv"));
    let err = store.append(&make_txn("AAAAAAAAA1")).unwrap_err();
    assert!(matches!(err, StoreError::Open { .. }));
    assert!(err.to_string().contains("missing.csv"));
}

#[test]
fn test_ensure_schema_fails_under_file() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let store = RecordStore::new(blocker.join("ledger.csv"));
    let err = store.ensure_schema().unwrap_err();
    assert!(matches!(err, StoreError::Create { .. }));
}
