#![allow(clippy::unwrap_used)]

use super::*;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_positional_skips_flags_and_values() {
    let a = args(&[
        "--config", "c.toml", "watch-file", "sms.txt", "--interval", "3", "--once",
    ]);
    assert_eq!(positional(&a), vec!["watch-file", "sms.txt"]);
}

#[test]
fn test_positional_keeps_help() {
    assert_eq!(positional(&args(&["--help"])), vec!["--help"]);
    assert_eq!(positional(&args(&["-h"])), vec!["-h"]);
}

#[test]
fn test_flag_value() {
    let a = args(&["watch-device", "--serial", "R58M123"]);
    assert_eq!(flag_value(&a, "--serial").as_deref(), Some("R58M123"));
    assert_eq!(flag_value(&a, "--interval"), None);
    assert!(!has_flag(&a, "--once"));
}

#[test]
fn test_interval_flag() {
    assert_eq!(interval_flag(&args(&["--interval", "15"])).unwrap(), Some(15));
    assert_eq!(interval_flag(&args(&[])).unwrap(), None);
    assert!(interval_flag(&args(&["--interval", "0"])).is_err());
    assert!(interval_flag(&args(&["--interval", "soon"])).is_err());
}

#[test]
fn test_message_arg_joins_words() {
    let msg = message_arg(&["Ksh5.00", "sent", "to", "Jo"], "parse").unwrap();
    assert_eq!(msg, "Ksh5.00 sent to Jo");
    assert!(message_arg(&[], "parse").is_err());
    assert!(message_arg(&["  "], "parse").is_err());
}

#[test]
fn test_shellexpand() {
    assert_eq!(shellexpand("/abs/path.csv"), "/abs/path.csv");
    assert!(!shellexpand("~/ledger.csv").starts_with('~'));
}

#[test]
fn test_process_appends_to_output() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("ledger.csv");
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "").unwrap();

    let a = args(&[
        "mpesa-logger",
        "--config",
        config.to_str().unwrap(),
        "--output",
        ledger.to_str().unwrap(),
        "process",
        "THK04TF1W4 Confirmed. Ksh250.00 sent to Antony Kiumbe on 20/8/25 at 10:15 AM.",
    ]);
    as_cli(&a).unwrap();
    as_cli(&a).unwrap();

    let rows = RecordStore::new(&ledger).load().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1][0], "THK04TF1W4");
    assert_eq!(rows[1][3], "Antony Kiumbe");
}

#[test]
fn test_watch_file_once() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("ledger.csv");
    let inbox = dir.path().join("sms.txt");
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "").unwrap();
    std::fs::write(
        &inbox,
        "ABC123XYZ7 Confirmed. Ksh500.00 received from John Doe on 21/8/25 at 2:30 PM.\nlunch?\n",
    )
    .unwrap();

    as_cli(&args(&[
        "mpesa-logger",
        "--config",
        config.to_str().unwrap(),
        "--output",
        ledger.to_str().unwrap(),
        "watch-file",
        inbox.to_str().unwrap(),
        "--once",
    ]))
    .unwrap();

    let rows = RecordStore::new(&ledger).load().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][2], "Receive Money");
}

#[test]
fn test_unknown_command() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "").unwrap();
    let err = as_cli(&args(&[
        "mpesa-logger",
        "--config",
        config.to_str().unwrap(),
        "frobnicate",
    ]))
    .unwrap_err();
    assert!(err.to_string().contains("frobnicate"));
}
