use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::models::ParsedTransaction;
use crate::store::RecordStore;

/// Flags that take a value, so their value is not mistaken for a positional.
const VALUED_FLAGS: &[&str] = &["--config", "--output", "--interval", "--serial"];

pub(crate) fn as_cli(args: &[String]) -> Result<()> {
    let rest = &args[1..];
    let config_path = flag_value(rest, "--config").map(|p| PathBuf::from(shellexpand(&p)));
    let mut config = Config::locate(config_path.as_deref())?;
    if let Some(output) = flag_value(rest, "--output") {
        config.output = Some(PathBuf::from(shellexpand(&output)));
    }

    let positional = positional(rest);
    let Some((command, operands)) = positional.split_first() else {
        print_usage();
        return Ok(());
    };

    match *command {
        "parse" | "p" => cli_parse(operands, &config),
        "process" => cli_process(operands, &config),
        "watch-file" => cli_watch_file(operands, rest, &mut config),
        "watch-device" => cli_watch_device(rest, &mut config),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("mpesa-logger {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

pub(crate) fn print_usage() {
    println!("mpesa-logger - log M-PESA notification messages to a CSV ledger");
    println!();
    println!("Usage: mpesa-logger [--config <file>] [--output <file.csv>] <command>");
    println!();
    println!("Commands:");
    println!("  parse <message>               Parse a message and print the fields");
    println!("  process <message>             Parse a message and append it to the ledger");
    println!("  watch-file <path>             Poll a text file, one message per line");
    println!("    --interval <secs>           Poll interval (default: 5)");
    println!("    --once                      Run a single poll and exit");
    println!("  watch-device                  Poll unread SMS on a phone through adb");
    println!("    --serial <id>               Device serial when several are attached");
    println!("    --interval <secs>           Poll interval (default: 10)");
    println!("    --once                      Run a single poll and exit");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Watch commands run until interrupted (Ctrl-C).");
    println!("Set RUST_LOG=debug for more detail.");
}

fn cli_parse(operands: &[&str], config: &Config) -> Result<()> {
    let message = message_arg(operands, "parse")?;
    let parser = config.parser()?;
    if !config.relevance_filter().is_relevant(&message) {
        println!("Note: message does not look like an M-PESA notification");
    }
    print_summary(&parser.parse(&message));
    Ok(())
}

fn cli_process(operands: &[&str], config: &Config) -> Result<()> {
    let message = message_arg(operands, "process")?;
    let parser = config.parser()?;
    let store = open_store(config)?;

    println!("Processing message: {}...", message.chars().take(50).collect::<String>());
    let txn = parser.parse(&message);
    store
        .append(&txn)
        .context("Failed to add transaction to ledger")?;
    println!("Transaction {} added to {}", txn.code(), store.path().display());
    print_summary(&txn);
    Ok(())
}

fn cli_watch_file(operands: &[&str], args: &[String], config: &mut Config) -> Result<()> {
    let path = operands
        .first()
        .map(|p| shellexpand(p))
        .ok_or_else(|| anyhow::anyhow!("Usage: mpesa-logger watch-file <path> [--interval <secs>] [--once]"))?;
    if let Some(secs) = interval_flag(args)? {
        config.file.interval_secs = secs;
    }
    let store = open_store(config)?;
    super::watch::file(Path::new(&path), config, store, has_flag(args, "--once"))
}

fn cli_watch_device(args: &[String], config: &mut Config) -> Result<()> {
    if let Some(serial) = flag_value(args, "--serial") {
        config.device.serial = Some(serial);
    }
    if let Some(secs) = interval_flag(args)? {
        config.device.interval_secs = secs;
    }
    let store = open_store(config)?;
    super::watch::device(config, store, has_flag(args, "--once"))
}

fn open_store(config: &Config) -> Result<RecordStore> {
    let store = RecordStore::new(config.store_path()?);
    if !store.ensure_schema()? {
        log::info!("Using existing ledger {}", store.path().display());
    }
    Ok(store)
}

fn message_arg(operands: &[&str], command: &str) -> Result<String> {
    // Unquoted messages arrive split on whitespace
    let message = operands.join(" ");
    if message.trim().is_empty() {
        anyhow::bail!("Usage: mpesa-logger {command} <message>");
    }
    Ok(message)
}

fn interval_flag(args: &[String]) -> Result<Option<u64>> {
    let Some(raw) = flag_value(args, "--interval") else {
        return Ok(None);
    };
    let secs: u64 = raw
        .parse()
        .with_context(|| format!("Invalid --interval '{raw}', expected whole seconds"))?;
    if secs == 0 {
        anyhow::bail!("--interval must be at least 1 second");
    }
    Ok(Some(secs))
}

fn print_summary(txn: &ParsedTransaction) {
    println!("{}", txn.summary());
}

pub(crate) fn flag_value(args: &[String], name: &str) -> Option<String> {
    args.windows(2).find(|w| w[0] == name).map(|w| w[1].clone())
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

/// Arguments that are neither flags nor the values of valued flags.
fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUED_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
            continue;
        }
        if arg.starts_with("--") && arg.len() > 2 && !is_command_flag(arg) {
            continue;
        }
        out.push(arg.as_str());
    }
    out
}

fn is_command_flag(arg: &str) -> bool {
    matches!(arg, "--help" | "--version")
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
