use anyhow::Result;
use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::monitor::{CycleReport, Monitor};
use crate::source::{DeviceSource, FileSource, MessageSource};
use crate::store::RecordStore;

pub(crate) fn file(path: &Path, config: &Config, store: RecordStore, once: bool) -> Result<()> {
    let source = FileSource::new(path);
    if !source.path().exists() {
        log::warn!(
            "{} does not exist yet, waiting for it to appear",
            source.path().display()
        );
    }
    watch(source, config, store, config.file_interval(), once)
}

pub(crate) fn device(config: &Config, store: RecordStore, once: bool) -> Result<()> {
    let source = DeviceSource::new(config.device.program.as_str(), config.device.serial.clone());
    watch(source, config, store, config.device_interval(), once)
}

fn watch<S: MessageSource>(
    source: S,
    config: &Config,
    store: RecordStore,
    interval: Duration,
    once: bool,
) -> Result<()> {
    let mut monitor = Monitor::new(
        source,
        config.parser()?,
        config.relevance_filter(),
        store,
        interval,
    );

    if once {
        let report = monitor.run_cycle();
        print_report(&report);
        if report.source_failed {
            anyhow::bail!("Poll failed, see log for details");
        }
        return Ok(());
    }

    monitor.run(|report| {
        if report.appended > 0 || report.store_failures > 0 {
            print_report(report);
        }
        true
    });
    Ok(())
}

fn print_report(report: &CycleReport) {
    if report.source_failed {
        println!("Poll failed");
        return;
    }
    for txn in &report.logged {
        println!("New M-PESA transaction {}:", txn.code());
        println!("{}", txn.summary());
    }
    println!(
        "Fetched {}, logged {}, ignored {}, already seen {}, failed {}",
        report.fetched,
        report.appended,
        report.irrelevant,
        report.already_seen,
        report.store_failures
    );
}
