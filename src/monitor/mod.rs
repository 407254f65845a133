use std::collections::HashSet;
use std::thread;
use std::time::Duration;

use crate::models::ParsedTransaction;
use crate::parse::{MessageParser, RelevanceFilter};
use crate::source::{MessageKey, MessageSource, RawMessage};
use crate::store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MonitorState {
    Idle,
    Querying,
    Dispatching,
}

/// Keys of messages already handed to the parser during this run.
#[derive(Debug, Default)]
pub(crate) struct SeenSet {
    keys: HashSet<MessageKey>,
}

impl SeenSet {
    pub(crate) fn contains(&self, key: &MessageKey) -> bool {
        self.keys.contains(key)
    }

    pub(crate) fn insert(&mut self, key: MessageKey) -> bool {
        self.keys.insert(key)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }
}

/// What one poll cycle did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct CycleReport {
    pub(crate) fetched: usize,
    pub(crate) already_seen: usize,
    pub(crate) irrelevant: usize,
    pub(crate) appended: usize,
    /// Transactions written this cycle, in order.
    pub(crate) logged: Vec<ParsedTransaction>,
    pub(crate) store_failures: usize,
    pub(crate) source_failed: bool,
}

pub(crate) struct Monitor<S> {
    source: S,
    parser: MessageParser,
    filter: RelevanceFilter,
    store: RecordStore,
    seen: SeenSet,
    state: MonitorState,
    interval: Duration,
}

impl<S: MessageSource> Monitor<S> {
    pub(crate) fn new(
        source: S,
        parser: MessageParser,
        filter: RelevanceFilter,
        store: RecordStore,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            parser,
            filter,
            store,
            seen: SeenSet::default(),
            state: MonitorState::Idle,
            interval,
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> MonitorState {
        self.state
    }

    #[cfg(test)]
    pub(crate) fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// Poll until `keep_going` returns false. Sleeps `interval` between
    /// cycles and nowhere else.
    pub(crate) fn run(&mut self, mut keep_going: impl FnMut(&CycleReport) -> bool) {
        log::info!(
            "Monitoring {} every {}s, logging to {}",
            self.source.describe(),
            self.interval.as_secs_f32(),
            self.store.path().display()
        );
        loop {
            let report = self.run_cycle();
            if !keep_going(&report) {
                break;
            }
            thread::sleep(self.interval);
        }
    }

    /// One Idle → Querying → Dispatching → Idle pass. Source and store
    /// failures are logged and reported, never returned.
    pub(crate) fn run_cycle(&mut self) -> CycleReport {
        self.transition(MonitorState::Querying);
        let messages = match self.source.fetch() {
            Ok(messages) => messages,
            Err(e) => {
                log::warn!(
                    "Skipping poll of {}: {:#}",
                    self.source.describe(),
                    anyhow::Error::new(e)
                );
                self.transition(MonitorState::Idle);
                return CycleReport {
                    source_failed: true,
                    ..CycleReport::default()
                };
            }
        };

        self.transition(MonitorState::Dispatching);
        let report = dispatch(
            &mut self.seen,
            messages,
            &self.filter,
            &self.parser,
            &self.store,
        );
        self.transition(MonitorState::Idle);
        report
    }

    fn transition(&mut self, next: MonitorState) {
        log::debug!("{:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

/// Parse and store every new relevant message. A message is marked seen once
/// it has been parsed, whether or not the store accepted it, so a failed
/// write is never retried.
fn dispatch(
    seen: &mut SeenSet,
    messages: Vec<RawMessage>,
    filter: &RelevanceFilter,
    parser: &MessageParser,
    store: &RecordStore,
) -> CycleReport {
    let mut report = CycleReport {
        fetched: messages.len(),
        ..CycleReport::default()
    };

    for msg in messages {
        if msg.key.is_some_and(|k| seen.contains(&k)) {
            report.already_seen += 1;
            continue;
        }
        if !filter.is_relevant(&msg.body) {
            log::debug!("Ignoring non M-PESA message: {}", preview(&msg.body));
            report.irrelevant += 1;
            continue;
        }

        let txn = parser.parse(&msg.body);
        match store.append(&txn) {
            Ok(()) => {
                log::info!(
                    "Logged {} {}: Ksh {} ({}) at {}",
                    txn.code(),
                    txn.transaction_type,
                    txn.amount,
                    txn.counterparty(),
                    txn.date_time(),
                );
                report.appended += 1;
                report.logged.push(txn);
            }
            Err(e) => {
                log::error!("{:#}", anyhow::Error::new(e));
                report.store_failures += 1;
            }
        }

        if let Some(key) = msg.key {
            seen.insert(key);
        }
    }

    report
}

fn preview(body: &str) -> String {
    let mut s: String = body.chars().take(50).collect();
    if body.chars().count() > 50 {
        s.push('…');
    }
    s
}
