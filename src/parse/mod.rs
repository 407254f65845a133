mod classify;
mod patterns;
mod relevance;

pub(crate) use patterns::Patterns;
pub(crate) use relevance::{RelevanceFilter, DEFAULT_KEYWORDS};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use regex::Regex;

use crate::models::{Amount, ParsedTransaction};
use classify::Rule;

/// Compiled extraction patterns. Building one can fail on a bad pattern;
/// parsing a message with it cannot.
pub(crate) struct MessageParser {
    code: Regex,
    amount: Regex,
    date_time: Regex,
    new_balance: Regex,
    transaction_cost: Regex,
    daily_limit: Regex,
    rules: Vec<Rule>,
}

impl MessageParser {
    pub(crate) fn new(patterns: &Patterns) -> Result<Self> {
        Ok(Self {
            code: compile("code", &patterns.code, 1)?,
            amount: compile("amount", &patterns.amount, 1)?,
            date_time: compile("date_time", &patterns.date_time, 2)?,
            new_balance: compile("new_balance", &patterns.new_balance, 1)?,
            transaction_cost: compile("transaction_cost", &patterns.transaction_cost, 1)?,
            daily_limit: compile("daily_limit", &patterns.daily_limit, 1)?,
            rules: classify::rules(
                compile("sent_to", &patterns.sent_to, 1)?,
                compile("received_from", &patterns.received_from, 1)?,
                compile("paid_to", &patterns.paid_to, 1)?,
            ),
        })
    }

    pub(crate) fn parse(&self, message: &str) -> ParsedTransaction {
        self.parse_at(message, chrono::Local::now().naive_local())
    }

    pub(crate) fn parse_at(&self, message: &str, processed_at: NaiveDateTime) -> ParsedTransaction {
        let (transaction_type, counterparty) = classify::classify(&self.rules, message);

        // Date and time come from one pattern: both or neither
        let (date, time) = self
            .date_time
            .captures(message)
            .and_then(|caps| {
                let date = caps.get(1)?.as_str().trim();
                let time = caps.get(2)?.as_str().trim();
                Some((date.to_string(), time.to_string()))
            })
            .filter(|(date, time)| !date.is_empty() && !time.is_empty())
            .unzip();

        ParsedTransaction {
            transaction_code: first_capture(&self.code, message),
            amount: capture_amount(&self.amount, message).unwrap_or_else(Amount::zero),
            transaction_type,
            counterparty,
            date,
            time,
            new_balance: capture_amount(&self.new_balance, message),
            transaction_cost: capture_amount(&self.transaction_cost, message)
                .unwrap_or_else(Amount::zero),
            daily_limit_remaining: capture_amount(&self.daily_limit, message),
            raw_message: message.to_string(),
            processed_at,
        }
    }
}

fn compile(name: &str, pattern: &str, groups: usize) -> Result<Regex> {
    let re = Regex::new(pattern).with_context(|| format!("Invalid pattern '{name}': {pattern}"))?;
    // captures_len counts the implicit whole-match group
    if re.captures_len() <= groups {
        anyhow::bail!(
            "Pattern '{name}' needs {groups} capture group(s), found {}: {pattern}",
            re.captures_len() - 1
        );
    }
    Ok(re)
}

/// Trimmed text of capture group 1, `None` when absent or blank.
fn first_capture(re: &Regex, message: &str) -> Option<String> {
    re.captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn capture_amount(re: &Regex, message: &str) -> Option<Amount> {
    first_capture(re, message).and_then(|raw| Amount::parse(&raw))
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
