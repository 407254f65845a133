use regex::Regex;

use crate::models::TransactionType;

pub(super) enum Counterparty {
    /// Capture group 1 of the pattern, sentinel when it does not match.
    Captured(Regex),
    Fixed(&'static str),
}

pub(super) struct Rule {
    keyword: &'static str,
    kind: TransactionType,
    counterparty: Counterparty,
}

/// Classification rules in priority order. Templates rarely overlap, but when
/// two keywords do co-occur the earlier rule wins.
pub(super) fn rules(sent_to: Regex, received_from: Regex, paid_to: Regex) -> Vec<Rule> {
    vec![
        Rule {
            keyword: "sent to",
            kind: TransactionType::SendMoney,
            counterparty: Counterparty::Captured(sent_to),
        },
        Rule {
            keyword: "received from",
            kind: TransactionType::ReceiveMoney,
            counterparty: Counterparty::Captured(received_from),
        },
        Rule {
            keyword: "paid to",
            kind: TransactionType::PayMerchant,
            counterparty: Counterparty::Captured(paid_to),
        },
        Rule {
            keyword: "withdrawn",
            kind: TransactionType::Withdraw,
            counterparty: Counterparty::Fixed("ATM/Agent"),
        },
    ]
}

pub(super) fn classify(rules: &[Rule], message: &str) -> (TransactionType, Option<String>) {
    let lower = message.to_lowercase();

    let Some(rule) = rules.iter().find(|r| lower.contains(r.keyword)) else {
        return (TransactionType::Other, None);
    };

    let counterparty = match &rule.counterparty {
        Counterparty::Captured(re) => super::first_capture(re, message),
        Counterparty::Fixed(name) => Some((*name).to_string()),
    };
    (rule.kind, counterparty)
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
