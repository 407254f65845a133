use serde::Deserialize;

/// A number with optional thousands separators. Must start with a digit and
/// only takes a fraction when digits follow the point, so the full stop
/// closing a sentence is left out.
const NUMBER: &str = r"(\d[\d,]*(?:\.\d+)?)";

/// Extraction patterns, one regex per field. Every pattern reports its value
/// in capture group 1; `date_time` uses group 1 for the date and group 2 for
/// the time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Patterns {
    pub(crate) code: String,
    pub(crate) amount: String,
    pub(crate) date_time: String,
    pub(crate) new_balance: String,
    pub(crate) transaction_cost: String,
    pub(crate) daily_limit: String,
    pub(crate) sent_to: String,
    pub(crate) received_from: String,
    pub(crate) paid_to: String,
}

impl Default for Patterns {
    fn default() -> Self {
        Self {
            code: r"^([A-Z0-9]{10})(?:[^A-Z0-9]|$)".into(),
            amount: format!("Ksh{NUMBER}"),
            date_time: r"on (\d{1,2}/\d{1,2}/\d{2,4}) at (\d{1,2}:\d{2} [AP]M)".into(),
            new_balance: format!("New M-PESA balance is Ksh{NUMBER}"),
            transaction_cost: format!("Transaction cost[,.]? Ksh{NUMBER}"),
            daily_limit: format!("Amount you can transact within the day is {NUMBER}"),
            sent_to: r"(?i)sent to\s+(.+?)\s+on\b".into(),
            received_from: r"(?i)received from\s+(.+?)\s+on\b".into(),
            paid_to: r"(?i)paid to\s+([^.]+)".into(),
        }
    }
}
