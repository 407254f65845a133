use chrono::NaiveDateTime;

use super::Amount;

/// Placeholder written for any field the message did not carry.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    SendMoney,
    ReceiveMoney,
    PayMerchant,
    Withdraw,
    Other,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SendMoney => "Send Money",
            Self::ReceiveMoney => "Receive Money",
            Self::PayMerchant => "Pay Bill/Buy Goods",
            Self::Withdraw => "Withdraw",
            Self::Other => "Other",
        }
    }

    /// Money leaves the account for these kinds.
    pub fn is_outgoing(&self) -> bool {
        matches!(self, Self::SendMoney | Self::PayMerchant | Self::Withdraw)
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One M-PESA notification turned into a ledger row.
///
/// Optional fields render as [`NOT_AVAILABLE`]; `amount` and
/// `transaction_cost` default to zero instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTransaction {
    pub transaction_code: Option<String>,
    pub amount: Amount,
    pub transaction_type: TransactionType,
    pub counterparty: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub new_balance: Option<Amount>,
    pub transaction_cost: Amount,
    pub daily_limit_remaining: Option<Amount>,
    pub raw_message: String,
    pub processed_at: NaiveDateTime,
}

impl ParsedTransaction {
    pub const COLUMNS: [&'static str; 11] = [
        "TransactionCode",
        "Amount",
        "TransactionType",
        "RecipientSender",
        "Date",
        "Time",
        "NewBalance",
        "TransactionCost",
        "DailyLimitRemaining",
        "RawMessage",
        "ProcessedDateTime",
    ];

    pub const PROCESSED_AT_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    pub fn code(&self) -> &str {
        self.transaction_code.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn counterparty(&self) -> &str {
        self.counterparty.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// "20/8/25 10:15 AM", or the sentinel when the message had no
    /// timestamp.
    pub fn date_time(&self) -> String {
        match (&self.date, &self.time) {
            (Some(date), Some(time)) => format!("{date} {time}"),
            _ => NOT_AVAILABLE.to_string(),
        }
    }

    /// Human readable block printed after a message is processed.
    pub fn summary(&self) -> String {
        let direction = match self.transaction_type {
            TransactionType::Other => "",
            t if t.is_outgoing() => " (out)",
            _ => " (in)",
        };

        let mut lines = vec![
            format!("  Code:         {}", self.code()),
            format!("  Type:         {}", self.transaction_type),
            format!("  Amount:       Ksh {}{direction}", self.amount),
            format!("  With:         {}", self.counterparty()),
            format!("  Date/Time:    {}", self.date_time()),
            format!(
                "  New balance:  {}",
                amount_or_sentinel(self.new_balance.as_ref())
            ),
            format!("  Cost:         Ksh {}", self.transaction_cost),
        ];
        if self.transaction_type.is_outgoing() {
            let total = self
                .amount
                .to_decimal()
                .zip(self.transaction_cost.to_decimal())
                .and_then(|(amount, cost)| amount.checked_add(cost));
            if let Some(total) = total {
                lines.push(format!("  Total out:    Ksh {total}"));
            }
        }
        if let Some(limit) = &self.daily_limit_remaining {
            lines.push(format!("  Daily limit:  Ksh {limit}"));
        }
        lines.join("\n")
    }

    /// Cells in [`Self::COLUMNS`] order. Never yields an empty cell for a
    /// missing field.
    pub fn to_row(&self) -> [String; 11] {
        [
            self.code().to_string(),
            self.amount.to_string(),
            self.transaction_type.to_string(),
            self.counterparty().to_string(),
            text_or_sentinel(self.date.as_deref()),
            text_or_sentinel(self.time.as_deref()),
            amount_or_sentinel(self.new_balance.as_ref()),
            self.transaction_cost.to_string(),
            amount_or_sentinel(self.daily_limit_remaining.as_ref()),
            self.raw_message.clone(),
            self.processed_at
                .format(Self::PROCESSED_AT_FORMAT)
                .to_string(),
        ]
    }
}

fn text_or_sentinel(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

fn amount_or_sentinel(value: Option<&Amount>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |a| a.to_string())
}
