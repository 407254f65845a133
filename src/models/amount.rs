use rust_decimal::Decimal;
use std::str::FromStr;

/// A non-negative Ksh figure exactly as the message wrote it, minus
/// thousands separators. Digits beyond what `Decimal` can hold are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount {
    text: String,
}

impl Amount {
    pub fn zero() -> Self {
        Self { text: "0".into() }
    }

    /// Accepts `digits[.digits]` with optional `,` separators in the integer
    /// part. Anything else (signs, exponents, non-ASCII digits) is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let cleaned = raw.trim().replace(',', "");
        let (int_part, frac_part) = match cleaned.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (cleaned.as_str(), None),
        };
        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !frac_part.map_or(true, all_digits) {
            return None;
        }
        Some(Self { text: cleaned })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The value as a `Decimal`, only when it converts without rounding or
    /// overflow.
    pub fn to_decimal(&self) -> Option<Decimal> {
        Decimal::from_str(&self.text)
            .ok()
            .filter(|d| d.to_string() == self.text)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
