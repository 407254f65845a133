pub(crate) const DEFAULT_KEYWORDS: [&str; 5] = ["confirmed", "ksh", "m-pesa", "transaction", "balance"];

/// Coarse keyword gate in front of the parser. Errs towards letting
/// messages through; a missed M-PESA message is worse than a junk row.
#[derive(Debug, Clone)]
pub(crate) struct RelevanceFilter {
    keywords: Vec<String>,
}

impl RelevanceFilter {
    pub(crate) fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub(crate) fn is_relevant(&self, message: &str) -> bool {
        let lower = message.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl Default for RelevanceFilter {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS)
    }
}

#[cfg(test)]
#[path = "relevance_tests.rs"]
mod tests;
