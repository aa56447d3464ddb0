//! Rule-based field extractors for receipts.

pub mod amounts;
pub mod dates;
pub mod patterns;
pub mod payment;
pub mod vendor;

pub use amounts::{find_amounts, parse_amount, Amounts, KeywordTotal, LabeledTax, LargestAmount};
pub use dates::{parse_fuzzy_date, HintLineDate, PatternDate};
pub use payment::TenderKeyword;
pub use vendor::FirstLineVendor;

use tracing::trace;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Extract the field from text, or `None` when this rule finds nothing.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

type BoxedExtractor<T> = Box<dyn FieldExtractor<Output = T> + Send + Sync>;

/// Extractors for one field, tried in priority order. The first hit wins.
pub struct StrategyChain<T> {
    strategies: Vec<BoxedExtractor<T>>,
}

impl<T> StrategyChain<T> {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Append a lower-priority strategy.
    pub fn then<E>(mut self, extractor: E) -> Self
    where
        E: FieldExtractor<Output = T> + Send + Sync + 'static,
    {
        self.strategies.push(Box::new(extractor));
        self
    }

    /// Strategy names in priority order.
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn extract(&self, text: &str) -> Option<T> {
        for strategy in &self.strategies {
            if let Some(value) = strategy.extract(text) {
                trace!("{} matched", strategy.name());
                return Some(value);
            }
        }
        None
    }
}

impl<T> Default for StrategyChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Trimmed, non-blank lines of a document, top to bottom.
pub fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<u32>, &'static str);

    impl FieldExtractor for Fixed {
        type Output = u32;

        fn name(&self) -> &'static str {
            self.1
        }

        fn extract(&self, _text: &str) -> Option<u32> {
            self.0
        }
    }

    #[test]
    fn test_first_hit_wins() {
        let chain = StrategyChain::new()
            .then(Fixed(None, "miss"))
            .then(Fixed(Some(2), "second"))
            .then(Fixed(Some(3), "third"));

        assert_eq!(chain.extract(""), Some(2));
        assert_eq!(chain.names(), vec!["miss", "second", "third"]);
    }

    #[test]
    fn test_empty_chain() {
        let chain: StrategyChain<u32> = StrategyChain::new();
        assert_eq!(chain.extract("anything"), None);
    }

    #[test]
    fn test_non_blank_lines() {
        let lines: Vec<&str> = non_blank_lines("  A \n\n \t\n B\n").collect();
        assert_eq!(lines, vec!["A", "B"]);
    }
}
