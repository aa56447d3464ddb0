//! Money amounts, totals, and tax.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::MONEY_PATTERN;
use super::{non_blank_lines, FieldExtractor};

/// Line labels that mark a total. Upper-case substrings.
pub const TOTAL_KEYWORDS: [&str; 4] = ["TOTAL", "AMOUNT", "BALANCE DUE", "GRAND TOTAL"];

/// Line label that marks tax.
pub const TAX_KEYWORD: &str = "TAX";

/// Money amounts in a piece of text, left to right.
///
/// A token must not touch another digit on either side, so no sub-span of a
/// longer number is ever reported. Tokens that fail numeric conversion are
/// skipped.
pub struct Amounts<'t> {
    text: &'t str,
    pos: usize,
}

impl<'t> Amounts<'t> {
    pub fn new(text: &'t str) -> Self {
        Self { text, pos: 0 }
    }
}

impl Iterator for Amounts<'_> {
    type Item = Decimal;

    fn next(&mut self) -> Option<Decimal> {
        let bytes = self.text.as_bytes();

        while self.pos <= self.text.len() {
            let m = MONEY_PATTERN.find_at(self.text, self.pos)?;
            let (start, end) = (m.start(), m.end());

            // Every candidate starting here ends at the same ".dd", so a
            // touching digit rules out this start entirely.
            let digit_before = start > 0 && bytes[start - 1].is_ascii_digit();
            let digit_after = bytes.get(end).is_some_and(u8::is_ascii_digit);
            if digit_before || digit_after {
                self.pos = start + 1;
                continue;
            }

            self.pos = end;
            if let Some(amount) = parse_amount(m.as_str()) {
                return Some(amount);
            }
        }

        None
    }
}

/// Money amounts in `text`, evaluated lazily.
pub fn find_amounts(text: &str) -> Amounts<'_> {
    Amounts::new(text)
}

/// Convert a money token to a decimal, dropping thousands separators.
pub fn parse_amount(token: &str) -> Option<Decimal> {
    let cleaned: String = token
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    Decimal::from_str(&cleaned).ok()
}

/// Last amount on any line carrying a total keyword.
pub struct KeywordTotal;

impl FieldExtractor for KeywordTotal {
    type Output = Decimal;

    fn name(&self) -> &'static str {
        "keyword-total"
    }

    fn extract(&self, text: &str) -> Option<Decimal> {
        non_blank_lines(text)
            .filter(|line| {
                let upper = line.to_uppercase();
                TOTAL_KEYWORDS.iter().any(|k| upper.contains(k))
            })
            .flat_map(find_amounts)
            .last()
    }
}

/// Largest amount anywhere in the document.
pub struct LargestAmount;

impl FieldExtractor for LargestAmount {
    type Output = Decimal;

    fn name(&self) -> &'static str {
        "largest-amount"
    }

    fn extract(&self, text: &str) -> Option<Decimal> {
        find_amounts(text).max()
    }
}

/// Last amount on the first line labeled as tax.
pub struct LabeledTax;

impl FieldExtractor for LabeledTax {
    type Output = Decimal;

    fn name(&self) -> &'static str {
        "labeled-tax"
    }

    fn extract(&self, text: &str) -> Option<Decimal> {
        let line = non_blank_lines(text).find(|l| l.to_uppercase().contains(TAX_KEYWORD))?;
        find_amounts(line).last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn amounts(text: &str) -> Vec<Decimal> {
        find_amounts(text).collect()
    }

    #[test]
    fn test_amounts_in_order() {
        assert_eq!(
            amounts("Milk 3.49 Eggs 12.00 Total 1,234.56"),
            vec![dec("3.49"), dec("12.00"), dec("1234.56")]
        );
    }

    #[test]
    fn test_space_separated_thousands() {
        assert_eq!(amounts("TOTAL 12 345.67"), vec![dec("12345.67")]);
    }

    #[test]
    fn test_currency_symbols_are_not_part_of_token() {
        assert_eq!(amounts("$5.00 / USD7.25"), vec![dec("5.00"), dec("7.25")]);
    }

    #[test]
    fn test_requires_two_decimals() {
        assert!(amounts("Qty 3 @ 4.5 each, item 12").is_empty());
    }

    #[test]
    fn test_rejects_digit_adjacent_spans() {
        assert!(amounts("ref 1234.567").is_empty());
        assert_eq!(amounts("12,34.56"), vec![dec("34.56")]);
    }

    #[test]
    fn test_long_bare_run() {
        assert_eq!(amounts("1234567.89"), vec![dec("1234567.89")]);
    }

    #[test]
    fn test_iterator_is_lazy() {
        let mut iter = find_amounts("1.00 2.00 3.00");
        assert_eq!(iter.next(), Some(dec("1.00")));
        assert_eq!(iter.next(), Some(dec("2.00")));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("12 345.67"), Some(dec("12345.67")));
        assert_eq!(parse_amount("12.x4"), None);
    }

    #[test]
    fn test_keyword_total_takes_last_tagged() {
        let text = "TOTAL 12.00\nPAID CASH 100.00\nGRAND TOTAL 45.00\n";
        assert_eq!(KeywordTotal.extract(text), Some(dec("45.00")));
    }

    #[test]
    fn test_keyword_total_ignores_untagged_lines() {
        assert_eq!(KeywordTotal.extract("Widget 99.99\nSnack 3.50"), None);
    }

    #[test]
    fn test_balance_due_is_a_keyword() {
        assert_eq!(
            KeywordTotal.extract("Subtotal 10.00\nBalance Due 10.70"),
            Some(dec("10.70"))
        );
    }

    #[test]
    fn test_largest_amount() {
        assert_eq!(LargestAmount.extract("3.50\n27.00\n9.99"), Some(dec("27.00")));
        assert_eq!(LargestAmount.extract("no numbers"), None);
    }

    #[test]
    fn test_tax_from_first_tax_line() {
        let text = "Subtotal 20.00\nSales Tax 6% 1.20 0.30\nTAX 9.99\nTotal 21.50";
        assert_eq!(LabeledTax.extract(text), Some(dec("0.30")));
    }

    #[test]
    fn test_tax_line_without_amount() {
        assert_eq!(LabeledTax.extract("TAX EXEMPT\nTAX 1.00"), None);
        assert_eq!(LabeledTax.extract("Total 5.00"), None);
    }
}
