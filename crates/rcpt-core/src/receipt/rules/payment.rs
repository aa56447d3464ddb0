//! Payment method from tender lines.

use super::patterns::TENDER_PATTERN;
use super::FieldExtractor;

/// Card brand or tender word, normalized. A card brand anywhere beats a
/// generic word such as "CREDIT" or "CASH".
pub struct TenderKeyword;

impl FieldExtractor for TenderKeyword {
    type Output = String;

    fn name(&self) -> &'static str {
        "tender-keyword"
    }

    fn extract(&self, text: &str) -> Option<String> {
        let labels: Vec<(&'static str, bool)> = TENDER_PATTERN
            .find_iter(text)
            .map(|m| normalize_tender(m.as_str()))
            .collect();

        labels
            .iter()
            .find(|(_, brand)| *brand)
            .or_else(|| labels.first())
            .map(|(label, _)| label.to_string())
    }
}

/// Display label for a matched tender word, and whether it names a card brand.
fn normalize_tender(word: &str) -> (&'static str, bool) {
    let upper = word.to_uppercase();
    let compact: String = upper.split_whitespace().collect();

    match compact.as_str() {
        "AMERICANEXPRESS" | "AMEX" => ("Amex", true),
        "MASTERCARD" | "MC" => ("Mastercard", true),
        "VISA" => ("Visa", true),
        "DISCOVER" => ("Discover", true),
        "DEBIT" => ("Debit", false),
        "CREDIT" => ("Credit", false),
        _ => ("Cash", false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_brand() {
        let text = "SUBTOTAL 10.00\nCREDIT CARD\nVISA ************1234\n";
        assert_eq!(TenderKeyword.extract(text), Some("Visa".to_string()));
    }

    #[test]
    fn test_multi_word_brand() {
        assert_eq!(
            TenderKeyword.extract("Paid with American  Express"),
            Some("Amex".to_string())
        );
        assert_eq!(TenderKeyword.extract("MASTER CARD"), Some("Mastercard".to_string()));
    }

    #[test]
    fn test_generic_tender() {
        assert_eq!(TenderKeyword.extract("CASH 20.00\nCHANGE 3.25"), Some("Cash".to_string()));
        assert_eq!(TenderKeyword.extract("Debit tend"), Some("Debit".to_string()));
    }

    #[test]
    fn test_words_inside_other_words_do_not_count() {
        assert_eq!(TenderKeyword.extract("McDonalds\nVISAGE SALON\nCASHEW 2.00"), None);
    }
}
