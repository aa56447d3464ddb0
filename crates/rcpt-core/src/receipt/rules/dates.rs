//! Date extraction for receipts.

use chrono::NaiveDate;
use regex::Regex;

use super::patterns::{DATE_MDY, DATE_MONTH_NAME, DATE_NUMERIC_TOKEN, DATE_YMD, DAY_TOKEN};
use super::{non_blank_lines, FieldExtractor};

/// Words marking a line that probably carries the receipt date. Lower-case substrings.
pub const DATE_HINTS: [&str; 4] = ["date", "dated", "transaction", "purchase"];

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// First occurrence of one structural date shape anywhere in the document.
pub struct PatternDate {
    name: &'static str,
    pattern: &'static Regex,
}

impl PatternDate {
    /// `M/D/YY` or `M/D/YYYY`.
    pub fn month_day_year() -> Self {
        Self {
            name: "date-mdy",
            pattern: &DATE_MDY,
        }
    }

    /// `YYYY-M-D`.
    pub fn iso() -> Self {
        Self {
            name: "date-ymd",
            pattern: &DATE_YMD,
        }
    }

    /// `Jan 5, 2026`, `January 5 2026`.
    pub fn month_name() -> Self {
        Self {
            name: "date-month-name",
            pattern: &DATE_MONTH_NAME,
        }
    }
}

impl FieldExtractor for PatternDate {
    type Output = NaiveDate;

    fn name(&self) -> &'static str {
        self.name
    }

    fn extract(&self, text: &str) -> Option<NaiveDate> {
        let m = self.pattern.find(text)?;
        parse_fuzzy_date(m.as_str())
    }
}

/// Whole-line parse of the first hint-labeled line that yields a date.
pub struct HintLineDate;

impl FieldExtractor for HintLineDate {
    type Output = NaiveDate;

    fn name(&self) -> &'static str {
        "date-hint-line"
    }

    fn extract(&self, text: &str) -> Option<NaiveDate> {
        non_blank_lines(text)
            .filter(|line| {
                let lower = line.to_lowercase();
                DATE_HINTS.iter().any(|h| lower.contains(h))
            })
            .find_map(parse_fuzzy_date)
    }
}

/// Parse a calendar date out of free text, ignoring words that are not part of it.
///
/// Understands numeric tokens (`3/15/26`, `2026/03/15`, `15.03.2026`) and a
/// month name with a neighbouring day number and a year. Numeric dates are
/// read month-first unless that is impossible. Returns `None` when no
/// complete date (day, month, and year) is present.
pub fn parse_fuzzy_date(text: &str) -> Option<NaiveDate> {
    let tokens: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .map(|t| t.trim_matches(|c: char| !c.is_ascii_alphanumeric()))
        .filter(|t| !t.is_empty())
        .collect();

    let numeric = tokens.iter().find_map(|token| {
        let caps = DATE_NUMERIC_TOKEN.captures(token)?;
        numeric_date(&caps[1], &caps[2], &caps[3])
    });
    if numeric.is_some() {
        return numeric;
    }

    let (index, month) = tokens
        .iter()
        .enumerate()
        .find_map(|(i, token)| month_from_name(token).map(|m| (i, m)))?;

    let after = tokens.get(index + 1).and_then(|t| day_number(t));
    let before = index
        .checked_sub(1)
        .and_then(|i| tokens.get(i))
        .and_then(|t| day_number(t));
    let day = after.or(before)?;

    // Nearest four-digit year after the month, then before it. No year, no date.
    let year = tokens[index + 1..]
        .iter()
        .chain(tokens[..index].iter().rev())
        .find(|t| t.len() == 4 && !t.starts_with('0') && t.chars().all(|c| c.is_ascii_digit()))
        .and_then(|t| t.parse().ok())
        .or_else(|| {
            // Two-digit year directly after "Mon DD".
            let short = tokens.get(index + 2).filter(|_| after.is_some())?;
            (short.len() == 2 && short.chars().all(|c| c.is_ascii_digit()))
                .then(|| parse_year(short))
        })?;

    NaiveDate::from_ymd_opt(year, month, day)
}

fn numeric_date(first: &str, second: &str, third: &str) -> Option<NaiveDate> {
    let a: u32 = first.parse().ok()?;
    let b: u32 = second.parse().ok()?;

    if first.len() == 4 {
        let c: u32 = third.parse().ok()?;
        return NaiveDate::from_ymd_opt(a as i32, b, c);
    }

    let year = parse_year(third);
    NaiveDate::from_ymd_opt(year, a, b).or_else(|| NaiveDate::from_ymd_opt(year, b, a))
}

fn month_from_name(token: &str) -> Option<u32> {
    if token.len() < 3 || !token.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let lower = token.to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|m| m.starts_with(&lower))
        .map(|i| i as u32 + 1)
}

fn day_number(token: &str) -> Option<u32> {
    let caps = DAY_TOKEN.captures(token)?;
    let day: u32 = caps[1].parse().ok()?;
    (1..=31).contains(&day).then_some(day)
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if s.len() <= 2 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 {
            2000 + year
        } else {
            1900 + year
        }
    } else {
        year
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_day_year() {
        let extractor = PatternDate::month_day_year();
        assert_eq!(extractor.extract("Store 12\n01/05/2026 14:22"), Some(ymd(2026, 1, 5)));
        assert_eq!(extractor.extract("1/5/26"), Some(ymd(2026, 1, 5)));
    }

    #[test]
    fn test_day_first_when_month_impossible() {
        assert_eq!(PatternDate::month_day_year().extract("13/02/2026"), Some(ymd(2026, 2, 13)));
    }

    #[test]
    fn test_only_first_occurrence_is_tried() {
        let text = "99/99/2026\n03/04/2026";
        assert_eq!(PatternDate::month_day_year().extract(text), None);
    }

    #[test]
    fn test_iso() {
        assert_eq!(PatternDate::iso().extract("printed 2026-1-5 at noon"), Some(ymd(2026, 1, 5)));
        assert_eq!(PatternDate::iso().extract("2026-13-40"), None);
    }

    #[test]
    fn test_month_name() {
        let extractor = PatternDate::month_name();
        assert_eq!(extractor.extract("Date: March 3, 2026"), Some(ymd(2026, 3, 3)));
        assert_eq!(extractor.extract("jan 5 2026"), Some(ymd(2026, 1, 5)));
        assert_eq!(extractor.extract("SEPT 30, 25"), Some(ymd(2025, 9, 30)));
    }

    #[test]
    fn test_month_lookalike_words_are_rejected() {
        assert_eq!(PatternDate::month_name().extract("Marble 3, 2026"), None);
    }

    #[test]
    fn test_hint_line() {
        let text = "THANK YOU\nTransaction 0042 on 15 Mar 2026\n";
        // "0042" is not a year.
        assert_eq!(HintLineDate.extract(text), Some(ymd(2026, 3, 15)));
    }

    #[test]
    fn test_hint_line_skips_unparseable_lines() {
        let text = "Transaction #0042\nPurchase date: 2026/03/15\n";
        assert_eq!(HintLineDate.extract(text), Some(ymd(2026, 3, 15)));
    }

    #[test]
    fn test_hint_line_without_year_is_not_completed() {
        assert_eq!(HintLineDate.extract("Purchase date: Mar 3"), None);
        assert_eq!(HintLineDate.extract("Date: 3/15"), None);
        assert_eq!(
            HintLineDate.extract("Date: 3/15\nPurchase date: Mar 3, 2026"),
            Some(ymd(2026, 3, 3))
        );
    }

    #[test]
    fn test_hint_line_requires_hint_word() {
        assert_eq!(HintLineDate.extract("Served 2026/03/15"), None);
    }

    #[test]
    fn test_fuzzy_needs_complete_date() {
        assert_eq!(parse_fuzzy_date("Date 5 Jan"), None);
        assert_eq!(parse_fuzzy_date("Store 42 Register 7"), None);
        assert_eq!(parse_fuzzy_date(""), None);
    }

    #[test]
    fn test_fuzzy_ignores_unrelated_numbers() {
        assert_eq!(parse_fuzzy_date("Store 42 Date: March 3, 2026"), Some(ymd(2026, 3, 3)));
        assert_eq!(parse_fuzzy_date("Dated 3rd December 2025"), Some(ymd(2025, 12, 3)));
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(parse_year("24"), 2024);
        assert_eq!(parse_year("99"), 1999);
        assert_eq!(parse_year("2024"), 2024);
    }
}
