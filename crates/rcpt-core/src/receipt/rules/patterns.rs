//! Common regex patterns for receipt extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Money: 1-3 digits with comma/space thousands groups, or a bare digit
    // run, always with two decimals. Digit adjacency is checked by the caller.
    pub static ref MONEY_PATTERN: Regex = Regex::new(
        r"[0-9]{1,3}(?:[, ][0-9]{3})*\.[0-9]{2}|[0-9]+\.[0-9]{2}"
    ).unwrap();

    // 1/5/26, 01/05/2026
    pub static ref DATE_MDY: Regex = Regex::new(
        r"\b\d{1,2}/\d{1,2}/\d{2,4}\b"
    ).unwrap();

    // 2026-01-05
    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b\d{4}-\d{1,2}-\d{1,2}\b"
    ).unwrap();

    // Jan 5, 2026 / January 5 2026
    pub static ref DATE_MONTH_NAME: Regex = Regex::new(
        r"(?i)\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Sept|Oct|Nov|Dec)[a-z]*\s+\d{1,2},?\s+\d{2,4}\b"
    ).unwrap();

    // Numeric date token inside a free-form line: 3.15.2026, 2026/03/15, 15-03-26
    pub static ref DATE_NUMERIC_TOKEN: Regex = Regex::new(
        r"^(\d{1,4})[/.\-](\d{1,2})[/.\-](\d{1,4})$"
    ).unwrap();

    // Day number with an optional ordinal suffix: 3, 03, 3rd
    pub static ref DAY_TOKEN: Regex = Regex::new(
        r"(?i)^(\d{1,2})(?:st|nd|rd|th)?$"
    ).unwrap();

    // Characters kept in a vendor name
    pub static ref VENDOR_NOISE: Regex = Regex::new(
        r"[^A-Za-z0-9&.\-\s]"
    ).unwrap();

    // Tender labels, most specific first
    pub static ref TENDER_PATTERN: Regex = Regex::new(
        r"(?i)\b(AMERICAN\s+EXPRESS|AMEX|MASTERCARD|MASTER\s+CARD|MC|VISA|DISCOVER|DEBIT|CREDIT|CASH)\b"
    ).unwrap();
}
