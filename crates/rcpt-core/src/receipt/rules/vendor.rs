//! Vendor name from the receipt header.

use super::patterns::VENDOR_NOISE;
use super::{non_blank_lines, FieldExtractor};

/// Longest vendor name kept, in characters.
pub const MAX_VENDOR_LEN: usize = 60;

/// First non-blank line, reduced to letters, digits, `&`, `.`, `-` and spaces.
pub struct FirstLineVendor;

impl FieldExtractor for FirstLineVendor {
    type Output = String;

    fn name(&self) -> &'static str {
        "first-line-vendor"
    }

    fn extract(&self, text: &str) -> Option<String> {
        let line = non_blank_lines(text).next()?;
        let cleaned = VENDOR_NOISE.replace_all(line, "");
        let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

        let vendor: String = collapsed.chars().take(MAX_VENDOR_LEN).collect();
        let vendor = vendor.trim_end().to_string();

        (!vendor.is_empty()).then_some(vendor)
    }
}
