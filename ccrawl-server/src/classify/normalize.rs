//! Date normalization to sortable `YYYYMMDD` keys

use std::fmt;

use super::parser::DateCandidate;

/// Two-digit years below this are read as 20YY, the rest as 19YY
///
/// Fixed rather than tied to the current year, so titles from 2025 onward
/// with two-digit years sort into the 1900s.
pub const CENTURY_PIVOT: u32 = 25;

/// Canonical `YYYYMMDD` key
///
/// Always 8 ASCII digits, so lexical order is chronological order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey(String);

impl SortKey {
    /// Wrap an existing key, or `None` unless it is exactly 8 ASCII digits
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.len() == 8 && key.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(key))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 4-digit year prefix
    pub fn year(&self) -> &str {
        &self.0[..4]
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the sort key for a candidate
///
/// No calendar validation: month `13` or day `45` pass through unchanged.
pub fn normalize(candidate: &DateCandidate) -> SortKey {
    SortKey(format!(
        "{}{:0>2}{:0>2}",
        expand_year(candidate.year()),
        candidate.month(),
        candidate.day()
    ))
}

/// Expand a 2-digit year to 4 digits; 4-digit years are kept verbatim
fn expand_year(year: &str) -> String {
    if year.len() != 2 {
        return year.to_string();
    }

    match year.parse::<u32>() {
        Ok(value) if value < CENTURY_PIVOT => format!("20{}", year),
        _ => format!("19{}", year),
    }
}
