//! Title date extraction
//!
//! Finds a single performance date embedded in an album title. Titles are
//! folded to lowercase, then run through an ordered list of strategies:
//!
//! 1. **Calendar word**: `"<month name> <day>"` plus a 4-digit year that
//!    follows a comma, digit or hyphen (`"july 4, 1989"`).
//! 2. **Numeric delimited**: `M/D/Y`, `M-D-Y` or `M.D.Y` with the same
//!    separator used twice (`"08/15/1995"`, `"5-6-10"`).
//!
//! A strategy that finds its anchor but no usable date rejects the title
//! outright; later strategies only run when earlier ones do not apply.

use regex::Regex;
use std::sync::LazyLock;

/// Month names, index + 1 is the calendar month
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

/// Separators accepted by the numeric strategy
const DATE_SEPARATORS: [&str; 3] = ["/", "-", "."];

/// 4-digit year preceded by a comma, digit or hyphen (e.g. `", 1989"`)
static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:,|[0-9]|-)\s*([0-9]{4})").expect("valid year pattern"));

/// `"<month> <day>"` with the day not followed by another digit
static MONTH_DAY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"({}) ([0-9]{{1,2}})(?:[^0-9]|$)", MONTHS.join("|")))
        .expect("valid month-day pattern")
});

/// Standalone 1 or 2 digit numbers (day candidates)
static DAY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9]([0-9]{1,2})[^0-9]").expect("valid day pattern"));

/// One `M<sep>D<sep>Y` pattern per separator; `regex` has no back-references
static DELIMITED_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DATE_SEPARATORS
        .iter()
        .map(|sep| {
            let sep = regex::escape(sep);
            Regex::new(&format!(
                r"(?:^|[^0-9])([0-9]+){sep}([0-9]+){sep}([0-9]+)(?:[^0-9]|$)"
            ))
            .expect("valid delimited date pattern")
        })
        .collect()
});

/// Which strategy produced a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateSource {
    CalendarWord,
    NumericDelimited,
}

impl DateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateSource::CalendarWord => "calendar-word",
            DateSource::NumericDelimited => "numeric-delimited",
        }
    }
}

/// Raw date fields as captured from a title
///
/// Day and month hold 1 or 2 digits, year holds 2 or 4 digits. Values are
/// not calendar-checked: month `"13"` is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCandidate {
    day: String,
    month: String,
    year: String,
    source: DateSource,
}

impl DateCandidate {
    /// Build a candidate, or `None` if a field has the wrong width or a non-digit
    pub fn new(
        day: impl Into<String>,
        month: impl Into<String>,
        year: impl Into<String>,
        source: DateSource,
    ) -> Option<Self> {
        let (day, month, year) = (day.into(), month.into(), year.into());

        let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !is_digits(&day) || !is_digits(&month) || !is_digits(&year) {
            return None;
        }
        if day.len() > 2 || month.len() > 2 || !matches!(year.len(), 2 | 4) {
            return None;
        }

        Some(Self {
            day,
            month,
            year,
            source,
        })
    }

    pub fn day(&self) -> &str {
        &self.day
    }

    pub fn month(&self) -> &str {
        &self.month
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn source(&self) -> DateSource {
        self.source
    }
}

/// Outcome of a single strategy
#[derive(Debug, PartialEq, Eq)]
enum Extraction {
    /// Anchor not present, try the next strategy
    NotApplicable,
    /// Anchor present but no usable date; the title is not a live date
    Rejected,
    Found(DateCandidate),
}

type Strategy = fn(&str) -> Extraction;

/// Strategies in priority order
const STRATEGIES: [Strategy; 2] = [calendar_word, numeric_delimited];

/// Extract the performance date from a title
///
/// Pure: the same title always yields the same result.
pub fn parse(title: &str) -> Option<DateCandidate> {
    let folded = title.to_lowercase();

    for strategy in STRATEGIES {
        match strategy(&folded) {
            Extraction::NotApplicable => continue,
            Extraction::Rejected => return None,
            Extraction::Found(candidate) => return Some(candidate),
        }
    }

    None
}

/// `"... july 4, 1989"` style titles
fn calendar_word(title: &str) -> Extraction {
    let Some(year) = YEAR_PATTERN.captures(title).and_then(|caps| caps.get(1)) else {
        return Extraction::NotApplicable;
    };

    // Multi-night runs ("march 7 & 8, 1970") list several days; they are
    // kept and sorted by the first night, which the month-day match yields.
    if DAY_PATTERN.find_iter(title).next().is_none() {
        return Extraction::Rejected;
    }

    let Some(caps) = MONTH_DAY_PATTERN.captures(title) else {
        return Extraction::Rejected;
    };
    let (Some(month_name), Some(day)) = (caps.get(1), caps.get(2)) else {
        return Extraction::Rejected;
    };
    let Some(month_index) = MONTHS.iter().position(|m| *m == month_name.as_str()) else {
        return Extraction::Rejected;
    };

    DateCandidate::new(
        day.as_str(),
        format!("{:02}", month_index + 1),
        year.as_str(),
        DateSource::CalendarWord,
    )
    .map_or(Extraction::Rejected, Extraction::Found)
}

/// `"... 08/15/1995"` style titles, US month-day-year order
fn numeric_delimited(title: &str) -> Extraction {
    let first = DELIMITED_PATTERNS
        .iter()
        .filter_map(|pattern| pattern.captures(title))
        .min_by_key(|caps| caps.get(0).map_or(usize::MAX, |m| m.start()));

    let Some(caps) = first else {
        return Extraction::NotApplicable;
    };

    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
    DateCandidate::new(group(2), group(1), group(3), DateSource::NumericDelimited)
        .map_or(Extraction::Rejected, Extraction::Found)
}
