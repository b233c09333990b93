use serde::{Deserialize, Serialize};

use crate::{MAX_YEAR, MIN_YEAR};

/// Inclusive year interval during which a feature is active.
///
/// Parsed from feature title annotations like `"500"` or `"500-800"`.
/// Malformed annotations never error; they degrade to the full timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSpan {
    pub start: i32,
    pub end: i32,
}

impl YearSpan {
    pub const fn full() -> Self {
        Self {
            start: MIN_YEAR,
            end: MAX_YEAR,
        }
    }

    /// Parse a title annotation into a span.
    ///
    /// `"A-B"` yields `[A, B]` in written order (a reversed pair is kept as
    /// authored and simply contains no years). `"A"` yields `[A, MAX_YEAR]`.
    /// Anything else, including a missing title, yields the full timeline.
    pub fn parse(title: Option<&str>) -> Self {
        let Some(title) = title else {
            return Self::full();
        };
        if title.trim().is_empty() {
            return Self::full();
        }

        let parts: Vec<i32> = title.split('-').filter_map(parse_year).collect();
        match parts.as_slice() {
            [start, end] => Self {
                start: *start,
                end: *end,
            },
            [start] => Self {
                start: *start,
                end: MAX_YEAR,
            },
            _ => Self::full(),
        }
    }

    /// Inclusive on both ends.
    pub const fn contains(&self, year: i32) -> bool {
        year >= self.start && year <= self.end
    }

    /// A reversed span (`"800-500"`) contains no years. Exposed for data
    /// validation tooling; the pipeline does not correct authored spans.
    pub const fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

impl Default for YearSpan {
    fn default() -> Self {
        Self::full()
    }
}

/// Leading-integer parse: `"500"` and `"500 AD"` both give 500, `"abc"` gives
/// nothing. Matches how the upstream data's annotations were read.
fn parse_year(token: &str) -> Option<i32> {
    let trimmed = token.trim();
    let digits: &str = match trimmed.find(|c: char| !c.is_ascii_digit()) {
        Some(0) => return None,
        Some(idx) => &trimmed[..idx],
        None => trimmed,
    };
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_title_is_full_range() {
        assert_eq!(YearSpan::parse(None), YearSpan::full());
    }

    #[test]
    fn empty_and_whitespace_titles_are_full_range() {
        assert_eq!(YearSpan::parse(Some("")), YearSpan::full());
        assert_eq!(YearSpan::parse(Some("   ")), YearSpan::full());
    }

    #[test]
    fn single_year_runs_to_max() {
        assert_eq!(
            YearSpan::parse(Some("500")),
            YearSpan {
                start: 500,
                end: MAX_YEAR
            }
        );
    }

    #[test]
    fn two_years_in_written_order() {
        assert_eq!(
            YearSpan::parse(Some("500-800")),
            YearSpan {
                start: 500,
                end: 800
            }
        );
    }

    #[test]
    fn unparseable_title_is_full_range() {
        assert_eq!(YearSpan::parse(Some("abc")), YearSpan::full());
    }

    #[test]
    fn bad_second_token_is_dropped() {
        assert_eq!(
            YearSpan::parse(Some("500-abc")),
            YearSpan {
                start: 500,
                end: MAX_YEAR
            }
        );
    }

    #[test]
    fn too_many_tokens_is_full_range() {
        assert_eq!(YearSpan::parse(Some("100-200-300")), YearSpan::full());
    }

    #[test]
    fn reversed_span_kept_as_authored_and_empty() {
        let span = YearSpan::parse(Some("800-500"));
        assert_eq!(
            span,
            YearSpan {
                start: 800,
                end: 500
            }
        );
        assert!(span.is_empty());
        assert!(!span.contains(650));
    }

    #[test]
    fn year_suffix_is_ignored() {
        assert_eq!(
            YearSpan::parse(Some("500 AD")),
            YearSpan {
                start: 500,
                end: MAX_YEAR
            }
        );
    }

    #[test]
    fn containment_is_inclusive_on_both_ends() {
        let span = YearSpan {
            start: 500,
            end: 800,
        };
        assert!(!span.contains(499));
        assert!(span.contains(500));
        assert!(span.contains(800));
        assert!(!span.contains(801));
    }
}
