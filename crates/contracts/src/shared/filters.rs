//! Report parameter resolution.
//!
//! Raw query-string values are never trusted: invalid dates silently reset
//! to the page default, reversed ranges are swapped, and unknown filter
//! values degrade to the least-restrictive variant. SQL fragments produced
//! here are fixed strings; user input only ever travels as bound parameters.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Default window used when a report receives no (or malformed) dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateDefaults {
    /// First day of the current month through today.
    MonthToDate,
    /// January 1 of the current year through today.
    YearToDate,
}

/// A resolved, validated inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Resolves raw `from_date`/`to_date` strings against today's date.
    pub fn resolve_now(
        raw_from: Option<&str>,
        raw_to: Option<&str>,
        defaults: DateDefaults,
    ) -> Self {
        Self::resolve(raw_from, raw_to, defaults, Local::now().date_naive())
    }

    /// Same as [`resolve_now`](Self::resolve_now) with an explicit "today",
    /// so the rules stay testable.
    pub fn resolve(
        raw_from: Option<&str>,
        raw_to: Option<&str>,
        defaults: DateDefaults,
        today: NaiveDate,
    ) -> Self {
        let default_from = match defaults {
            DateDefaults::MonthToDate => today.with_day(1).unwrap_or(today),
            DateDefaults::YearToDate => {
                NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today)
            }
        };

        // A supplied-but-invalid date resets both ends to the defaults.
        let parsed_from = raw_from.map(parse_date);
        let parsed_to = raw_to.map(parse_date);
        let any_invalid = parsed_from == Some(None) || parsed_to == Some(None);

        let (mut from, mut to) = if any_invalid {
            (default_from, today)
        } else {
            (
                parsed_from.flatten().unwrap_or(default_from),
                parsed_to.flatten().unwrap_or(today),
            )
        };

        if from > to {
            std::mem::swap(&mut from, &mut to);
        }
        DateRange { from, to }
    }

    pub fn from_str(&self) -> String {
        self.from.format("%Y-%m-%d").to_string()
    }

    pub fn to_str(&self) -> String {
        self.to.format("%Y-%m-%d").to_string()
    }
}

/// Strict `YYYY-MM-DD` parse; rejects unpadded forms chrono would accept.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    if raw.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Branch filter: everything, or a single branch by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchFilter {
    All,
    Id(i64),
}

impl BranchFilter {
    /// `"all"`, absent, or anything non-numeric resolves to [`All`](Self::All).
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value != "all" => {
                value.parse::<i64>().map(BranchFilter::Id).unwrap_or(BranchFilter::All)
            }
            _ => BranchFilter::All,
        }
    }

    pub fn id(&self) -> Option<i64> {
        match self {
            BranchFilter::All => None,
            BranchFilter::Id(id) => Some(*id),
        }
    }

    pub fn as_query_value(&self) -> String {
        match self {
            BranchFilter::All => "all".to_string(),
            BranchFilter::Id(id) => id.to_string(),
        }
    }
}

/// Customer-segment filter applied to order and customer queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomerSegment {
    #[default]
    All,
    Enrolled,
    CanEnrollNotEnrolled,
    CanEnrollAndEnrolled,
}

impl CustomerSegment {
    /// Unknown values degrade to the least-restrictive filter.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("enrolled") => CustomerSegment::Enrolled,
            Some("can_enroll_not_enrolled") => CustomerSegment::CanEnrollNotEnrolled,
            Some("can_enroll_and_enrolled") => CustomerSegment::CanEnrollAndEnrolled,
            _ => CustomerSegment::All,
        }
    }

    pub fn as_query_value(&self) -> &'static str {
        match self {
            CustomerSegment::All => "all",
            CustomerSegment::Enrolled => "enrolled",
            CustomerSegment::CanEnrollNotEnrolled => "can_enroll_not_enrolled",
            CustomerSegment::CanEnrollAndEnrolled => "can_enroll_and_enrolled",
        }
    }

    /// Fixed WHERE fragment for the `companies c` alias. Empty for
    /// [`All`](Self::All); callers add the active-status guard where the
    /// page semantics require it.
    pub fn sql_predicate(&self) -> &'static str {
        match self {
            CustomerSegment::All => "",
            CustomerSegment::Enrolled => {
                " AND c.is_enrolled_loyalty = 1 AND c.status = 1"
            }
            CustomerSegment::CanEnrollNotEnrolled => {
                " AND c.can_enroll_loyalty = 1 AND c.is_enrolled_loyalty = 0 AND c.status = 1"
            }
            CustomerSegment::CanEnrollAndEnrolled => {
                " AND (c.can_enroll_loyalty = 1 OR c.is_enrolled_loyalty = 1) AND c.status = 1"
            }
        }
    }

    /// Whether order queries must inner-join companies for this segment.
    pub fn requires_company_join(&self) -> bool {
        !matches!(self, CustomerSegment::All)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_defaults_month_to_date() {
        let range = DateRange::resolve(None, None, DateDefaults::MonthToDate, today());
        assert_eq!(range.from_str(), "2024-03-01");
        assert_eq!(range.to_str(), "2024-03-15");
    }

    #[test]
    fn test_defaults_year_to_date() {
        let range = DateRange::resolve(None, None, DateDefaults::YearToDate, today());
        assert_eq!(range.from_str(), "2024-01-01");
        assert_eq!(range.to_str(), "2024-03-15");
    }

    #[test]
    fn test_invalid_dates_reset_to_defaults() {
        for bad in ["2024-3-1", "20240301", "yesterday", "2024-13-40", ""] {
            let range = DateRange::resolve(
                Some(bad),
                Some("2024-02-01"),
                DateDefaults::MonthToDate,
                today(),
            );
            assert_eq!(range.from_str(), "2024-03-01", "input {bad:?}");
            assert_eq!(range.to_str(), "2024-03-15", "input {bad:?}");
        }
    }

    #[test]
    fn test_reversed_range_is_swapped() {
        let range = DateRange::resolve(
            Some("2024-03-01"),
            Some("2024-01-01"),
            DateDefaults::MonthToDate,
            today(),
        );
        assert_eq!(range.from_str(), "2024-01-01");
        assert_eq!(range.to_str(), "2024-03-01");
    }

    #[test]
    fn test_branch_filter_parse() {
        assert_eq!(BranchFilter::parse(None), BranchFilter::All);
        assert_eq!(BranchFilter::parse(Some("all")), BranchFilter::All);
        assert_eq!(BranchFilter::parse(Some("12")), BranchFilter::Id(12));
        assert_eq!(BranchFilter::parse(Some("twelve")), BranchFilter::All);
    }

    #[test]
    fn test_customer_segment_parse_degrades_to_all() {
        assert_eq!(CustomerSegment::parse(Some("enrolled")), CustomerSegment::Enrolled);
        assert_eq!(
            CustomerSegment::parse(Some("can_enroll_not_enrolled")),
            CustomerSegment::CanEnrollNotEnrolled
        );
        assert_eq!(CustomerSegment::parse(Some("bogus")), CustomerSegment::All);
        assert_eq!(CustomerSegment::parse(None), CustomerSegment::All);
    }

    #[test]
    fn test_segment_predicates_contain_no_placeholders() {
        for segment in [
            CustomerSegment::All,
            CustomerSegment::Enrolled,
            CustomerSegment::CanEnrollNotEnrolled,
            CustomerSegment::CanEnrollAndEnrolled,
        ] {
            assert!(!segment.sql_predicate().contains('?'));
        }
    }
}
