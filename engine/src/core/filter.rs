//! Filter parameters for dashboard queries.
//!
//! A [`FilterContext`] is the single value every query is parameterized
//! by: the active company selector and an optional inclusive date range.
//! It carries no business logic and no derived state; changing it simply
//! means the next query recomputes from the immutable dataset.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Which companies a query is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanySelector {
    /// No company restriction.
    All,
    /// Restrict to vessels of a single company.
    Company(String),
}

impl CompanySelector {
    pub fn is_all(&self) -> bool {
        matches!(self, CompanySelector::All)
    }

    /// Returns `true` if a vessel with the given company passes the
    /// selector. Vessels without a company never match a scoped selector.
    pub fn matches(&self, company: Option<&str>) -> bool {
        match self {
            CompanySelector::All => true,
            CompanySelector::Company(selected) => company == Some(selected.as_str()),
        }
    }
}

impl Default for CompanySelector {
    fn default() -> Self {
        CompanySelector::All
    }
}

/// An inclusive timestamp range.
///
/// # Examples
///
/// ```
/// use oceanus_engine::core::filter::DateRange;
/// use chrono::NaiveDate;
///
/// let range = DateRange::from_dates(
///     NaiveDate::from_ymd_opt(2035, 2, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2035, 2, 28).unwrap(),
/// );
/// assert!(range.contains(range.start));
/// assert!(range.contains(range.end));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Builds a range spanning whole calendar days: `start` at 00:00:00
    /// through `end` at 23:59:59.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: start.and_hms_opt(0, 0, 0).expect("valid midnight").and_utc(),
            end: end.and_hms_opt(23, 59, 59).expect("valid end of day").and_utc(),
        }
    }

    /// Inclusive on both bounds.
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        time >= self.start && time <= self.end
    }
}

/// The active filter every dashboard query is parameterized by.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterContext {
    pub company: CompanySelector,
    pub date_range: Option<DateRange>,
}

impl FilterContext {
    /// Unrestricted filter: all companies, no date bound.
    pub fn unscoped() -> Self {
        Self::default()
    }

    pub fn for_company(company: impl Into<String>) -> Self {
        Self {
            company: CompanySelector::Company(company.into()),
            date_range: None,
        }
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Returns `true` if the timestamp passes the date filter (always
    /// true when no range is set).
    pub fn includes_time(&self, time: DateTime<Utc>) -> bool {
        match &self.date_range {
            Some(range) => range.contains(time),
            None => true,
        }
    }
}
