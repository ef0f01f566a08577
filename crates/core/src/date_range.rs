//! Calendar-day ranges used by reports and dashboards.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::{DomainError, DomainResult, timestamp};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `[start-of(start), end-of(end)]`, where end-of is the last persisted instant
/// (millisecond) of that calendar day. Equivalent to the half-open range
/// `[start, end + 1 day)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    pub fn from_days(start: NaiveDate, end: NaiveDate) -> DomainResult<Self> {
        if end < start {
            return Err(DomainError::invalid_argument("end date is before start date"));
        }
        let start_at = start.and_hms_opt(0, 0, 0).map(|d| d.and_utc());
        let next_day = end
            .succ_opt()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|d| d.and_utc());
        match (start_at, next_day) {
            (Some(start), Some(next)) => Ok(Self {
                start,
                end: next - Duration::milliseconds(1),
            }),
            _ => Err(DomainError::invalid_argument("date out of range")),
        }
    }

    /// Parse `YYYY-MM-DD` bounds.
    pub fn parse(start: &str, end: &str) -> DomainResult<Self> {
        Self::from_days(parse_day(start)?, parse_day(end)?)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        *ts >= self.start && *ts <= self.end
    }

    /// Bounds in persisted form, for store range filters.
    pub fn keys(&self) -> (String, String) {
        (timestamp::format(&self.start), timestamp::format(&self.end))
    }
}

pub fn parse_day(raw: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| DomainError::invalid_argument(format!("invalid date '{raw}', expected YYYY-MM-DD")))
}
