use crate::error::DashboardError;
use chrono::{Days, NaiveDate};
use std::fmt;

/// Display format for dates in panel titles (e.g. `01.01.2024`).
pub const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y";

/// An inclusive calendar date range `[start, end]`.
///
/// Construction rejects inverted ranges; a single day (`start == end`) is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, failing with [`DashboardError::InvalidDateRange`] if `start > end`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use swiss_weather_tracker::DateRange;
    ///
    /// let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// let dec = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    /// assert!(DateRange::new(jan, dec).is_ok());
    /// assert!(DateRange::new(dec, jan).is_err());
    /// ```
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DashboardError> {
        if start > end {
            return Err(DashboardError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The range ending on `today` and starting `days` days earlier.
    pub fn last_days(today: NaiveDate, days: u64) -> Self {
        let start = today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format(DISPLAY_DATE_FORMAT),
            self.end.format(DISPLAY_DATE_FORMAT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn rejects_inverted_range() {
        let err = DateRange::new(d(2024, 2, 1), d(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidDateRange { .. }));
    }

    #[test]
    fn single_day_is_valid_and_inclusive() {
        let range = DateRange::new(d(2024, 7, 15), d(2024, 7, 15)).unwrap();
        assert!(range.contains(d(2024, 7, 15)));
        assert!(!range.contains(d(2024, 7, 16)));
    }

    #[test]
    fn last_days_covers_a_year_back() {
        let range = DateRange::last_days(d(2025, 3, 1), 365);
        assert_eq!(range.start(), d(2024, 3, 1));
        assert_eq!(range.end(), d(2025, 3, 1));
    }

    #[test]
    fn displays_swiss_style() {
        let range = DateRange::new(d(2024, 1, 1), d(2025, 1, 1)).unwrap();
        assert_eq!(range.to_string(), "01.01.2024-01.01.2025");
    }
}
