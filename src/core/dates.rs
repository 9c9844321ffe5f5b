//! Synthetic date assignment
//!
//! Photos scraped from a website rarely carry a usable capture date, so the
//! user supplies a date range and every photo gets a date by linear
//! interpolation over that range, based on its position in the batch.

use crate::core::config::DateOrder;
use crate::core::error::{OrganizerError, Result};
use chrono::{Duration, NaiveDate};

/// Input format for user-supplied dates
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// A user-supplied date range plus the ordering policy to spread it with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub order: DateOrder,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate, order: DateOrder) -> Self {
        Self { start, end, order }
    }

    /// Parse a range from two `YYYY-MM-DD` strings
    ///
    /// Either string failing to parse fails the whole range.
    pub fn parse(start: &str, end: &str, order: DateOrder) -> Result<Self> {
        Ok(Self::new(parse_date(start)?, parse_date(end)?, order))
    }

    /// Date for the item at `index` out of `total`
    pub fn date_for(&self, index: usize, total: usize) -> NaiveDate {
        assign(index, total, self.start, self.end, self.order)
    }

    /// Dates for `total` items, in index order
    pub fn assign_all(&self, total: usize) -> Vec<NaiveDate> {
        (0..total).map(|i| self.date_for(i, total)).collect()
    }

    /// Number of days from start to end (negative if end precedes start)
    pub fn total_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Parse a user-supplied `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_INPUT_FORMAT).map_err(|_| {
        OrganizerError::InvalidDateInput {
            input: trimmed.to_string(),
        }
    })
}

/// Assign a date to the item at `index` in a batch of `total`
///
/// `progress` runs from 0 at the first index to 1 at the last (0 for a
/// single item). The day offset is `floor(total_days * progress)`, measured
/// back from `end` for [`DateOrder::NewestFirst`] and forward from `start`
/// for [`DateOrder::OldestFirst`].
pub fn assign(
    index: usize,
    total: usize,
    start: NaiveDate,
    end: NaiveDate,
    order: DateOrder,
) -> NaiveDate {
    let total_days = (end - start).num_days();
    let offset = day_offset(index, total, total_days);

    match order {
        DateOrder::NewestFirst => end - Duration::days(offset),
        DateOrder::OldestFirst => start + Duration::days(offset),
    }
}

/// `floor(total_days * index / (total - 1))` in exact integer arithmetic
fn day_offset(index: usize, total: usize, total_days: i64) -> i64 {
    if total <= 1 {
        return 0;
    }
    let steps = (total - 1) as i128;
    let numerator = total_days as i128 * index as i128;
    numerator.div_euclid(steps) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_boundaries_newest_first() {
        let (start, end) = (ymd(2025, 1, 1), ymd(2025, 12, 31));
        assert_eq!(assign(0, 10, start, end, DateOrder::NewestFirst), end);
        assert_eq!(assign(9, 10, start, end, DateOrder::NewestFirst), start);
    }

    #[test]
    fn test_boundaries_oldest_first() {
        let (start, end) = (ymd(2025, 1, 1), ymd(2025, 12, 31));
        assert_eq!(assign(0, 10, start, end, DateOrder::OldestFirst), start);
        assert_eq!(assign(9, 10, start, end, DateOrder::OldestFirst), end);
    }

    #[test]
    fn test_single_item() {
        let (start, end) = (ymd(2025, 1, 1), ymd(2025, 1, 31));
        assert_eq!(assign(0, 1, start, end, DateOrder::NewestFirst), end);
        assert_eq!(assign(0, 1, start, end, DateOrder::OldestFirst), start);
    }

    #[test]
    fn test_three_items_over_january() {
        let range = DateRange::new(ymd(2025, 1, 1), ymd(2025, 1, 31), DateOrder::NewestFirst);
        assert_eq!(
            range.assign_all(3),
            vec![ymd(2025, 1, 31), ymd(2025, 1, 16), ymd(2025, 1, 1)]
        );
    }

    #[test]
    fn test_offset_is_floored() {
        // 10 days over 4 items: 0, 3.33, 6.67, 10 -> 0, 3, 6, 10
        let range = DateRange::new(ymd(2025, 3, 1), ymd(2025, 3, 11), DateOrder::OldestFirst);
        assert_eq!(
            range.assign_all(4),
            vec![ymd(2025, 3, 1), ymd(2025, 3, 4), ymd(2025, 3, 7), ymd(2025, 3, 11)]
        );
    }

    #[test]
    fn test_monotonic_in_index() {
        let range = DateRange::new(ymd(2024, 2, 1), ymd(2024, 3, 15), DateOrder::NewestFirst);
        let dates = range.assign_all(17);
        assert!(dates.windows(2).all(|w| w[0] >= w[1]));

        let range = DateRange { order: DateOrder::OldestFirst, ..range };
        let dates = range.assign_all(17);
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_same_start_and_end() {
        let day = ymd(2025, 6, 1);
        let range = DateRange::new(day, day, DateOrder::NewestFirst);
        assert!(range.assign_all(5).iter().all(|d| *d == day));
    }

    #[test]
    fn test_reversed_range_stays_within_bounds() {
        // end before start: total_days is negative
        let range = DateRange::new(ymd(2025, 1, 31), ymd(2025, 1, 1), DateOrder::OldestFirst);
        assert_eq!(range.total_days(), -30);
        let dates = range.assign_all(3);
        assert_eq!(dates, vec![ymd(2025, 1, 31), ymd(2025, 1, 16), ymd(2025, 1, 1)]);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(" 2025-01-28 ").unwrap(), ymd(2025, 1, 28));
        assert!(matches!(
            parse_date("28/01/2025"),
            Err(OrganizerError::InvalidDateInput { .. })
        ));
        assert!(parse_date("2025-02-30").is_err());
    }

    #[test]
    fn test_parse_range_fails_if_either_side_is_bad() {
        assert!(DateRange::parse("2025-01-01", "nope", DateOrder::NewestFirst).is_err());
        let range = DateRange::parse("2025-01-01", "2025-01-31", DateOrder::NewestFirst).unwrap();
        assert_eq!(range.total_days(), 30);
    }
}
