use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::FinanceError;

/// A calendar month, parsed from and rendered as a `YYYY-MM` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, FinanceError> {
        if !(1..=12).contains(&month) {
            return Err(FinanceError::InvalidPeriod(format!(
                "month {month} is outside 1-12"
            )));
        }
        // The last day must exist too, otherwise bounds() has nothing to return.
        let first = NaiveDate::from_ymd_opt(year, month, 1);
        if first.is_none() || last_day_of(year, month).is_none() {
            return Err(FinanceError::InvalidPeriod(format!(
                "year {year} is not a representable calendar year"
            )));
        }
        Ok(YearMonth { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(self) -> NaiveDate {
        last_day_of(self.year, self.month).unwrap_or(NaiveDate::MAX)
    }

    pub fn bounds(self) -> DateRange {
        DateRange::new(self.first_day(), self.last_day())
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The following month, or `None` past the last representable one.
    pub fn next(self) -> Option<Self> {
        if self.month == 12 {
            YearMonth::new(self.year.checked_add(1)?, 1).ok()
        } else {
            YearMonth::new(self.year, self.month + 1).ok()
        }
    }
}

fn last_day_of(year: i32, month: u32) -> Option<NaiveDate> {
    (28..=31)
        .rev()
        .find_map(|day| NaiveDate::from_ymd_opt(year, month, day))
}

/// Inclusive first and last calendar day of `month` in `year`.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), FinanceError> {
    let ym = YearMonth::new(year, month)?;
    Ok((ym.first_day(), ym.last_day()))
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.year < 0 {
            write!(f, "-{:04}-{:02}", self.year.unsigned_abs(), self.month)
        } else {
            write!(f, "{:04}-{:02}", self.year, self.month)
        }
    }
}

impl FromStr for YearMonth {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || {
            FinanceError::InvalidPeriod(format!(
                "malformed year-month token {s:?}, expected YYYY-MM"
            ))
        };

        let (year_part, month_part) = s.rsplit_once('-').ok_or_else(malformed)?;
        let year_digits = year_part.strip_prefix('-').unwrap_or(year_part);

        if year_digits.len() < 4 || !year_digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        if month_part.len() != 2 || !month_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let year: i32 = year_part.parse().map_err(|_| malformed())?;
        let month: u32 = month_part.parse().map_err(|_| malformed())?;
        YearMonth::new(year, month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// Like `new`, but rejects a range whose start falls after its end.
    pub fn checked(start: NaiveDate, end: NaiveDate) -> Result<Self, FinanceError> {
        if start > end {
            return Err(FinanceError::InvalidPeriod(format!(
                "range start {start} is after end {end}"
            )));
        }
        Ok(DateRange { start, end })
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// True when the two inclusive ranges share at least one day.
    pub fn overlaps(self, other: DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn leap_february() {
        assert_eq!(month_bounds(2024, 2).unwrap(), (date(2024, 2, 1), date(2024, 2, 29)));
    }

    #[test]
    fn common_february() {
        assert_eq!(month_bounds(2023, 2).unwrap(), (date(2023, 2, 1), date(2023, 2, 28)));
        assert_eq!(month_bounds(1900, 2).unwrap().1, date(1900, 2, 28));
        assert_eq!(month_bounds(2000, 2).unwrap().1, date(2000, 2, 29));
    }

    #[test]
    fn thirty_and_thirty_one_day_months() {
        assert_eq!(month_bounds(2024, 1).unwrap(), (date(2024, 1, 1), date(2024, 1, 31)));
        assert_eq!(month_bounds(2024, 4).unwrap().1, date(2024, 4, 30));
        assert_eq!(month_bounds(2024, 12).unwrap().1, date(2024, 12, 31));
    }

    #[test]
    fn every_month_starts_on_day_one() {
        for month in 1..=12 {
            let (start, end) = month_bounds(2025, month).unwrap();
            assert_eq!(start.day(), 1);
            assert_eq!(end.month(), month);
            assert_ne!(end.succ_opt().unwrap().month(), month);
        }
    }

    #[test]
    fn month_out_of_range() {
        assert!(matches!(month_bounds(2024, 0), Err(FinanceError::InvalidPeriod(_))));
        assert!(matches!(month_bounds(2024, 13), Err(FinanceError::InvalidPeriod(_))));
    }

    #[test]
    fn unrepresentable_year() {
        assert!(matches!(month_bounds(i32::MAX, 1), Err(FinanceError::InvalidPeriod(_))));
    }

    #[test]
    fn parse_token() {
        let ym: YearMonth = "2024-01".parse().unwrap();
        assert_eq!((ym.year(), ym.month()), (2024, 1));
        assert_eq!(ym.to_string(), "2024-01");
        assert_eq!(ym.bounds(), DateRange::new(date(2024, 1, 1), date(2024, 1, 31)));
    }

    #[test]
    fn parse_rejects_malformed_tokens() {
        let tokens = [
            "", "2024", "2024-1", "2024/01", "24-01", "2024-001", "2024-13", "2024-00", "abcd-ef",
            "2024-01-15", " 2024-01",
        ];
        for token in tokens {
            assert!(
                matches!(token.parse::<YearMonth>(), Err(FinanceError::InvalidPeriod(_))),
                "{token:?} should be rejected"
            );
        }
    }

    #[test]
    fn parse_negative_year() {
        let ym: YearMonth = "-0044-03".parse().unwrap();
        assert_eq!(ym.year(), -44);
        assert_eq!(ym.to_string(), "-0044-03");
    }

    #[test]
    fn next_rolls_over_year() {
        let dec: YearMonth = "2024-12".parse().unwrap();
        assert_eq!(dec.next().unwrap().to_string(), "2025-01");
        let jan: YearMonth = "2024-01".parse().unwrap();
        assert_eq!(jan.next().unwrap().to_string(), "2024-02");
    }

    #[test]
    fn month_contains_its_boundaries_only() {
        let jan: YearMonth = "2024-01".parse().unwrap();
        assert!(jan.contains(date(2024, 1, 1)));
        assert!(jan.contains(date(2024, 1, 31)));
        assert!(!jan.contains(date(2024, 2, 1)));
        assert!(!jan.next().unwrap().contains(date(2024, 1, 31)));
    }

    #[test]
    fn serde_uses_token() {
        let ym: YearMonth = "2024-07".parse().unwrap();
        assert_eq!(serde_json::to_string(&ym).unwrap(), "\"2024-07\"");
        let back: YearMonth = serde_json::from_str("\"2024-07\"").unwrap();
        assert_eq!(back, ym);
        assert!(serde_json::from_str::<YearMonth>("\"2024-7\"").is_err());
    }

    #[test]
    fn date_range_contains() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 12, 31));
        assert!(range.contains(date(2024, 6, 15)));
        assert!(range.contains(date(2024, 1, 1))); // inclusive start
        assert!(range.contains(date(2024, 12, 31))); // inclusive end
        assert!(!range.contains(date(2023, 12, 31)));
        assert!(!range.contains(date(2025, 1, 1)));
    }

    #[test]
    fn date_range_checked_rejects_inverted() {
        assert!(DateRange::checked(date(2024, 2, 1), date(2024, 1, 1)).is_err());
        assert!(DateRange::checked(date(2024, 1, 1), date(2024, 1, 1)).is_ok());
    }

    #[test]
    fn date_range_overlaps() {
        let jan = DateRange::new(date(2024, 1, 1), date(2024, 1, 31));
        assert!(jan.overlaps(DateRange::new(date(2023, 6, 1), date(2024, 1, 1))));
        assert!(!jan.overlaps(DateRange::new(date(2024, 2, 1), date(2024, 3, 1))));
    }

    #[test]
    fn date_range_display() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 12, 31));
        assert_eq!(range.to_string(), "2024-01-01 to 2024-12-31");
    }
}
