//! Whole-day calendar dates and the week/month arithmetic the grid needs.
//!
//! Everything here is a thin layer over `chrono::NaiveDate`: no time of day,
//! no timezone, just year/month/day.

pub mod grid;

use chrono::format::ParseErrorKind;
use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::str::FromStr;
use thiserror::Error;

pub use grid::{build_month_grid, DayCell, MonthGrid};

/// Earliest year accepted by [`CalendarDate::from_ymd`]
pub const MIN_YEAR: i32 = -262_000;
/// Latest year accepted by [`CalendarDate::from_ymd`]
pub const MAX_YEAR: i32 = 262_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidDateError {
    #[error("{year:04}-{month:02}-{day:02} is not a valid calendar date")]
    OutOfRange { year: i32, month: u32, day: u32 },
    #[error("'{0}' is not a valid calendar date")]
    Impossible(String),
    #[error("could not parse date '{0}' (expected YYYY-MM-DD)")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown weekday: '{0}'")]
pub struct InvalidWeekdayError(pub String);

/// A single calendar day. Ordering and equality are by day only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Build a date from its parts, rejecting anything that isn't a real day
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, InvalidDateError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(InvalidDateError::OutOfRange { year, month, day });
        }

        NaiveDate::from_ymd_opt(year, month, day)
            .map(CalendarDate)
            .ok_or(InvalidDateError::OutOfRange { year, month, day })
    }

    /// Today according to the local clock
    pub fn today() -> Self {
        CalendarDate(chrono::Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Number of days in this date's month (28..=31)
    pub fn days_in_month(&self) -> u32 {
        // Probe downwards from 31; with_day fails for days the month lacks
        [31, 30, 29]
            .into_iter()
            .find(|&d| self.0.with_day(d).is_some())
            .unwrap_or(28)
    }

    pub fn first_day_of_month(&self) -> Self {
        self.with_day_or_self(1)
    }

    pub fn last_day_of_month(&self) -> Self {
        self.with_day_or_self(self.days_in_month())
    }

    /// The day in this date's week that falls on `convention`'s first weekday.
    ///
    /// Near `MIN_YEAR`/`MAX_YEAR` this may be a few days outside the
    /// constructible range; chrono still represents it.
    pub fn start_of_week_containing(&self, convention: WeekdayConvention) -> Self {
        self.shift_days(-i64::from(convention.column_of(self.weekday())))
    }

    /// The day in this date's week that falls on `convention`'s last weekday
    pub fn end_of_week_containing(&self, convention: WeekdayConvention) -> Self {
        self.start_of_week_containing(convention).shift_days(6)
    }

    /// Move `n` days forward (or backward when negative).
    ///
    /// Panics if the result leaves `MIN_YEAR..=MAX_YEAR`, like `NaiveDate + Days`
    /// does at chrono's limits. Use [`CalendarDate::checked_add_days`] when `n`
    /// is untrusted.
    pub fn add_days(&self, n: i64) -> Self {
        match self.checked_add_days(n) {
            Some(date) => date,
            None => panic!("{} + {} days is out of the supported range", self, n),
        }
    }

    /// Returns `None` when the result falls outside `MIN_YEAR..=MAX_YEAR`
    pub fn checked_add_days(&self, n: i64) -> Option<Self> {
        let days = Days::new(n.unsigned_abs());
        let date = if n >= 0 {
            self.0.checked_add_days(days)
        } else {
            self.0.checked_sub_days(days)
        }?;

        CalendarDate::try_from(date).ok()
    }

    /// Day arithmetic for week alignment, which may step just past the
    /// supported years. Saturates at chrono's limits, which no date within
    /// a week of the supported range can reach.
    fn shift_days(&self, n: i64) -> Self {
        let days = Days::new(n.unsigned_abs());
        let date = if n >= 0 {
            self.0.checked_add_days(days).unwrap_or(NaiveDate::MAX)
        } else {
            self.0.checked_sub_days(days).unwrap_or(NaiveDate::MIN)
        };
        CalendarDate(date)
    }

    /// Move `n` months, clamping the day to the target month's length
    /// (Jan 31 + 1 month is the last day of February).
    ///
    /// Returns `None` when the result falls outside `MIN_YEAR..=MAX_YEAR`.
    pub fn checked_add_months(&self, n: i32) -> Option<Self> {
        let months = Months::new(n.unsigned_abs());
        let date = if n >= 0 {
            self.0.checked_add_months(months)
        } else {
            self.0.checked_sub_months(months)
        }?;

        (MIN_YEAR..=MAX_YEAR)
            .contains(&date.year())
            .then_some(CalendarDate(date))
    }

    /// Whole days from `earlier` to `self` (negative if `earlier` is later)
    pub fn days_since(&self, earlier: &CalendarDate) -> i64 {
        self.0.signed_duration_since(earlier.0).num_days()
    }

    pub fn is_same_month(&self, other: &CalendarDate) -> bool {
        self.year() == other.year() && self.month() == other.month()
    }

    pub fn is_same_day(&self, other: &CalendarDate) -> bool {
        self == other
    }

    /// Format with a strftime pattern (`%B %Y`, `%-d`, ...).
    ///
    /// Invalid patterns produce an error instead of a panic.
    pub fn format(&self, pattern: &str) -> Result<String, fmt::Error> {
        let mut out = String::new();
        write!(out, "{}", self.0.format(pattern))?;
        Ok(out)
    }

    fn with_day_or_self(&self, day: u32) -> Self {
        // Only called with days that exist in this month
        self.0.with_day(day).map(CalendarDate).unwrap_or(*self)
    }
}

impl TryFrom<NaiveDate> for CalendarDate {
    type Error = InvalidDateError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
            return Err(InvalidDateError::OutOfRange {
                year: date.year(),
                month: date.month(),
                day: date.day(),
            });
        }
        Ok(CalendarDate(date))
    }
}

impl From<CalendarDate> for NaiveDate {
    fn from(date: CalendarDate) -> Self {
        date.0
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for CalendarDate {
    type Err = InvalidDateError;

    /// Parse `YYYY-MM-DD`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| match e.kind() {
            ParseErrorKind::OutOfRange | ParseErrorKind::Impossible => {
                InvalidDateError::Impossible(s.to_string())
            }
            _ => InvalidDateError::Malformed(s.to_string()),
        })?;

        CalendarDate::try_from(date)
    }
}

/// Which weekday sits in column 0 of a month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekdayConvention(Weekday);

impl Default for WeekdayConvention {
    fn default() -> Self {
        WeekdayConvention(Weekday::Sun)
    }
}

impl WeekdayConvention {
    pub const SUNDAY: WeekdayConvention = WeekdayConvention(Weekday::Sun);
    pub const MONDAY: WeekdayConvention = WeekdayConvention(Weekday::Mon);

    pub fn starting_on(first_day: Weekday) -> Self {
        WeekdayConvention(first_day)
    }

    pub fn first_day(&self) -> Weekday {
        self.0
    }

    pub fn last_day(&self) -> Weekday {
        self.0.pred()
    }

    /// The seven weekdays in column order
    pub fn weekdays(&self) -> [Weekday; 7] {
        let mut day = self.0;
        std::array::from_fn(|_| {
            let current = day;
            day = day.succ();
            current
        })
    }

    /// Column (0..=6) that `day` occupies under this convention
    pub fn column_of(&self, day: Weekday) -> u32 {
        (7 + day.num_days_from_monday() - self.0.num_days_from_monday()) % 7
    }
}

impl fmt::Display for WeekdayConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WeekdayConvention {
    type Err = InvalidWeekdayError;

    /// Accepts full or short weekday names, any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<Weekday>()
            .map(WeekdayConvention)
            .map_err(|_| InvalidWeekdayError(s.to_string()))
    }
}

/// Full English weekday name, as used for column headers.
///
/// chrono only spells these out through `%A` on a whole date.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert!(CalendarDate::from_ymd(2023, 13, 1).is_err(), "month 13");
        assert!(CalendarDate::from_ymd(2023, 2, 30).is_err(), "Feb 30");
        assert!(CalendarDate::from_ymd(2023, 2, 29).is_err(), "Feb 29 in a common year");
        assert!(CalendarDate::from_ymd(2023, 4, 0).is_err(), "day 0");
        assert!(CalendarDate::from_ymd(2024, 2, 29).is_ok(), "Feb 29 in a leap year");

        assert_eq!(
            CalendarDate::from_ymd(2023, 2, 30),
            Err(InvalidDateError::OutOfRange { year: 2023, month: 2, day: 30 })
        );
    }

    #[test]
    fn test_rejects_years_outside_supported_range() {
        assert!(CalendarDate::from_ymd(MAX_YEAR + 1, 1, 1).is_err());
        assert!(CalendarDate::from_ymd(MIN_YEAR - 1, 12, 31).is_err());
        assert!(CalendarDate::from_ymd(MAX_YEAR, 12, 31).is_ok());
        assert!(CalendarDate::from_ymd(MIN_YEAR, 1, 1).is_ok());
    }

    #[test]
    fn test_parse_and_display() {
        let parsed: CalendarDate = "2021-02-15".parse().unwrap();
        assert_eq!(parsed, date(2021, 2, 15));
        assert_eq!(parsed.to_string(), "2021-02-15");

        assert_eq!(" 2020-2-9 ".parse::<CalendarDate>().unwrap(), date(2020, 2, 9));
        assert_eq!("-0044-03-15".parse::<CalendarDate>().unwrap(), date(-44, 3, 15));

        assert!(matches!(
            "2021/02/15".parse::<CalendarDate>(),
            Err(InvalidDateError::Malformed(_))
        ));
        assert!(matches!(
            "2021-02-xx".parse::<CalendarDate>(),
            Err(InvalidDateError::Malformed(_))
        ));
        assert!(matches!(
            "2021-02-30".parse::<CalendarDate>(),
            Err(InvalidDateError::Impossible(_))
        ));
        assert!(matches!(
            "2021-13-01".parse::<CalendarDate>(),
            Err(InvalidDateError::Impossible(_))
        ));

        // Parses fine but lies past the supported years
        assert_eq!(
            "+262001-01-01".parse::<CalendarDate>(),
            Err(InvalidDateError::OutOfRange { year: 262_001, month: 1, day: 1 })
        );
    }

    #[test]
    fn test_try_from_naive_date_checks_year_range() {
        let inside = NaiveDate::from_ymd_opt(2021, 2, 15).unwrap();
        assert_eq!(CalendarDate::try_from(inside), Ok(date(2021, 2, 15)));

        assert!(CalendarDate::try_from(NaiveDate::MAX).is_err());
        assert!(CalendarDate::try_from(NaiveDate::MIN).is_err());

        let past = NaiveDate::from_ymd_opt(MAX_YEAR + 1, 1, 1).unwrap();
        assert_eq!(
            CalendarDate::try_from(past),
            Err(InvalidDateError::OutOfRange { year: MAX_YEAR + 1, month: 1, day: 1 })
        );
    }

    #[test]
    fn test_month_boundaries() {
        assert_eq!(date(2021, 2, 15).first_day_of_month(), date(2021, 2, 1));
        assert_eq!(date(2021, 2, 15).last_day_of_month(), date(2021, 2, 28));
        assert_eq!(date(2020, 2, 15).last_day_of_month(), date(2020, 2, 29));
        assert_eq!(date(2023, 4, 1).last_day_of_month(), date(2023, 4, 30));
        assert_eq!(date(2023, 12, 31).last_day_of_month(), date(2023, 12, 31));

        // Century rules
        assert_eq!(date(1900, 2, 1).days_in_month(), 28);
        assert_eq!(date(2000, 2, 1).days_in_month(), 29);
    }

    #[test]
    fn test_week_boundaries() {
        // Feb 1 2021 is a Monday
        let feb1 = date(2021, 2, 1);
        assert_eq!(feb1.weekday(), Weekday::Mon);

        assert_eq!(feb1.start_of_week_containing(WeekdayConvention::SUNDAY), date(2021, 1, 31));
        assert_eq!(feb1.end_of_week_containing(WeekdayConvention::SUNDAY), date(2021, 2, 6));
        assert_eq!(feb1.start_of_week_containing(WeekdayConvention::MONDAY), feb1);
        assert_eq!(feb1.end_of_week_containing(WeekdayConvention::MONDAY), date(2021, 2, 7));

        // A date already on the week start is its own start
        let sunday = date(2021, 1, 31);
        assert_eq!(sunday.start_of_week_containing(WeekdayConvention::SUNDAY), sunday);
    }

    #[test]
    fn test_add_days_rolls_over() {
        assert!(date(2023, 2, 28).add_days(1).is_same_day(&date(2023, 3, 1)));
        assert_eq!(date(2024, 2, 28).add_days(1), date(2024, 2, 29));
        assert_eq!(date(2023, 12, 31).add_days(1), date(2024, 1, 1));
        assert_eq!(date(2023, 1, 1).add_days(-1), date(2022, 12, 31));
        assert_eq!(date(2023, 1, 1).add_days(0), date(2023, 1, 1));
        assert_eq!(date(2023, 1, 1).checked_add_days(i64::MAX), None);
    }

    #[test]
    fn test_checked_add_days_stays_in_supported_years() {
        let last = date(MAX_YEAR, 12, 31);
        assert_eq!(last.checked_add_days(1), None);
        assert_eq!(last.checked_add_days(-1), Some(date(MAX_YEAR, 12, 30)));

        let first = date(MIN_YEAR, 1, 1);
        assert_eq!(first.checked_add_days(-1), None);
        assert_eq!(first.checked_add_days(1), Some(date(MIN_YEAR, 1, 2)));
    }

    #[test]
    #[should_panic]
    fn test_add_days_panics_past_range() {
        date(2023, 1, 1).add_days(i64::MIN);
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(date(2023, 1, 31).checked_add_months(1), Some(date(2023, 2, 28)));
        assert_eq!(date(2024, 1, 31).checked_add_months(1), Some(date(2024, 2, 29)));
        assert_eq!(date(2023, 3, 31).checked_add_months(-1), Some(date(2023, 2, 28)));
        assert_eq!(date(2023, 12, 15).checked_add_months(1), Some(date(2024, 1, 15)));
        assert_eq!(date(2023, 1, 15).checked_add_months(-13), Some(date(2021, 12, 15)));
        assert_eq!(date(MAX_YEAR, 12, 1).checked_add_months(1), None);
    }

    #[test]
    fn test_same_month_and_day() {
        assert!(date(2023, 5, 1).is_same_month(&date(2023, 5, 31)));
        assert!(!date(2023, 5, 1).is_same_month(&date(2022, 5, 1)));
        assert!(!date(2023, 5, 31).is_same_month(&date(2023, 6, 1)));
        assert!(date(2023, 5, 1).is_same_day(&date(2023, 5, 1)));
        assert!(!date(2023, 5, 1).is_same_day(&date(2023, 5, 2)));
        assert!(date(2023, 5, 1) < date(2023, 5, 2));
    }

    #[test]
    fn test_format() {
        let d = date(2021, 2, 5);
        assert_eq!(d.format("%B %Y").unwrap(), "February 2021");
        assert_eq!(d.format("%-d").unwrap(), "5");
        assert!(d.format("%Q").is_err(), "unknown specifier should not panic");
    }

    #[test]
    fn test_weekday_convention() {
        assert_eq!(WeekdayConvention::default(), WeekdayConvention::SUNDAY);
        assert_eq!(WeekdayConvention::SUNDAY.last_day(), Weekday::Sat);
        assert_eq!(WeekdayConvention::MONDAY.last_day(), Weekday::Sun);

        let days = WeekdayConvention::MONDAY.weekdays();
        assert_eq!(days[0], Weekday::Mon);
        assert_eq!(days[6], Weekday::Sun);

        assert_eq!(WeekdayConvention::SUNDAY.column_of(Weekday::Sun), 0);
        assert_eq!(WeekdayConvention::SUNDAY.column_of(Weekday::Sat), 6);
        assert_eq!(WeekdayConvention::MONDAY.column_of(Weekday::Sun), 6);

        assert_eq!("monday".parse::<WeekdayConvention>().unwrap(), WeekdayConvention::MONDAY);
        assert_eq!("Sun".parse::<WeekdayConvention>().unwrap(), WeekdayConvention::SUNDAY);
        assert!("someday".parse::<WeekdayConvention>().is_err());
    }
}
