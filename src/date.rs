use crate::error::DateError;
use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use core::{
    fmt::{self, Display},
    ops::Deref,
    str::FromStr,
};

/// Returns true if `year` is a leap year in the proleptic Gregorian calendar.
pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 4 == 0 && year % 100 != 0)
}

/// A civil date: a year, month and day with no time-of-day or timezone.
///
/// Dates order by (year, month, day). Anything with a time component is truncated to its date
/// when converted, so comparisons never see the time of day.
///
/// ```
/// use nextdate::Date;
///
/// let explicit = Date::explicit(2024, 2, 29).unwrap();
/// let parsed: Date = "20240229".parse().unwrap();
/// assert_eq!(explicit, parsed);
/// assert_eq!("20240229", parsed.to_string());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(NaiveDate);

impl Date {
    /// Returns a new [Date] representing the current date in UTC at the time of this call.
    pub fn utc_today() -> Self {
        Self(Utc::now().date_naive())
    }

    /// Returns a new [Date] representing the current date in the system's local timezone at the
    /// time of this call.
    pub fn local_today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Returns result of a new [Date] representing the given date, or
    /// [DateError::InvalidDateArguments].
    pub fn explicit(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(DateError::InvalidDateArguments { year, month, day })
    }

    /// Returns true if this date is on a later calendar day than `now`.
    pub fn is_strictly_after(&self, now: &Date) -> bool {
        self.0 > now.0
    }

    /// Returns the ISO weekday number of this date: Monday is `1` and Sunday is `7`.
    pub fn weekday_number(&self) -> u32 {
        self.0.weekday().number_from_monday()
    }

    /// Returns the number of the last day in this date's month (`28` to `31`).
    pub fn last_day_of_month(&self) -> u32 {
        match self.0.month() {
            2 if is_leap_year(self.0.year()) => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// Returns the date `days` days later, or `None` if that leaves the representable range.
    pub(crate) fn add_days(&self, days: u64) -> Option<Self> {
        self.0.checked_add_days(Days::new(days)).map(Self)
    }

    /// Returns the number of days from `earlier` to this date. Negative if `earlier` is later.
    pub(crate) fn days_since(&self, earlier: &Date) -> i64 {
        self.0.signed_duration_since(earlier.0).num_days()
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<NaiveDateTime> for Date {
    fn from(datetime: NaiveDateTime) -> Self {
        Self(datetime.date())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Date {
    /// Takes the calendar date as seen in the datetime's own timezone.
    fn from(datetime: DateTime<Tz>) -> Self {
        Self(datetime.date_naive())
    }
}

impl FromStr for Date {
    type Err = DateError;

    /// Parses a date string into a [Date]. The string must be exactly 8 ASCII digits in the form
    /// `YYYYMMDD` and name a real calendar date.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DateError::InvalidDate {
            value: s.to_owned(),
        };

        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        // all ascii digits, so these slices are on char boundaries and parse as unsigned numbers
        let year = s[0..4].parse::<i32>().map_err(|_| invalid())?;
        let month = s[4..6].parse::<u32>().map_err(|_| invalid())?;
        let day = s[6..8].parse::<u32>().map_err(|_| invalid())?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl Deref for Date {
    type Target = NaiveDate;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Date {
    /// Renders the date as `YYYYMMDD`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}
