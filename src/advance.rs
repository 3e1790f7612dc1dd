use crate::{
    date::{is_leap_year, Date},
    error::AdvanceError,
    rule::{Rule, LAST_DAY, SECOND_TO_LAST_DAY},
};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

/// How many days a weekly rule scans, starting at (and including) the start date.
pub const WEEKLY_SCAN_DAYS: u32 = 730;

/// How many days a monthly rule scans, starting the day after the start date.
pub const MONTHLY_SCAN_DAYS: u32 = 1000;

impl Rule {
    /// Returns the first date produced by this rule from `start` that is strictly after `now`.
    ///
    /// - `d N`: `start` plus the smallest positive multiple of `N` days that passes `now`.
    /// - `y`: `start` plus whole years. A February 29 start lands on February 29 in leap years
    ///   and on March 1 otherwise.
    /// - `w`: the first listed weekday on or after `start`, scanning at most
    ///   [`WEEKLY_SCAN_DAYS`] days.
    /// - `m`: the first listed day of a listed month after `start`, scanning at most
    ///   [`MONTHLY_SCAN_DAYS`] days.
    ///
    /// # Example
    ///
    /// ```
    /// use nextdate::prelude::*;
    ///
    /// let rule: Rule = "w 1,3".parse().unwrap();
    /// let start = Date::explicit(2024, 1, 1).unwrap(); // a Monday
    /// let next = rule.next_after(&start, &start).unwrap();
    /// assert_eq!("20240103", next.to_string());
    /// ```
    ///
    /// # Errors
    ///
    /// - [`AdvanceError::NoMatchFound`] if a weekly or monthly scan ends without a match. This
    ///   happens for rules that can never match (`m 31 2`) and for starts far enough before
    ///   `now`.
    /// - [`AdvanceError::OutOfRange`] if the next date can't be represented.
    pub fn next_after(&self, start: &Date, now: &Date) -> Result<Date, AdvanceError> {
        let found = match self {
            Rule::Daily { interval } => Some(next_daily(*interval, start, now)?),
            Rule::Yearly => Some(next_yearly(start, now)?),
            Rule::Weekly { weekdays } => scan(start, 0..u64::from(WEEKLY_SCAN_DAYS), |date| {
                weekdays.contains(&date.weekday_number()) && date.is_strictly_after(now)
            })?,
            Rule::Monthly { days, months } => {
                scan(start, 1..u64::from(MONTHLY_SCAN_DAYS) + 1, |date| {
                    month_day_matches(days, date)
                        && (months.is_empty() || months.contains(&date.month()))
                        && date.is_strictly_after(now)
                })?
            }
        };

        found.ok_or_else(|| AdvanceError::NoMatchFound {
            rule: self.to_string(),
            scanned_days: match self {
                Rule::Weekly { .. } => WEEKLY_SCAN_DAYS,
                _ => MONTHLY_SCAN_DAYS,
            },
        })
    }
}

fn next_daily(interval: u32, start: &Date, now: &Date) -> Result<Date, AdvanceError> {
    let interval = u64::from(interval);
    // at least one step is always taken, even when start is already after now
    let steps = match u64::try_from(now.days_since(start)) {
        Ok(behind) => behind / interval + 1,
        Err(_) => 1,
    };

    steps
        .checked_mul(interval)
        .and_then(|days| start.add_days(days))
        .ok_or(AdvanceError::OutOfRange)
}

fn next_yearly(start: &Date, now: &Date) -> Result<Date, AdvanceError> {
    let leap_day = start.month() == 2 && start.day() == 29;

    // every candidate before now's year is on or before now, so skip straight to it
    let mut year = (start.year() + 1).max(now.year());
    loop {
        let candidate = yearly_candidate(start, year, leap_day).ok_or(AdvanceError::OutOfRange)?;
        if candidate.is_strictly_after(now) {
            tracing::trace!(%start, %candidate, "yearly rule advanced");
            return Ok(candidate);
        }
        year += 1;
    }
}

fn yearly_candidate(start: &Date, year: i32, leap_day: bool) -> Option<Date> {
    let (month, day) = match (leap_day, is_leap_year(year)) {
        (true, true) => (2, 29),
        (true, false) => (3, 1),
        (false, _) => (start.month(), start.day()),
    };
    NaiveDate::from_ymd_opt(year, month, day).map(Date::from)
}

fn month_day_matches(days: &BTreeSet<i32>, date: &Date) -> bool {
    let day = date.day() as i32;
    let last = date.last_day_of_month() as i32;

    days.contains(&day)
        || (day == last && days.contains(&LAST_DAY))
        || (day == last - 1 && days.contains(&SECOND_TO_LAST_DAY))
}

/// Walks `offsets` days from `start` and returns the first date accepted by `is_match`.
fn scan<F>(
    start: &Date,
    offsets: core::ops::Range<u64>,
    is_match: F,
) -> Result<Option<Date>, AdvanceError>
where
    F: Fn(&Date) -> bool,
{
    let first = offsets.start;
    for offset in offsets {
        let candidate = start.add_days(offset).ok_or(AdvanceError::OutOfRange)?;
        if is_match(&candidate) {
            tracing::trace!(%start, %candidate, scanned = offset - first + 1, "scan matched");
            return Ok(Some(candidate));
        }
    }
    tracing::trace!(%start, "scan exhausted");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::iproduct;
    use rstest::*;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn next(rule_str: &str, start: &str, now: &str) -> Result<String, AdvanceError> {
        let rule: Rule = rule_str.parse().unwrap();
        rule.next_after(&date(start), &date(now)).map(|d| d.to_string())
    }

    #[fixture]
    fn now() -> &'static str {
        "20240126"
    }

    #[rstest]
    #[case("d 7", "20240113", "20240127")]
    #[case("d 20", "20240120", "20240209")]
    #[case("d 30", "20240202", "20240303")]
    #[case("d 1", "20240126", "20240127")]
    #[case("d 1", "20240125", "20240127")]
    #[case("y", "20240229", "20250301")]
    #[case("y", "20230101", "20250101")]
    #[case("y", "20231225", "20241225")]
    #[case("w 1,2,3", "20240125", "20240129")]
    #[case("w 7", "20240126", "20240128")]
    #[case("w 4,5", "20230126", "20240201")]
    #[case("m 25,26,7", "20240126", "20240207")]
    #[case("m 31", "20240409", "20240531")]
    #[case("m 10,17 12,8,1", "20240329", "20240810")]
    #[case("m 07,19 05,6", "20230311", "20240507")]
    #[case("m 1 1,2", "20230311", "20240201")]
    #[case("m -1", "20240127", "20240131")]
    #[case("m -2", "20240222", "20240228")]
    #[case("m -1,-2", "20240326", "20240330")]
    #[case("m -1,18", "20240201", "20240218")]
    fn test_next_after(
        now: &str,
        #[case] rule_str: &str,
        #[case] start: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(Ok(expected.to_string()), next(rule_str, start, now));
    }

    #[test]
    fn test_start_equals_now() {
        assert_eq!(Ok("20240108".into()), next("d 7", "20240101", "20240101"));
        // 2024-01-01 is a Monday, but it isn't strictly after now
        assert_eq!(Ok("20240103".into()), next("w 1,3", "20240101", "20240101"));
        assert_eq!(Ok("20240229".into()), next("m -1", "20240201", "20240201"));
    }

    #[test]
    fn test_start_after_now_still_advances() {
        assert_eq!(Ok("20250108".into()), next("d 7", "20250101", "20240101"));
        assert_eq!(Ok("20260101".into()), next("y", "20250101", "20240101"));
        // monthly scans begin the day after start
        assert_eq!(Ok("20250201".into()), next("m 1", "20250101", "20240101"));
        // weekly scans include start
        assert_eq!(Ok("20250101".into()), next("w 3", "20250101", "20240101"));
    }

    #[test]
    fn test_yearly_leap_day() {
        let args = [
            ("20200229", "20210301"),
            ("20210301", "20220301"),
            ("20230228", "20230301"),
            ("20230301", "20240229"),
            ("20230601", "20240229"),
            ("20240228", "20240229"),
            ("20240229", "20250301"),
            ("20990301", "21000301"), // 2100 is not a leap year
        ];

        for (now, expected) in args {
            assert_eq!(Ok(expected.to_string()), next("y", "20200229", now), "now {now}");
        }
    }

    #[rstest]
    #[case("20240101", "20240131")]
    #[case("20240131", "20240229")]
    #[case("20230131", "20230228")]
    #[case("20240331", "20240430")]
    #[case("20241130", "20241231")]
    #[case("19000131", "19000228")]
    fn test_monthly_last_day(#[case] now: &str, #[case] expected: &str) {
        assert_eq!(Ok(expected.to_string()), next("m -1", now, now));
    }

    #[test]
    fn test_monthly_second_to_last_day() {
        assert_eq!(Ok("20240228".into()), next("m -2", "20240201", "20240201"));
        assert_eq!(Ok("20230227".into()), next("m -2", "20230201", "20230201"));
        assert_eq!(Ok("20240430".into()), next("m -2,-1", "20240428", "20240429"));
    }

    #[test]
    fn test_monthly_month_filter() {
        assert_eq!(Ok("20241201".into()), next("m 1 12", "20240101", "20240101"));
        assert_eq!(Ok("20250131".into()), next("m -1 1", "20240131", "20240131"));
    }

    #[test]
    fn test_no_match_found() {
        let args = [
            // february never has a 30th or 31st
            ("m 31 2", "20240101", "20240101", MONTHLY_SCAN_DAYS),
            ("m 30 2", "20240101", "20240101", MONTHLY_SCAN_DAYS),
            // start far enough behind now that the scans can't catch up
            ("w 1", "20200101", "20240101", WEEKLY_SCAN_DAYS),
            ("m 1", "20200101", "20240101", MONTHLY_SCAN_DAYS),
        ];

        for (rule_str, start, now, scanned_days) in args {
            let rule: Rule = rule_str.parse().unwrap();
            assert_eq!(
                Err(AdvanceError::NoMatchFound {
                    rule: rule.to_string(),
                    scanned_days,
                }),
                next(rule_str, start, now)
            );
        }
    }

    #[test]
    fn test_out_of_range() {
        let max = Date::from(NaiveDate::MAX);
        let rule: Rule = "d 1".parse().unwrap();
        assert_eq!(Err(AdvanceError::OutOfRange), rule.next_after(&max, &max));
        let rule: Rule = "y".parse().unwrap();
        assert_eq!(Err(AdvanceError::OutOfRange), rule.next_after(&max, &max));
    }

    fn sample_dates() -> Vec<Date> {
        ["20230115", "20231231", "20240101", "20240228", "20240229", "20240301", "20250704"]
            .iter()
            .map(|s| date(s))
            .collect()
    }

    #[test]
    fn test_daily_properties() {
        let intervals = [1u32, 2, 7, 30, 400];

        for (start, now, interval) in iproduct!(sample_dates(), sample_dates(), intervals) {
            let rule: Rule = format!("d {interval}").parse().unwrap();
            let next = rule.next_after(&start, &now).unwrap();
            let elapsed = next.days_since(&start);

            assert!(next.is_strictly_after(&now));
            assert!(elapsed > 0);
            assert_eq!(0, elapsed % i64::from(interval));
            // the previous step was not after now, unless it was start itself
            let previous = Date::from(*next - chrono::Days::new(u64::from(interval)));
            assert!(previous == start || !previous.is_strictly_after(&now));
        }
    }

    #[test]
    fn test_yearly_properties() {
        for (start, now) in iproduct!(sample_dates(), sample_dates()) {
            if start.month() == 2 && start.day() == 29 {
                continue;
            }
            let next = Rule::Yearly.next_after(&start, &now).unwrap();

            assert!(next.is_strictly_after(&now));
            assert!(next.year() > start.year());
            assert_eq!((start.month(), start.day()), (next.month(), next.day()));
        }
    }

    #[test]
    fn test_weekly_properties() {
        let weekday_sets: [&[u32]; 4] = [&[1], &[7], &[2, 4, 6], &[1, 2, 3, 4, 5, 6, 7]];

        for (start, now, weekdays) in iproduct!(sample_dates(), sample_dates(), weekday_sets) {
            if now.days_since(&start) > i64::from(WEEKLY_SCAN_DAYS) - 7 {
                continue;
            }
            let weekdays: BTreeSet<u32> = weekdays.iter().copied().collect();
            let rule = Rule::Weekly {
                weekdays: weekdays.clone(),
            };
            let next = rule.next_after(&start, &now).unwrap();

            assert!(next.is_strictly_after(&now));
            assert!(!start.is_strictly_after(&next));
            assert!(weekdays.contains(&next.weekday_number()));
        }
    }

    #[test]
    fn test_monthly_properties() {
        for (start, now) in iproduct!(sample_dates(), sample_dates()) {
            let next = next("m -1", &start.to_string(), &now.to_string()).map(|s| date(&s));
            let next = next.unwrap();

            assert!(next.is_strictly_after(&now));
            assert!(next.is_strictly_after(&start));
            assert_eq!(next.last_day_of_month(), next.day());
        }
    }
}
