//! # nextdate
//!
//! A library for computing the next occurrence of a recurring task.
//!
//! A task has a start date and a compact *repeat rule*. Given a reference date ("now"), this
//! library finds the first date produced by the rule that falls strictly after now. All
//! computation is on civil dates: there are no times of day and no timezones.
//!
//! ## Examples
//!
//! Quickly get a next date, with the same string-in, string-out shape a task API uses:
//!
//! ```
//! use nextdate::prelude::*;
//!
//! let now = Date::explicit(2024, 1, 1).unwrap();
//! let next = next_date(&now, "20240101", "d 7").unwrap();
//! assert_eq!(next, "20240108");
//! ```
//!
//! Or, break down the steps for reusability:
//!
//! ```
//! use nextdate::prelude::*;
//!
//! let rule = Rule::parse("m -1", Strictness::Strict).unwrap();
//! let start: Date = "20240201".parse().unwrap();
//! let next = rule.next_after(&start, &start).unwrap();
//! assert_eq!(next.to_string(), "20240229");
//! ```
//!
//! ## Rules
//!
//! | Rule | Example | Meaning |
//! |---|---|---|
//! | `d <N>` | `d 7` | Every `N` days after the start date. `N` is `1`–`400`. |
//! | `y` | `y` | Every year on the start date's month and day. A February 29 start falls on March 1 in non-leap years. |
//! | `w <W,...>` | `w 1,3` | On the listed weekdays, `1` (Monday) through `7` (Sunday). |
//! | `m <D,...>` | `m 1,15,-1` | On the listed days of every month. `-1` is the last day, `-2` the second-to-last. |
//! | `m <D,...> <M,...>` | `m 10 1,7` | On the listed days of the listed months (`1`–`12`). |
//!
//! Tokens are separated by single spaces and list elements by commas.
//!
//! ### Strictness
//!
//! `y` takes no parameters and `m` takes at most two, but extra tokens are ignored by default.
//! Use [`Strictness::Strict`] to reject them instead.
//!
//! ## Dates
//!
//! Date strings are 8 digits, `YYYYMMDD`. See [`Date`].
//!
//! ## Prelude
//!
//! nextdate provides a prelude module for convenience. It contains everything needed to interact
//! with the library.
//!
//! Use it with:
//!
//! ```
//! use nextdate::prelude::*;
//! ```
#![warn(missing_docs)]

mod advance;
mod date;
mod error;
mod rule;

pub use crate::advance::{MONTHLY_SCAN_DAYS, WEEKLY_SCAN_DAYS};
pub use crate::date::{is_leap_year, Date};
pub use crate::error::{AdvanceError, DateError, NextDateError, RuleError};
pub use crate::rule::{Rule, Strictness, LAST_DAY, MAX_DAY_INTERVAL, SECOND_TO_LAST_DAY};

/// Returns the next date after `now` for a task starting on `date` that repeats by `repeat`,
/// formatted as `YYYYMMDD`. Extra rule tokens are ignored; see [`next_date_with`].
///
/// ```
/// use nextdate::prelude::*;
///
/// let now = Date::explicit(2024, 1, 1).unwrap();
/// assert_eq!(next_date(&now, "20240101", "w 1,3").unwrap(), "20240103");
/// ```
///
/// # Errors
///
/// - [`RuleError::EmptyRule`] if `repeat` is empty. This is checked before `date`.
/// - [`DateError::InvalidDate`] if `date` is not a `YYYYMMDD` date.
/// - Any other [`RuleError`] if `repeat` doesn't parse.
/// - An [`AdvanceError`] if no next date can be found.
pub fn next_date(now: &Date, date: &str, repeat: &str) -> Result<String, NextDateError> {
    next_date_with(now, date, repeat, Strictness::Lenient)
}

/// Like [`next_date`], but with the given [`Strictness`] for parsing `repeat`.
pub fn next_date_with(
    now: &Date,
    date: &str,
    repeat: &str,
    strictness: Strictness,
) -> Result<String, NextDateError> {
    if repeat.is_empty() {
        return Err(RuleError::EmptyRule.into());
    }
    let start: Date = date.parse()?;
    let rule = Rule::parse(repeat, strictness)?;
    let next = rule.next_after(&start, now)?;

    tracing::debug!(%now, %start, %rule, %next, "computed next date");
    Ok(next.to_string())
}

/// A convenience module appropriate for glob imports (`use nextdate::prelude::*;`).
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::next_date;
    #[doc(no_inline)]
    pub use crate::next_date_with;
    #[doc(no_inline)]
    pub use crate::AdvanceError;
    #[doc(no_inline)]
    pub use crate::Date;
    #[doc(no_inline)]
    pub use crate::DateError;
    #[doc(no_inline)]
    pub use crate::NextDateError;
    #[doc(no_inline)]
    pub use crate::Rule;
    #[doc(no_inline)]
    pub use crate::RuleError;
    #[doc(no_inline)]
    pub use crate::Strictness;
}
