use crate::error::RuleError;
use core::{
    fmt::{self, Display},
    str::FromStr,
};
use std::collections::BTreeSet;

pub(crate) const DAILY: &str = "d";
pub(crate) const YEARLY: &str = "y";
pub(crate) const WEEKLY: &str = "w";
pub(crate) const MONTHLY: &str = "m";

/// The largest interval accepted by a daily rule.
pub const MAX_DAY_INTERVAL: u32 = 400;

/// Day-of-month value meaning "the last day of the month".
pub const LAST_DAY: i32 = -1;

/// Day-of-month value meaning "the second-to-last day of the month".
pub const SECOND_TO_LAST_DAY: i32 = -2;

/// How to treat rule tokens that carry no meaning.
///
/// Only two places accept such tokens: anything after `y`, and anything after the month list of
/// an `m` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Ignore meaningless tokens.
    #[default]
    Lenient,
    /// Reject meaningless tokens with [`RuleError::UnexpectedToken`].
    Strict,
}

impl Strictness {
    fn check_no_extra(self, kind: &'static str, extra: &[&str]) -> Result<(), RuleError> {
        match (self, extra.first()) {
            (Strictness::Strict, Some(token)) => Err(RuleError::UnexpectedToken {
                kind,
                token: (*token).to_owned(),
            }),
            _ => Ok(()),
        }
    }
}

/// A repeat rule describes how a task recurs.
///
/// Rules are written as a kind letter followed by space-separated parameters:
///
/// | Rule | Meaning |
/// |---|---|
/// | `d <N>` | Every `N` days, `N` in `1..=400`. |
/// | `y` | Every year on the same date. A February 29 start falls on March 1 in non-leap years. |
/// | `w <W,...>` | On the listed weekdays, `1` (Monday) to `7` (Sunday). |
/// | `m <D,...> [<M,...>]` | On the listed days of the month (`1..=31`, `-1` for the last day, `-2` for the second-to-last), optionally only in the listed months (`1..=12`). |
///
/// A `Rule` can only be obtained by parsing, so its values always satisfy the ranges above.
///
/// ```
/// use nextdate::prelude::*;
///
/// let rule: Rule = "m -1,15 1,6".parse().unwrap();
/// assert_eq!("m -1,15 1,6", rule.to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Repeats every `interval` days.
    #[non_exhaustive]
    Daily {
        /// Days between occurrences, in `1..=400`.
        interval: u32,
    },

    /// Repeats every year.
    Yearly,

    /// Repeats on the given weekdays.
    #[non_exhaustive]
    Weekly {
        /// ISO weekday numbers, `1` (Monday) to `7` (Sunday). Never empty.
        weekdays: BTreeSet<u32>,
    },

    /// Repeats on the given days of the given months.
    #[non_exhaustive]
    Monthly {
        /// Days of the month in `1..=31`, or [`LAST_DAY`]/[`SECOND_TO_LAST_DAY`]. Never empty.
        days: BTreeSet<i32>,
        /// Months in `1..=12`. Empty means every month.
        months: BTreeSet<u32>,
    },
}

impl Rule {
    /// Parses a rule string.
    ///
    /// # Errors
    ///
    /// - [`RuleError::EmptyRule`] if `rule_str` is empty.
    /// - [`RuleError::UnsupportedRuleKind`] if the first token is not `d`, `y`, `w` or `m`.
    /// - [`RuleError::InvalidDayInterval`], [`RuleError::InvalidWeekday`],
    ///   [`RuleError::InvalidMonthDay`] or [`RuleError::InvalidMonth`] if a parameter is missing
    ///   or out of range.
    /// - [`RuleError::UnexpectedToken`] if `strictness` is [`Strictness::Strict`] and the rule
    ///   has trailing tokens.
    pub fn parse(rule_str: &str, strictness: Strictness) -> Result<Self, RuleError> {
        if rule_str.is_empty() {
            return Err(RuleError::EmptyRule);
        }

        // split on single spaces: doubled spaces produce empty tokens, which are then invalid
        let tokens: Vec<&str> = rule_str.split(' ').collect();
        let (kind, params) = tokens.split_first().ok_or(RuleError::EmptyRule)?;

        match *kind {
            DAILY => Self::parse_daily(params),
            YEARLY => {
                strictness.check_no_extra(YEARLY, params)?;
                Ok(Rule::Yearly)
            }
            WEEKLY => Self::parse_weekly(params),
            MONTHLY => Self::parse_monthly(params, strictness),
            other => Err(RuleError::UnsupportedRuleKind {
                kind: other.to_owned(),
            }),
        }
    }

    fn parse_daily(params: &[&str]) -> Result<Self, RuleError> {
        let invalid = || RuleError::InvalidDayInterval {
            value: params.join(" "),
        };

        let [interval] = params else {
            return Err(invalid());
        };
        // parse wide so that negative and huge values are reported as out of range
        let interval = interval.parse::<i64>().map_err(|_| invalid())?;
        if !(1..=i64::from(MAX_DAY_INTERVAL)).contains(&interval) {
            return Err(invalid());
        }

        Ok(Rule::Daily {
            interval: interval as u32,
        })
    }

    fn parse_weekly(params: &[&str]) -> Result<Self, RuleError> {
        let [weekdays] = params else {
            return Err(RuleError::InvalidWeekday {
                value: params.join(" "),
            });
        };
        let weekdays = parse_list(weekdays, |day: &u32| (1..=7).contains(day), |value| {
            RuleError::InvalidWeekday { value }
        })?;

        Ok(Rule::Weekly { weekdays })
    }

    fn parse_monthly(params: &[&str], strictness: Strictness) -> Result<Self, RuleError> {
        let Some((days, rest)) = params.split_first() else {
            return Err(RuleError::InvalidMonthDay {
                value: String::new(),
            });
        };
        let days = parse_list(
            days,
            |day: &i32| *day != 0 && (SECOND_TO_LAST_DAY..=31).contains(day),
            |value| RuleError::InvalidMonthDay { value },
        )?;

        let months = match rest.split_first() {
            Some((months, extra)) => {
                let months = parse_list(months, |month: &u32| (1..=12).contains(month), |value| {
                    RuleError::InvalidMonth { value }
                })?;
                strictness.check_no_extra(MONTHLY, extra)?;
                months
            }
            None => BTreeSet::new(),
        };

        Ok(Rule::Monthly { days, months })
    }

    /// Returns the kind letter of this rule (`d`, `y`, `w` or `m`).
    pub fn kind(&self) -> &'static str {
        match self {
            Rule::Daily { .. } => DAILY,
            Rule::Yearly => YEARLY,
            Rule::Weekly { .. } => WEEKLY,
            Rule::Monthly { .. } => MONTHLY,
        }
    }
}

/// Parses a comma-separated list into a set, rejecting the first element that doesn't parse or
/// isn't accepted.
fn parse_list<T, A, E>(list: &str, accept: A, make_err: E) -> Result<BTreeSet<T>, RuleError>
where
    T: FromStr + Ord,
    A: Fn(&T) -> bool,
    E: Fn(String) -> RuleError,
{
    list.split(',')
        .map(|item| {
            item.trim()
                .parse::<T>()
                .ok()
                .filter(&accept)
                .ok_or_else(|| make_err(item.to_owned()))
        })
        .collect()
}

fn join_list<T: Display>(items: &BTreeSet<T>) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl FromStr for Rule {
    type Err = RuleError;

    /// Parses a rule string with [`Strictness::Lenient`]. See [`Rule::parse`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, Strictness::Lenient)
    }
}

impl Display for Rule {
    /// Renders the canonical rule string, with lists sorted and deduplicated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Daily { interval } => write!(f, "{DAILY} {interval}"),
            Rule::Yearly => f.write_str(YEARLY),
            Rule::Weekly { weekdays } => write!(f, "{WEEKLY} {}", join_list(weekdays)),
            Rule::Monthly { days, months } => {
                write!(f, "{MONTHLY} {}", join_list(days))?;
                if !months.is_empty() {
                    write!(f, " {}", join_list(months))?;
                }
                Ok(())
            }
        }
    }
}
