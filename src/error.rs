/// Errors that can occur when parsing a repeat rule.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum RuleError {
    /// The rule string is empty.
    #[error("Repeat rule should not be empty")]
    EmptyRule,

    /// The first token of the rule is not one of `d`, `y`, `w` or `m`.
    #[error("Unsupported repeat rule kind `{kind}`, expected one of `d`, `y`, `w`, `m`")]
    UnsupportedRuleKind {
        /// The offending first token.
        kind: String,
    },

    /// A daily rule's interval is missing, not a number, or outside `1..=400`.
    #[error("Invalid day interval `{value}`: must be positive integer between 1-400")]
    InvalidDayInterval {
        /// The offending token, or an empty string if it was missing.
        value: String,
    },

    /// A weekly rule's weekday list is missing or holds a value outside `1..=7`.
    #[error("Invalid weekday `{value}`: must be an integer between 1 (Monday) and 7 (Sunday)")]
    InvalidWeekday {
        /// The offending list element, or an empty string if the list was missing.
        value: String,
    },

    /// A monthly rule's day list is missing or holds a value outside `-2..=31`, or zero.
    #[error("Invalid day of month `{value}`: must be an integer between 1-31, or -1/-2 for the last/second-to-last day")]
    InvalidMonthDay {
        /// The offending list element, or an empty string if the list was missing.
        value: String,
    },

    /// A monthly rule's month list holds a value outside `1..=12`.
    #[error("Invalid month `{value}`: must be an integer between 1-12")]
    InvalidMonth {
        /// The offending list element.
        value: String,
    },

    /// A token that carries no meaning for this rule kind. Only raised by
    /// [`Strictness::Strict`](crate::Strictness::Strict).
    #[error("Unexpected token `{token}` in `{kind}` rule")]
    UnexpectedToken {
        /// The rule kind (`y` or `m`).
        kind: &'static str,
        /// The first extraneous token.
        token: String,
    },
}

/// Errors that can occur when creating a [`Date`](crate::Date).
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum DateError {
    /// The date string is not an 8-digit `YYYYMMDD` calendar date.
    #[error("Invalid date `{value}`: expected a real calendar date formatted as YYYYMMDD")]
    InvalidDate {
        /// The offending string.
        value: String,
    },

    /// Explicit year, month and day arguments do not make a real date.
    #[error("Explicit year ({year}), month ({month}), and day ({day}) arguments cannot be made into a valid date")]
    InvalidDateArguments {
        /// The year argument.
        year: i32,
        /// The month argument.
        month: u32,
        /// The day argument.
        day: u32,
    },
}

/// Errors that can occur when advancing a date by a [`Rule`](crate::Rule).
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum AdvanceError {
    /// No qualifying date was found within the scan limit of a weekly or monthly rule.
    #[error("No date matching rule `{rule}` found within {scanned_days} days of the start date")]
    NoMatchFound {
        /// The canonical rule string.
        rule: String,
        /// How many days were examined.
        scanned_days: u32,
    },

    /// The next date falls outside the range of representable dates.
    #[error("Next date is out of the representable date range")]
    OutOfRange,
}

/// A composite error type for all errors that can occur in [`next_date`](crate::next_date).
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum NextDateError {
    /// A [`RuleError`].
    #[error("{0}")]
    Rule(#[from] RuleError),

    /// A [`DateError`].
    #[error("{0}")]
    Date(#[from] DateError),

    /// An [`AdvanceError`].
    #[error("{0}")]
    Advance(#[from] AdvanceError),
}
