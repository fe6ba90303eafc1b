//! Shape checks for cron schedule expressions.
//!
//! Only syntax is checked: `@` shorthands, or five space-separated parts that
//! are each `*`, a comma list, a `*/step` or an `a-b` range within the part's
//! bounds. Month and weekday names are accepted case-insensitively.

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Serialize;

use crate::error::{ConfigError, ConfigResult};

const SPECIAL_PATTERN: &str = r"^@(yearly|annually|monthly|weekly|daily|hourly|reboot)$";
const MINUTE_ATOM: &str = r"([0-5]?[0-9])";
const HOUR_ATOM: &str = r"([01]?[0-9]|2[0-3])";
const DAY_ATOM: &str = r"([1-9]|[12][0-9]|3[01])";
const MONTH_ATOM: &str = r"(([1-9]|1[0-2])|JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)";
const WEEKDAY_ATOM: &str = r"([0-6]|SUN|MON|TUE|WED|THU|FRI|SAT)";

static PATTERNS: OnceCell<CronPatterns> = OnceCell::new();

/// Position of a part within a five-part cron expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CronPart {
    /// Minute of the hour.
    Minute,
    /// Hour of the day.
    Hour,
    /// Day of the month.
    Day,
    /// Month of the year.
    Month,
    /// Day of the week.
    Weekday,
}

impl CronPart {
    const ALL: [Self; 5] = [
        Self::Minute,
        Self::Hour,
        Self::Day,
        Self::Month,
        Self::Weekday,
    ];
}

/// Validity of a single cron part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CronPartCheck {
    /// Which part was checked.
    pub part: CronPart,
    /// Raw text of the part.
    pub value: String,
    /// Whether the part matched its pattern.
    pub valid: bool,
}

/// Result of checking a cron expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum CronCheck {
    /// An `@` shorthand such as `@daily`.
    Special {
        /// Whether the shorthand is a known one.
        valid: bool,
    },
    /// Five space-separated parts.
    Fields {
        /// Per-part results in expression order.
        parts: Vec<CronPartCheck>,
    },
    /// Neither a shorthand nor exactly five parts.
    Malformed {
        /// Number of space-separated parts found.
        part_count: usize,
    },
}

impl CronCheck {
    /// Whether the whole expression is well-formed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Special { valid } => *valid,
            Self::Fields { parts } => parts.iter().all(|part| part.valid),
            Self::Malformed { .. } => false,
        }
    }
}

struct CronPatterns {
    special: Regex,
    parts: [Regex; 5],
}

impl CronPatterns {
    fn compile() -> ConfigResult<Self> {
        Ok(Self {
            special: compile("special", SPECIAL_PATTERN)?,
            parts: [
                compile("minute", &part_pattern(MINUTE_ATOM, false))?,
                compile("hour", &part_pattern(HOUR_ATOM, false))?,
                compile("day", &part_pattern(DAY_ATOM, false))?,
                compile("month", &part_pattern(MONTH_ATOM, true))?,
                compile("weekday", &part_pattern(WEEKDAY_ATOM, true))?,
            ],
        })
    }
}

fn part_pattern(atom: &str, case_insensitive: bool) -> String {
    let flags = if case_insensitive { "(?i)" } else { "" };
    format!(r"{flags}^(\*|{atom}(,{atom})*|\*/{atom}|{atom}-{atom})$")
}

fn compile(field: &'static str, pattern: &str) -> ConfigResult<Regex> {
    Regex::new(pattern).map_err(|source| ConfigError::PatternCompile { field, source })
}

/// Check the shape of a cron expression.
///
/// # Errors
///
/// Returns [`ConfigError::PatternCompile`] if the built-in patterns fail to compile.
pub fn check_cron(expression: &str) -> ConfigResult<CronCheck> {
    let patterns = PATTERNS.get_or_try_init(CronPatterns::compile)?;

    if expression.starts_with('@') {
        return Ok(CronCheck::Special {
            valid: patterns.special.is_match(expression),
        });
    }

    let values: Vec<&str> = expression.split(' ').collect();
    if values.len() != CronPart::ALL.len() {
        return Ok(CronCheck::Malformed {
            part_count: values.len(),
        });
    }

    let parts = CronPart::ALL
        .iter()
        .zip(patterns.parts.iter())
        .zip(values)
        .map(|((part, pattern), value)| CronPartCheck {
            part: *part,
            value: value.to_string(),
            valid: pattern.is_match(value),
        })
        .collect();
    Ok(CronCheck::Fields { parts })
}
