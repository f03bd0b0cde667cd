//! Quartz-style cron expressions.
//!
//! Expressions have six or seven whitespace separated fields:
//! `second minute hour day_of_month month day_of_week [year]`.
//!
//! Examples:
//! - `"0 0 * * * ?"` - every hour at minute 0
//! - `"0 0/1 * 1/1 * ? *"` - every minute
//! - `"0 30 12 ? * MON-FRI"` - 12:30 on weekdays
//!
//! `?` ("no specific value") is accepted in any field and behaves like `*`.
//!
//! Not supported: the Quartz `L` and `W` day-of-month forms (`L`, `L-3`,
//! `15W`, `LW`) and the `L` and `#` day-of-week forms (`6L`, `6#3`). They are
//! rejected with an error naming the token.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use cron::Schedule;

use crate::error::{Result, SchedulerError};

const DAY_OF_MONTH: usize = 3;
const DAY_OF_WEEK: usize = 5;

/// A validated cron expression.
#[derive(Clone)]
pub struct CronExpression {
    expression: String,
    schedule: Schedule,
}

impl CronExpression {
    /// Validate and parse `expression`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidCronExpression`] when the field count
    /// is wrong or any field fails to parse.
    pub fn parse(expression: &str) -> Result<Self> {
        let trimmed = expression.trim();
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if !(6..=7).contains(&fields.len()) {
            let hint = if fields.len() == 5 {
                " (a seconds field is required first)"
            } else {
                ""
            };
            return Err(invalid(
                expression,
                format!("expected 6 or 7 fields, found {}{hint}", fields.len()),
            ));
        }

        if let Some(reason) = fields
            .iter()
            .enumerate()
            .find_map(|(index, field)| unsupported_token(index, field))
        {
            return Err(invalid(expression, reason));
        }

        let normalized = fields
            .iter()
            .map(|field| if *field == "?" { "*" } else { field })
            .collect::<Vec<_>>()
            .join(" ");
        let schedule =
            Schedule::from_str(&normalized).map_err(|e| invalid(expression, e.to_string()))?;

        Ok(Self {
            expression: trimmed.to_string(),
            schedule,
        })
    }

    /// Check an expression without keeping the result.
    pub fn is_valid(expression: &str) -> bool {
        Self::parse(expression).is_ok()
    }

    /// The expression as written (trimmed).
    pub fn as_str(&self) -> &str {
        &self.expression
    }

    /// First fire time strictly after `after`.
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&after).next()
    }

    /// The next `count` fire times from now.
    pub fn upcoming(&self, count: usize) -> Vec<DateTime<Utc>> {
        self.schedule.upcoming(Utc).take(count).collect()
    }
}

fn unsupported_token(index: usize, field: &str) -> Option<String> {
    let upper = field.to_ascii_uppercase();
    let (token, meaning, name) = match index {
        DAY_OF_MONTH if upper.contains('L') => ('L', "last day", "day-of-month"),
        DAY_OF_MONTH if upper.contains('W') => ('W', "nearest weekday", "day-of-month"),
        DAY_OF_WEEK if upper.contains('#') => ('#', "nth weekday of the month", "day-of-week"),
        DAY_OF_WEEK if upper.contains('L') => ('L', "last weekday of the month", "day-of-week"),
        _ => return None,
    };
    Some(format!(
        "Quartz '{token}' ({meaning}) is not supported in the {name} field '{field}'"
    ))
}

fn invalid(expression: &str, reason: impl Into<String>) -> SchedulerError {
    SchedulerError::InvalidCronExpression {
        expression: expression.to_string(),
        reason: reason.into(),
    }
}

impl FromStr for CronExpression {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Debug for CronExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CronExpression").field(&self.expression).finish()
    }
}

impl fmt::Display for CronExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

impl PartialEq for CronExpression {
    fn eq(&self, other: &Self) -> bool {
        self.expression == other.expression
    }
}

impl Eq for CronExpression {}
