/// Core types and enums used throughout the domain layer
///
/// This module defines the identifiers, the Period and HabitType enums, and the
/// textual timestamp format shared by the store and the presentation layer.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Textual timestamp format used at the persistence boundary (minute granularity)
///
/// Example: `Mar 04, 2025 at 09:30`
pub const TIMESTAMP_FORMAT: &str = "%b %d, %Y at %H:%M";

/// Unique identifier for a habit
///
/// Assigned by the store when the habit is inserted and stable for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HabitId(pub i64);

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a completion record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionId(pub i64);

impl fmt::Display for CompletionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How often a habit recurs
///
/// The period decides the renewal window used by the streak engine:
/// one day for daily habits, a rolling seven days for weekly habits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
}

impl Period {
    /// Number of elapsed days within which a new completion continues the streak
    pub fn renewal_window_days(&self) -> i64 {
        match self {
            Period::Daily => 1,
            Period::Weekly => 7,
        }
    }

    /// Storage representation (`DAILY` / `WEEKLY`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "DAILY",
            Period::Weekly => "WEEKLY",
        }
    }

    /// Human readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Period::Daily => "Daily",
            Period::Weekly => "Weekly",
        }
    }

    /// Unit used when talking about streak lengths ("day" / "week")
    pub fn unit(&self) -> &'static str {
        match self {
            Period::Daily => "day",
            Period::Weekly => "week",
        }
    }
}

impl FromStr for Period {
    type Err = DomainError;

    /// Case-insensitive parse of the period name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            _ => Err(DomainError::InvalidPeriod(format!(
                "'{}'. Valid options: daily, weekly",
                s
            ))),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Whether the habit is one to build up or one to break
///
/// Informational only. The streak math is identical for both types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitType {
    Positive,
    Negative,
}

impl HabitType {
    /// Storage representation (`POSITIVE` / `NEGATIVE`)
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitType::Positive => "POSITIVE",
            HabitType::Negative => "NEGATIVE",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            HabitType::Positive => "Positive",
            HabitType::Negative => "Negative",
        }
    }
}

impl FromStr for HabitType {
    type Err = DomainError;

    /// Case-insensitive parse of the habit type name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(HabitType::Positive),
            "negative" => Ok(HabitType::Negative),
            _ => Err(DomainError::InvalidHabitType(format!(
                "'{}'. Valid options: positive, negative",
                s
            ))),
        }
    }
}

impl fmt::Display for HabitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Render a timestamp in the persisted textual format
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp written with [`TIMESTAMP_FORMAT`]
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, DomainError> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)
        .map_err(|e| DomainError::InvalidPeriodTransition(format!("'{}': {}", s, e)))
}

/// Drop seconds and sub-second precision so that in-memory values match what is persisted
pub fn truncate_to_minute(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}
