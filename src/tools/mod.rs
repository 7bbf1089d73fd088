/// MCP tools for habit management
/// 
/// This module contains all the MCP tools that external clients can call to
/// interact with the habit tracker. Tools take `now` from their caller and
/// turn store and analytics results into user-facing messages.

pub mod create;
pub mod complete;
pub mod status;
pub mod list;
pub mod analyze;
pub mod update;

// Re-export tool functions for easy access
pub use create::*;
pub use complete::*;
pub use status::*;
pub use list::*;
pub use analyze::*;
pub use update::*;

use schemars::JsonSchema;
use serde::Deserialize;
use thiserror::Error;

use crate::analytics::AnalyticsError;
use crate::domain::{DomainError, HabitId};
use crate::storage::StorageError;

/// Errors a tool call can end with
#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

/// Parameters of tools that act on a single habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct HabitIdParams {
    /// ID of the habit
    pub habit_id: i64,
}

impl HabitIdParams {
    pub fn id(&self) -> HabitId {
        HabitId(self.habit_id)
    }
}

/// "1 day", "3 weeks"
pub(crate) fn plural(count: u32, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}
