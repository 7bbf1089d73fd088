/// Domain module containing core business logic and data types
/// 
/// This module defines the core entities (Habit, Completion), the period
/// calendar and the streak engine. Nothing in here touches the clock or the
/// database: callers pass `now` in and persist whatever comes out.

pub mod habit;
pub mod completion;
pub mod period;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use completion::*;
pub use period::*;
pub use streak::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),
    
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    
    #[error("Invalid habit type: {0}")]
    InvalidHabitType(String),
    
    /// A stored completion timestamp could not be interpreted
    #[error("Invalid period transition: {0}")]
    InvalidPeriodTransition(String),
    
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}
