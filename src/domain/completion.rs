/// Completion entity
///
/// A completion is one append-only record of a habit being done. Completions
/// are never edited; they disappear only when their habit is deleted.

use serde::{Deserialize, Serialize};
use chrono::NaiveDateTime;
use crate::domain::{CompletionId, HabitId};

/// A record of completing a habit at a specific moment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Identifier assigned by the store
    pub id: CompletionId,
    /// Which habit this completion belongs to
    pub habit_id: HabitId,
    /// When the habit was completed (minute precision)
    pub completed_at: NaiveDateTime,
}
