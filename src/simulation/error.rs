//! Invariant violations raised by the scheduler core
//!
//! None of these occur while the four fixed lanes are intact. They are
//! surfaced as errors so a broken invariant stops the run instead of being
//! papered over with a default.

use thiserror::Error;

use super::types::LaneId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// `extract_max` was called with no live entries
    #[error("priority directory is empty")]
    EmptyDirectory,

    /// An update referenced a lane the directory does not hold
    #[error("lane {0} not found in priority directory")]
    LaneNotFound(LaneId),

    /// A new lane was inserted into a directory that is already full
    #[error("cannot insert lane {lane}: priority directory is at capacity {capacity}")]
    DirectoryFull { lane: LaneId, capacity: usize },
}
