//! Error types for grid editing and search setup.

use grid_util::point::Point;
use thiserror::Error;

/// Everything that can go wrong before a search starts. Running out of frontier
/// or being cancelled are [SearchOutcome](crate::SearchOutcome)s, not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid size must be positive, got {0}")]
    InvalidSize(i32),

    #[error("{0:?} lies outside the grid")]
    OutOfBounds(Point),

    #[error("start and end are both placed at {0:?}")]
    SameStartEnd(Point),

    #[error("{0:?} is a barrier")]
    Blocked(Point),

    #[error("no start cell has been placed")]
    MissingStart,

    #[error("no end cell has been placed")]
    MissingEnd,

    #[error("search start {0:?} is not the placed start")]
    StartMismatch(Point),

    #[error("search end {0:?} is not the placed end")]
    EndMismatch(Point),

    #[error("{0:?} already holds the other terminal marker")]
    Reserved(Point),
}

impl GridError {
    /// True for the errors that reject a search invocation.
    pub fn is_invalid_configuration(&self) -> bool {
        !matches!(self, GridError::Reserved(_))
    }
}

pub type Result<T> = std::result::Result<T, GridError>;
