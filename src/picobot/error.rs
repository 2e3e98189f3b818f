#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use super::rules::{Pattern, State};

/// Everything that can go wrong while compiling Picobot rules, reading a map,
/// or simulating a run.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PicobotError {
    /// A non-blank, non-comment line of the rule file did not match the rule
    /// grammar.
    #[error("syntax error on line {line}")]
    Syntax {
        /// 0-based index of the offending line, counting blanks and comments.
        line: usize,
    },
    /// Two rule lines expand to the same concrete (state, pattern) entry.
    #[error("repeat rule for state {state} and surroundings {pattern}")]
    RepeatRule {
        /// State both rules are defined for.
        state:   State,
        /// The concrete pattern defined twice.
        pattern: Pattern,
    },
    /// The rule table has no entry for the agent's current state and
    /// surroundings.
    #[error("no rule mapping for current conditions (state {state}, surroundings {pattern})")]
    NoRule {
        /// State the agent was in.
        state:   State,
        /// Surroundings the agent perceived.
        pattern: Pattern,
    },
    /// The agent was told to move into a wall.
    #[error("cannot move into wall at row {row}, column {col}")]
    Wall {
        /// Row of the wall, relative to the agent's previous row if the move
        /// left the grid.
        row: isize,
        /// Column of the wall.
        col: isize,
    },
    /// The map does not have the required shape.
    #[error("{0}")]
    Dimension(String),
    /// The start position is outside the map or not on an open cell.
    #[error("start position ({row}, {col}) is not an open cell of the map")]
    InvalidStart {
        /// Requested start row.
        row: usize,
        /// Requested start column.
        col: usize,
    },
}

impl PicobotError {
    /// Whether this error is caused by the submitted rule file, and should
    /// therefore become a deduction instead of aborting the grading run.
    pub fn is_submission_error(&self) -> bool {
        matches!(
            self,
            PicobotError::Syntax { .. }
                | PicobotError::RepeatRule { .. }
                | PicobotError::NoRule { .. }
                | PicobotError::Wall { .. }
        )
    }
}
