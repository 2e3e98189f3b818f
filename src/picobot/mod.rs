#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Errors raised by the rule compiler, map parser and simulator.
pub mod error;
/// Fixed-size Picobot maps.
pub mod map;
/// Grammars for rule lines and start positions.
pub mod parsers;
/// Rule compilation into a (state, pattern) lookup table.
pub mod rules;
/// The step loop that moves the agent around a map.
pub mod simulate;

pub use error::PicobotError;
pub use map::{Cell, Grid, MapShape};
pub use rules::{CellKind, Direction, Pattern, PatternSpec, RuleLine, RuleTable, Slot, State, Transition};
pub use simulate::{Coverage, RunState, SimulationOutcome, Simulator, default_max_steps, simulate};
