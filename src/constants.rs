#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Number of rows every Picobot map must have.
pub const NUM_ROWS: usize = 25;

/// Number of columns every Picobot map row must have.
pub const NUM_COLS: usize = 25;

/// Number of concrete neighbour patterns (four slots, open or wall each).
pub const NUM_PATTERNS: usize = 16;

/// Multiplier applied to `cells * patterns * states` when deriving the
/// default simulation step cap.
///
/// A deterministic run that has not finished after visiting every
/// (cell, state, pattern) combination this many times is looping.
pub const STEPS_PER_PATTERN_CELL: u64 = 4;

/// Directory map files are resolved against when `SOCRATES_STATIC_DIR` is
/// not set.
pub const DEFAULT_STATIC_DIR: &str = "static";

/// File extensions recognised as Picobot rule files.
pub const PICOBOT_EXTENSIONS: &[&str] = &["txt", "picobot"];
