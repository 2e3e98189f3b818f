#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use num_rational::Ratio;
use tracing::{debug, warn};

use super::{
    error::PicobotError,
    map::{Cell, Grid},
    rules::{CellKind, Pattern, RuleTable, State},
};
use crate::constants::{NUM_PATTERNS, STEPS_PER_PATTERN_CELL};

/// Fraction of the initially open cells visited by a run.
pub type Coverage = Ratio<u64>;

/// Where a simulation is in its lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Open cells remain and no error has happened.
    Running,
    /// Every open cell has been visited.
    Completed,
    /// A step failed; the run is over.
    Failed(PicobotError),
}

/// Result of a run that ended without an error.
#[derive(Clone, Debug)]
pub struct SimulationOutcome {
    /// Fraction of the open cells visited.
    pub coverage:     Coverage,
    /// Number of steps taken.
    pub steps:        u64,
    /// Whether the run stopped because it reached the step cap.
    pub hit_step_cap: bool,
    /// Final (row, column) of the agent.
    pub position:     (usize, usize),
    /// The map with visited cells marked.
    pub grid:         Grid,
}

/// Step cap used when none is configured: every (cell, pattern, state)
/// combination a few times over.
pub fn default_max_steps(rules: &RuleTable, grid: &Grid) -> u64 {
    let states = rules.num_states().max(1) as u64;
    grid.num_cells() as u64 * NUM_PATTERNS as u64 * states * STEPS_PER_PATTERN_CELL
}

/// A single Picobot run on its own copy of a map.
#[derive(Debug)]
pub struct Simulator<'a> {
    /// Compiled rules driving the agent.
    rules:      &'a RuleTable,
    /// The map being covered.
    grid:       Grid,
    /// Current control state.
    state:      State,
    /// Current row.
    row:        usize,
    /// Current column.
    col:        usize,
    /// Open cells at the start, the start cell included.
    total_open: u64,
    /// Open cells not visited yet.
    remaining:  u64,
    /// Steps taken so far.
    steps:      u64,
    /// Lifecycle of the run.
    run_state:  RunState,
}

impl<'a> Simulator<'a> {
    /// Places the agent at `start` in state 0 and marks the start visited.
    pub fn new(
        rules: &'a RuleTable,
        mut grid: Grid,
        start: (usize, usize),
    ) -> Result<Self, PicobotError> {
        let (row, col) = start;
        let on_map = grid.get(row as isize, col as isize);
        if on_map.is_none_or(|cell| cell == Cell::Wall) {
            return Err(PicobotError::InvalidStart { row, col });
        }

        let total_open = grid.count_open() as u64;
        let mut remaining = total_open;
        if grid.visit(row, col) {
            remaining -= 1;
        }

        let run_state = if remaining == 0 {
            RunState::Completed
        } else {
            RunState::Running
        };

        Ok(Self {
            rules,
            grid,
            state: 0,
            row,
            col,
            total_open,
            remaining,
            steps: 0,
            run_state,
        })
    }

    /// Surroundings at the agent's position; off-map neighbours are walls.
    pub fn surroundings(&self) -> Pattern {
        let (r, c) = (self.row as isize, self.col as isize);
        let kind = |row: isize, col: isize| {
            self.grid
                .get(row, col)
                .map_or(CellKind::Wall, Cell::kind)
        };
        Pattern::new(kind(r - 1, c), kind(r, c + 1), kind(r, c - 1), kind(r + 1, c))
    }

    /// Advances the run by one step. Does nothing once the run has ended.
    pub fn step(&mut self) -> &RunState {
        if self.run_state != RunState::Running {
            return &self.run_state;
        }

        self.steps += 1;
        self.run_state = match self.try_step() {
            Ok(()) if self.remaining == 0 => RunState::Completed,
            Ok(()) => RunState::Running,
            Err(err) => RunState::Failed(err),
        };
        &self.run_state
    }

    /// Looks up the rule for the current situation and applies it.
    fn try_step(&mut self) -> Result<(), PicobotError> {
        let pattern = self.surroundings();
        let transition = self
            .rules
            .lookup(self.state, pattern)
            .ok_or(PicobotError::NoRule {
                state: self.state,
                pattern,
            })?;

        let (dr, dc) = transition.direction.offset();
        let (row, col) = (self.row as isize + dr, self.col as isize + dc);
        match self.grid.get(row, col) {
            None | Some(Cell::Wall) => return Err(PicobotError::Wall { row, col }),
            Some(_) => {}
        }

        // both are non-negative: the cell exists
        self.row = row as usize;
        self.col = col as usize;
        if self.grid.visit(self.row, self.col) {
            self.remaining -= 1;
        }
        self.state = transition.next_state;
        Ok(())
    }

    /// Steps until the map is covered, `max_steps` is reached, or a step
    /// fails.
    pub fn run(mut self, max_steps: u64) -> Result<SimulationOutcome, PicobotError> {
        while self.run_state == RunState::Running && self.steps < max_steps {
            self.step();
        }

        let hit_step_cap = self.run_state == RunState::Running;
        if hit_step_cap {
            warn!(steps = self.steps, "picobot simulation reached its step cap");
        }
        if let RunState::Failed(err) = &self.run_state {
            debug!(steps = self.steps, %err, "picobot simulation failed");
            return Err(err.clone());
        }

        let coverage = self.coverage();
        debug!(steps = self.steps, %coverage, hit_step_cap, "picobot simulation finished");
        Ok(SimulationOutcome {
            coverage,
            steps: self.steps,
            hit_step_cap,
            position: (self.row, self.col),
            grid: self.grid,
        })
    }

    /// Visited fraction of the open cells; a map with no open cells counts as
    /// fully covered.
    pub fn coverage(&self) -> Coverage {
        if self.total_open == 0 {
            return Coverage::from_integer(1);
        }
        Coverage::new(self.total_open - self.remaining, self.total_open)
    }

    /// Current control state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Current (row, column).
    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Steps taken so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Lifecycle of the run.
    pub fn run_state(&self) -> &RunState {
        &self.run_state
    }

    /// The map as it currently is.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

/// Runs `rules` on a copy of `grid` from `start` and returns the outcome.
///
/// `max_steps` defaults to [`default_max_steps`].
pub fn simulate(
    rules: &RuleTable,
    grid: &Grid,
    start: (usize, usize),
    max_steps: Option<u64>,
) -> Result<SimulationOutcome, PicobotError> {
    let cap = max_steps.unwrap_or_else(|| default_max_steps(rules, grid));
    Simulator::new(rules, grid.clone(), start)?.run(cap)
}
