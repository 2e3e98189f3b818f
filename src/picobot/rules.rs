#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{collections::BTreeMap, fmt};

use itertools::iproduct;
use tracing::debug;

use super::{error::PicobotError, parsers::parser};
use crate::constants::NUM_PATTERNS;

/// An automaton control state, as written in a rule file.
pub type State = u32;

/// What the agent perceives in one neighbouring cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Nothing in the way; visited cells are perceived as open too.
    Open,
    /// A wall.
    Wall,
}

impl CellKind {
    /// Bit used for this kind in a [`Pattern`] index.
    fn bit(self) -> u8 {
        match self {
            CellKind::Open => 0,
            CellKind::Wall => 1,
        }
    }

    /// Inverse of [`CellKind::bit`].
    fn from_bit(bit: u8) -> Self {
        if bit & 1 == 1 { CellKind::Wall } else { CellKind::Open }
    }
}

/// One slot of a rule's surroundings, before wildcard expansion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// `*`, matches either kind.
    Any,
    /// `x`, matches open cells.
    Open,
    /// The compass letter, matches walls.
    Wall,
}

impl Slot {
    /// Concrete cell kinds this slot stands for, open first.
    pub fn choices(self) -> &'static [CellKind] {
        match self {
            Slot::Any => &[CellKind::Open, CellKind::Wall],
            Slot::Open => &[CellKind::Open],
            Slot::Wall => &[CellKind::Wall],
        }
    }
}

/// A concrete north/east/west/south neighbour pattern.
///
/// Stored as a 4-bit index `n<<3 | e<<2 | w<<1 | s` with wall = 1, so the
/// sixteen patterns of a state fit a fixed array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pattern(u8);

impl Pattern {
    /// Builds a pattern from its four neighbours.
    pub fn new(north: CellKind, east: CellKind, west: CellKind, south: CellKind) -> Self {
        Self(north.bit() << 3 | east.bit() << 2 | west.bit() << 1 | south.bit())
    }

    /// Returns the pattern with the given index, if it is below 16.
    pub fn from_index(index: usize) -> Option<Self> {
        (index < NUM_PATTERNS).then_some(Self(index as u8))
    }

    /// Position of this pattern in a state's table.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The northern neighbour.
    pub fn north(self) -> CellKind {
        CellKind::from_bit(self.0 >> 3)
    }

    /// The eastern neighbour.
    pub fn east(self) -> CellKind {
        CellKind::from_bit(self.0 >> 2)
    }

    /// The western neighbour.
    pub fn west(self) -> CellKind {
        CellKind::from_bit(self.0 >> 1)
    }

    /// The southern neighbour.
    pub fn south(self) -> CellKind {
        CellKind::from_bit(self.0)
    }

    /// All sixteen patterns, in index order.
    pub fn all() -> impl Iterator<Item = Pattern> {
        (0..NUM_PATTERNS as u8).map(Pattern)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = |kind: CellKind, wall: char| match kind {
            CellKind::Open => 'x',
            CellKind::Wall => wall,
        };
        write!(
            f,
            "{}{}{}{}",
            letter(self.north(), 'N'),
            letter(self.east(), 'E'),
            letter(self.west(), 'W'),
            letter(self.south(), 'S')
        )
    }
}

/// The surroundings part of a rule line, possibly with wildcards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternSpec {
    /// North slot.
    north: Slot,
    /// East slot.
    east:  Slot,
    /// West slot.
    west:  Slot,
    /// South slot.
    south: Slot,
}

impl PatternSpec {
    /// Creates a new spec from its four slots.
    pub fn new(north: Slot, east: Slot, west: Slot, south: Slot) -> Self {
        Self {
            north,
            east,
            west,
            south,
        }
    }

    /// Every concrete pattern this spec matches, north-major with open before
    /// wall.
    pub fn expand(&self) -> impl Iterator<Item = Pattern> + use<> {
        iproduct!(
            self.north.choices(),
            self.east.choices(),
            self.west.choices(),
            self.south.choices()
        )
        .map(|(&n, &e, &w, &s)| Pattern::new(n, e, w, s))
    }
}

/// Where a rule sends the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// One row up.
    North,
    /// One column right.
    East,
    /// One column left.
    West,
    /// One row down.
    South,
    /// Stay on the current cell (`X` in a rule file).
    Stay,
}

impl Direction {
    /// Row and column delta of a move in this direction.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
            Direction::South => (1, 0),
            Direction::Stay => (0, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Direction::North => 'N',
            Direction::East => 'E',
            Direction::West => 'W',
            Direction::South => 'S',
            Direction::Stay => 'X',
        };
        write!(f, "{symbol}")
    }
}

/// The right hand side of a rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Transition {
    /// Direction to move in.
    pub direction:  Direction,
    /// State to continue in.
    pub next_state: State,
}

/// One parsed line of a rule file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleLine {
    /// State the rule applies in.
    pub state:      State,
    /// Surroundings the rule applies to.
    pub spec:       PatternSpec,
    /// What the rule does.
    pub transition: Transition,
}

impl RuleLine {
    /// Parses a single (trimmed, non-comment) rule line.
    ///
    /// * `line`: the text of the line
    /// * `index`: 0-based line number reported on failure
    pub fn parse(line: &str, index: usize) -> Result<Self, PicobotError> {
        parser::rule_line(line).map_err(|_| PicobotError::Syntax { line: index })
    }
}

/// The sixteen table entries of one state.
type StateRules = [Option<Transition>; NUM_PATTERNS];

/// A compiled rule file: for each known state, the transition for each
/// concrete pattern, or `None` where no rule was written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleTable {
    /// Per-state tables, ordered by state.
    states: BTreeMap<State, StateRules>,
}

impl RuleTable {
    /// Compiles the lines of a rule file.
    ///
    /// Blank lines and lines starting with `#` are skipped, but still count
    /// towards the line numbers reported in [`PicobotError::Syntax`]. The
    /// first malformed or conflicting line aborts compilation.
    pub fn compile<I, S>(lines: I) -> Result<Self, PicobotError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = RuleTable::default();

        for (index, line) in lines.into_iter().enumerate() {
            let line = line.as_ref().trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let rule = RuleLine::parse(line, index)?;
            table.add_rule(&rule)?;
        }

        debug!(
            states = table.num_states(),
            rules = table.num_rules(),
            "compiled picobot rules"
        );
        Ok(table)
    }

    /// Compiles the full text of a rule file.
    pub fn from_source(source: &str) -> Result<Self, PicobotError> {
        Self::compile(source.lines())
    }

    /// Makes `state` known, with all of its entries unmapped.
    pub fn register(&mut self, state: State) {
        self.states.entry(state).or_insert([None; NUM_PATTERNS]);
    }

    /// Expands a rule line and records one entry per concrete pattern.
    pub fn add_rule(&mut self, rule: &RuleLine) -> Result<(), PicobotError> {
        self.register(rule.transition.next_state);
        for pattern in rule.spec.expand() {
            self.insert(rule.state, pattern, rule.transition)?;
        }
        Ok(())
    }

    /// Records a single concrete entry, failing if it is already taken.
    pub fn insert(
        &mut self,
        state: State,
        pattern: Pattern,
        transition: Transition,
    ) -> Result<(), PicobotError> {
        let entries = self.states.entry(state).or_insert([None; NUM_PATTERNS]);
        let slot = &mut entries[pattern.index()];
        if slot.is_some() {
            return Err(PicobotError::RepeatRule { state, pattern });
        }
        *slot = Some(transition);
        Ok(())
    }

    /// Returns the transition for `state` in `pattern`, if one was written.
    pub fn lookup(&self, state: State, pattern: Pattern) -> Option<Transition> {
        self.states
            .get(&state)
            .and_then(|entries| entries[pattern.index()])
    }

    /// Whether `state` appears anywhere in the rule file.
    pub fn contains_state(&self, state: State) -> bool {
        self.states.contains_key(&state)
    }

    /// Known states, ascending.
    pub fn states(&self) -> impl Iterator<Item = State> + '_ {
        self.states.keys().copied()
    }

    /// Number of known states.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Number of mapped (state, pattern) entries.
    pub fn num_rules(&self) -> usize {
        self.states
            .values()
            .map(|entries| entries.iter().filter(|e| e.is_some()).count())
            .sum()
    }
}

impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (state, entries) in &self.states {
            writeln!(f, "while in state {state}:")?;
            for pattern in Pattern::all() {
                match entries[pattern.index()] {
                    Some(t) => writeln!(f, "{pattern} -> {} {}", t.direction, t.next_state)?,
                    None => writeln!(f, "{pattern} -> (no mapping)")?,
                }
            }
        }
        Ok(())
    }
}
