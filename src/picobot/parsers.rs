#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use super::rules::{Direction, PatternSpec, RuleLine, Slot, Transition};

peg::parser! {
    /// includes grammars for Picobot rule lines and criteria start positions.
    pub grammar parser() for str {
        /// matches any sequence of 1 or more numbers
        rule number() -> u32
            = n:$(['0'..='9']+) {? n.parse().or(Err("u32")) }

        /// matches a row or column index
        rule index() -> usize
            = n:$(['0'..='9']+) {? n.parse().or(Err("usize")) }

        /// matches optional spaces and tabs
        rule ws() = quiet!{[' ' | '\t']*}

        /// matches at least one space or tab
        rule ws1() = quiet!{[' ' | '\t']+}

        /// matches the wildcard slot
        rule any() -> Slot
            = "*" { Slot::Any }

        /// matches the open slot
        rule open() -> Slot
            = ['x' | 'X'] { Slot::Open }

        /// north slot: `*`, `x` or `N`
        rule north() -> Slot
            = any() / open() / ['n' | 'N'] { Slot::Wall }

        /// east slot: `*`, `x` or `E`
        rule east() -> Slot
            = any() / open() / ['e' | 'E'] { Slot::Wall }

        /// west slot: `*`, `x` or `W`
        rule west() -> Slot
            = any() / open() / ['w' | 'W'] { Slot::Wall }

        /// south slot: `*`, `x` or `S`
        rule south() -> Slot
            = any() / open() / ['s' | 'S'] { Slot::Wall }

        /// matches a move direction, `x` meaning stay put
        rule direction() -> Direction
            = ['n' | 'N'] { Direction::North }
            / ['e' | 'E'] { Direction::East }
            / ['w' | 'W'] { Direction::West }
            / ['s' | 'S'] { Direction::South }
            / ['x' | 'X'] { Direction::Stay }

        /// matches whatever follows a rule, e.g. `# go north` or `// note`
        rule trailing() = [_]*

        /// matches `row, col`
        rule position() -> (usize, usize)
            = r:index() ws() "," ws() c:index() { (r, c) }

        /// parses one rule line, e.g. `0 x*** -> N 0`
        pub rule rule_line() -> RuleLine
            = ws() state:number() ws1() n:north() e:east() w:west() s:south() ws() "->" ws()
              d:direction() ws1() next:number() trailing()
            {
                RuleLine {
                    state,
                    spec: PatternSpec::new(n, e, w, s),
                    transition: Transition { direction: d, next_state: next },
                }
            }

        /// finds the first `row, col` pair in a start position such as
        /// `(12, 12)` or `start at [3, 4]`
        pub rule start_position() -> (usize, usize)
            = (!position() [_])* p:position() [_]* { p }
    }
}
