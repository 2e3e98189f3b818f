use std::{fs, path::PathBuf};

use socrates::picobot::{
    CellKind, Direction, Pattern, PicobotError, RuleLine, RuleTable, Transition, parsers::parser,
};

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("picobot")
        .join("rules")
        .join(name);
    fs::read_to_string(path).expect("read rules fixture")
}

fn open_all() -> Pattern {
    Pattern::new(CellKind::Open, CellKind::Open, CellKind::Open, CellKind::Open)
}

#[test]
fn compiling_twice_gives_the_same_table() {
    let source = "0 xxxx -> N 1\n1 NxxS -> E 0\n1 xExx -> W 2\n";
    let first = RuleTable::from_source(source).expect("compile");
    let second = RuleTable::from_source(source).expect("compile");
    assert_eq!(first, second);
    assert_eq!(first.num_rules(), 3);
}

#[test]
fn full_wildcard_expands_to_sixteen_rules() {
    let table = RuleTable::from_source("4 **** -> S 4").expect("compile");
    assert_eq!(table.num_rules(), 16);
    for pattern in Pattern::all() {
        assert_eq!(
            table.lookup(4, pattern),
            Some(Transition {
                direction:  Direction::South,
                next_state: 4,
            })
        );
    }
}

#[test]
fn partial_wildcards_expand_per_slot() {
    let table = RuleTable::from_source("0 N**x -> E 0").expect("compile");
    assert_eq!(table.num_rules(), 4);
    for pattern in Pattern::all() {
        let expected = pattern.north() == CellKind::Wall && pattern.south() == CellKind::Open;
        assert_eq!(table.lookup(0, pattern).is_some(), expected, "pattern {pattern}");
    }
}

#[test]
fn overlapping_lines_conflict() {
    let err = RuleTable::from_source(&fixture("conflict.txt")).unwrap_err();
    assert_eq!(
        err,
        PicobotError::RepeatRule {
            state:   0,
            pattern: open_all(),
        }
    );
    assert!(err.to_string().contains("repeat rule"));
    assert!(err.is_submission_error());
}

#[test]
fn disjoint_lines_compile() {
    let table = RuleTable::from_source("0 x*** -> N 0\n0 N*** -> S 0").expect("compile");
    assert_eq!(table.num_rules(), 16);
}

#[test]
fn same_pattern_in_different_states_is_not_a_conflict() {
    let table = RuleTable::from_source("0 xxxx -> N 1\n1 xxxx -> S 0").expect("compile");
    assert_eq!(table.num_rules(), 2);
}

#[test]
fn syntax_errors_count_blank_and_comment_lines() {
    let err = RuleTable::from_source(&fixture("syntax_error.txt")).unwrap_err();
    assert_eq!(err, PicobotError::Syntax { line: 3 });
    assert_eq!(err.to_string(), "syntax error on line 3");
}

#[test]
fn slot_letters_are_checked_per_direction() {
    // `E` is not a valid north symbol
    let err = RuleTable::from_source("0 Exxx -> N 0").unwrap_err();
    assert_eq!(err, PicobotError::Syntax { line: 0 });
    assert!(RuleTable::from_source("0 nEwS -> n 0").is_ok());
}

#[test]
fn first_error_wins() {
    let source = "0 x*** -> N 0\n0 xxxx -> E 0\nthis is not a rule";
    assert!(matches!(
        RuleTable::from_source(source),
        Err(PicobotError::RepeatRule { state: 0, .. })
    ));
}

#[test]
fn rule_lines_accept_comments_and_multi_digit_states() {
    let line = parser::rule_line("12 x*W* -> X 305   # wait here").expect("parse");
    assert_eq!(line.state, 12);
    assert_eq!(line.transition.direction, Direction::Stay);
    assert_eq!(line.transition.next_state, 305);
    assert_eq!(line.spec.expand().count(), 4);

    assert!(RuleLine::parse("0 xxxx -> Q 0", 7).is_err());
    assert!(RuleLine::parse("0 xxxx -> N", 0).is_err());
    assert!(RuleLine::parse("-1 xxxx -> N 0", 0).is_err());
}

#[test]
fn destination_states_are_registered_unmapped() {
    let table = RuleTable::from_source("0 **** -> E 3").expect("compile");
    assert!(table.contains_state(3));
    assert_eq!(table.states().collect::<Vec<_>>(), vec![0, 3]);
    assert_eq!(table.lookup(3, open_all()), None);
}

#[test]
fn rule_table_display_lists_every_pattern() {
    let table = RuleTable::from_source("0 NxWx -> S 0").expect("compile");
    let shown = table.to_string();
    assert!(shown.starts_with("while in state 0:\n"));
    assert!(shown.contains("NxWx -> S 0"));
    assert!(shown.contains("xxxx -> (no mapping)"));
    assert_eq!(shown.lines().count(), 17);
}

#[test]
fn pattern_index_round_trips_neighbours() {
    let pattern = Pattern::new(CellKind::Wall, CellKind::Open, CellKind::Wall, CellKind::Open);
    assert_eq!(pattern.index(), 0b1010);
    assert_eq!(Pattern::from_index(0b1010), Some(pattern));
    assert_eq!(Pattern::from_index(16), None);
    assert_eq!(pattern.to_string(), "NxWx");
}

#[test]
fn text_after_the_next_state_is_ignored() {
    for source in ["0 xxxx -> N 0 go north", "0 xxxx -> N 0// go north", "0 xxxx -> N 12x"] {
        let table = RuleTable::from_source(source).expect(source);
        assert_eq!(table.num_rules(), 1, "{source}");
    }
    let line = parser::rule_line("0 xxxx -> N 12 then west").expect("parse");
    assert_eq!(line.transition.next_state, 12);
}

#[test]
fn start_positions_are_found_inside_free_text() {
    assert_eq!(parser::start_position("(12, 12)"), Ok((12, 12)));
    assert_eq!(parser::start_position("1,1"), Ok((1, 1)));
    assert_eq!(parser::start_position("start at [3, 4]"), Ok((3, 4)));
    assert_eq!(parser::start_position("row 2 col 9, 10 please"), Ok((9, 10)));
    assert!(parser::start_position("(12)").is_err());
    assert!(parser::start_position("").is_err());
}
