use std::{
    fs,
    path::{Path, PathBuf},
};

use socrates::{
    criteria::{Criteria, generate_skeleton},
    filetypes::{LoadContext, MapTest, MapTestDescriptor, Registry},
    grade::{GradeReport, grade_submissions, render_json, render_table},
};
use uuid::Uuid;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures").join("picobot")
}

fn ctx() -> LoadContext {
    LoadContext::new(fixtures().join("maps"), None)
}

fn load(name: &str) -> anyhow::Result<Criteria> {
    Criteria::load(&fixtures().join("criteria").join(name), &Registry::with_defaults(), &ctx())
}

/// Copies a rules fixture into a fresh directory as `picobot.txt`.
fn submit(rules: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("socrates-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    let dest = dir.join("picobot.txt");
    fs::copy(fixtures().join("rules").join(rules), &dest).expect("copy rules");
    dest
}

fn grade_with(rules: &str) -> GradeReport {
    let criteria = load("ps1.json").expect("load criteria");
    let submission = submit(rules);
    let report = grade_submissions(&criteria, &[submission.clone()]).expect("grade");
    if let Some(dir) = submission.parent() {
        let _ = fs::remove_dir_all(dir);
    }
    report
}

#[test]
fn criteria_load_with_their_tests() {
    let criteria = load("ps1.json").expect("load criteria");
    assert_eq!(criteria.assignment_name, "Problem Set 1");
    assert_eq!(criteria.files.len(), 1);
    assert_eq!(criteria.files[0].path, "picobot.txt");
    assert_eq!(criteria.files[0].point_value, 20.0);
    assert_eq!(criteria.files[0].tests.len(), 1);
    assert_eq!(criteria.files[0].tests[0].json_type(), MapTest::JSON_TYPE);
}

#[test]
fn full_coverage_keeps_every_point() {
    let report = grade_with("snake.txt");
    assert!(report.files[0].deductions.is_empty());
    assert_eq!(report.total(), 20.0);
    assert_eq!(report.out_of(), 20.0);
}

#[test]
fn low_coverage_falls_back_to_the_lowest_threshold() {
    let report = grade_with("north_only.txt");
    let deductions = &report.files[0].deductions;
    assert_eq!(deductions.len(), 1);
    assert_eq!(deductions[0].deduction, 10.0);
    assert_eq!(deductions[0].description, "Picobot covers the empty room");
    assert_eq!(deductions[0].notes, vec!["Picobot coverage: 12/529".to_string()]);
    assert_eq!(report.total(), 10.0);
}

#[test]
fn broken_rules_lose_the_error_deduction() {
    for rules in ["syntax_error.txt", "conflict.txt", "missing_rule.txt"] {
        let report = grade_with(rules);
        let deductions = &report.files[0].deductions;
        assert_eq!(deductions.len(), 1, "{rules}");
        assert_eq!(deductions[0].deduction, 20.0, "{rules}");
        assert_eq!(report.total(), 0.0, "{rules}");
    }
}

#[test]
fn walking_into_a_wall_is_graded_as_an_error() {
    let report = grade_with("east_forever.txt");
    let deduction = &report.files[0].deductions[0];
    assert_eq!(deduction.deduction, 20.0);
    assert_eq!(
        deduction.notes,
        vec!["cannot move into wall at row 12, column 24".to_string()]
    );
    assert_eq!(
        deduction.to_string(),
        "-20 Picobot covers the empty room (cannot move into wall at row 12, column 24)"
    );
}

#[test]
fn map_test_finds_the_start_in_free_text() {
    let descriptor: MapTestDescriptor = serde_json::from_value(serde_json::json!({
        "description": "free-form start",
        "deductions": { "1": 3 },
        "error_deduction": 3,
        "map": "empty_room.txt",
        "start": "start at [3, 4]"
    }))
    .expect("descriptor");
    let test = MapTest::new(descriptor, &ctx()).expect("load map test");
    assert_eq!(test.start(), (3, 4));
    assert_eq!(test.grid().count_open(), 529);

    let source =
        fs::read_to_string(fixtures().join("rules").join("north_only.txt")).expect("read");
    let deduction = test.evaluate(&source).expect("graded").expect("deduction");
    assert_eq!(deduction.deduction, 3.0);
    assert_eq!(deduction.notes, vec!["Picobot coverage: 3/529".to_string()]);
    assert_eq!(test.grid().count_open(), 529);
}

#[test]
fn missing_submission_loses_the_whole_file() {
    let criteria = load("ps1.json").expect("load criteria");
    let report = grade_submissions(&criteria, &[PathBuf::from("elsewhere/other.txt")])
        .expect("grade");
    let deductions = &report.files[0].deductions;
    assert_eq!(deductions[0].deduction, 20.0);
    assert_eq!(deductions[0].notes, vec!["file not submitted".to_string()]);
    assert_eq!(report.total(), 0.0);
}

#[test]
fn unsupported_test_type_fails_to_load() {
    let err = load("unknown_test.json").unwrap_err();
    assert!(format!("{err:#}").contains("`review` tests are not supported for `picobot` files"));
}

#[test]
fn missing_map_fails_to_load() {
    let err = load("missing_map.json").unwrap_err();
    assert!(format!("{err:#}").contains("no_such_maze.txt' cannot be found"));
}

#[test]
fn unknown_file_type_fails_to_load() {
    let json = r#"{ "files": [{ "path": "a.py", "type": "python", "point_value": 5 }] }"#;
    let err = Criteria::from_json(json, &Registry::with_defaults(), &ctx()).unwrap_err();
    assert!(err.to_string().contains("Unknown file type `python`"));
}

#[test]
fn start_must_be_an_open_cell() {
    let json = r#"{ "files": [{ "path": "picobot.txt", "type": "picobot", "point_value": 5,
        "tests": [{ "type": "map", "description": "corner", "deductions": { "1": 5 },
                    "error_deduction": 5, "map": "empty_room.txt", "start": "0, 0" }] }] }"#;
    assert!(Criteria::from_json(json, &Registry::with_defaults(), &ctx()).is_err());
}

#[test]
fn empty_registry_supports_nothing() {
    let criteria = fixtures().join("criteria").join("ps1.json");
    assert!(Criteria::load(&criteria, &Registry::new(), &ctx()).is_err());
}

#[test]
fn loaded_criteria_write_back_the_same_tests() {
    let criteria = load("ps1.json").expect("load criteria");
    let descriptor = criteria.to_descriptor().expect("descriptor");
    let json = serde_json::to_string(&descriptor).expect("serialize");
    let reloaded = Criteria::from_json(&json, &Registry::with_defaults(), &ctx()).expect("reload");

    let test = &descriptor.files[0].tests[0];
    assert_eq!(test["type"], "map");
    assert_eq!(test["start"], "(12, 12)");
    assert_eq!(test["deductions"]["99/100"], 2.0);
    assert_eq!(
        reloaded.to_descriptor().expect("descriptor").files[0].tests,
        descriptor.files[0].tests
    );
}

#[test]
fn skeleton_lists_solution_files() {
    let skeleton =
        generate_skeleton(&[Path::new("solutions/maze.txt"), Path::new("room.PICOBOT")])
            .expect("skeleton");
    assert_eq!(skeleton.files.len(), 2);
    assert_eq!(skeleton.files[0].path, "maze.txt");
    assert_eq!(skeleton.files[0].kind, "picobot");
    assert_eq!(skeleton.files[1].path, "room.PICOBOT");
    assert!(skeleton.files.iter().all(|f| f.tests.is_empty() && f.point_value == 0.0));

    assert!(generate_skeleton(&[Path::new("Main.java")]).is_err());
}

#[test]
fn report_renders_table_and_json() {
    let report = grade_with("north_only.txt");
    let table = render_table(&report);
    assert!(table.contains("Grading Overview: Problem Set 1"));
    assert!(table.contains("Total: 10.00/20.00"));

    let json: serde_json::Value =
        serde_json::from_str(&render_json(&report).expect("json")).expect("valid json");
    assert_eq!(json["assignment_name"], "Problem Set 1");
    assert_eq!(json["files"][0]["deductions"][0]["deduction"], 10.0);
}
