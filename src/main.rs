#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # socrates
//!
//! Grade student work from the command line.
//!
//! * `socrates grade criteria.json picobot.txt` grades submissions against a
//!   criteria file.
//! * `socrates generate solution.txt` prints a criteria skeleton.
//! * `socrates simulate rules.txt map.txt --start "(12, 12)"` runs a Picobot
//!   rule file and draws where it went.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use bpaf::*;
use dotenvy::dotenv;
use socrates::{
    config, criteria,
    grade::show_result,
    picobot::{Grid, RuleTable, parsers::parser, simulate},
};
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Grade submissions against a criteria file
    Grade {
        /// Print the JSON report to stdout too
        json:        bool,
        /// Criteria file
        criteria:    PathBuf,
        /// Submitted files
        submissions: Vec<PathBuf>,
    },
    /// Print a criteria skeleton for solution files
    Generate(Vec<PathBuf>),
    /// Run a Picobot rule file on a map
    Simulate {
        /// Rule file
        rules: PathBuf,
        /// Map file
        map:   PathBuf,
        /// Start position, `(row, col)`
        start: String,
    },
}

/// Parsed command line.
#[derive(Debug, Clone)]
struct Opts {
    /// Only log warnings and errors
    quiet: bool,
    /// Subcommand
    cmd:   Cmd,
}

/// Parse the command line arguments and return `Opts`
fn options() -> Opts {
    let quiet = short('q').long("quiet").help("Only print warnings and errors").switch();

    let grade = {
        let json = long("json").help("Also print the report as JSON").switch();
        let criteria = positional::<PathBuf>("CRITERIA").help("criteria file in JSON format");
        let submissions = positional::<PathBuf>("SUBMISSION")
            .help("submission file(s) to grade")
            .many();
        construct!(Cmd::Grade {
            json,
            criteria,
            submissions
        })
        .to_options()
        .descr("Grade submissions against a criteria file")
        .command("grade")
    };

    let generate = positional::<PathBuf>("SOLUTION")
        .help("file(s) for which to generate criteria")
        .many()
        .map(Cmd::Generate)
        .to_options()
        .descr("Generate a JSON criteria file from an existing solution")
        .command("generate")
        .long("gen");

    let simulate = {
        let start = long("start")
            .help("Start position as (row, col)")
            .argument::<String>("POS");
        let rules = positional::<PathBuf>("RULES").help("Picobot rule file");
        let map = positional::<PathBuf>("MAP").help("Picobot map file");
        construct!(Cmd::Simulate { start, rules, map })
            .to_options()
            .descr("Simulate a Picobot rule file on a map")
            .command("simulate")
    };

    let cmd = construct!([grade, generate, simulate]);

    construct!(Opts { quiet, cmd })
        .to_options()
        .descr("Grade student work from the command line")
        .run()
}

/// Compiles and simulates a rule file, printing coverage and the final map.
fn run_simulation(rules: &Path, map: &Path, start: &str) -> Result<()> {
    let source = fs::read_to_string(rules)
        .with_context(|| format!("Could not read Picobot rules {}", rules.display()))?;
    let grid = Grid::from_path(map)?;
    let start = parser::start_position(start)
        .with_context(|| format!("Could not parse start position `{start}`"))?;

    let table = RuleTable::from_source(&source)?;
    let outcome = simulate(&table, &grid, start, config::max_steps()?)?;

    println!("{}", outcome.grid.render(Some(outcome.position)));
    println!(
        "Picobot coverage: {} after {} steps{}",
        outcome.coverage,
        outcome.steps,
        if outcome.hit_step_cap { " (step cap reached)" } else { "" }
    );
    Ok(())
}

fn main() -> Result<()> {
    dotenv().ok();

    let opts = options();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(if opts.quiet { Level::WARN } else { Level::INFO });
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    match opts.cmd {
        Cmd::Grade {
            json,
            criteria,
            submissions,
        } => {
            let report = socrates::grade(&criteria, &submissions)
                .with_context(|| format!("Failed to grade against {}", criteria.display()))?;
            show_result(&report, json)?;
        }
        Cmd::Generate(files) => {
            let skeleton = criteria::generate_skeleton(&files)?;
            println!("{}", serde_json::to_string_pretty(&skeleton)?);
        }
        Cmd::Simulate { rules, map, start } => run_simulation(&rules, &map, &start)?,
    };

    Ok(())
}
