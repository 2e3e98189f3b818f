//! # socrates
//!
//! Grades student work from the command line: every file named in a JSON
//! criteria document is run through its tests, and failed criteria turn into
//! point deductions. Picobot rule files are graded by simulating them on a
//! maze and measuring how much of it they cover.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Environment-driven configuration
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// Loading and writing criteria documents
pub mod criteria;
/// Kinds of submitted files and the tests run on them
pub mod filetypes;
/// For all things related to grading
pub mod grade;
/// Picobot rule compiler, maps and simulator
pub mod picobot;
/// Utility functions for convenience
pub mod util;

use std::path::{Path, PathBuf};

use anyhow::Result;
use criteria::Criteria;
use filetypes::{LoadContext, Registry};
use grade::GradeReport;

/// Loads the criteria at `criteria_path` with the built-in tests and grades
/// `submissions` against them.
pub fn grade(criteria_path: &Path, submissions: &[PathBuf]) -> Result<GradeReport> {
    let ctx = LoadContext::from_config()?;
    let criteria = Criteria::load(criteria_path, &Registry::with_defaults(), &ctx)?;
    grade::grade_submissions(&criteria, submissions)
}
