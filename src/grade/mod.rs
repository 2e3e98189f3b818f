#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Coverage thresholds and the coverage grader.
pub mod coverage;
/// Overview table and JSON rendering.
pub mod report;
/// Deduction and grade record types.
pub mod results;

use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

pub use coverage::{CoverageGrader, CoverageTable, parse_ratio};
pub use report::{render_json, render_table, show_result};
pub use results::{Deduction, FileGrade, GradeReport, ReportRow};

use crate::{criteria::Criteria, util::find_submission};

/// Grades `submissions` against every file named in `criteria`.
///
/// Submissions are matched to criteria files by file name. A criteria file
/// with no matching submission loses all of its points.
pub fn grade_submissions(criteria: &Criteria, submissions: &[PathBuf]) -> Result<GradeReport> {
    let mut files = Vec::with_capacity(criteria.files.len());

    for file in &criteria.files {
        let deductions = match find_submission(&file.path, submissions) {
            Some(submission) => {
                info!("Grading {}", submission.display());
                file.run_tests(submission)?
            }
            None => {
                warn!("No submission found for {}", file.path);
                vec![
                    Deduction::builder()
                        .deduction(file.point_value)
                        .description(file.path.clone())
                        .notes(vec![String::from("file not submitted")])
                        .build(),
                ]
            }
        };

        files.push(
            FileGrade::builder()
                .path(file.path.clone())
                .point_value(file.point_value)
                .deductions(deductions)
                .build(),
        );
    }

    Ok(GradeReport::builder()
        .assignment_name(criteria.assignment_name.clone())
        .files(files)
        .build())
}
