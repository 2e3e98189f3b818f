#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use bon::Builder;
use serde::{Deserialize, Serialize};
use tabled::Tabled;
use typed_builder::TypedBuilder;

#[derive(Clone, Debug, Default, PartialEq, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
/// Points taken off for one failed criterion
pub struct Deduction {
    /// * `deduction`: number of points taken off
    pub deduction:   f64,
    /// * `description`: description of the criterion that failed
    pub description: String,
    /// * `notes`: extra details, e.g. the coverage achieved or an error
    #[builder(default)]
    #[serde(default)]
    pub notes:       Vec<String>,
}

impl Display for Deduction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "-{} {}", self.deduction, self.description)?;
        if !self.notes.is_empty() {
            write!(f, " ({})", self.notes.join("; "))?;
        }
        Ok(())
    }
}

/// Grade of a single file of the criteria.
#[derive(Serialize, Deserialize, Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
#[builder(doc)]
pub struct FileGrade {
    /// Path of the file as named in the criteria.
    pub path:        String,
    /// Points the file is worth.
    pub point_value: f64,
    /// Deductions applied, in test order.
    #[builder(default)]
    pub deductions:  Vec<Deduction>,
}

impl FileGrade {
    /// Points left after deductions, never below zero.
    pub fn grade(&self) -> f64 {
        let taken: f64 = self.deductions.iter().map(|d| d.deduction).sum();
        (self.point_value - taken).max(0.0)
    }
}

/// Grades of every file of an assignment.
#[derive(Serialize, Deserialize, Debug, Clone, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[builder(doc)]
pub struct GradeReport {
    /// Name of the assignment, from the criteria.
    pub assignment_name: String,
    /// Per-file grades.
    pub files:           Vec<FileGrade>,
}

impl GradeReport {
    /// Total points received.
    pub fn total(&self) -> f64 {
        self.files.iter().map(FileGrade::grade).sum()
    }

    /// Total points possible.
    pub fn out_of(&self) -> f64 {
        self.files.iter().map(|f| f.point_value).sum()
    }

    /// One table row per deduction, or a single row for a file without any.
    pub fn rows(&self) -> Vec<ReportRow> {
        self.files
            .iter()
            .flat_map(|file| {
                if file.deductions.is_empty() {
                    vec![ReportRow {
                        file:      file.path.clone(),
                        criterion: String::from("-"),
                        deduction: String::from("0"),
                        notes:     String::new(),
                        grade:     format!("{:.2}/{:.2}", file.grade(), file.point_value),
                    }]
                } else {
                    file.deductions
                        .iter()
                        .map(|d| ReportRow {
                            file:      file.path.clone(),
                            criterion: d.description.clone(),
                            deduction: format!("-{}", d.deduction),
                            notes:     d.notes.join("\n"),
                            grade:     format!("{:.2}/{:.2}", file.grade(), file.point_value),
                        })
                        .collect()
                }
            })
            .collect()
    }
}

#[derive(Tabled, Clone, Debug)]
/// A row of the grading overview table
pub struct ReportRow {
    #[tabled(rename = "File")]
    /// * `file`: file the deduction belongs to
    pub file:      String,
    #[tabled(rename = "Criterion")]
    /// * `criterion`: description of the failed criterion
    pub criterion: String,
    #[tabled(rename = "Deduction")]
    /// * `deduction`: points taken off
    pub deduction: String,
    #[tabled(rename = "Notes")]
    /// * `notes`: details of the deduction
    pub notes:     String,
    #[tabled(rename = "Grade")]
    /// * `grade`: grade of the whole file
    pub grade:     String,
}
