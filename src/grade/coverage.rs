#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Turning a Picobot coverage ratio into a deduction.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail, ensure};
use bon::Builder;
use serde::{Deserialize, Serialize};

use super::results::Deduction;
use crate::picobot::{Coverage, PicobotError};

/// Parses a threshold such as `"3/4"`, `"1"` or `"0.75"` into an exact
/// ratio.
pub fn parse_ratio(text: &str) -> Result<Coverage> {
    let text = text.trim();
    if let Some((whole, frac)) = text.split_once('.') {
        ensure!(
            !(whole.is_empty() && frac.is_empty())
                && whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()),
            "`{text}` is not a valid ratio"
        );
        let denom = 10u64
            .checked_pow(frac.len() as u32)
            .with_context(|| format!("`{text}` has too many decimal places"))?;
        let whole: u64 = if whole.is_empty() { 0 } else { whole.parse()? };
        let frac: u64 = if frac.is_empty() { 0 } else { frac.parse()? };
        let numer = whole
            .checked_mul(denom)
            .and_then(|w| w.checked_add(frac))
            .with_context(|| format!("`{text}` is too large"))?;
        return Ok(Coverage::new(numer, denom));
    }

    match text.parse::<Coverage>() {
        Ok(ratio) => Ok(ratio),
        Err(e) => bail!("`{text}` is not a valid ratio: {e}"),
    }
}

/// Ordered coverage thresholds and the deduction for reaching each.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct CoverageTable {
    /// Threshold to deduction, ascending by threshold.
    thresholds: BTreeMap<Coverage, f64>,
}

impl CoverageTable {
    /// Builds a table from (threshold, deduction) pairs.
    pub fn new(thresholds: impl IntoIterator<Item = (Coverage, f64)>) -> Self {
        Self {
            thresholds: thresholds.into_iter().collect(),
        }
    }

    /// Deduction earned by `coverage`.
    ///
    /// `None` when coverage is above the highest threshold. Otherwise the
    /// deduction of the highest threshold not above `coverage`, falling back
    /// to the lowest threshold.
    pub fn deduction_for(&self, coverage: Coverage) -> Option<f64> {
        let (&max, _) = self.thresholds.last_key_value()?;
        if coverage > max {
            return None;
        }

        self.thresholds
            .range(..=coverage)
            .next_back()
            .or_else(|| self.thresholds.first_key_value())
            .map(|(_, &deduction)| deduction)
    }

    /// Whether the table has no thresholds.
    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Thresholds and deductions, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (Coverage, f64)> + '_ {
        self.thresholds.iter().map(|(&k, &v)| (k, v))
    }
}

impl TryFrom<BTreeMap<String, f64>> for CoverageTable {
    type Error = anyhow::Error;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self> {
        let thresholds = raw
            .into_iter()
            .map(|(ratio, deduction)| Ok((parse_ratio(&ratio)?, deduction)))
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(Self { thresholds })
    }
}

impl From<CoverageTable> for BTreeMap<String, f64> {
    fn from(table: CoverageTable) -> Self {
        table
            .thresholds
            .into_iter()
            .map(|(ratio, deduction)| (ratio.to_string(), deduction))
            .collect()
    }
}

/// Grades a Picobot run against a coverage table.
#[derive(Clone, Debug, Builder)]
#[builder(on(String, into))]
pub struct CoverageGrader {
    /// Description reported with every deduction.
    description:     String,
    /// Coverage thresholds.
    table:           CoverageTable,
    /// Deduction when the rules fail to compile or the run fails.
    error_deduction: f64,
}

impl CoverageGrader {
    /// Deduction for a run that finished with `coverage`, if any.
    pub fn grade(&self, coverage: Coverage) -> Option<Deduction> {
        let deduction = self.table.deduction_for(coverage)?;
        Some(
            Deduction::builder()
                .deduction(deduction)
                .description(self.description.clone())
                .notes(vec![format!("Picobot coverage: {coverage}")])
                .build(),
        )
    }

    /// Deduction for a rule file that failed to compile or a run that failed.
    pub fn grade_error(&self, err: &PicobotError) -> Deduction {
        Deduction::builder()
            .deduction(self.error_deduction)
            .description(self.description.clone())
            .notes(vec![err.to_string()])
            .build()
    }

    /// Grades either a coverage or an error. Errors that are not the
    /// submission's fault are handed back.
    pub fn grade_outcome(
        &self,
        outcome: Result<Coverage, PicobotError>,
    ) -> Result<Option<Deduction>, PicobotError> {
        match outcome {
            Ok(coverage) => Ok(self.grade(coverage)),
            Err(err) if err.is_submission_error() => Ok(Some(self.grade_error(&err))),
            Err(err) => Err(err),
        }
    }

    /// The coverage table.
    pub fn table(&self) -> &CoverageTable {
        &self.table
    }

    /// The description reported with deductions.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The deduction applied on errors.
    pub fn error_deduction(&self) -> f64 {
        self.error_deduction
    }
}
