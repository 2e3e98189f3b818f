#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{fs, path::Path};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::{CriterionTest, LoadContext, Registry};
use crate::{
    criteria::FileDescriptor,
    grade::{CoverageGrader, CoverageTable, Deduction},
    picobot::{Cell, Grid, PicobotError, RuleTable, parsers::parser, simulate},
};

/// A `map` test as written in a criteria file.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MapTestDescriptor {
    /// Description reported with deductions.
    pub description:     String,
    /// Coverage threshold to deduction.
    pub deductions:      CoverageTable,
    /// Deduction for rule files that do not compile or runs that fail.
    pub error_deduction: f64,
    /// Map file name, relative to the static directory.
    pub map:             String,
    /// Start position, written like `(12, 12)`; row first.
    pub start:           String,
}

/// Simulates a Picobot rule file on a map and deducts by coverage.
#[derive(Clone, Debug)]
pub struct MapTest {
    /// Turns coverage or errors into deductions.
    grader:    CoverageGrader,
    /// Map file name as written in the criteria.
    map:       String,
    /// The parsed map; every run works on a copy.
    grid:      Grid,
    /// Start (row, column).
    start:     (usize, usize),
    /// Step cap override.
    max_steps: Option<u64>,
}

impl MapTest {
    /// Criteria `type` of this test.
    pub const JSON_TYPE: &'static str = "map";

    /// Loads the map and checks the start position.
    pub fn new(descriptor: MapTestDescriptor, ctx: &LoadContext) -> Result<Self> {
        ensure!(
            !descriptor.deductions.is_empty(),
            "Picobot map test `{}` has no coverage deductions",
            descriptor.description
        );

        let map_path = ctx.static_dir.join(&descriptor.map);
        ensure!(
            map_path.is_file(),
            "Picobot map file '{}' cannot be found",
            descriptor.map
        );
        let grid = Grid::from_path(&map_path)?;

        let start = parser::start_position(&descriptor.start)
            .with_context(|| format!("Could not parse start position `{}`", descriptor.start))?;
        let (row, col) = start;
        match grid.get(row as isize, col as isize) {
            Some(Cell::Open) => {}
            _ => return Err(PicobotError::InvalidStart { row, col }.into()),
        }

        let grader = CoverageGrader::builder()
            .description(descriptor.description)
            .table(descriptor.deductions)
            .error_deduction(descriptor.error_deduction)
            .build();

        Ok(Self {
            grader,
            map: descriptor.map,
            grid,
            start,
            max_steps: ctx.max_steps,
        })
    }

    /// [`super::TestConstructor`] for `map` tests.
    pub fn from_descriptor(value: &Value, ctx: &LoadContext) -> Result<Box<dyn CriterionTest>> {
        let descriptor: MapTestDescriptor =
            serde_json::from_value(value.clone()).context("Malformed `map` test descriptor")?;
        Ok(Box::new(Self::new(descriptor, ctx)?))
    }

    /// Compiles `source`, simulates it on a fresh copy of the map and grades
    /// the result.
    pub fn evaluate(&self, source: &str) -> Result<Option<Deduction>, PicobotError> {
        let coverage = RuleTable::from_source(source).and_then(|rules| {
            simulate(&rules, &self.grid, self.start, self.max_steps).map(|outcome| outcome.coverage)
        });
        self.grader.grade_outcome(coverage)
    }

    /// The parsed map, untouched by any run.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Start (row, column).
    pub fn start(&self) -> (usize, usize) {
        self.start
    }
}

impl CriterionTest for MapTest {
    fn json_type(&self) -> &'static str {
        Self::JSON_TYPE
    }

    fn to_descriptor(&self) -> Result<Value> {
        let descriptor = MapTestDescriptor {
            description:     self.grader.description().to_string(),
            deductions:      self.grader.table().clone(),
            error_deduction: self.grader.error_deduction(),
            map:             self.map.clone(),
            start:           format!("({}, {})", self.start.0, self.start.1),
        };
        let mut value = serde_json::to_value(descriptor)?;
        if let Some(obj) = value.as_object_mut() {
            obj.insert("type".into(), Value::from(Self::JSON_TYPE));
        }
        Ok(value)
    }

    fn run(&self, submission: &Path) -> Result<Option<Deduction>> {
        let source = fs::read_to_string(submission)
            .with_context(|| format!("Could not read Picobot rules {}", submission.display()))?;
        let result = self.evaluate(&source)?;
        debug!(test = %self.grader.description(), deducted = result.is_some(), "map test done");
        Ok(result)
    }
}

/// A Picobot rule file named in the criteria, with its tests.
#[derive(Debug)]
pub struct PicobotFile {
    /// Path of the file as named in the criteria.
    pub path:        String,
    /// Points the file is worth.
    pub point_value: f64,
    /// Tests to run on the submitted file.
    pub tests:       Vec<Box<dyn CriterionTest>>,
}

impl PicobotFile {
    /// Criteria `type` of this file kind.
    pub const JSON_TYPE: &'static str = "picobot";

    /// Loads the file entry and all of its tests.
    pub fn from_descriptor(
        descriptor: &FileDescriptor,
        registry: &Registry,
        ctx: &LoadContext,
    ) -> Result<Self> {
        let tests = descriptor
            .tests
            .iter()
            .map(|t| registry.build(Self::JSON_TYPE, t, ctx))
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("Could not load tests for {}", descriptor.path))?;

        Ok(Self {
            path: descriptor.path.clone(),
            point_value: descriptor.point_value,
            tests,
        })
    }

    /// The file entry as it would appear in a criteria file.
    pub fn to_descriptor(&self) -> Result<FileDescriptor> {
        Ok(FileDescriptor::builder()
            .path(self.path.clone())
            .kind(Self::JSON_TYPE)
            .point_value(self.point_value)
            .tests(
                self.tests
                    .iter()
                    .map(|t| t.to_descriptor())
                    .collect::<Result<Vec<_>>>()?,
            )
            .build())
    }

    /// Runs every test on `submission`, keeping only actual deductions.
    pub fn run_tests(&self, submission: &Path) -> Result<Vec<Deduction>> {
        let mut results = Vec::new();
        for test in &self.tests {
            if let Some(result) = test.run(submission)? {
                info!(file = %self.path, "{result}");
                results.push(result);
            }
        }
        Ok(results)
    }
}
