#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Kinds of submitted files and the tests that can be run on them.

/// Picobot rule files and the map coverage test.
pub mod picobot;

use std::{
    collections::HashMap,
    fmt::Debug,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

pub use picobot::{MapTest, MapTestDescriptor, PicobotFile};

use crate::{config, grade::Deduction};

/// A test that can be loaded from, and written back to, a criteria file and
/// run against a submission.
pub trait CriterionTest: Debug {
    /// The test's `type` in the criteria file, e.g. `map`.
    fn json_type(&self) -> &'static str;

    /// The test as it would appear in a criteria file.
    fn to_descriptor(&self) -> Result<Value>;

    /// Runs the test on the submitted file; `None` means nothing to deduct.
    fn run(&self, submission: &Path) -> Result<Option<Deduction>>;
}

/// Builds a test from its criteria descriptor.
pub type TestConstructor = fn(&Value, &LoadContext) -> Result<Box<dyn CriterionTest>>;

/// Settings tests need while being loaded.
#[derive(Clone, Debug)]
pub struct LoadContext {
    /// Directory map files are resolved against.
    pub static_dir: PathBuf,
    /// Step cap override for simulations.
    pub max_steps:  Option<u64>,
}

impl LoadContext {
    /// Creates a new context.
    pub fn new(static_dir: impl Into<PathBuf>, max_steps: Option<u64>) -> Self {
        Self {
            static_dir: static_dir.into(),
            max_steps,
        }
    }

    /// Creates a context from the global configuration.
    pub fn from_config() -> Result<Self> {
        let cfg = config::get()?;
        Ok(Self::new(cfg.static_dir(), cfg.max_steps()))
    }
}

/// Test constructors keyed by (file kind, test kind).
#[derive(Clone, Default)]
pub struct Registry {
    /// Registered constructors.
    tests: HashMap<(String, String), TestConstructor>,
}

impl Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.tests.keys()).finish()
    }
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in test registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PicobotFile::JSON_TYPE, MapTest::JSON_TYPE, MapTest::from_descriptor);
        registry
    }

    /// Registers `constructor` for tests of `test_kind` on files of
    /// `file_kind`, replacing any previous registration.
    pub fn register(&mut self, file_kind: &str, test_kind: &str, constructor: TestConstructor) {
        self.tests
            .insert((file_kind.to_string(), test_kind.to_string()), constructor);
    }

    /// Looks up the constructor for a (file kind, test kind) pair.
    pub fn find(&self, file_kind: &str, test_kind: &str) -> Option<TestConstructor> {
        self.tests
            .get(&(file_kind.to_string(), test_kind.to_string()))
            .copied()
    }

    /// Builds the test described by `descriptor`, dispatching on its `type`.
    pub fn build(
        &self,
        file_kind: &str,
        descriptor: &Value,
        ctx: &LoadContext,
    ) -> Result<Box<dyn CriterionTest>> {
        let test_kind = descriptor
            .get("type")
            .and_then(Value::as_str)
            .context("Test descriptor has no `type`")?;
        let constructor = self.find(file_kind, test_kind).ok_or_else(|| {
            anyhow!("`{test_kind}` tests are not supported for `{file_kind}` files")
        })?;
        constructor(descriptor, ctx)
            .with_context(|| format!("Could not load `{test_kind}` test for a `{file_kind}` file"))
    }
}
