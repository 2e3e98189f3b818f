#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use typed_builder::TypedBuilder;

use crate::{
    filetypes::{LoadContext, PicobotFile, Registry},
    util::file_kind_for,
};

/// One file entry of a criteria document.
#[derive(Serialize, Deserialize, Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
#[builder(doc)]
pub struct FileDescriptor {
    /// Path of the file to grade.
    pub path:        String,
    /// Kind of file, e.g. `picobot`.
    #[serde(rename = "type")]
    pub kind:        String,
    /// Points the file is worth.
    pub point_value: f64,
    /// Test descriptors; their shape depends on their `type`.
    #[serde(default)]
    #[builder(default)]
    pub tests:       Vec<Value>,
}

/// A criteria document as stored on disk.
#[derive(Serialize, Deserialize, Debug, Clone, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[builder(doc)]
pub struct CriteriaDescriptor {
    /// Name of the assignment.
    #[serde(default)]
    pub assignment_name: String,
    /// Files to grade.
    pub files:           Vec<FileDescriptor>,
}

/// Loaded grading criteria for one assignment.
#[derive(Debug)]
pub struct Criteria {
    /// Name of the assignment.
    pub assignment_name: String,
    /// Files to grade, with their tests.
    pub files:           Vec<PicobotFile>,
}

impl Criteria {
    /// Loads criteria from a descriptor.
    pub fn from_descriptor(
        descriptor: &CriteriaDescriptor,
        registry: &Registry,
        ctx: &LoadContext,
    ) -> Result<Self> {
        let files = descriptor
            .files
            .iter()
            .map(|file| match file.kind.as_str() {
                PicobotFile::JSON_TYPE => PicobotFile::from_descriptor(file, registry, ctx),
                other => bail!("Unknown file type `{other}` for {}", file.path),
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(files = files.len(), "loaded criteria");
        Ok(Self {
            assignment_name: descriptor.assignment_name.clone(),
            files,
        })
    }

    /// Parses and loads a JSON criteria document.
    pub fn from_json(json: &str, registry: &Registry, ctx: &LoadContext) -> Result<Self> {
        let descriptor: CriteriaDescriptor =
            serde_json::from_str(json).context("Criteria file is not valid criteria JSON")?;
        Self::from_descriptor(&descriptor, registry, ctx)
    }

    /// Reads, parses and loads a JSON criteria file.
    pub fn load(path: &Path, registry: &Registry, ctx: &LoadContext) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Could not read criteria file {}", path.display()))?;
        Self::from_json(&json, registry, ctx)
            .with_context(|| format!("Could not load criteria file {}", path.display()))
    }

    /// The criteria as they would be written to disk.
    pub fn to_descriptor(&self) -> Result<CriteriaDescriptor> {
        Ok(CriteriaDescriptor::builder()
            .assignment_name(self.assignment_name.clone())
            .files(
                self.files
                    .iter()
                    .map(PicobotFile::to_descriptor)
                    .collect::<Result<Vec<_>>>()?,
            )
            .build())
    }
}

/// A criteria skeleton for the given solution files: one entry per file,
/// worth no points and without tests.
pub fn generate_skeleton(paths: &[impl AsRef<Path>]) -> Result<CriteriaDescriptor> {
    let files = paths
        .iter()
        .map(|p| {
            let p = p.as_ref();
            let kind = file_kind_for(p)
                .with_context(|| format!("Cannot tell what kind of file {} is", p.display()))?;
            let name = p
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| p.display().to_string());
            Ok(FileDescriptor::builder()
                .path(name)
                .kind(kind)
                .point_value(0.0)
                .build())
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CriteriaDescriptor::builder().files(files).build())
}
