#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock},
};

use anyhow::{Context, Result};

use crate::constants::DEFAULT_STATIC_DIR;

/// Runtime configuration shared across the crate.
#[derive(Debug)]
pub struct ConfigState {
    /// Directory that map files named in criteria documents live in.
    static_dir: PathBuf,
    /// Optional override of the derived simulation step cap.
    max_steps:  Option<u64>,
}

impl ConfigState {
    /// Construct a new configuration instance by reading the environment.
    fn new() -> Result<Self> {
        let static_dir = std::env::var("SOCRATES_STATIC_DIR")
            .map(|value| value.trim().to_owned())
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string());

        let max_steps = match std::env::var("SOCRATES_MAX_STEPS") {
            Ok(value) if !value.trim().is_empty() => Some(
                value
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("SOCRATES_MAX_STEPS is not a number: {value}"))?,
            ),
            _ => None,
        };

        Ok(Self {
            static_dir: PathBuf::from(static_dir),
            max_steps,
        })
    }

    /// Returns the directory map files are resolved against.
    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    /// Returns the step cap override, if one was configured.
    pub fn max_steps(&self) -> Option<u64> {
        self.max_steps
    }
}

/// Shared configuration handle used throughout the crate.
#[derive(Clone, Debug)]
pub struct ConfigHandle(Arc<ConfigState>);

impl std::ops::Deref for ConfigHandle {
    type Target = ConfigState;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Global storage for the lazily constructed configuration state.
static CONFIG_SLOT: OnceLock<Mutex<Option<Arc<ConfigState>>>> = OnceLock::new();

/// Returns the mutex guarding the global configuration slot.
fn slot() -> &'static Mutex<Option<Arc<ConfigState>>> {
    CONFIG_SLOT.get_or_init(|| Mutex::new(None))
}

/// Ensure the global configuration has been initialized and return a handle.
pub fn ensure_initialized() -> Result<ConfigHandle> {
    let mut guard = slot()
        .lock()
        .map_err(|_| anyhow::anyhow!("config slot poisoned"))?;
    if let Some(cfg) = guard.as_ref() {
        return Ok(ConfigHandle(Arc::clone(cfg)));
    }

    let cfg = Arc::new(ConfigState::new()?);
    *guard = Some(Arc::clone(&cfg));
    Ok(ConfigHandle(cfg))
}

/// Returns the active configuration, initializing it on demand.
pub fn get() -> Result<ConfigHandle> {
    ensure_initialized()
}

/// Returns the configured step cap override, if any.
pub fn max_steps() -> Result<Option<u64>> {
    Ok(get()?.max_steps())
}
