//! Load session configuration.
//!
//! The host supplies its engine version and declared capability set; the only
//! pipeline tunable is the decode worker bound. A TOML host profile keeps
//! those facts out of code for embedders that prefer configuration files.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use pack_core::{HostContext, SemanticVersion};

/// Options for one load session.
#[derive(Clone, Debug)]
pub struct LoadOptions {
    pub host: HostContext,
    /// Upper bound on concurrently running decode tasks.
    pub max_decode_workers: usize,
}

impl LoadOptions {
    pub const DEFAULT_DECODE_WORKERS: usize = 4;

    pub fn new(host: HostContext) -> Self {
        Self {
            host,
            max_decode_workers: Self::DEFAULT_DECODE_WORKERS,
        }
    }

    pub fn with_decode_workers(mut self, workers: usize) -> Self {
        // A zero bound would deadlock the decode pool.
        self.max_decode_workers = workers.max(1);
        self
    }
}

/// Errors raised while reading a host profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read host profile {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid host profile: {0}")]
    Parse(String),
}

/// TOML host profile.
///
/// ```toml
/// engine_version = "1.4.0"
/// capabilities = ["rituals", "hex-overlays"]
/// max_decode_workers = 8
/// ```
#[derive(Debug, Deserialize)]
pub struct HostProfile {
    engine_version: SemanticVersion,
    #[serde(default)]
    capabilities: Vec<String>,
    #[serde(default)]
    max_decode_workers: Option<usize>,
}

impl HostProfile {
    /// Reads a profile file and converts it into load options.
    pub fn load(path: &Path) -> Result<LoadOptions, ProfileError> {
        let text = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let profile: HostProfile =
            toml::from_str(&text).map_err(|e| ProfileError::Parse(e.to_string()))?;
        Ok(profile.into_options())
    }

    fn into_options(self) -> LoadOptions {
        let mut host = HostContext::new(self.engine_version);
        host.capabilities.extend(self.capabilities);

        let options = LoadOptions::new(host);
        match self.max_decode_workers {
            Some(workers) => options.with_decode_workers(workers),
            None => options,
        }
    }
}
