//! Conversion runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the conversion
//! functions, so nothing below the CLI reads environment variables.

use crate::constants::DEFAULT_RAW_ROOT;
use crate::{ConvertError, ConvertResult};
use std::path::{Path, PathBuf};

/// Configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ConvertConfig {
    raw_root: PathBuf,
}

impl ConvertConfig {
    /// Create a new `ConvertConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidInput`] if `raw_root` is empty.
    pub fn new(raw_root: PathBuf) -> ConvertResult<Self> {
        if raw_root.as_os_str().is_empty() {
            return Err(ConvertError::InvalidInput("raw root cannot be empty".into()));
        }

        Ok(Self { raw_root })
    }

    /// Directory under which `Dataset<NNN>_<TaskName>` folders are created.
    pub fn raw_root(&self) -> &Path {
        &self.raw_root
    }
}

/// Resolve the raw data root without reading environment variables.
///
/// Precedence is `override_dir`, then `env_value` (the value of
/// [`crate::constants::RAW_ROOT_ENV_VAR`]), then [`DEFAULT_RAW_ROOT`] relative to the working directory.
/// Whitespace and double quotes are stripped from `env_value`.
pub fn resolve_raw_root(override_dir: Option<PathBuf>, env_value: Option<String>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir;
    }

    env_value
        .map(|v| v.trim().replace('"', ""))
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RAW_ROOT))
}
