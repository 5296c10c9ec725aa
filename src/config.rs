//! Project-level configuration.
//!
//! An optional `prebuild-matrix.toml` in the working directory can point at
//! a different packaging tool, replace the axes `all` expands to, or turn
//! off the `package` step. Every key is optional; a missing file means the
//! built-in defaults.
//!
//! ```toml
//! tool = "node_modules/.bin/node-pre-gyp"
//! archs = ["ia32", "x64"]
//! versions = ["8.0.0", "9.0.0"]
//! package = false
//! ```

use crate::command::ToolPlan;
use crate::matrix::Axes;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file name, looked up in the current working directory.
pub const CONFIG_FILE_NAME: &str = "prebuild-matrix.toml";

/// Environment variable overriding the config file path.
pub const CONFIG_ENV_VAR: &str = "PREBUILD_MATRIX_CONFIG";

/// Environment variable overriding the packaging tool path.
pub const TOOL_ENV_VAR: &str = "PREBUILD_MATRIX_TOOL";

/// Tool location relative to the project root when nothing overrides it.
#[cfg(not(windows))]
pub const DEFAULT_TOOL: &str = "node_modules/.bin/node-pre-gyp";
#[cfg(windows)]
pub const DEFAULT_TOOL: &str = "node_modules/.bin/node-pre-gyp.cmd";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MatrixConfig {
    /// Path to the packaging tool. Relative paths resolve against the
    /// working directory.
    pub tool: Option<String>,
    /// Architectures for `--target_arch=all`.
    pub archs: Option<Vec<String>>,
    /// Node.js versions for `--target=all`.
    pub versions: Option<Vec<String>>,
    /// Whether to run the `package` step after `configure build`.
    pub package: Option<bool>,
}

impl MatrixConfig {
    /// Path of the config file for a working directory, honoring
    /// `PREBUILD_MATRIX_CONFIG`.
    pub fn config_path(cwd: &Path) -> PathBuf {
        Self::config_path_with_env(cwd, std::env::var(CONFIG_ENV_VAR).ok())
    }

    fn config_path_with_env(cwd: &Path, env_value: Option<String>) -> PathBuf {
        match non_empty_trimmed(env_value) {
            Some(p) => cwd.join(p),
            None => cwd.join(CONFIG_FILE_NAME),
        }
    }

    /// Load the config for a working directory.
    pub fn load(cwd: &Path) -> Result<Self> {
        Self::load_from(&Self::config_path(cwd))
    }

    /// Load config from a specific path. Returns defaults if the file does
    /// not exist; any other read or parse failure is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config: Self = match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("failed to parse config file at {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read config file at {}", path.display()));
            }
        };
        config
            .validate()
            .with_context(|| format!("invalid config file at {}", path.display()))?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (key, values) in [("archs", &self.archs), ("versions", &self.versions)] {
            let Some(values) = values else { continue };
            if values.is_empty() {
                bail!("`{key}` must list at least one value");
            }
            if values.iter().any(|v| v.trim().is_empty()) {
                bail!("`{key}` must not contain empty values");
            }
        }
        Ok(())
    }

    /// The axes `all` expands to, falling back to the built-in lists.
    pub fn axes(&self) -> Axes {
        let mut axes = Axes::default();
        if let Some(archs) = &self.archs {
            axes.archs = archs.clone();
        }
        if let Some(versions) = &self.versions {
            axes.versions = versions.clone();
        }
        axes
    }

    pub fn package_enabled(&self) -> bool {
        self.package.unwrap_or(true)
    }

    /// Resolve the tool path.
    ///
    /// Priority (highest wins):
    /// 1. `PREBUILD_MATRIX_TOOL` environment variable
    /// 2. `tool` from the config file
    /// 3. `node_modules/.bin/node-pre-gyp`
    ///
    /// Empty values fall through. Relative results are joined onto `cwd`.
    pub fn resolve_tool(&self, cwd: &Path) -> PathBuf {
        self.resolve_tool_with_env(cwd, std::env::var(TOOL_ENV_VAR).ok())
    }

    fn resolve_tool_with_env(&self, cwd: &Path, env_value: Option<String>) -> PathBuf {
        let tool = non_empty_trimmed(env_value)
            .or_else(|| non_empty_trimmed(self.tool.clone()))
            .unwrap_or_else(|| DEFAULT_TOOL.to_string());
        cwd.join(tool)
    }

    /// Tool path plus subcommands for this configuration.
    pub fn tool_plan(&self, cwd: &Path) -> ToolPlan {
        ToolPlan::new(self.resolve_tool(cwd), self.package_enabled())
    }
}

/// Return the trimmed value if non-empty after trimming, otherwise `None`.
fn non_empty_trimmed(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
