use anyhow::{Context, Result};
use padic_math::{EngineConfig, RenderOptions, SolverConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

/// Picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "./padic.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub engine: EngineConfig,
    pub solver: SolverConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Base used for literals without a `_<base>` suffix.
    pub base: u32,
    /// Integer digits shown per result.
    pub digits: usize,
    pub pad: bool,
    pub include_base: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            base: 10,
            digits: 20,
            pad: false,
            include_base: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty`, `compact` or `json`.
    pub format: String,
    pub module_filters: BTreeMap<String, String>,
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
            module_filters: BTreeMap::new(),
            file_output: None,
        }
    }
}

impl CliConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// File (explicit path, else `./padic.toml` when present, else
    /// defaults), then environment overrides. Command line flags are applied
    /// by the caller on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `PADIC_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| env::var(key).ok());
    }

    /// Overrides read through `lookup`. Values that fail to parse are
    /// ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base) = lookup("PADIC_BASE").and_then(|v| v.parse().ok()) {
            self.display.base = base;
        }
        if let Some(max_digits) = lookup("PADIC_MAX_DIGITS").and_then(|v| v.parse().ok()) {
            self.engine = self.engine.with_max_digits(max_digits);
        }
        if let Some(digits) = lookup("PADIC_DIGITS").and_then(|v| v.parse().ok()) {
            self.display.digits = digits;
        }
        if let Some(level) = lookup("PADIC_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
        if let Some(format) = lookup("PADIC_LOG_FORMAT") {
            if !format.is_empty() {
                self.logging.format = format;
            }
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            pad: self.display.pad,
            include_base: self.display.include_base,
        }
    }
}
