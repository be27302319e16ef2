use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TIDEMARK_DIR_NAME: &str = ".tidemark";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_REPORT_LIMIT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GridStyle {
    Ascii,
    Modern,
    #[default]
    Rounded,
    Markdown,
    Psql,
    Blank,
}

impl GridStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Modern => "modern",
            Self::Rounded => "rounded",
            Self::Markdown => "markdown",
            Self::Psql => "psql",
            Self::Blank => "blank",
        }
    }
}

impl std::str::FromStr for GridStyle {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "ascii" => Ok(Self::Ascii),
            "modern" => Ok(Self::Modern),
            "rounded" => Ok(Self::Rounded),
            "markdown" => Ok(Self::Markdown),
            "psql" => Ok(Self::Psql),
            "blank" => Ok(Self::Blank),
            other => Err(format!(
                "invalid grid style '{other}', expected one of: ascii, modern, rounded, markdown, psql, blank"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TidemarkConfig {
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub grid_style: GridStyle,
    #[serde(default = "default_color")]
    pub color: bool,
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            grid_style: GridStyle::default(),
            color: default_color(),
            default_limit: default_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
}

pub fn tidemark_dir(workspace_root: impl AsRef<Path>) -> PathBuf {
    workspace_root.as_ref().join(TIDEMARK_DIR_NAME)
}

pub fn config_path(workspace_root: impl AsRef<Path>) -> PathBuf {
    tidemark_dir(workspace_root).join(CONFIG_FILE_NAME)
}

/// Reads `.tidemark/config.toml`; a missing file yields the defaults and nothing is written.
pub fn load_workspace_config(
    workspace_root: impl AsRef<Path>,
) -> Result<TidemarkConfig, ConfigError> {
    let path = config_path(workspace_root);
    if !path.exists() {
        return Ok(TidemarkConfig::default());
    }

    let raw = fs::read_to_string(path)?;
    let parsed: TidemarkConfig = toml::from_str(&raw)?;
    Ok(parsed)
}

pub fn validate_config(config: &TidemarkConfig) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.report.default_limit == 0 {
        warnings.push(ConfigWarning {
            code: "report_default_limit_zero",
            message: format!(
                "[report].default_limit = 0 renders empty reports, using {DEFAULT_REPORT_LIMIT}"
            ),
        });
    }

    warnings
}

impl ReportConfig {
    pub fn effective_limit(&self) -> u32 {
        if self.default_limit == 0 {
            DEFAULT_REPORT_LIMIT
        } else {
            self.default_limit
        }
    }
}

fn default_color() -> bool {
    true
}

fn default_limit() -> u32 {
    DEFAULT_REPORT_LIMIT
}
