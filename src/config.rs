//! Configuration schema for patternscan.
//!
//! A configuration selects the enabled rules and how findings are reported.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default configuration file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["patternscan.yaml", ".patternscan.yaml"];

/// Template written by `patternscan init`.
pub const DEFAULT_TEMPLATE: &str = include_str!("templates/default.yaml");

/// Highest supported report verbosity.
pub const MAX_VERBOSITY: u8 = 2;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub report: ReportSettings,
}

fn default_version() -> String {
    "1".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            rules: RulesConfig::default(),
            report: ReportSettings::default(),
        }
    }
}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Find a configuration file in the current directory.
    pub fn discover() -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Load `path` if given, else a discovered file, else the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::discover() {
                Some(p) => p,
                None => {
                    tracing::debug!("no configuration file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        tracing::debug!(path = %path.display(), "loading configuration");
        let config = Self::parse_file(&path)
            .map_err(|e| anyhow::anyhow!("parsing {}: {}", path.display(), e))?;
        validate(&config)?;
        Ok(config)
    }
}

/// Per-rule toggles.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RulesConfig {
    #[serde(default = "RuleSetting::on")]
    pub too_many_returns: RuleSetting,
    #[serde(default = "RuleSetting::on")]
    pub too_many_params: RuleSetting,
    #[serde(default = "RuleSetting::on")]
    pub nested_conditional: RuleSetting,
    #[serde(default = "RuleSetting::off")]
    pub imperative_loop: RuleSetting,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            too_many_returns: RuleSetting::on(),
            too_many_params: RuleSetting::on(),
            nested_conditional: RuleSetting::on(),
            imperative_loop: RuleSetting::off(),
        }
    }
}

/// Settings for one rule. `max` only applies to rules with a limit.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RuleSetting {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
}

fn default_true() -> bool {
    true
}

impl RuleSetting {
    pub fn on() -> Self {
        Self {
            enabled: true,
            max: None,
        }
    }

    pub fn off() -> Self {
        Self {
            enabled: false,
            max: None,
        }
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    #[default]
    Log,
    Html,
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Text,
        OutputFormat::Log,
        OutputFormat::Html,
        OutputFormat::Json,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Log => "log",
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("invalid format {:?}, must be 'text', 'log', 'html', or 'json'", s))
    }
}

/// How findings are reported.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ReportSettings {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_verbosity")]
    pub verbosity: u8,
    #[serde(default = "default_destination")]
    pub destination: PathBuf,
}

fn default_verbosity() -> u8 {
    1
}

fn default_destination() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            verbosity: default_verbosity(),
            destination: default_destination(),
        }
    }
}

/// Validate a configuration.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    let limited = [
        ("too_many_returns", &config.rules.too_many_returns),
        ("too_many_params", &config.rules.too_many_params),
    ];
    for (name, setting) in limited {
        if setting.max == Some(0) {
            anyhow::bail!("rules.{}.max must be at least 1", name);
        }
    }

    if config.report.verbosity > MAX_VERBOSITY {
        anyhow::bail!(
            "report.verbosity {} is out of range, must be 0 to {}",
            config.report.verbosity,
            MAX_VERBOSITY
        );
    }

    Ok(())
}
