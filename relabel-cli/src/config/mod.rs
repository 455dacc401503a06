//! Configuration for relabel
//!
//! Read from `<config dir>/relabel/config.toml` when present, then overridden by
//! environment variables (a `.env` file is loaded by `main`):
//!
//! - `RELABEL_CONFIG`: path of the config file
//! - `RELABEL_DELIMITER`: rules file delimiter
//! - `RELABEL_OUTPUT_PREFIX`: prefix of the renamed document's file name
//! - `RELABEL_LOG`: log filter (env_logger syntax)

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::rename::{DocumentSchema, LocateStrategy, ShortRowPolicy};
use crate::rules::RulesFormat;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rules: RulesConfig,
    pub document: DocumentSchema,
    pub engine: EngineConfig,
    pub output: OutputConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub delimiter: char,
    pub has_headers: bool,
    pub short_rows: ShortRowPolicy,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_headers: false,
            short_rows: ShortRowPolicy::Fail,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub strategy: LocateStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Prepended to the input file name when no output path is given
    pub prefix: String,
    /// Re-parse the renamed document before writing it
    pub verify: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix: "renomme_".to_string(),
            verify: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("RELABEL_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("relabel").join("config.toml"))
    }

    /// Load the config file (if any) and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::path() {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                Self::from_toml_str(&content)
                    .with_context(|| format!("Invalid config file: {}", path.display()))?
            }
            _ => Config::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.rules_format()?;
        let schema = &self.document;
        if schema.identifier_tag.is_empty() || schema.label_tag.is_empty() {
            bail!("Document identifier_tag and label_tag must not be empty");
        }
        if schema.identifier_tag == schema.label_tag {
            bail!(
                "Document identifier_tag and label_tag must differ, both are '{}'",
                schema.label_tag
            );
        }
        Ok(())
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(delimiter) = lookup("RELABEL_DELIMITER") {
            let mut chars = delimiter.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => self.rules.delimiter = c,
                _ => bail!("RELABEL_DELIMITER must be a single character, got '{}'", delimiter),
            }
        }
        if let Some(prefix) = lookup("RELABEL_OUTPUT_PREFIX") {
            self.output.prefix = prefix;
        }
        if let Some(level) = lookup("RELABEL_LOG") {
            self.log.level = level;
        }
        self.validate()?;
        Ok(())
    }

    /// Rules file layout with the delimiter checked to be a single byte
    pub fn rules_format(&self) -> Result<RulesFormat> {
        let delimiter = self.rules.delimiter;
        if !delimiter.is_ascii() {
            bail!("Rules delimiter must be an ASCII character, got '{}'", delimiter);
        }
        Ok(RulesFormat {
            delimiter: delimiter as u8,
            has_headers: self.rules.has_headers,
            short_rows: self.rules.short_rows,
        })
    }
}
