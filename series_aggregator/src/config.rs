//! Aggregator configuration: parsing, defaults and overrides.
//!
//! The TOML file is optional; every key has a default:
//!
//! ```toml
//! [source]
//! path = "db/sample_collection.bson"
//!
//! [response]
//! indent = 4
//! ```
//!
//! Layering, lowest to highest precedence:
//! - built-in defaults
//! - the TOML file ([`load_config_path`])
//! - `AGGREGATOR_SOURCE_PATH` from the environment ([`AggregatorConfig::apply_env`])
//! - explicit overrides from the command line

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use shared_utils::env::get_env_var_opt;
use toml::from_str;

/// Environment variable that overrides [`SourceCfg::path`].
pub const SOURCE_PATH_ENV: &str = "AGGREGATOR_SOURCE_PATH";

/// Default location of the BSON dump, relative to the working directory.
pub const DEFAULT_SOURCE_PATH: &str = "db/sample_collection.bson";

/// Upper bound for [`ResponseCfg::indent`]; anything wider is a typo.
pub const MAX_INDENT: usize = 16;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct AggregatorConfig {
    /// Where records are read from.
    pub source: SourceCfg,
    /// How replies are rendered.
    pub response: ResponseCfg,
}

/// Record source location.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct SourceCfg {
    /// Path to a concatenated-BSON dump.
    pub path: PathBuf,
}

impl Default for SourceCfg {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_SOURCE_PATH),
        }
    }
}

/// Reply rendering options.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ResponseCfg {
    /// Spaces per JSON nesting level.
    pub indent: usize,
}

impl Default for ResponseCfg {
    fn default() -> Self {
        Self { indent: 4 }
    }
}

impl AggregatorConfig {
    /// Reject values that parse but make no sense.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.source.path.as_os_str().is_empty() {
            bail!("source.path cannot be empty");
        }
        if self.response.indent > MAX_INDENT {
            bail!(
                "response.indent must be at most {MAX_INDENT}, got {}",
                self.response.indent
            );
        }
        Ok(())
    }

    /// Layer `AGGREGATOR_SOURCE_PATH` over the current source path, if set.
    pub fn apply_env(&mut self) -> anyhow::Result<()> {
        if let Some(path) = get_env_var_opt(SOURCE_PATH_ENV)? {
            tracing::debug!(%path, "source path overridden from environment");
            self.source.path = PathBuf::from(path);
        }
        Ok(())
    }
}

/// Parse and validate a configuration from a TOML string.
pub fn load_config_str(toml_str: &str) -> anyhow::Result<AggregatorConfig> {
    let cfg: AggregatorConfig = from_str(toml_str).context("failed to parse aggregator TOML")?;
    cfg.validate().context("invalid aggregator config")?;
    Ok(cfg)
}

/// Read a TOML file from disk, parse, and validate it.
pub fn load_config_path(path: impl AsRef<Path>) -> anyhow::Result<AggregatorConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}
