//! Run configuration
//!
//! Pure parsing and validation of the TOML configuration document. Reading
//! the file and applying command line overrides happens in the shell crate.
//!
//! ```toml
//! debug = true
//!
//! [server]
//! url = "https://forum.example.org"
//! token = "..."
//!
//! [reparation]
//! image_uploads = true
//! multiple_br = true
//! quote = false
//!
//! [selection]
//! topic_include = [12, 34]
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::repair::{RuleName, RuleSet};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unknown reparation rule '{0}'. Valid rules: {1}")]
    UnknownRule(String, String),

    #[error("server.url must be an http(s) URL, got '{0}'")]
    InvalidUrl(String),

    #[error("No API token configured. Set server.token or FORUMFIX_TOKEN")]
    MissingToken,
}

/// Configuration document as written on disk
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    debug: bool,
    server: RawServer,
    #[serde(default)]
    reparation: BTreeMap<String, bool>,
    #[serde(default)]
    selection: Selection,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    url: String,
    #[serde(default)]
    token: Option<String>,
    #[serde(default = "default_check_auth")]
    check_auth: bool,
}

fn default_check_auth() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Base URL without trailing slash
    pub url: String,
    pub token: Option<String>,
    /// Probe an authenticated endpoint before doing any work
    pub check_auth: bool,
}

/// Explicit subset of the forum to process instead of a full traversal
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub topic_include: Vec<u64>,
    #[serde(default)]
    pub post_include: Vec<u64>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.topic_include.is_empty() && self.post_include.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server: ServerConfig,
    pub rules: RuleSet,
    /// Print repaired posts instead of writing them back
    pub dry_run: bool,
    pub selection: Selection,
}

impl Config {
    /// Apply command line and environment overrides.
    ///
    /// `dry_run` can only turn dry-run mode on, never off.
    pub fn with_overrides(mut self, token: Option<String>, dry_run: bool) -> Self {
        if let Some(token) = token {
            self.server.token = Some(token);
        }
        self.dry_run |= dry_run;
        self
    }

    /// The API token, which is required for every run
    pub fn token(&self) -> Result<&str, ConfigError> {
        self.server
            .token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingToken)
    }
}

/// Parse and validate a TOML configuration document.
pub fn parse_config(source: &str) -> Result<Config, ConfigError> {
    let raw: RawConfig = toml::from_str(source)?;

    let url = raw.server.url.trim().trim_end_matches('/').to_string();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidUrl(raw.server.url));
    }

    Ok(Config {
        server: ServerConfig {
            url,
            token: raw.server.token,
            check_auth: raw.server.check_auth,
        },
        rules: parse_rules(&raw.reparation)?,
        dry_run: raw.debug,
        selection: raw.selection,
    })
}

/// Build the enabled rule set from the `[reparation]` table.
///
/// Every key must name a known rule, whatever its value.
pub fn parse_rules(table: &BTreeMap<String, bool>) -> Result<RuleSet, ConfigError> {
    let mut rules = RuleSet::none();

    for (name, enabled) in table {
        let rule: RuleName = name.parse().map_err(|_| {
            let valid = RuleName::ALL
                .iter()
                .map(|rule| rule.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            ConfigError::UnknownRule(name.clone(), valid)
        })?;

        if *enabled {
            rules.enable(rule);
        }
    }

    Ok(rules)
}
