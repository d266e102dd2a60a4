use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::sources;

const CONFIG_DIR: &str = "tmq";
const CONFIG_FILE: &str = "todo.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub source: SourceConfig,
}

/// The `[source]` table: backend name, optional tag scope and backend params.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub name: String,
    #[serde(default)]
    pub scope: Option<Vec<String>>,
    #[serde(default)]
    pub params: toml::Table,
}

impl Config {
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = match &cli.config {
            Some(path) => PathBuf::from(path),
            None => default_config_path()?,
        };
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        parse_config(&content)
    }
}

/// `$XDG_CONFIG_HOME/tmq/todo.toml`, else `$HOME/.config/tmq/todo.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    config_path_from(
        std::env::var_os("XDG_CONFIG_HOME"),
        std::env::var_os("HOME"),
    )
    .ok_or_else(|| {
        Error::ConfigValidation(
            "cannot locate config: neither $XDG_CONFIG_HOME nor $HOME is set".to_string(),
        )
    })
}

fn config_path_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    let base = match xdg_config_home.filter(|dir| !dir.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(home.filter(|dir| !dir.is_empty())?).join(".config"),
    };
    Some(base.join(CONFIG_DIR).join(CONFIG_FILE))
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let name = config.source.name.as_str();
    if sources::constructor(name).is_none() {
        let expected: Vec<&str> = sources::source_names().collect();
        return Err(Error::ConfigValidation(format!(
            "unknown source: {name} (expected: {})",
            expected.join(", ")
        )));
    }
    if let Some(scope) = &config.source.scope {
        if scope.is_empty() {
            return Err(Error::ConfigValidation(
                "scope must list at least one tag".to_string(),
            ));
        }
        if scope.iter().any(|tag| tag.trim().is_empty()) {
            return Err(Error::ConfigValidation(
                "scope tags must not be blank".to_string(),
            ));
        }
    }
    Ok(())
}
