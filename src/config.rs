//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.crud-resolver.toml` in current directory
//! 4. `~/.config/crud-resolver/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [sql]
//! dialect = "mysql"            # generic, mysql, postgresql, sqlite
//!
//! [resolver]
//! data_access_suffixes = ["Mapper", "Repository", "Dao"]
//! max_depth = 0                # 0 = unlimited
//!
//! [matcher]
//! disabled = ["containment"]
//!
//! [engine]
//! parallel = true
//! include_packages = ["com.example.api"]
//! exclude_packages = ["com.example.api.internal"]
//!
//! [log]
//! level = "info"
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `CRUD_RESOLVER_DIALECT` | SQL dialect name |
//! | `CRUD_RESOLVER_PARALLEL` | `true`/`false`, per-endpoint parallelism |
//! | `CRUD_RESOLVER_LOG` | `tracing` filter directive, read by the binary |

use std::{
    env, fs,
    path::{Path, PathBuf}
};

use serde::Deserialize;

use crate::{
    classify::SqlDialect,
    error::{AppResult, config_error},
    graph::{DEFAULT_DATA_ACCESS_SUFFIXES, DataAccessConvention}
};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sql:      SqlConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub matcher:  MatcherConfig,
    #[serde(default)]
    pub engine:   EngineConfig,
    #[serde(default)]
    pub log:      LogConfig
}

/// SQL parsing configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SqlConfig {
    #[serde(default)]
    pub dialect: SqlDialect
}

/// Reachability configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    /// Class-name suffixes marking the data-access layer
    #[serde(default = "default_suffixes")]
    pub data_access_suffixes: Vec<String>,
    /// Maximum call depth from the entry point, 0 for unlimited
    #[serde(default)]
    pub max_depth:            usize
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            data_access_suffixes: default_suffixes(),
            max_depth:            0
        }
    }
}

impl ResolverConfig {
    pub fn convention(&self) -> DataAccessConvention {
        DataAccessConvention::with_suffixes(&self.data_access_suffixes)
    }
}

fn default_suffixes() -> Vec<String> {
    DEFAULT_DATA_ACCESS_SUFFIXES
        .iter()
        .map(|s| String::from(*s))
        .collect()
}

/// Matcher configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MatcherConfig {
    /// Disabled tier names
    #[serde(default)]
    pub disabled: Vec<String>
}

/// Engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_parallel")]
    pub parallel:         bool,
    /// Package prefixes an endpoint must match; empty admits all
    #[serde(default)]
    pub include_packages: Vec<String>,
    /// Package prefixes excluded even when included
    #[serde(default)]
    pub exclude_packages: Vec<String>
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel:         default_parallel(),
            include_packages: Vec::new(),
            exclude_packages: Vec::new()
        }
    }
}

fn default_parallel() -> bool {
    true
}

impl EngineConfig {
    /// True when an endpoint in `package` passes the include/exclude filter.
    pub fn admits_package(&self, package: &str) -> bool {
        let included = self.include_packages.is_empty()
            || self
                .include_packages
                .iter()
                .any(|p| package.starts_with(p.as_str()));
        included
            && !self
                .exclude_packages
                .iter()
                .any(|p| package.starts_with(p.as_str()))
    }
}

/// Diagnostic output configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogConfig {
    /// `tracing` level name (error, warn, info, debug, trace)
    #[serde(default)]
    pub level: Option<String>
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.crud-resolver.toml)
    /// 3. Config file in home directory (~/.config/crud-resolver/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("crud-resolver")
                .join("config.toml");

            if home_config.exists() {
                config = Self::from_file(&home_config)?;
            }
        }

        let local_config = PathBuf::from(".crud-resolver.toml");
        if local_config.exists() {
            config = Self::from_file(&local_config)?;
        }

        config.apply_env()?;
        Ok(config)
    }

    /// Load an explicit configuration file without environment overrides.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    /// Override settings from `CRUD_RESOLVER_*` environment variables.
    pub fn apply_env(&mut self) -> AppResult<()> {
        if let Ok(dialect) = env::var("CRUD_RESOLVER_DIALECT") {
            self.sql.dialect = SqlDialect::parse(&dialect)
                .ok_or_else(|| config_error(format!("Unknown SQL dialect: {}", dialect)))?;
        }

        if let Ok(parallel) = env::var("CRUD_RESOLVER_PARALLEL") {
            self.engine.parallel = parse_bool(&parallel).ok_or_else(|| {
                config_error(format!("Invalid CRUD_RESOLVER_PARALLEL value: {}", parallel))
            })?;
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None
    }
}
