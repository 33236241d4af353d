//! Server Configuration Module
//!
//! ## Resolution Order (highest wins)
//!
//! 1. CLI flags
//! 2. Environment variables (`MODEL_PATH`, `PORT`, `BLADE_*`)
//! 3. TOML file: `--config`, else `$BLADE_CONFIG`, else `./blade_predictor.toml`
//! 4. Built-in defaults (`config::defaults`)
//!
//! ## Environment Variables
//!
//! | Variable                   | Field                |
//! |----------------------------|----------------------|
//! | `MODEL_PATH`               | `model_path`         |
//! | `PORT`                     | `port`               |
//! | `BLADE_HOST`               | `host`               |
//! | `BLADE_DEBUG`              | `debug`              |
//! | `BLADE_LOG_JSON`           | `log_json`           |
//! | `BLADE_MAX_BODY_BYTES`     | `max_body_bytes`     |
//! | `BLADE_PREDICT_TIMEOUT_MS` | `predict_timeout_ms` |
//! | `BLADE_CORS_ORIGINS`       | `cors_origins`       |

pub mod defaults;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use defaults::{
    DEFAULT_HOST, DEFAULT_MAX_BODY_BYTES, DEFAULT_MODEL_PATH, DEFAULT_PORT,
    DEFAULT_PREDICT_TIMEOUT_MS, LOCAL_CONFIG_FILE,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {1}", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({}): {1}", .0.display())]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Model artifact location
    pub model_path: PathBuf,
    /// Verbose logging
    pub debug: bool,
    /// Emit logs as JSON lines
    pub log_json: bool,
    pub max_body_bytes: usize,
    pub predict_timeout_ms: u64,
    /// Allowed cross-origin callers; empty means same-origin only
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            debug: false,
            log_json: false,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            predict_timeout_ms: DEFAULT_PREDICT_TIMEOUT_MS,
            cors_origins: Vec::new(),
        }
    }
}

/// Values supplied on the command line; `None` leaves lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub model_path: Option<PathBuf>,
    pub debug: bool,
    pub log_json: bool,
}

/// Where the file layer came from, for the startup log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
}

/// A resolved config plus anything worth logging once tracing is up.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ServerConfig,
    pub source: ConfigSource,
    pub warnings: Vec<String>,
}

impl ServerConfig {
    /// Resolve the full layer stack against the process environment.
    pub fn load(overrides: &ConfigOverrides) -> Result<LoadedConfig, ConfigError> {
        Self::load_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve with an injectable environment lookup.
    pub fn load_with<F>(overrides: &ConfigOverrides, env: F) -> Result<LoadedConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();

        let (mut config, source) = match Self::locate_file(overrides, &env, &mut warnings)? {
            Some(path) => (Self::load_from_file(&path)?, ConfigSource::File(path)),
            None => (Self::default(), ConfigSource::Defaults),
        };

        warnings.extend(config.apply_env(&env));
        config.apply_overrides(overrides);
        config.validate()?;

        Ok(LoadedConfig {
            config,
            source,
            warnings,
        })
    }

    /// Parse a TOML file. Unset keys keep their defaults.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    fn locate_file<F>(
        overrides: &ConfigOverrides,
        env: &F,
        warnings: &mut Vec<String>,
    ) -> Result<Option<PathBuf>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // An explicit --config must exist.
        if let Some(path) = &overrides.config_file {
            if !path.exists() {
                return Err(ConfigError::Io(
                    path.clone(),
                    std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
                ));
            }
            return Ok(Some(path.clone()));
        }

        if let Some(path) = env("BLADE_CONFIG").filter(|p| !p.trim().is_empty()) {
            let p = PathBuf::from(&path);
            if p.exists() {
                return Ok(Some(p));
            }
            warnings.push(format!(
                "BLADE_CONFIG points to non-existent file {path}, falling back"
            ));
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        Ok(local.exists().then_some(local))
    }

    /// Apply environment variables. Unparseable values are skipped and
    /// reported as warnings.
    pub fn apply_env<F>(&mut self, env: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();

        if let Some(v) = env("MODEL_PATH").filter(|v| !v.trim().is_empty()) {
            self.model_path = PathBuf::from(v);
        }
        if let Some(v) = env("BLADE_HOST").filter(|v| !v.trim().is_empty()) {
            self.host = v;
        }
        if let Some(v) = env("PORT") {
            match v.trim().parse() {
                Ok(port) => self.port = port,
                Err(_) => warnings.push(format!("Ignoring invalid PORT value '{v}'")),
            }
        }
        if let Some(v) = env("BLADE_DEBUG") {
            self.debug = parse_flag(&v);
        }
        if let Some(v) = env("BLADE_LOG_JSON") {
            self.log_json = parse_flag(&v);
        }
        if let Some(v) = env("BLADE_MAX_BODY_BYTES") {
            match v.trim().parse() {
                Ok(n) => self.max_body_bytes = n,
                Err(_) => warnings.push(format!("Ignoring invalid BLADE_MAX_BODY_BYTES value '{v}'")),
            }
        }
        if let Some(v) = env("BLADE_PREDICT_TIMEOUT_MS") {
            match v.trim().parse() {
                Ok(n) => self.predict_timeout_ms = n,
                Err(_) => warnings.push(format!(
                    "Ignoring invalid BLADE_PREDICT_TIMEOUT_MS value '{v}'"
                )),
            }
        }
        if let Some(v) = env("BLADE_CORS_ORIGINS") {
            self.cors_origins = v
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(ToString::to_string)
                .collect();
        }

        warnings
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(host) = &overrides.host {
            self.host.clone_from(host);
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(path) = &overrides.model_path {
            self.model_path.clone_from(path);
        }
        if overrides.debug {
            self.debug = true;
        }
        if overrides.log_json {
            self.log_json = true;
        }
    }

    /// Collect every problem rather than stopping at the first.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        if self.host.trim().is_empty() {
            errors.push("host must not be empty".to_string());
        }
        if self.port == 0 {
            errors.push("port must be non-zero".to_string());
        }
        if self.model_path.as_os_str().is_empty() {
            errors.push("model_path must not be empty".to_string());
        }
        if self.max_body_bytes == 0 {
            errors.push("max_body_bytes must be greater than zero".to_string());
        }
        if self.predict_timeout_ms == 0 {
            errors.push("predict_timeout_ms must be greater than zero".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub const fn predict_timeout(&self) -> Duration {
        Duration::from_millis(self.predict_timeout_ms)
    }
}

/// `1`, `true`, `yes`, `on` (any case) enable a flag; anything else disables.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
