//! Startup configuration for the `hero` binary.
//!
//! Values come from the environment; a `.env` file is honoured for local runs.

use std::path::{Path, PathBuf};

use tracing::Level;

const DEFAULT_DB_URL: &str = "sqlite://hero.sqlite3";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
    #[error("invalid database url: {raw}")]
    InvalidDbUrl { raw: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub db_url: String,
    pub log_level: Level,
    /// Seed for reproducible plan generation.
    pub seed: Option<u64>,
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// The `.env` file is skipped under `cfg(test)`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let db_url = lookup("HERO_DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.to_string());
        let db_url = normalize_sqlite_url(&db_url)?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());
        let log_level = log_level_str.trim().parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{log_level_str}' is not a valid log level"),
            )
        })?;

        let seed = lookup("HERO_SEED")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| ConfigError::InvalidValue("HERO_SEED".to_string(), e.to_string()))
            })
            .transpose()?;

        Ok(Self {
            db_url,
            log_level,
            seed,
        })
    }
}

/// Turns a bare path or `sqlite:` url into an absolute `sqlite://` url.
///
/// # Errors
///
/// Returns `ConfigError::InvalidDbUrl` for a blank value.
pub fn normalize_sqlite_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "sqlite:" || trimmed == "sqlite://" {
        return Err(ConfigError::InvalidDbUrl {
            raw: raw.to_string(),
        });
    }
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite:///") {
        return Ok(trimmed.to_string());
    }

    let path_str = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    Ok(format!("sqlite://{}", absolute.display()))
}

/// Creates the database file and its parent directories if missing.
///
/// # Errors
///
/// Returns `ConfigError::InvalidDbUrl` for urls without a path, or an IO
/// error if the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), crate::error::AppError> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let invalid = || ConfigError::InvalidDbUrl {
        raw: db_url.to_string(),
    };
    let path = db_url.strip_prefix("sqlite://").ok_or_else(invalid)?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(invalid().into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}
