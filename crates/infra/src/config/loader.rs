//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Environment variables, when an API key is present there
//! 2. Otherwise the first config file found by [`probe_config_paths`]
//! 3. The result is validated before it is returned
//!
//! ## Environment Variables
//! - `YOTEI_OPENAI_API_KEY` (or `OPENAI_API_KEY`): required
//! - `YOTEI_OPENAI_API_URL`: chat completions endpoint
//! - `YOTEI_PRIMARY_MODEL`, `YOTEI_FALLBACK_MODEL`, `YOTEI_CLASSIFIER_MODEL`
//! - `YOTEI_LLM_TIMEOUT_SECS`: per-call timeout, applied to HTTP and pipeline
//! - `YOTEI_TIMEZONE`: IANA zone name, default `Asia/Tokyo`
//! - `YOTEI_TRAVEL_ENABLED`: whether travel buffers are inserted
//! - `YOTEI_TRAVEL_BUFFER_MINUTES`: default buffer length
//!
//! ## File Locations
//! `yotei.{json,toml}` then `config.{json,toml}` in the working directory,
//! its parent, and next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono_tz::Tz;
use yotei_domain::{Result, YoteiConfig, YoteiError};

const FILE_NAMES: &[&str] = &["yotei.json", "yotei.toml", "config.json", "config.toml"];

/// Load configuration from the environment, falling back to a file.
///
/// # Errors
/// Returns `YoteiError::Config` if neither source yields a valid
/// configuration.
pub fn load() -> Result<YoteiConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "environment incomplete, trying config file");
            load_from_file(None)
        }
    }
}

/// Load configuration from `YOTEI_*` environment variables.
///
/// Only the API key is required; everything else falls back to defaults.
///
/// # Errors
/// Returns `YoteiError::Config` if the API key is missing or a value does not
/// parse.
pub fn load_from_env() -> Result<YoteiConfig> {
    let mut config = YoteiConfig::default();
    config.llm.api_key = env_var("YOTEI_OPENAI_API_KEY").or_else(|_| env_var("OPENAI_API_KEY"))?;
    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file.
///
/// `None` probes the standard locations. Format follows the file extension.
///
/// # Errors
/// Returns `YoteiError::Config` if the file is missing, unreadable, malformed
/// or fails validation.
pub fn load_from_file(path: Option<PathBuf>) -> Result<YoteiConfig> {
    let config_path = match path {
        Some(p) if p.exists() => p,
        Some(p) => {
            return Err(YoteiError::Config(format!("config file not found: {}", p.display())))
        }
        None => probe_config_paths().ok_or_else(|| {
            YoteiError::Config("no config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| YoteiError::Config(format!("failed to read config file: {e}")))?;

    let mut config = parse_config(&contents, &config_path)?;
    if config.llm.api_key.trim().is_empty() {
        if let Ok(key) = env_var("YOTEI_OPENAI_API_KEY").or_else(|_| env_var("OPENAI_API_KEY")) {
            config.llm.api_key = key;
        }
    }
    validate(&config)?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<YoteiConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| YoteiError::Config(format!("invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| YoteiError::Config(format!("invalid JSON format: {e}"))),
        other => Err(YoteiError::Config(format!("unsupported config format: {other}"))),
    }
}

/// First existing config file among the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn apply_env_overrides(config: &mut YoteiConfig) -> Result<()> {
    if let Ok(url) = env_var("YOTEI_OPENAI_API_URL") {
        config.llm.api_url = url;
    }
    if let Ok(model) = env_var("YOTEI_PRIMARY_MODEL") {
        config.llm.primary_model = model;
    }
    if let Ok(model) = env_var("YOTEI_FALLBACK_MODEL") {
        config.llm.fallback_model = model;
    }
    if let Ok(model) = env_var("YOTEI_CLASSIFIER_MODEL") {
        config.llm.classifier_model = model;
    }
    if let Some(secs) = env_parse::<u64>("YOTEI_LLM_TIMEOUT_SECS")? {
        config.llm.request_timeout_secs = secs;
        config.pipeline.call_timeout_secs = secs;
    }
    if let Ok(timezone) = env_var("YOTEI_TIMEZONE") {
        config.pipeline.timezone = timezone;
    }
    if let Some(minutes) = env_parse::<u32>("YOTEI_TRAVEL_BUFFER_MINUTES")? {
        config.travel.default_buffer_minutes = minutes;
    }
    config.travel.enabled = env_bool("YOTEI_TRAVEL_ENABLED", config.travel.enabled);
    Ok(())
}

/// Structural checks plus a timezone lookup.
fn validate(config: &YoteiConfig) -> Result<()> {
    config.validate()?;
    Tz::from_str(&config.pipeline.timezone).map_err(|_| {
        YoteiError::Config(format!("unknown timezone: {}", config.pipeline.timezone))
    })?;
    Ok(())
}

fn env_var(key: &str) -> Result<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(YoteiError::Config(format!("missing required environment variable: {key}"))),
    }
}

fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env_var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| YoteiError::Config(format!("invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive).
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
