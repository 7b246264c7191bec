#![forbid(unsafe_code)]

use anyhow::{Context, Result, anyhow};
use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::youtube::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT};

pub const DEFAULT_ENV_PATH: &str = ".env";
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(1);
/// The Data API refuses `maxResults` above 50.
pub const MAX_PAGE_SIZE: u32 = 50;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct CuratorSettings {
    pub api_key: String,
    pub api_base_url: String,
    pub request_delay: Duration,
    pub page_size: u32,
    pub request_timeout: Duration,
    pub log_level: String,
    pub debug: bool,
    /// Log records go here instead of stderr when set.
    pub log_file: Option<PathBuf>,
}

impl CuratorSettings {
    /// Human-readable summary with the API key masked.
    pub fn summary(&self) -> String {
        format!(
            "API key: {}\nAPI base URL: {}\nPage size: {}\nDelay between pages: {:.1}s\nRequest timeout: {}s\nLog level: {}{}{}",
            mask_secret(&self.api_key),
            self.api_base_url,
            self.page_size,
            self.request_delay.as_secs_f64(),
            self.request_timeout.as_secs(),
            self.log_level,
            if self.debug { " (debug)" } else { "" },
            match &self.log_file {
                Some(path) => format!("\nLog file: {}", path.display()),
                None => String::new(),
            },
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub request_delay: Option<Duration>,
    pub page_size: Option<u32>,
    pub debug: bool,
    pub log_file: Option<PathBuf>,
    pub env_path: Option<PathBuf>,
}

/// Precedence per key: explicit override, process environment, then the
/// `.env` file.
pub fn resolve_settings(overrides: SettingsOverrides) -> Result<CuratorSettings> {
    let env_path = overrides
        .env_path
        .as_deref()
        .unwrap_or_else(|| Path::new(DEFAULT_ENV_PATH));
    let file_vars = read_env_file(env_path)?;
    build_settings_with_overrides(&file_vars, env_var_string, overrides)
}

#[cfg(test)]
fn build_settings(
    file_vars: &HashMap<String, String>,
    env_lookup: impl Fn(&str) -> Option<String>,
) -> Result<CuratorSettings> {
    build_settings_with_overrides(file_vars, env_lookup, SettingsOverrides::default())
}

fn build_settings_with_overrides(
    file_vars: &HashMap<String, String>,
    env_lookup: impl Fn(&str) -> Option<String>,
    overrides: SettingsOverrides,
) -> Result<CuratorSettings> {
    let api_key = non_blank(overrides.api_key)
        .or_else(|| lookup_value("YOUTUBE_API_KEY", file_vars, &env_lookup))
        .ok_or_else(|| {
            anyhow!("YOUTUBE_API_KEY not set; add it to the environment or {DEFAULT_ENV_PATH}")
        })?;
    let api_base_url = non_blank(overrides.api_base_url)
        .or_else(|| lookup_value("YOUTUBE_API_BASE_URL", file_vars, &env_lookup))
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
        .trim_end_matches('/')
        .to_string();
    let request_delay = overrides
        .request_delay
        .or_else(|| {
            lookup_value("API_REQUEST_DELAY", file_vars, &env_lookup)
                .and_then(|value| parse_seconds(&value))
        })
        .unwrap_or(DEFAULT_REQUEST_DELAY);
    let page_size = overrides
        .page_size
        .or_else(|| {
            lookup_value("MAX_RESULTS_PER_REQUEST", file_vars, &env_lookup)
                .and_then(|value| value.parse::<u32>().ok())
        })
        .unwrap_or(MAX_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let request_timeout = lookup_value("REQUEST_TIMEOUT_SECS", file_vars, &env_lookup)
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT);
    let log_level = lookup_value("LOG_LEVEL", file_vars, &env_lookup)
        .map(|value| value.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let debug = overrides.debug
        || lookup_value("DEBUG", file_vars, &env_lookup)
            .is_some_and(|value| value.eq_ignore_ascii_case("true") || value == "1");
    let log_file = overrides
        .log_file
        .or_else(|| lookup_value("LOG_FILE", file_vars, &env_lookup).map(PathBuf::from));

    Ok(CuratorSettings {
        api_key,
        api_base_url,
        request_delay,
        page_size,
        request_timeout,
        log_level,
        debug,
        log_file,
    })
}

fn parse_seconds(value: &str) -> Option<Duration> {
    value
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn env_var_string(key: &str) -> Option<String> {
    non_blank(env::var(key).ok())
}

fn lookup_value(
    key: &str,
    file_vars: &HashMap<String, String>,
    env_lookup: &impl Fn(&str) -> Option<String>,
) -> Option<String> {
    env_lookup(key).or_else(|| non_blank(file_vars.get(key).cloned()))
}

fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}

/// Parses `KEY=value` lines, tolerating comments, `export ` prefixes and
/// quoted values. A missing file yields no variables.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let mut vars = HashMap::new();
    if !path.exists() {
        return Ok(vars);
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let line = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        let Some((key, value_raw)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        vars.insert(key.to_string(), unquote(value_raw.trim()).to_string());
    }
    Ok(vars)
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|value| value.strip_suffix('"'))
        .or_else(|| {
            value
                .strip_prefix('\'')
                .and_then(|value| value.strip_suffix('\''))
        })
        .unwrap_or(value)
}
