use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::warn;
use url::Url;

use crate::{
    error::ContactsError,
    reducer::{ShortFieldPolicy, SubmitPolicy, UpdateFailurePolicy},
};

pub const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_SETTINGS_FILE: &str = "contacts.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub short_field_policy: ShortFieldPolicy,
    pub update_failure_policy: UpdateFailurePolicy,
    pub log_filter: String,
    /// Values that were ignored while loading. Settings load before the
    /// tracing subscriber exists, so callers replay these with
    /// [`Settings::log_diagnostics`] once logging is up.
    pub diagnostics: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            short_field_policy: ShortFieldPolicy::default(),
            update_failure_policy: UpdateFailurePolicy::default(),
            log_filter: "info".into(),
            diagnostics: Vec::new(),
        }
    }
}

impl Settings {
    pub fn submit_policy(&self) -> SubmitPolicy {
        SubmitPolicy {
            short_fields: self.short_field_policy,
            update_failure: self.update_failure_policy,
        }
    }

    pub fn log_diagnostics(&self) {
        for message in &self.diagnostics {
            warn!("{message}");
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base_url: Option<String>,
    short_field_policy: Option<ShortFieldPolicy>,
    update_failure_policy: Option<UpdateFailurePolicy>,
    log_filter: Option<String>,
}

/// Defaults, then `contacts.toml` (or `$CONTACTS_CONFIG`), then environment.
pub fn load_settings() -> anyhow::Result<Settings> {
    let path = std::env::var("CONTACTS_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_FILE));
    load_settings_from(&path, |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
        let file_cfg: FileSettings = toml::from_str(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
        apply_file_settings(&mut settings, file_cfg);
    }

    apply_env_overrides(&mut settings, env);

    settings.api_base_url = normalize_api_base_url(&settings.api_base_url)
        .context("api_base_url is not usable")?;
    Ok(settings)
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file_cfg.short_field_policy {
        settings.short_field_policy = v;
    }
    if let Some(v) = file_cfg.update_failure_policy {
        settings.update_failure_policy = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
}

fn apply_env_overrides(settings: &mut Settings, env: impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("CONTACTS_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("APP__SHORT_FIELD_POLICY") {
        match parse_policy::<ShortFieldPolicy>(&v) {
            Some(policy) => settings.short_field_policy = policy,
            None => settings
                .diagnostics
                .push(format!("ignoring unknown APP__SHORT_FIELD_POLICY value '{v}'")),
        }
    }
    if let Some(v) = env("APP__UPDATE_FAILURE_POLICY") {
        match parse_policy::<UpdateFailurePolicy>(&v) {
            Some(policy) => settings.update_failure_policy = policy,
            None => settings
                .diagnostics
                .push(format!("ignoring unknown APP__UPDATE_FAILURE_POLICY value '{v}'")),
        }
    }

    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}

fn parse_policy<T: DeserializeOwned>(raw: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_ascii_lowercase())).ok()
}

pub fn normalize_api_base_url(raw: &str) -> Result<String, ContactsError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(DEFAULT_API_BASE_URL.to_string());
    }

    let parsed = Url::parse(trimmed).map_err(|source| ContactsError::InvalidBaseUrl {
        url: trimmed.to_string(),
        source,
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(ContactsError::UnsupportedScheme {
            scheme: other.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
