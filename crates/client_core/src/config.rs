use std::{fs, path::Path, str::FromStr, time::Duration};

use serde::Deserialize;
use shared::error::ParseError;
use tracing::warn;

pub const SETTINGS_FILE: &str = "playground.toml";

/// What to do when an operation is invoked while an identical one is still
/// in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Every invocation runs and emits its own events.
    #[default]
    Allow,
    /// Identical in-flight invocations share one request and its terminal
    /// event; the later ones emit nothing.
    Coalesce,
}

impl FromStr for DuplicatePolicy {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(DuplicatePolicy::Allow),
            "coalesce" => Ok(DuplicatePolicy::Coalesce),
            _ => Err(ParseError::new("DuplicatePolicy", value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub gist_api_url: String,
    pub request_timeout_secs: Option<u64>,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            gist_api_url: "https://api.github.com".into(),
            request_timeout_secs: None,
            duplicate_policy: DuplicatePolicy::Allow,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    server_url: Option<String>,
    gist_api_url: Option<String>,
    request_timeout_secs: Option<u64>,
    duplicate_policy: Option<DuplicatePolicy>,
}

pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file if it exists and parses, then
/// environment overrides.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<SettingsFile>(&raw) {
            Ok(file_cfg) => apply_file(&mut settings, file_cfg),
            Err(err) => warn!(path = %path.display(), error = %err, "ignoring unreadable settings file"),
        }
    }

    apply_env(&mut settings, env);
    settings
}

fn apply_file(settings: &mut ClientSettings, file_cfg: SettingsFile) {
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.gist_api_url {
        settings.gist_api_url = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = Some(v);
    }
    if let Some(v) = file_cfg.duplicate_policy {
        settings.duplicate_policy = v;
    }
}

fn apply_env(settings: &mut ClientSettings, env: impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("PLAYGROUND_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = env("PLAYGROUND_GIST_API_URL") {
        settings.gist_api_url = v;
    }
    if let Some(v) = env("APP__GIST_API_URL") {
        settings.gist_api_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = Some(parsed);
        }
    }

    if let Some(v) = env("APP__DUPLICATE_POLICY") {
        if let Ok(parsed) = v.parse::<DuplicatePolicy>() {
            settings.duplicate_policy = parsed;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
