use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

pub const DEV_SECRET_KEY: &str = "dev-secret-key";
pub const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_bind: String,
    pub database_url: String,
    pub secret_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            database_url: "sqlite://./data/todo.db".into(),
            secret_key: DEV_SECRET_KEY.into(),
        }
    }
}

impl Settings {
    pub fn uses_dev_secret(&self) -> bool {
        self.secret_key == DEV_SECRET_KEY
    }
}

/// Defaults, then `server.toml`, then `APP__*` variables, then the plain
/// `SERVER_BIND` / `DATABASE_URL` / `SECRET_KEY` variables.
pub fn load_settings() -> anyhow::Result<Settings> {
    let mut settings = settings_from_sources(Path::new(SETTINGS_FILE))?;
    apply_plain_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

pub(crate) fn settings_from_sources(file: &Path) -> anyhow::Result<Settings> {
    ::config::Config::builder()
        .add_source(::config::File::from(file).required(false))
        .add_source(::config::Environment::with_prefix("APP").separator("__"))
        .build()
        .with_context(|| format!("failed to read settings from '{}'", file.display()))?
        .try_deserialize::<Settings>()
        .context("invalid settings")
}

pub(crate) fn apply_plain_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = lookup("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = lookup("SECRET_KEY") {
        settings.secret_key = v;
    }
}

pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        return format!("sqlite://{}", path.replace('\\', "/"));
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
