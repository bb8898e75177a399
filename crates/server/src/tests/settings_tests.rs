use super::*;

use std::{collections::HashMap, fs};

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
}

#[test]
fn keeps_memory_and_full_urls() {
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(
        normalize_database_url("sqlite://./data/todo.db"),
        "sqlite://./data/todo.db"
    );
}

#[test]
fn normalizes_single_colon_sqlite_url() {
    assert_eq!(
        normalize_database_url("sqlite:data\\todo.db"),
        "sqlite://data/todo.db"
    );
}

#[test]
fn blank_url_falls_back_to_default() {
    assert_eq!(
        normalize_database_url("   "),
        Settings::default().database_url
    );
}

#[test]
fn reads_settings_file_over_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("server.toml");
    fs::write(
        &path,
        "server_bind = \"0.0.0.0:8080\"\ndatabase_url = \"sqlite://./todo.db\"\n",
    )
    .expect("write settings");

    let settings = settings_from_sources(&path).expect("settings");
    assert_eq!(settings.server_bind, "0.0.0.0:8080");
    assert_eq!(settings.database_url, "sqlite://./todo.db");
    assert!(settings.uses_dev_secret());
}

#[test]
fn missing_settings_file_uses_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = settings_from_sources(&dir.path().join("absent.toml")).expect("settings");
    assert_eq!(settings.server_bind, Settings::default().server_bind);
}

#[test]
fn plain_env_overrides_win() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("DATABASE_URL", "sqlite://./other.db"),
        ("SECRET_KEY", "s3cret"),
    ]);
    let mut settings = Settings::default();
    apply_plain_env(&mut settings, |key| env.get(key).map(|v| v.to_string()));

    assert_eq!(settings.database_url, "sqlite://./other.db");
    assert_eq!(settings.secret_key, "s3cret");
    assert_eq!(settings.server_bind, Settings::default().server_bind);
    assert!(!settings.uses_dev_secret());
}
