//! Settings file loading and configuration precedence.

use clap::Parser;
use emlpush::IngestConfig;
use emlpush::engine::Cli;
use emlpush::engine::cli::resolve_settings;
use emlpush::utils::config::{ApiConsts, DEFAULT_CONCURRENCY};
use emlpush::utils::{
    RemoteEnv, apply_file_to_config, effective_concurrency, load_settings_toml, read_settings_toml,
};
use std::time::Duration;
use tempfile::TempDir;

const SETTINGS: &str = r#"
[settings]
tenant = "file-tenant"
source = "archive"
labels = ["legal", "hold"]
concurrency = 2
server_url = "http://file.example.com"
exclude = ["drafts"]
strict = true
"#;

fn write_settings(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(".emlpush.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

// --- settings file ---

#[test]
fn test_load_settings_toml() {
    let dir = TempDir::new().unwrap();
    let file = load_settings_toml(&write_settings(&dir, SETTINGS)).unwrap();
    let sec = &file.settings;
    assert_eq!(sec.tenant.as_deref(), Some("file-tenant"));
    assert_eq!(sec.concurrency, Some(2));
    assert_eq!(sec.follow_links, None);
    assert_eq!(sec.server_url.as_deref(), Some("http://file.example.com"));
}

#[test]
fn test_load_settings_missing_or_invalid() {
    let dir = TempDir::new().unwrap();
    assert!(load_settings_toml(&dir.path().join("absent.toml")).is_none());
    assert!(load_settings_toml(&write_settings(&dir, "[settings\nbroken")).is_none());
}

#[test]
fn test_read_settings_reports_parse_error() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        read_settings_toml(&dir.path().join("absent.toml")),
        Ok(None)
    ));
    assert!(read_settings_toml(&write_settings(&dir, "[settings\nbroken")).is_err());
    let file = read_settings_toml(&write_settings(&dir, SETTINGS)).unwrap();
    assert!(file.is_some());
}

#[test]
fn test_apply_file_only_overrides_present_keys() {
    let dir = TempDir::new().unwrap();
    let file = load_settings_toml(&write_settings(&dir, "[settings]\nsource = \"pst\"\n")).unwrap();
    let mut config = IngestConfig::default();
    apply_file_to_config(&file, &mut config);
    assert_eq!(config.source, "pst");
    assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
    assert!(config.tenant_id.is_empty());
}

// --- precedence ---

#[test]
fn test_defaults_without_file_or_env() {
    let cli = Cli::parse_from(["emlpush", "mail"]);
    let settings = resolve_settings(&cli, None, &RemoteEnv::default());
    assert_eq!(settings.config.concurrency, DEFAULT_CONCURRENCY);
    assert_eq!(settings.config.source, "email");
    assert_eq!(settings.server_url, ApiConsts::DEFAULT_SERVER_URL);
    assert_eq!(
        settings.timeout,
        Duration::from_secs(ApiConsts::DEFAULT_TIMEOUT_SECS)
    );
    assert!(!settings.config.dry_run);
}

#[test]
fn test_env_overrides_file() {
    let dir = TempDir::new().unwrap();
    let file = load_settings_toml(&write_settings(&dir, SETTINGS)).unwrap();
    let env = RemoteEnv {
        server_url: Some("http://env.example.com".to_string()),
        api_token: Some("secret".to_string()),
        tenant: Some("env-tenant".to_string()),
        timeout_secs: Some(30),
    };
    let cli = Cli::parse_from(["emlpush", "mail"]);
    let settings = resolve_settings(&cli, Some(&file), &env);

    assert_eq!(settings.config.tenant_id, "env-tenant");
    assert_eq!(settings.server_url, "http://env.example.com");
    assert_eq!(settings.api_token.as_deref(), Some("secret"));
    assert_eq!(settings.timeout, Duration::from_secs(30));
    // Keys env does not cover still come from the file.
    assert_eq!(settings.config.source, "archive");
    assert_eq!(settings.config.labels, vec!["legal", "hold"]);
    assert_eq!(settings.config.concurrency, 2);
    assert!(settings.config.strict);
}

#[test]
fn test_cli_overrides_env_and_file() {
    let dir = TempDir::new().unwrap();
    let file = load_settings_toml(&write_settings(&dir, SETTINGS)).unwrap();
    let env = RemoteEnv {
        tenant: Some("env-tenant".to_string()),
        server_url: Some("http://env.example.com".to_string()),
        ..Default::default()
    };
    let cli = Cli::parse_from([
        "emlpush",
        "mail",
        "--tenant",
        "cli-tenant",
        "--label",
        "a",
        "--label",
        "b",
        "-j",
        "8",
        "--strict",
        "false",
        "--server-url",
        "http://cli.example.com",
        "--resume",
        "job-9",
        "--name",
        "box",
        "--dry-run",
    ]);
    let settings = resolve_settings(&cli, Some(&file), &env);

    assert_eq!(settings.config.tenant_id, "cli-tenant");
    assert_eq!(settings.config.labels, vec!["a", "b"]);
    assert_eq!(settings.config.concurrency, 8);
    assert!(!settings.config.strict);
    assert_eq!(settings.server_url, "http://cli.example.com");
    assert_eq!(settings.config.resume_job_id.as_deref(), Some("job-9"));
    assert_eq!(settings.config.job_name.as_deref(), Some("box"));
    assert!(settings.config.dry_run);
    assert_eq!(settings.config.exclude, vec!["drafts"]);
}

#[test]
fn test_json_disables_progress_bar() {
    let cli = Cli::parse_from(["emlpush", "mail", "--json"]);
    let settings = resolve_settings(&cli, None, &RemoteEnv::default());
    assert!(!settings.config.show_progress);
}

#[test]
fn test_settings_path_default_and_override() {
    let cli = Cli::parse_from(["emlpush", "mail"]);
    assert_eq!(cli.settings_path(), std::path::PathBuf::from(".emlpush.toml"));
    let cli = Cli::parse_from(["emlpush", "mail", "--config", "/etc/emlpush.toml"]);
    assert_eq!(
        cli.settings_path(),
        std::path::PathBuf::from("/etc/emlpush.toml")
    );
}

// --- worker count ---

#[test]
fn test_effective_concurrency_bounds() {
    assert_eq!(effective_concurrency(0, 10), 1);
    assert_eq!(effective_concurrency(4, 2), 2);
    assert_eq!(effective_concurrency(1, 100), 1);
    assert!(effective_concurrency(1000, 1000) <= 64);
}
