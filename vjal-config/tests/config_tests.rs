use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use vjal_config::{AppConfig, ConfigError, Environment, StateLocation};

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn load_valid_config() {
    let file = write_config(
        r#"{
            "env": "production",
            "licensePath": "/tmp/license.json",
            "outputDir": "build",
            "assetDir": "secure",
            "logFilter": "debug"
        }"#,
    );
    let config = AppConfig::load_with_env(file.path(), no_env).unwrap();
    assert_eq!(config.env, Environment::Production);
    assert_eq!(config.license_path, PathBuf::from("/tmp/license.json"));
    assert_eq!(config.output_dir, PathBuf::from("build"));
    assert_eq!(config.asset_path("llm_prompts.enc"), PathBuf::from("secure/llm_prompts.enc"));
    assert_eq!(config.log_filter, "debug");
}

#[test]
fn defaults_applied() {
    let file = write_config(r#"{"licensePath": "license.json"}"#);
    let config = AppConfig::load_with_env(file.path(), no_env).unwrap();
    assert_eq!(config.env, Environment::Development);
    assert_eq!(config.output_dir, PathBuf::from("out"));
    assert_eq!(config.log_filter, "info");
    assert_eq!(
        config.state_location(),
        StateLocation::File(PathBuf::from("out").join("state.db"))
    );
}

#[test]
fn unknown_fields_ignored() {
    let file = write_config(
        r#"{"licensePath": "l.json", "httpPort": 9090, "llmProvider": "openai"}"#,
    );
    assert!(AppConfig::load_with_env(file.path(), no_env).is_ok());
}

#[test]
fn missing_license_path_rejected() {
    let file = write_config(r#"{"env": "production"}"#);
    let err = AppConfig::load_with_env(file.path(), no_env).unwrap_err();
    assert!(matches!(err, ConfigError::Missing("licensePath")));
}

#[test]
fn invalid_json_rejected() {
    let file = write_config("{ not json");
    let err = AppConfig::load_with_env(file.path(), no_env).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AppConfig::load_with_env(dir.path().join("nope.json"), no_env).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn env_overrides_win() {
    let file = write_config(r#"{"licensePath": "file.json"}"#);
    let env: HashMap<&str, &str> = HashMap::from([
        ("VJAL_ENV", "prod"),
        ("VJAL_LICENSE_PATH", "/etc/vjal/license.json"),
        ("VJAL_STATE_DB", ":memory:"),
        ("VJAL_LOG", "vjal_storage=trace"),
        ("VJAL_OUTPUT_DIR", ""),
    ]);
    let config =
        AppConfig::load_with_env(file.path(), |k| env.get(k).map(|v| v.to_string())).unwrap();
    assert_eq!(config.env, Environment::Production);
    assert_eq!(config.license_path, PathBuf::from("/etc/vjal/license.json"));
    assert_eq!(config.state_location(), StateLocation::Memory);
    assert_eq!(config.log_filter, "vjal_storage=trace");
    // Empty overrides are ignored.
    assert_eq!(config.output_dir, PathBuf::from("out"));
}

#[test]
fn env_override_supplies_required_field() {
    let file = write_config("{}");
    let config = AppConfig::load_with_env(file.path(), |k| {
        (k == "VJAL_LICENSE_PATH").then(|| "license.json".to_string())
    })
    .unwrap();
    assert_eq!(config.license_path, PathBuf::from("license.json"));
}

#[test]
fn invalid_env_override_rejected() {
    let file = write_config(r#"{"licensePath": "l.json"}"#);
    let err = AppConfig::load_with_env(file.path(), |k| {
        (k == "VJAL_ENV").then(|| "staging".to_string())
    })
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidOverride { var: "VJAL_ENV", .. }));
}

#[test]
fn file_accepts_short_env_names() {
    for (name, expected) in [
        ("dev", Environment::Development),
        ("prod", Environment::Production),
    ] {
        let file = write_config(&format!(r#"{{"env": "{name}", "licensePath": "l.json"}}"#));
        let config = AppConfig::load_with_env(file.path(), no_env).unwrap();
        assert_eq!(config.env, expected);
        assert_eq!(name.parse::<Environment>(), Ok(expected));
    }
}

#[test]
fn explicit_state_db_path() {
    let mut config = AppConfig::from_json(br#"{"licensePath": "l.json"}"#).unwrap();
    config.state_db = Some("/var/lib/vjal/state.sqlite".into());
    assert_eq!(
        config.state_location(),
        StateLocation::File(PathBuf::from("/var/lib/vjal/state.sqlite"))
    );
}

#[test]
fn init_logging_is_idempotent() {
    let config = AppConfig::from_json(br#"{"licensePath": "l.json"}"#).unwrap();
    let first = vjal_config::init_logging(&config);
    let second = vjal_config::init_logging(&config);
    assert!(first);
    assert!(!second);
}
