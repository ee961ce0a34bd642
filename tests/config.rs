use figment::Jail;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

use taskers::config::Config;
use taskers::error::ConfigError;

#[test]
fn defaults_point_at_local_api() {
    let config = Config::default();
    assert_eq!(config.api.base_url, "http://127.0.0.1:8000/api");
    assert!(config.storage_path().ends_with("local_storage.json"));
    assert!(config.log_file().ends_with("taskers.log"));
}

#[test]
fn project_file_then_env_override() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "taskers.toml",
            r#"
            [api]
            base_url = "http://todo.example/api"

            [storage]
            path = "/tmp/boards.json"
            "#,
        )?;
        let config = Config::from_figment(Config::figment()).map_err(|e| e.to_string())?;
        assert_eq!(config.api.base_url, "http://todo.example/api");
        assert_eq!(config.storage_path(), PathBuf::from("/tmp/boards.json"));

        jail.set_env("TASKERS_API__BASE_URL", "https://override.example/v2");
        jail.set_env("TASKERS_LOG", "debug");
        let config = Config::from_figment(Config::figment()).map_err(|e| e.to_string())?;
        assert_eq!(config.api.base_url, "https://override.example/v2");
        Ok(())
    });
}

#[test]
fn bad_base_url_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("TASKERS_API__BASE_URL", "not a url");
        match Config::from_figment(Config::figment()) {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "api.base_url"),
            other => panic!("unexpected result: {other:?}"),
        }
        Ok(())
    });
}
