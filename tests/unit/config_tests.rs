//! Configuration loading through the public API
use figment::Jail;
use userservice_lib::config::{ConfigError, Settings};

#[test]
fn test_env_overrides_nested_keys() {
    Jail::expect_with(|jail| {
        jail.set_env(
            "USERSERVICE_JWT__SECRET",
            "environment-secret-long-enough-0123456789",
        );
        jail.set_env("USERSERVICE_PASSWORD_HASH__LOG_N", "10");
        jail.set_env("USERSERVICE_SEED_ROLES", "false");

        let settings = Settings::load().map_err(|e| e.to_string())?;
        assert_eq!(settings.jwt.secret, "environment-secret-long-enough-0123456789");
        assert_eq!(settings.password_hash.log_n, 10);
        assert!(!settings.seed_roles);
        Ok(())
    });
}

#[test]
fn test_explicit_path() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "service.toml",
            r#"
                data_dir = "/var/lib/userservice"
                log_json = true

                [cors]
                allowed_origins = ["https://app.example.com"]
                max_age_secs = 600
            "#,
        )?;

        let settings = Settings::load_from("service.toml").map_err(|e| e.to_string())?;
        assert_eq!(settings.data_dir.to_str(), Some("/var/lib/userservice"));
        assert!(settings.log_json);
        assert_eq!(settings.cors.allowed_origins, vec!["https://app.example.com".to_string()]);
        assert_eq!(settings.cors.max_age_secs, 600);
        Ok(())
    });
}

#[test]
fn test_malformed_values_fail_to_load() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", r#"bind_addr = "not an address""#)?;
        assert!(matches!(Settings::load(), Err(ConfigError::Load(_))));
        Ok(())
    });
}
