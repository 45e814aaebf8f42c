//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use faro_config::FaroConfig;
use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};

#[test]
fn loads_storage_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[storage]
region = "sa-east-1"
bucket = "toml-bucket"
output_bucket = "toml-gold"
access_key_id = "toml-key"
secret_access_key = "toml-secret"
"#,
        )?;

        let config: FaroConfig = Figment::from(Serialized::defaults(FaroConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.storage.region, "sa-east-1");
        assert_eq!(config.storage.bucket, "toml-bucket");
        assert_eq!(config.storage.output_bucket(), "toml-gold");
        assert!(config.storage.is_configured());
        Ok(())
    });
}

#[test]
fn loads_model_and_pipeline_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[model]
endpoint = "https://gw.example/v1/messages"
api_key = "sk-toml"
main_model = "main-x"
compress_model = "compress-y"
timeout_secs = 30

[pipeline]
max_retries = 2
workers = 4
recent_months = 6
"#,
        )?;

        let config: FaroConfig = Figment::from(Serialized::defaults(FaroConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.model.main_model, "main-x");
        assert_eq!(config.model.compress_model, "compress-y");
        assert_eq!(config.model.timeout_secs, 30);
        assert!(config.model.is_configured());
        assert_eq!(config.pipeline.max_retries, 2);
        assert_eq!(config.pipeline.workers, 4);
        assert_eq!(config.pipeline.recent_months, Some(6));
        Ok(())
    });
}

#[test]
fn toml_sources_replace_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[sources]
piloto = "comercial/piloto/"
"#,
        )?;

        let config: FaroConfig = Figment::from(Serialized::defaults(FaroConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.sources["piloto"], "comercial/piloto/");
        Ok(())
    });
}

#[test]
fn env_var_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.set_env("FARO_STORAGE__BUCKET", "from-env");

        jail.create_file(
            "config.toml",
            r#"
[storage]
bucket = "from-toml"
access_key_id = "toml-key"
"#,
        )?;

        let config: FaroConfig = Figment::from(Serialized::defaults(FaroConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("FARO_").split("__"))
            .extract()?;

        // Env should win over TOML
        assert_eq!(config.storage.bucket, "from-env");
        // TOML value not overridden by env should remain
        assert_eq!(config.storage.access_key_id, "toml-key");
        Ok(())
    });
}

/// Documents the figment gotcha: typo'd env var keys are silently ignored.
#[test]
fn typo_env_var_silently_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("FARO_MODEL__ENDPOINTT", "https://typo.example");

        let config: FaroConfig = Figment::from(Serialized::defaults(FaroConfig::default()))
            .merge(Env::prefixed("FARO_").split("__"))
            .extract()?;

        assert!(
            config.model.endpoint.is_empty(),
            "typo'd env var should be silently ignored by figment"
        );
        Ok(())
    });
}
