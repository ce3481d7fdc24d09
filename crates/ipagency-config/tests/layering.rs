use figment::Jail;
use ipagency_config::{Settings, TimestampMode};
use std::path::PathBuf;

#[test]
fn defaults_without_file_or_env() {
    Jail::expect_with(|_jail| {
        let settings = Settings::load().expect("settings load");
        assert_eq!(settings, Settings::default());
        Ok(())
    });
}

#[test]
fn toml_file_overrides_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "ipagency.toml",
            r#"
                database_path = "data/agency.db"
                default_actor_id = 42

                [tables.case_types]
                timestamps = "fixed"
            "#,
        )?;

        let settings = Settings::load().expect("settings load");
        assert_eq!(settings.database_path, PathBuf::from("data/agency.db"));
        assert_eq!(settings.default_actor_id, 42);
        assert_eq!(settings.source_dir, PathBuf::from("database/config"));
        assert_eq!(
            settings.table_timestamps("case_types"),
            Some(TimestampMode::Fixed)
        );
        Ok(())
    });
}

#[test]
fn env_beats_toml_file() {
    Jail::expect_with(|jail| {
        jail.create_file("ipagency.toml", r#"source_dir = "from-file""#)?;
        jail.set_env("IPAGENCY_SOURCE_DIR", "from-env");
        jail.set_env("IPAGENCY_TABLES__USERS__TIMESTAMPS", "now");

        let settings = Settings::load().expect("settings load");
        assert_eq!(settings.source_dir, PathBuf::from("from-env"));
        assert_eq!(settings.table_timestamps("users"), Some(TimestampMode::Now));
        Ok(())
    });
}

#[test]
fn invalid_mode_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("IPAGENCY_TABLES__ROLES__TIMESTAMPS", "sometimes");
        assert!(Settings::load().is_err());
        Ok(())
    });
}

#[test]
fn dotenv_file_is_read() {
    Jail::expect_with(|jail| {
        jail.create_file(".env", "IPAGENCY_DEFAULT_ACTOR_ID=7\n")?;
        let settings = Settings::load_with_dotenv().expect("settings load");
        assert_eq!(settings.default_actor_id, 7);
        std::env::remove_var("IPAGENCY_DEFAULT_ACTOR_ID");
        Ok(())
    });
}
