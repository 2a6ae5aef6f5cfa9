use crate::error::ConfigError;
use crate::settings::Config;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{AggregationSettings, DatasetSettings, LoggingSettings, ServerSettings};

/// File read when no explicit configuration path is given. It may be absent.
pub const DEFAULT_CONFIG_FILE: &str = "salesboard.toml";

/// Prefix of environment variables overriding file values, e.g.
/// `SALESBOARD__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "SALESBOARD";

/// Loads and validates the application configuration.
///
/// Sources, lowest precedence first: built-in defaults, the TOML file, then
/// `SALESBOARD__*` environment variables. An explicit `path` must exist; the default
/// file is optional.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("dataset.date_formats")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::MonthLabel;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config(
            r#"
            [dataset]
            path = "sales/2024.csv"

            [aggregation]
            month_label = "start"
            fill_month_gaps = true
            "#,
        );

        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(config.dataset.path, PathBuf::from("sales/2024.csv"));
        assert_eq!(config.dataset.date_formats.len(), 3);
        assert_eq!(config.aggregation.month_label, MonthLabel::Start);
        assert!(config.aggregation.fill_month_gaps);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = load_config(Some(Path::new("/definitely/not/here/salesboard.toml")));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let file = write_config(
            r#"
            [server]
            host = "localhost"
            "#,
        );
        assert!(matches!(load_config(Some(file.path())), Err(ConfigError::ValidationError(_))));

        let file = write_config(
            r#"
            [dataset]
            date_formats = []
            "#,
        );
        assert!(matches!(load_config(Some(file.path())), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn unknown_month_label_is_rejected() {
        let file = write_config(
            r#"
            [aggregation]
            month_label = "middle"
            "#,
        );
        assert!(matches!(load_config(Some(file.path())), Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.aggregation.month_label, MonthLabel::End);
        assert!(!config.aggregation.fill_month_gaps);
        assert_eq!(config.server.socket_addr().unwrap().port(), 3000);
    }
}
