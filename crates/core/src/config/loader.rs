use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides
///
/// Nested keys use a double underscore, e.g. `ADMIT_BATCH__ROW_DELAY_MS=0`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("ADMIT_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[paths]
input = "roster.csv"
template_root = "templates"
output_dir = "out"
supplement = "rules.pdf"

[mail]
sender = "tickets@example.org"
port = 587
tls = "starttls"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.mail.port, 587);
    }

    #[test]
    fn test_load_config_from_str_missing_mail() {
        let toml = r#"
[paths]
input = "roster.csv"
template_root = "templates"
output_dir = "out"
supplement = "rules.pdf"
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/admit.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[paths]
input = "roster.csv"
template_root = "templates"
output_dir = "out"
supplement = "rules.pdf"

[mail]
host = "smtp.example.org"
sender = "tickets@example.org"

[batch]
row_delay_ms = 500
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.mail.host, "smtp.example.org");
        assert_eq!(config.batch.row_delay_ms, 500);
    }

    #[test]
    fn test_example_config_is_valid() {
        let config =
            load_config_from_str(include_str!("../../../../admit.example.toml")).unwrap();
        crate::config::validate_config(&config).unwrap();
        assert_eq!(config.codes.speakers.len(), 9);
        assert_eq!(config.render.offset_y, 230);
    }
}
