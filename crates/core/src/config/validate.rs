use crate::codec::CategoryCodes;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Sender address is set and SMTP port is not 0
/// - JPEG quality is within 1..=100 and at least one font is listed
/// - Code tables have no empty codes and no sentinel collisions
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.mail.sender.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "mail.sender cannot be empty".to_string(),
        ));
    }

    if config.mail.port == 0 {
        return Err(ConfigError::ValidationError(
            "mail.port cannot be 0".to_string(),
        ));
    }

    if !(1..=100).contains(&config.render.jpeg_quality) {
        return Err(ConfigError::ValidationError(format!(
            "render.jpeg_quality must be within 1..=100, got {}",
            config.render.jpeg_quality
        )));
    }

    if config.render.fonts.is_empty() {
        return Err(ConfigError::ValidationError(
            "render.fonts must list at least one font file".to_string(),
        ));
    }

    CategoryCodes::from_config(&config.codes)
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

    Ok(())
}
