//! Settings validation.
//!
//! Every check pushes onto a shared error list so a single
//! `ConfigError::ValidationError` reports all problems at once.

use crate::schema::QuipConfig;
use quip_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &QuipConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    let model = &config.model;

    if model.name.trim().is_empty() {
        errors.push("model.name must not be empty".to_string());
    }
    validate_range(&mut errors, "model.max_tokens", model.max_tokens, 1, 8192);
    if let Some(temperature) = model.temperature {
        validate_range_f64(&mut errors, "model.temperature", temperature, 0.0, 1.0);
    }
    if model.connect_timeout_secs == 0 {
        errors.push("model.connect_timeout_secs must be greater than 0".to_string());
    }
    if model.request_timeout_secs == 0 {
        errors.push("model.request_timeout_secs must be greater than 0".to_string());
    }
    if !(model.base_url.starts_with("https://") || model.base_url.starts_with("http://")) {
        errors.push(format!(
            "model.base_url = {:?} must start with http:// or https://",
            model.base_url
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

fn validate_range_f64(errors: &mut Vec<String>, name: &str, value: f64, min: f64, max: f64) {
    if !(min..=max).contains(&value) {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate(&QuipConfig::default()).is_ok());
    }

    #[test]
    fn catches_empty_model_name() {
        let mut config = QuipConfig::default();
        config.model.name = "  ".into();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("model.name"));
    }

    #[test]
    fn catches_max_tokens_out_of_range() {
        let mut config = QuipConfig::default();
        config.model.max_tokens = 0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("model.max_tokens = 0"));

        config.model.max_tokens = 100_000;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("model.max_tokens"));
    }

    #[test]
    fn catches_temperature_out_of_range() {
        let mut config = QuipConfig::default();
        config.model.temperature = Some(1.5);
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("model.temperature"));
    }

    #[test]
    fn catches_non_http_base_url() {
        let mut config = QuipConfig::default();
        config.model.base_url = "ftp://api.anthropic.com".into();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("model.base_url"));
    }

    #[test]
    fn collects_multiple_errors() {
        let mut config = QuipConfig::default();
        config.model.name = String::new();
        config.model.request_timeout_secs = 0;
        config.model.connect_timeout_secs = 0;
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        let msg = err.to_string();
        assert!(msg.contains("model.name"));
        assert!(msg.contains("request_timeout_secs"));
        assert!(msg.contains("connect_timeout_secs"));
    }
}
