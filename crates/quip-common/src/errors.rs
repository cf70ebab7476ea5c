use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} not found in environment variables")]
    MissingCredential { key: String },

    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

impl ConfigError {
    /// Human-facing lines explaining how to fix the problem.
    pub fn remediation(&self) -> Vec<String> {
        match self {
            ConfigError::MissingCredential { key } => vec![
                format!("Error: {key} not found in environment variables."),
                "Please create a .env file with your Anthropic API key:".to_string(),
                format!("{key}=your_actual_api_key_here"),
            ],
            other => vec![format!("Error: {other}")],
        }
    }
}
