mod cli;
mod runner;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use quip_ai::{ClaudeClient, ClaudeConfig, Conversation};
use quip_config::{dotenv, toml_loader, Credential, LogLevel, ModelConfig};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use runner::{SessionError, SessionRunner};

/// Initialize logging to stderr.
///
/// `RUST_LOG` is honored; the CLI directive (or `quip=<level>` from the
/// settings file) is added on top.
fn init_logging(cli_directive: Option<&str>, level: LogLevel) {
    let default_directive = format!("quip={}", level.as_str());
    let directive: Result<Directive, _> = cli_directive
        .unwrap_or(&default_directive)
        .parse()
        .or_else(|_| default_directive.parse());

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = directive {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// `.env` files to try, in order. An explicit file replaces the defaults.
fn env_candidates(env_file: Option<&Path>) -> Vec<PathBuf> {
    if let Some(path) = env_file {
        return vec![path.to_path_buf()];
    }

    let mut candidates = vec![PathBuf::from(".env")];
    if let Ok(path) = toml_loader::default_env_path() {
        candidates.push(path);
    }
    candidates
}

/// Load `KEY=value` pairs from a `.env` file without overriding the
/// process environment. Returns the file that was loaded.
fn load_env(env_file: Option<&Path>) -> Option<PathBuf> {
    let loaded = dotenv::load_first(&env_candidates(env_file));
    if loaded.is_none() {
        match env_file {
            Some(path) => tracing::warn!("could not read env file {}", path.display()),
            None => tracing::debug!("no .env file found"),
        }
    }
    loaded
}

fn claude_config(model: &ModelConfig, credential: &Credential) -> ClaudeConfig {
    ClaudeConfig::new(credential.expose())
        .with_model(&model.name)
        .with_max_tokens(model.max_tokens)
        .with_temperature(model.temperature)
        .with_base_url(&model.base_url)
        .with_timeouts(
            Duration::from_secs(model.connect_timeout_secs),
            Duration::from_secs(model.request_timeout_secs),
        )
}

/// Process exit status for a finished session: 0 on success, 1 on any
/// fatal condition.
fn exit_status(result: &Result<Conversation, SessionError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

fn report(err: &SessionError) {
    for line in err.diagnostic() {
        eprintln!("{line}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = cli::parse();

    let config = quip_config::load_config(args.config.as_deref());
    let level = config
        .as_ref()
        .map(|c| c.logging.level)
        .unwrap_or_default();
    init_logging(args.log_level.as_deref(), level);

    tracing::debug!("quip v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("config load failed: {e}");
            let err = SessionError::Config(e);
            report(&err);
            return ExitCode::from(exit_status(&Err(err)));
        }
    };

    load_env(args.env_file.as_deref());

    let conversation = match config.model.system_prompt.as_deref() {
        Some(prompt) if !prompt.trim().is_empty() => {
            Conversation::new().with_system_prompt(prompt)
        }
        _ => Conversation::new(),
    };

    let mut session = SessionRunner::new(std::io::stdin().lock(), std::io::stdout().lock());
    let result = session
        .run(
            |key| std::env::var(key).ok(),
            |credential| ClaudeClient::new(claude_config(&config.model, credential)),
            conversation,
        )
        .await;

    match &result {
        Ok(conversation) => {
            tracing::debug!(
                input_tokens = conversation.usage().input_tokens,
                output_tokens = conversation.usage().output_tokens,
                "session complete"
            );
        }
        Err(e) => {
            tracing::debug!(stage = ?session.stage(), "session failed: {e}");
            report(e);
        }
    }
    ExitCode::from(exit_status(&result))
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use quip_ai::AiError;
    use quip_common::ConfigError;
    use quip_config::API_KEY_VAR;

    use super::*;

    #[test]
    fn claude_config_copies_model_settings() {
        let model = ModelConfig {
            name: "claude-3-5-haiku-20241022".into(),
            max_tokens: 321,
            temperature: Some(0.25),
            system_prompt: Some("unused here".into()),
            base_url: "http://localhost:8080".into(),
            connect_timeout_secs: 3,
            request_timeout_secs: 45,
        };
        let credential =
            Credential::from_lookup(API_KEY_VAR, |_: &str| Some("sk-ant-xyz".into())).unwrap();

        let config = claude_config(&model, &credential);

        assert_eq!(config.api_key, "sk-ant-xyz");
        assert_eq!(config.model, "claude-3-5-haiku-20241022");
        assert_eq!(config.max_tokens, 321);
        assert_eq!(config.temperature, Some(0.25));
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.request_timeout, Duration::from_secs(45));
    }

    #[test]
    fn claude_config_from_defaults() {
        let credential =
            Credential::from_lookup(API_KEY_VAR, |_: &str| Some("sk-ant-xyz".into())).unwrap();

        let config = claude_config(&ModelConfig::default(), &credential);

        assert_eq!(config.model, "claude-3-5-sonnet-20241022");
        assert_eq!(config.max_tokens, 1000);
        assert!(config.temperature.is_none());
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Duration::from_secs(120));
    }

    #[test]
    fn explicit_env_file_replaces_default_candidates() {
        let explicit = Path::new("/tmp/quip-explicit.env");
        assert_eq!(env_candidates(Some(explicit)), vec![explicit.to_path_buf()]);

        let defaults = env_candidates(None);
        assert_eq!(defaults[0], PathBuf::from(".env"));
        assert!(!defaults.contains(&explicit.to_path_buf()));
    }

    #[test]
    fn load_env_reads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.env");
        std::fs::write(&path, "QUIP_MAIN_TEST_KEY=from-explicit-file\n").unwrap();

        assert_eq!(load_env(Some(path.as_path())), Some(path.clone()));
        assert_eq!(
            std::env::var("QUIP_MAIN_TEST_KEY").unwrap(),
            "from-explicit-file"
        );
    }

    #[test]
    fn unreadable_explicit_env_file_does_not_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.env");
        assert_eq!(load_env(Some(missing.as_path())), None);
    }

    #[test]
    fn exit_status_is_zero_only_on_success() {
        assert_eq!(exit_status(&Ok(Conversation::new())), 0);

        let failures = [
            SessionError::Config(ConfigError::MissingCredential {
                key: API_KEY_VAR.into(),
            }),
            SessionError::Init(AiError::Authentication("invalid x-api-key".into())),
            SessionError::Exchange(AiError::Timeout),
            SessionError::Input(std::io::Error::new(ErrorKind::UnexpectedEof, "closed")),
            SessionError::Output(std::io::Error::new(ErrorKind::BrokenPipe, "closed")),
        ];
        for err in failures {
            assert_eq!(exit_status(&Err(err)), 1);
        }
    }
}
