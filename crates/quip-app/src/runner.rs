//! The chat session: credential → client + probe → input → one exchange.
//!
//! `SessionRunner` walks the stages exactly once. Input and output are
//! injected so the whole session runs against in-memory buffers and a stub
//! client in tests.

use std::fmt::Display;
use std::io::{BufRead, ErrorKind, Write};

use quip_ai::{AiClient, AiError, Conversation, Message};
use quip_common::ConfigError;
use quip_config::{Credential, API_KEY_VAR};
use tracing::{debug, error};

/// Single-message request sent right after the client is built.
pub const PROBE_PROMPT: &str = "Test connection - respond with 'OK'";

pub const INPUT_PROMPT: &str = "Enter a message: ";

const SEPARATOR_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitingCredential,
    AwaitingClient,
    AwaitingInput,
    AwaitingCompletion,
    Done,
    Fatal,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("error initializing chat model: {0}")]
    Init(#[source] AiError),

    #[error("error during execution: {0}")]
    Exchange(#[source] AiError),

    #[error("failed to read input: {0}")]
    Input(#[source] std::io::Error),

    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl SessionError {
    /// Lines printed to the user before exiting.
    pub fn diagnostic(&self) -> Vec<String> {
        match self {
            SessionError::Config(e) => e.remediation(),
            SessionError::Init(e) => vec![
                format!("❌ Error initializing chat model: {e}"),
                "Please verify your API key is correct.".to_string(),
            ],
            SessionError::Exchange(e) => vec![
                format!("Error during execution: {e}"),
                "Please check your API key and try again.".to_string(),
            ],
            SessionError::Input(e) => vec![format!("Error reading input: {e}")],
            SessionError::Output(e) => vec![format!("Error writing output: {e}")],
        }
    }
}

pub struct SessionRunner<R, W> {
    input: R,
    out: W,
    stage: Stage,
}

impl<R: BufRead, W: Write> SessionRunner<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self {
            input,
            out,
            stage: Stage::AwaitingCredential,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Run the whole session once.
    ///
    /// `lookup` resolves the credential variable; `connect` builds the client
    /// and is only called once a credential was found. Returns the
    /// conversation holding the user message and the reply.
    pub async fn run<C, L, F>(
        &mut self,
        lookup: L,
        connect: F,
        conversation: Conversation,
    ) -> Result<Conversation, SessionError>
    where
        C: AiClient,
        L: FnOnce(&str) -> Option<String>,
        F: FnOnce(&Credential) -> Result<C, AiError>,
    {
        let result = self.run_stages(lookup, connect, conversation).await;
        let next = if result.is_ok() {
            Stage::Done
        } else {
            Stage::Fatal
        };
        self.advance(next);
        result
    }

    async fn run_stages<C, L, F>(
        &mut self,
        lookup: L,
        connect: F,
        mut conversation: Conversation,
    ) -> Result<Conversation, SessionError>
    where
        C: AiClient,
        L: FnOnce(&str) -> Option<String>,
        F: FnOnce(&Credential) -> Result<C, AiError>,
    {
        let credential = self.load_credential(lookup)?;

        self.advance(Stage::AwaitingClient);
        let client = self.build_client(&credential, connect).await?;

        self.advance(Stage::AwaitingInput);
        let user_text = self.read_input()?;

        self.advance(Stage::AwaitingCompletion);
        self.run_turn(&client, &mut conversation, user_text).await?;

        Ok(conversation)
    }

    fn load_credential(
        &mut self,
        lookup: impl FnOnce(&str) -> Option<String>,
    ) -> Result<Credential, SessionError> {
        let credential = Credential::from_lookup(API_KEY_VAR, lookup)?;
        self.line(format_args!("API key loaded: {}", credential.masked()))?;
        Ok(credential)
    }

    async fn build_client<C: AiClient>(
        &mut self,
        credential: &Credential,
        connect: impl FnOnce(&Credential) -> Result<C, AiError>,
    ) -> Result<C, SessionError> {
        let client = connect(credential).map_err(SessionError::Init)?;
        let probe = client
            .send_message(&[Message::user(PROBE_PROMPT)])
            .await
            .map_err(|e| {
                error!("connection probe failed: {e}");
                SessionError::Init(e)
            })?;
        self.line(format_args!(
            "✅ Connection test successful: {}",
            probe.content
        ))?;
        Ok(client)
    }

    /// Prompt and read one line. The line terminator is stripped; anything
    /// else, including an empty line, is returned unchanged.
    fn read_input(&mut self) -> Result<String, SessionError> {
        write!(self.out, "{INPUT_PROMPT}").map_err(SessionError::Output)?;
        self.out.flush().map_err(SessionError::Output)?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(SessionError::Input)?;
        if read == 0 {
            return Err(SessionError::Input(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                "standard input closed",
            )));
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }

    async fn run_turn(
        &mut self,
        client: &dyn AiClient,
        conversation: &mut Conversation,
        user_text: String,
    ) -> Result<(), SessionError> {
        let reply = conversation
            .send(client, user_text)
            .await
            .map_err(SessionError::Exchange)?;
        self.print_reply(&reply)
    }

    fn print_reply(&mut self, reply: &str) -> Result<(), SessionError> {
        let separator = "=".repeat(SEPARATOR_WIDTH);
        self.line("")?;
        self.line(&separator)?;
        self.line("Response:")?;
        self.line(&separator)?;
        self.line(reply)
    }

    fn line(&mut self, text: impl Display) -> Result<(), SessionError> {
        writeln!(self.out, "{text}").map_err(SessionError::Output)
    }

    fn advance(&mut self, next: Stage) {
        debug!(from = ?self.stage, to = ?next, "session stage");
        self.stage = next;
    }
}
