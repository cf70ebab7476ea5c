//! Conversation history.
//!
//! A `Conversation` is the append-only, oldest-first list of messages
//! exchanged with a completion service during one run.

use tracing::{debug, error};

use crate::{AiClient, AiError, Message, TokenUsage};

#[derive(Debug, Default)]
pub struct Conversation {
    /// Conversation message history.
    messages: Vec<Message>,
    /// System prompt (sent ahead of the history on every call).
    system_prompt: Option<String>,
    /// Token usage summed over all calls.
    usage: TokenUsage,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Append a user message, submit the whole history, and append and
    /// return the assistant's reply.
    ///
    /// On failure the user message stays in the history and no assistant
    /// message is added.
    pub async fn send(
        &mut self,
        client: &dyn AiClient,
        user_message: impl Into<String>,
    ) -> Result<String, AiError> {
        self.messages.push(Message::user(user_message));

        let messages = self.build_messages();
        let response = client.send_message(&messages).await.map_err(|e| {
            error!("completion request failed: {e}");
            e
        })?;

        self.usage.accumulate(&response.usage);
        debug!(
            total_tokens = self.usage.total_tokens(),
            "conversation usage"
        );

        self.messages.push(Message::assistant(response.content.clone()));
        Ok(response.content)
    }

    fn build_messages(&self) -> Vec<Message> {
        let mut msgs = Vec::with_capacity(self.messages.len() + 1);
        if let Some(ref system) = self.system_prompt {
            msgs.push(Message::system(system.clone()));
        }
        msgs.extend(self.messages.iter().cloned());
        msgs
    }

    /// Get the full conversation history.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn usage(&self) -> &TokenUsage {
        &self.usage
    }
}
