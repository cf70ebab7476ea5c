//! Completion-service credential loading and masking.

use std::fmt;

use quip_common::ConfigError;

/// Environment variable holding the Anthropic API key.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

const MASK_PREFIX: usize = 15;
const MASK_SUFFIX: usize = 5;

/// An API key, trimmed and known to be non-empty.
///
/// `Debug` never shows the key; use [`Credential::masked`] for display.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Read the credential named `key` through `lookup`.
    ///
    /// Absent values and values that are empty after trimming are both
    /// reported as `ConfigError::MissingCredential`.
    pub fn from_lookup(
        key: &str,
        lookup: impl FnOnce(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let missing = || ConfigError::MissingCredential {
            key: key.to_string(),
        };
        let raw = lookup(key).ok_or_else(missing)?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(missing());
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The raw key, for building request headers.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// A display form with only a bounded prefix and suffix visible.
    ///
    /// Keys longer than 20 characters show the first 15 and last 5. Shorter
    /// keys show `len/2` leading and `len/4` trailing characters
    /// (`sk-ok-12345` becomes `sk-ok...45`), so some part of the key is
    /// always hidden.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        let len = chars.len();
        let (prefix, suffix) = if len > MASK_PREFIX + MASK_SUFFIX {
            (MASK_PREFIX, MASK_SUFFIX)
        } else {
            (len / 2, len / 4)
        };
        let head: String = chars[..prefix].iter().collect();
        let tail: String = chars[len - suffix..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&"[REDACTED]").finish()
    }
}
