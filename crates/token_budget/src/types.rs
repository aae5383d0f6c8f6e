//! Core types for token counting and budget clamping.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encoding::EncodingFamily;

/// Message author role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Get the wire-format string for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single chat message, as assembled for a model call.
///
/// Immutable input to the budgeting functions; nothing in this crate stores
/// it. `content` may be absent (some transports omit the field), in which
/// case every counting path reads it as the empty string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(content.into()),
        }
    }

    /// Message text, with missing content read as empty.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// Why `clamp_max_tokens` adjusted the requested value.
///
/// The string form of each variant is the tag the calling application logs
/// and matches on, so both `as_str` and the serde representation keep the
/// exact spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClampReason {
    /// The requested value was non-finite or not a positive integer.
    #[serde(rename = "maxTokens_clamped_invalid_desired")]
    InvalidDesired,
    /// The model's remaining context window reduced (or zeroed) the request.
    #[serde(rename = "maxTokens_clamped_model_limit")]
    ModelLimit,
}

impl ClampReason {
    /// Get the stable tag for this reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClampReason::InvalidDesired => "maxTokens_clamped_invalid_desired",
            ClampReason::ModelLimit => "maxTokens_clamped_model_limit",
        }
    }
}

impl std::fmt::Display for ClampReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of clamping a requested output-token count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClampResult {
    /// Safe `max_tokens` for the request. Always at least 1.
    pub max_tokens: u32,
    /// Clamp rules that fired, in evaluation order.
    pub reasons: Vec<ClampReason>,
}

impl ClampResult {
    /// Whether any clamp rule changed the requested value.
    pub fn was_clamped(&self) -> bool {
        !self.reasons.is_empty()
    }
}

/// Errors raised while preparing an exact tokenizer.
///
/// Counting functions recover from this internally by downgrading to the
/// character heuristic; it only reaches callers that load an encoder
/// themselves.
#[derive(Debug, Error)]
pub enum TokenizerError {
    /// The rank tables for a tiktoken encoding failed to load.
    #[error("failed to load {family} encoder: {message}")]
    Load {
        family: EncodingFamily,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn message_text_reads_missing_content_as_empty() {
        let message = ChatMessage {
            role: Role::Assistant,
            content: None,
        };
        assert_eq!(message.text(), "");
        assert_eq!(ChatMessage::user("hi").text(), "hi");
    }

    #[test]
    fn message_deserializes_without_content_field() {
        let message: ChatMessage = serde_json::from_str(r#"{"role":"user"}"#).unwrap();
        assert_eq!(message.role, Role::User);
        assert_eq!(message.content, None);
    }

    #[test]
    fn clamp_reason_tags_keep_exact_spelling() {
        assert_eq!(
            ClampReason::InvalidDesired.as_str(),
            "maxTokens_clamped_invalid_desired"
        );
        assert_eq!(
            ClampReason::ModelLimit.as_str(),
            "maxTokens_clamped_model_limit"
        );
        assert_eq!(
            serde_json::to_string(&ClampReason::ModelLimit).unwrap(),
            "\"maxTokens_clamped_model_limit\""
        );
        assert_eq!(
            ClampReason::InvalidDesired.to_string(),
            "maxTokens_clamped_invalid_desired"
        );
    }

    #[test]
    fn clamp_reason_roundtrips_through_serde() {
        let parsed: ClampReason =
            serde_json::from_str("\"maxTokens_clamped_invalid_desired\"").unwrap();
        assert_eq!(parsed, ClampReason::InvalidDesired);
    }

    #[test]
    fn was_clamped_tracks_reasons() {
        let untouched = ClampResult {
            max_tokens: 512,
            reasons: vec![],
        };
        assert!(!untouched.was_clamped());

        let clamped = ClampResult {
            max_tokens: 1,
            reasons: vec![ClampReason::ModelLimit],
        };
        assert!(clamped.was_clamped());
    }
}
