//! Error types for every failure the studio can surface.
//!
//! Each enum's `Display` text is the message shown to the user, so callers
//! can put `err.to_string()` straight into a status line.

use crate::history::AudioId;

/// Failure to turn a remote payload into samples, or samples into a container.
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("Speech synthesis failed: audio payload is not valid base64 ({0})")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("Audio container error: {0}")]
    Container(#[from] hound::Error),
    #[error(
        "Unsupported audio container: {channels} channel(s), {bits_per_sample}-bit \
         (expected mono 16-bit PCM)"
    )]
    UnsupportedFormat { channels: u16, bits_per_sample: u16 },
}

/// Failure reported for a speech synthesis request.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("The request succeeded but no audio was returned. This may be a temporary service issue.")]
    EmptyResponse,
    #[error("The content was blocked for safety reasons ({reason}). Please edit the text and try again.")]
    ContentRejected { reason: String },
    #[error("Generation failed: the model returned text instead of audio: \"{preview}...\"")]
    WrongModality { preview: String },
    #[error("Speech service error: {0}")]
    Transport(String),
}

/// Failure reported for a script rewrite request.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    #[error("AI processing failed, please retry (no content returned)")]
    EmptyResponse,
    #[error("AI processing failed, please retry ({0})")]
    Transport(String),
}

/// Network or service failure reported by a remote collaborator.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[cfg(feature = "gemini")]
impl From<reqwest::Error> for TransportError {
    fn from(source: reqwest::Error) -> Self {
        Self(source.to_string())
    }
}

/// Top-level error for studio operations.
#[derive(thiserror::Error, Debug)]
pub enum StudioError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    #[error(transparent)]
    Rewrite(#[from] RewriteError),
    #[error("A {0} request is already in progress")]
    Busy(&'static str),
    #[error("No generated audio with id {0}")]
    NotFound(AudioId),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StudioError {
    /// True for failures the user can fix by editing input rather than retrying.
    pub fn is_validation(&self) -> bool {
        matches!(self, StudioError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_rejected_message_suggests_editing() {
        let err = SynthesisError::ContentRejected {
            reason: "SAFETY".to_string(),
        };
        assert!(err.to_string().contains("edit the text"));
    }

    #[test]
    fn studio_error_is_transparent_over_synthesis() {
        let err: StudioError = SynthesisError::Transport("connection reset".to_string()).into();
        assert_eq!(err.to_string(), "Speech service error: connection reset");
        assert!(!err.is_validation());
    }
}
