//! # voxgen
//!
//! A Rust library for turning remote text-to-speech output into playable
//! voiceover assets.
//!
//! ## Features
//!
//! - **PCM codec**: base64 raw 16-bit PCM in, canonical mono WAV out
//! - **Asset lifecycle**: single-owner blob handles released exactly once
//! - **Orchestration**: script rewrite presets and speech synthesis against
//!   pluggable remote models, with user-facing error mapping
//! - **Session state**: most-recent-first history, per-item playback, export
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! voxgen-rs = { version = "2026.10", features = ["gemini"] }
//! ```
//!
//! ```ignore
//! use voxgen::{config::StudioConfig, engines::gemini::GeminiClient, studio::Studio};
//!
//! let config = StudioConfig::from_env();
//! let client = GeminiClient::new(&config)?;
//! let mut studio = Studio::new(config, client.clone(), client);
//!
//! studio.set_script("Hello, world!");
//! let id = studio.generate().await?;
//! studio.export(id, std::path::Path::new("."))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod asset;
pub mod codec;
pub mod config;
pub mod engines;
pub mod error;
pub mod history;
pub mod orchestrator;
pub mod playback;
pub mod rewrite;
pub mod script;
pub mod studio;
pub mod voices;

use async_trait::async_trait;

pub use error::{DecodeError, RewriteError, StudioError, SynthesisError, TransportError};
pub use history::{AudioId, GeneratedAudio};
pub use rewrite::{RewriteAction, RewriteRequest};
pub use voices::VoiceName;

/// What the speech model sent back for one request.
///
/// A well-behaved model fills only `audio_payload`. The other fields carry
/// what a misbehaving one returned instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeechReply {
    /// Base64 of headerless little-endian 16-bit mono PCM.
    pub audio_payload: Option<String>,
    /// Present when the model refused, e.g. a safety block.
    pub refusal_reason: Option<String>,
    /// Conversational text returned in place of audio.
    pub text: Option<String>,
}

impl SpeechReply {
    pub fn audio(payload: impl Into<String>) -> Self {
        Self {
            audio_payload: Some(payload.into()),
            ..Self::default()
        }
    }

    pub fn refused(reason: impl Into<String>) -> Self {
        Self {
            refusal_reason: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

/// What the text model sent back for a rewrite request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReply {
    pub text: Option<String>,
    pub refusal_reason: Option<String>,
}

impl RewriteReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            refusal_reason: None,
        }
    }

    pub fn refused(reason: impl Into<String>) -> Self {
        Self {
            text: None,
            refusal_reason: Some(reason.into()),
        }
    }
}

/// Remote speech synthesis model.
///
/// Implementations only shape the request and classify the response; turning
/// the payload into audio is the caller's job.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with the prebuilt `voice`.
    async fn synthesize(&self, text: &str, voice: VoiceName)
        -> Result<SpeechReply, TransportError>;
}

/// Remote text model used to rewrite scripts.
#[async_trait]
pub trait ScriptRewriter: Send + Sync {
    async fn rewrite(&self, request: &RewriteRequest) -> Result<RewriteReply, TransportError>;
}
