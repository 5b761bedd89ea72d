//! Google Gemini back-end.
//!
//! One [`GeminiClient`] serves both collaborators: script rewrites go to a
//! text model (`gemini-2.5-flash` by default) and synthesis goes to a TTS
//! model (`gemini-2.5-flash-preview-tts`) asked for audio only.
//!
//! The TTS model answers with base64 headerless 16-bit mono PCM at 24 kHz in
//! `candidates[0].content.parts[0].inlineData.data`. When it does not, the
//! reply is classified as a safety refusal (`finishReason: "SAFETY"` or a
//! prompt block), as stray text, or as empty.
//!
//! # Credentials
//!
//! The key is taken from [`StudioConfig::api_key`]; [`StudioConfig::from_env`]
//! fills it from `GEMINI_API_KEY` or `API_KEY`.
//!
//! # Example
//!
//! ```rust,no_run
//! use voxgen::{config::StudioConfig, engines::gemini::GeminiClient, SpeechSynthesizer, VoiceName};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new(&StudioConfig::from_env())?;
//! let reply = client.synthesize("Hello from Kore!", VoiceName::Kore).await?;
//! println!("audio returned: {}", reply.audio_payload.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! [`StudioConfig::api_key`]: crate::config::StudioConfig::api_key
//! [`StudioConfig::from_env`]: crate::config::StudioConfig::from_env

pub mod client;
pub mod types;

pub use client::{GeminiClient, DEFAULT_BASE_URL};
