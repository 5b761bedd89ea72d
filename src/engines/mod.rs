//! Remote model back-ends.
//!
//! This module contains implementations of the [`SpeechSynthesizer`] and
//! [`ScriptRewriter`] collaborators.
//!
//! # Available Engines
//!
//! - `mock` - scripted in-process replies, always available
//!
//! Enable remote engines via Cargo features:
//! - `gemini` - Google Gemini `generateContent` REST API (text and TTS models)
//!
//! [`SpeechSynthesizer`]: crate::SpeechSynthesizer
//! [`ScriptRewriter`]: crate::ScriptRewriter

#[cfg(feature = "gemini")]
pub mod gemini;
pub mod mock;
