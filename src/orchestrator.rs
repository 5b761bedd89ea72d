//! Drives the remote models and turns their replies into history records.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::asset::AssetStore;
use crate::codec::{bytes_to_pcm_samples, decode_base64_to_bytes};
use crate::error::{RewriteError, StudioError, SynthesisError};
use crate::history::GeneratedAudio;
use crate::rewrite::{RewriteAction, RewriteRequest};
use crate::voices::VoiceName;
use crate::{ScriptRewriter, SpeechReply, SpeechSynthesizer};

/// Characters of stray model text kept in a wrong-modality error.
pub const TEXT_PREVIEW_CHARS: usize = 50;

/// Flag that allows one outstanding request at a time.
#[derive(Debug, Default)]
struct InFlight(AtomicBool);

impl InFlight {
    fn acquire(&self, what: &'static str) -> Result<InFlightGuard<'_>, StudioError> {
        if self.0.swap(true, Ordering::AcqRel) {
            log::warn!("Rejected {what} request: one is already in flight");
            return Err(StudioError::Busy(what));
        }
        Ok(InFlightGuard(&self.0))
    }

    fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Clears the flag when the request settles, or when its future is dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs generate and rewrite requests against the remote collaborators.
///
/// No retries happen here: each failure goes straight back to the caller.
pub struct Orchestrator {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    rewriter: Arc<dyn ScriptRewriter>,
    sample_rate: u32,
    generating: InFlight,
    rewriting: InFlight,
}

impl Orchestrator {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        rewriter: Arc<dyn ScriptRewriter>,
        sample_rate: u32,
    ) -> Self {
        Self {
            synthesizer,
            rewriter,
            sample_rate,
            generating: InFlight::default(),
            rewriting: InFlight::default(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn is_generating(&self) -> bool {
        self.generating.is_set()
    }

    pub fn is_rewriting(&self) -> bool {
        self.rewriting.is_set()
    }

    /// Synthesize `script` with `voice` and store the audio in `assets`.
    ///
    /// A blank script fails with [`StudioError::Validation`] before any remote call.
    pub async fn generate(
        &self,
        assets: &AssetStore,
        script: &str,
        voice: VoiceName,
    ) -> Result<GeneratedAudio, StudioError> {
        let text = script.trim();
        if text.is_empty() {
            return Err(StudioError::Validation(
                "Script text must not be empty".to_string(),
            ));
        }

        let _guard = self.generating.acquire("generation")?;
        log::info!(
            "Starting generation for voice {voice} ({} chars)",
            text.chars().count()
        );

        let reply = self
            .synthesizer
            .synthesize(script, voice)
            .await
            .map_err(|e| {
                log::error!("Speech request failed: {e}");
                SynthesisError::Transport(e.0)
            })?;

        let payload = audio_payload(reply).inspect_err(|e| {
            log::error!("Speech reply carried no audio: {e:?}");
        })?;

        let bytes = decode_base64_to_bytes(&payload)?;
        let samples = bytes_to_pcm_samples(&bytes);
        let (audio, duration) = assets.create_playable_asset(&samples, self.sample_rate)?;

        log::info!(
            "Generated {duration:.2}s of audio ({} samples at {} Hz)",
            samples.len(),
            self.sample_rate
        );
        Ok(GeneratedAudio::new(text, voice, audio, duration))
    }

    /// Ask the text model to apply `user_instruction` to `current_text`.
    ///
    /// Returns the trimmed result; the caller keeps its text on failure.
    pub async fn rewrite(
        &self,
        current_text: &str,
        system_instruction: &str,
        user_instruction: &str,
    ) -> Result<String, StudioError> {
        let _guard = self.rewriting.acquire("rewrite")?;
        let request = RewriteRequest::new(current_text, system_instruction, user_instruction);

        let reply = self.rewriter.rewrite(&request).await.map_err(|e| {
            log::error!("Rewrite request failed: {e}");
            RewriteError::Transport(e.0)
        })?;

        if let Some(reason) = &reply.refusal_reason {
            log::warn!("Rewrite refused by model: {reason}");
        }

        match reply.text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => Err(RewriteError::EmptyResponse.into()),
        }
    }

    /// Run one of the editor's rewrite actions on `current_text`.
    pub async fn rewrite_action(
        &self,
        action: &RewriteAction,
        current_text: &str,
    ) -> Result<String, StudioError> {
        if !action.accepts_empty_script() && current_text.trim().is_empty() {
            return Err(StudioError::Validation(
                "Enter some text to process first".to_string(),
            ));
        }
        log::info!("Running rewrite action {action:?}");
        self.rewrite(
            action.input_text(current_text),
            action.system_instruction(),
            &action.task(),
        )
        .await
    }
}

/// Pick the audio out of a reply, or say why there is none.
///
/// Audio wins over everything else; a refusal wins over stray text.
fn audio_payload(reply: SpeechReply) -> Result<String, SynthesisError> {
    if let Some(payload) = reply.audio_payload.filter(|p| !p.trim().is_empty()) {
        return Ok(payload);
    }
    if let Some(reason) = reply.refusal_reason {
        return Err(SynthesisError::ContentRejected { reason });
    }
    if let Some(text) = reply.text.filter(|t| !t.is_empty()) {
        return Err(SynthesisError::WrongModality {
            preview: text.chars().take(TEXT_PREVIEW_CHARS).collect(),
        });
    }
    Err(SynthesisError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_container;
    use crate::engines::mock::{pcm_payload, MockRewriter, MockSynthesizer};
    use crate::error::DecodeError;
    use crate::{RewriteReply, TransportError};

    fn orchestrator(synth: &MockSynthesizer, rewriter: &MockRewriter) -> Orchestrator {
        Orchestrator::new(Arc::new(synth.clone()), Arc::new(rewriter.clone()), 24000)
    }

    #[tokio::test]
    async fn blank_script_makes_no_remote_call() {
        let synth = MockSynthesizer::new();
        let orch = orchestrator(&synth, &MockRewriter::new());
        let assets = AssetStore::default();

        for script in ["", "  ", "\n\t"] {
            let err = orch
                .generate(&assets, script, VoiceName::Puck)
                .await
                .unwrap_err();
            assert!(err.is_validation());
        }
        assert_eq!(synth.calls(), 0);
    }

    #[tokio::test]
    async fn generates_record_from_pcm_payload() {
        let synth = MockSynthesizer::new();
        synth.push_reply(SpeechReply::audio(pcm_payload(&[1000; 2400])));
        let orch = orchestrator(&synth, &MockRewriter::new());
        let assets = AssetStore::default();

        let item = orch
            .generate(&assets, "  hello ", VoiceName::Kore)
            .await
            .unwrap();

        assert_eq!(item.duration, 0.1);
        assert_eq!(item.voice, VoiceName::Kore);
        assert_eq!(item.text, "hello");
        let decoded = decode_container(item.audio().bytes()).unwrap();
        assert_eq!(decoded.samples.len(), 2400);
        assert!(decoded.samples.iter().all(|&s| s == 1000));
        assert_eq!(synth.requests(), vec![("  hello ".to_string(), VoiceName::Kore)]);
        assert!(!orch.is_generating());
    }

    #[tokio::test]
    async fn refusal_maps_to_content_rejected() {
        let synth = MockSynthesizer::new();
        synth.push_reply(SpeechReply {
            refusal_reason: Some("SAFETY".to_string()),
            text: Some("I can't read that".to_string()),
            ..SpeechReply::default()
        });
        let orch = orchestrator(&synth, &MockRewriter::new());

        let err = orch
            .generate(&AssetStore::default(), "text", VoiceName::Kore)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StudioError::Synthesis(SynthesisError::ContentRejected { ref reason }) if reason == "SAFETY"
        ));
    }

    #[tokio::test]
    async fn text_reply_maps_to_wrong_modality_with_preview() {
        let long = "x".repeat(80);
        let synth = MockSynthesizer::new();
        synth.push_reply(SpeechReply::text(long));
        let orch = orchestrator(&synth, &MockRewriter::new());

        let err = orch
            .generate(&AssetStore::default(), "text", VoiceName::Kore)
            .await
            .unwrap_err();
        match err {
            StudioError::Synthesis(SynthesisError::WrongModality { preview }) => {
                assert_eq!(preview, "x".repeat(TEXT_PREVIEW_CHARS));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_payload_maps_to_empty_response() {
        let synth = MockSynthesizer::new();
        synth.push_reply(SpeechReply::default());
        synth.push_reply(SpeechReply::audio(""));
        let orch = orchestrator(&synth, &MockRewriter::new());
        let assets = AssetStore::default();

        for _ in 0..2 {
            let err = orch
                .generate(&assets, "text", VoiceName::Kore)
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                StudioError::Synthesis(SynthesisError::EmptyResponse)
            ));
        }
        assert_eq!(assets.live_count(), 0);
    }

    #[tokio::test]
    async fn transport_failure_carries_message() {
        let synth = MockSynthesizer::new();
        synth.push_error(TransportError::new("503 Service Unavailable"));
        let orch = orchestrator(&synth, &MockRewriter::new());

        let err = orch
            .generate(&AssetStore::default(), "text", VoiceName::Kore)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StudioError::Synthesis(SynthesisError::Transport(ref msg)) if msg == "503 Service Unavailable"
        ));
        assert!(!orch.is_generating());
    }

    #[tokio::test]
    async fn malformed_payload_is_decode_error() {
        let synth = MockSynthesizer::new();
        synth.push_reply(SpeechReply::audio("not*base64"));
        let orch = orchestrator(&synth, &MockRewriter::new());

        let err = orch
            .generate(&AssetStore::default(), "text", VoiceName::Kore)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StudioError::Decode(DecodeError::InvalidBase64(_))
        ));
    }

    #[tokio::test]
    async fn odd_length_payload_still_generates() {
        let synth = MockSynthesizer::new();
        // Three bytes: one full sample plus a trailing artifact.
        synth.push_reply(SpeechReply::audio("6AMA"));
        let orch = orchestrator(&synth, &MockRewriter::new());
        let assets = AssetStore::default();

        let item = orch
            .generate(&assets, "text", VoiceName::Zephyr)
            .await
            .unwrap();
        assert_eq!(item.audio().sample_count(), 1);
    }

    #[tokio::test]
    async fn discarded_record_frees_its_audio() {
        let synth = MockSynthesizer::new();
        let orch = orchestrator(&synth, &MockRewriter::new());
        let assets = AssetStore::default();

        let item = orch
            .generate(&assets, "hello", VoiceName::Kore)
            .await
            .unwrap();
        let uri = item.audio().uri().clone();
        assert_eq!(assets.live_count(), 1);

        drop(item);
        assert_eq!(assets.live_count(), 0);
        assert_eq!(assets.released_count(), 1);
        assert!(!assets.is_live(&uri));
    }

    #[tokio::test]
    async fn rewrite_uses_template_and_trims() {
        let rewriter = MockRewriter::new();
        rewriter.push_reply(RewriteReply::text("\n  Better text.  \n"));
        let orch = orchestrator(&MockSynthesizer::new(), &rewriter);

        let text = orch.rewrite("draft", "be brief", "polish").await.unwrap();

        assert_eq!(text, "Better text.");
        let request = &rewriter.requests()[0];
        assert_eq!(request.system_instruction, "be brief");
        assert_eq!(request.content, "Original content:\n\"draft\"\n\nTask: polish");
    }

    #[tokio::test]
    async fn rewrite_without_text_is_empty_response() {
        let rewriter = MockRewriter::new();
        rewriter.push_reply(RewriteReply::text("   "));
        rewriter.push_reply(RewriteReply::refused("SAFETY"));
        let orch = orchestrator(&MockSynthesizer::new(), &rewriter);

        for _ in 0..2 {
            let err = orch.rewrite("draft", "sys", "task").await.unwrap_err();
            assert!(matches!(
                err,
                StudioError::Rewrite(RewriteError::EmptyResponse)
            ));
        }
    }

    #[tokio::test]
    async fn preset_on_blank_script_is_rejected_locally() {
        let rewriter = MockRewriter::new();
        let orch = orchestrator(&MockSynthesizer::new(), &rewriter);

        let err = orch
            .rewrite_action(&RewriteAction::Polish, "  ")
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(rewriter.calls(), 0);
    }

    #[tokio::test]
    async fn custom_topic_on_empty_script_sends_placeholder() {
        let rewriter = MockRewriter::new();
        rewriter.push_reply(RewriteReply::text("A script about Mars."));
        let orch = orchestrator(&MockSynthesizer::new(), &rewriter);

        let action = RewriteAction::Custom {
            topic: "Mars".to_string(),
        };
        let text = orch.rewrite_action(&action, "").await.unwrap();

        assert_eq!(text, "A script about Mars.");
        let request = &rewriter.requests()[0];
        assert!(request.content.starts_with("Original content:\n\"(none)\""));
        assert!(request.content.ends_with("Mars"));
    }

    #[test]
    fn in_flight_flag_blocks_second_request() {
        let flag = InFlight::default();
        let guard = flag.acquire("generation").unwrap();
        assert!(matches!(
            flag.acquire("generation"),
            Err(StudioError::Busy("generation"))
        ));
        drop(guard);
        assert!(flag.acquire("generation").is_ok());
    }
}
