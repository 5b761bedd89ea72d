//! One user session: script, voice choice, generation status, history and playback.
//!
//! Every user action goes through here and its failure becomes a status
//! message. Nothing escalates beyond the returned `Result`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::asset::{AssetStore, WAV_MIME};
use crate::config::StudioConfig;
use crate::error::StudioError;
use crate::history::{AudioId, GeneratedAudio, HistoryStore};
use crate::orchestrator::Orchestrator;
use crate::playback::{PlaybackController, PlaybackDeck};
use crate::rewrite::RewriteAction;
use crate::script::ScriptText;
use crate::voices::VoiceName;
use crate::{ScriptRewriter, SpeechSynthesizer};

/// Characters of the record id used in exported file names.
pub const EXPORT_ID_CHARS: usize = 6;

/// State of the most recent generation attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStatus {
    pub is_generating: bool,
    pub error: Option<String>,
}

/// A generated file ready to be saved by the user.
#[derive(Debug)]
pub struct Download<'a> {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: &'a [u8],
}

/// `<product>_<voice>_<first 6 chars of id>.wav`
pub fn export_file_name(product: &str, item: &GeneratedAudio) -> String {
    format!(
        "{product}_{}_{}.wav",
        item.voice,
        item.id().short(EXPORT_ID_CHARS)
    )
}

pub struct Studio {
    config: StudioConfig,
    orchestrator: Orchestrator,
    assets: AssetStore,
    history: HistoryStore,
    deck: PlaybackDeck,
    script: ScriptText,
    voice: VoiceName,
    status: GenerationStatus,
    notice: Option<String>,
}

impl Studio {
    pub fn new(
        config: StudioConfig,
        synthesizer: impl SpeechSynthesizer + 'static,
        rewriter: impl ScriptRewriter + 'static,
    ) -> Self {
        Self::with_collaborators(config, Arc::new(synthesizer), Arc::new(rewriter))
    }

    pub fn with_collaborators(
        config: StudioConfig,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        rewriter: Arc<dyn ScriptRewriter>,
    ) -> Self {
        log::info!(
            "Studio ready: {} Hz, {} char limit, default voice {}",
            config.sample_rate,
            config.max_script_chars,
            config.default_voice
        );
        Self {
            orchestrator: Orchestrator::new(synthesizer, rewriter, config.sample_rate),
            assets: AssetStore::new(config.product.clone()),
            history: HistoryStore::new(),
            deck: PlaybackDeck::new(),
            script: ScriptText::new(config.max_script_chars),
            voice: config.default_voice,
            status: GenerationStatus::default(),
            notice: None,
            config,
        }
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn script(&self) -> &ScriptText {
        &self.script
    }

    /// Replace the script text; returns `true` if it was cut at the limit.
    pub fn set_script(&mut self, text: impl Into<String>) -> bool {
        self.script.set(text)
    }

    pub fn clear_script(&mut self) {
        self.script.clear();
    }

    pub fn voice(&self) -> VoiceName {
        self.voice
    }

    pub fn select_voice(&mut self, voice: VoiceName) {
        self.voice = voice;
    }

    pub fn status(&self) -> &GenerationStatus {
        &self.status
    }

    /// Last rewrite failure, until taken.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Whether the generate action is currently allowed.
    pub fn can_generate(&self) -> bool {
        !self.status.is_generating && !self.script.is_blank()
    }

    /// Synthesize the current script with the selected voice.
    ///
    /// On success the new record is at the head of the history. On failure
    /// the message is also left in [`Self::status`].
    pub async fn generate(&mut self) -> Result<AudioId, StudioError> {
        self.status = GenerationStatus {
            is_generating: true,
            error: None,
        };

        let result = self
            .orchestrator
            .generate(&self.assets, self.script.as_str(), self.voice)
            .await;
        self.status.is_generating = false;

        match result {
            Ok(item) => {
                let id = item.id();
                self.history.insert(item);
                Ok(id)
            }
            Err(e) => {
                log::warn!("Generation failed: {e}");
                self.status.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Apply a rewrite action to the script.
    ///
    /// The script is replaced only on success. Failures leave it untouched
    /// and post a notice.
    pub async fn rewrite(&mut self, action: RewriteAction) -> Result<(), StudioError> {
        match self
            .orchestrator
            .rewrite_action(&action, self.script.as_str())
            .await
        {
            Ok(text) => {
                self.script.set(text);
                Ok(())
            }
            Err(e) => {
                log::warn!("Rewrite failed: {e}");
                self.notice = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Records, most recent first.
    pub fn history(&self) -> Vec<&GeneratedAudio> {
        self.history.list()
    }

    pub fn get(&self, id: AudioId) -> Option<&GeneratedAudio> {
        self.history.get(id)
    }

    /// Delete a record, releasing its audio and dropping its player.
    ///
    /// Unknown ids are ignored.
    pub fn delete(&mut self, id: AudioId) -> bool {
        self.deck.hide(id);
        self.history.remove(id, &self.assets)
    }

    /// Player for a listed record, created stopped on first use.
    pub fn player(&mut self, id: AudioId) -> Option<&mut PlaybackController> {
        let duration = self.history.get(id)?.duration;
        Some(self.deck.show(id, duration))
    }

    /// Advance all playing items; returns those that reached the end.
    pub fn tick(&mut self, elapsed: Duration) -> Vec<AudioId> {
        self.deck.tick(elapsed)
    }

    /// WAV bytes of a listed record.
    pub fn audio_bytes(&self, id: AudioId) -> Option<&[u8]> {
        Some(self.history.get(id)?.audio().bytes())
    }

    pub fn download(&self, id: AudioId) -> Option<Download<'_>> {
        let item = self.history.get(id)?;
        Some(Download {
            file_name: export_file_name(&self.config.product, item),
            mime: WAV_MIME,
            bytes: item.audio().bytes(),
        })
    }

    /// Write a record's WAV into `dir`; returns the file path.
    pub fn export(&self, id: AudioId, dir: &Path) -> Result<PathBuf, StudioError> {
        let download = self.download(id).ok_or(StudioError::NotFound(id))?;
        let path = dir.join(&download.file_name);
        std::fs::write(&path, download.bytes)?;
        log::info!("Exported {id} to {}", path.display());
        Ok(path)
    }

    /// Live audio blobs; equals the history length.
    pub fn live_assets(&self) -> usize {
        self.assets.live_count()
    }
}
