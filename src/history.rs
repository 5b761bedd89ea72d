//! Generated audio records and the session history that owns them.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::asset::{AssetStore, AudioAsset};
use crate::voices::VoiceName;

/// Process-unique identifier of a generated audio record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioId(Uuid);

impl AudioId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First `n` characters of the hyphenated form, used in file names.
    pub fn short(&self, n: usize) -> String {
        self.0.to_string().chars().take(n).collect()
    }
}

impl Default for AudioId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AudioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One finished narration.
///
/// The record exclusively owns its [`AudioAsset`], so the audio is freed
/// when the record is removed from a [`HistoryStore`] or simply dropped.
#[derive(Debug)]
pub struct GeneratedAudio {
    id: AudioId,
    /// The submitted script, trimmed.
    pub text: String,
    pub voice: VoiceName,
    pub timestamp: DateTime<Utc>,
    /// Informational; derived from sample count and rate.
    pub duration: f64,
    audio: AudioAsset,
}

impl GeneratedAudio {
    pub fn new(text: impl Into<String>, voice: VoiceName, audio: AudioAsset, duration: f64) -> Self {
        Self {
            id: AudioId::new(),
            text: text.into(),
            voice,
            timestamp: Utc::now(),
            duration,
            audio,
        }
    }

    /// Assigned at construction and never changed, so no two records share one.
    pub fn id(&self) -> AudioId {
        self.id
    }

    pub fn audio(&self) -> &AudioAsset {
        &self.audio
    }

    /// Give up the record and hand back its asset for release or reuse.
    pub fn into_audio(self) -> AudioAsset {
        self.audio
    }
}

/// Most-recent-first list of generated audio.
#[derive(Debug, Default)]
pub struct HistoryStore {
    items: VecDeque<GeneratedAudio>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `item` at the head of the list.
    pub fn insert(&mut self, item: GeneratedAudio) {
        log::info!(
            "History: added {} ({}, {:.1}s)",
            item.id,
            item.voice,
            item.duration
        );
        self.items.push_front(item);
    }

    /// Remove the record with `id` and release its asset in `assets`.
    ///
    /// Returns `false` when no such record exists; that is not an error.
    pub fn remove(&mut self, id: AudioId, assets: &AssetStore) -> bool {
        let found = self.items.iter().position(|item| item.id == id);
        let Some(item) = found.and_then(|pos| self.items.remove(pos)) else {
            log::debug!("History: nothing to remove for {id}");
            return false;
        };
        assets.release_asset(item.into_audio());
        log::info!("History: removed {id}");
        true
    }

    /// Records, most recent first.
    ///
    /// The returned view borrows the store, so it cannot change while held.
    pub fn list(&self) -> Vec<&GeneratedAudio> {
        self.items.iter().collect()
    }

    pub fn get(&self, id: AudioId) -> Option<&GeneratedAudio> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: AudioId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every record, releasing all assets.
    pub fn clear(&mut self, assets: &AssetStore) {
        for item in self.items.drain(..) {
            assets.release_asset(item.into_audio());
        }
    }
}
