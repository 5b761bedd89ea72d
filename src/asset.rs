//! Playable audio assets.
//!
//! Each [`AudioAsset`] owns its encoded WAV bytes and a short `blob:`
//! reference. The [`AssetStore`] that minted it keeps a ledger of live
//! references; the asset strikes itself from that ledger when it is dropped,
//! whether through [`AssetStore::release_asset`] or by simply going out of
//! scope. Handles are not `Clone`, so every blob is freed exactly once.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::codec::{duration_secs, encode_pcm_to_container};
use crate::error::DecodeError;

/// MIME type of every stored blob.
pub const WAV_MIME: &str = "audio/wav";

/// Session-local reference to a stored blob, e.g. `blob:voxgen/6f1c...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetUri(String);

impl AssetUri {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Default)]
struct Ledger {
    live: HashSet<AssetUri>,
    released: usize,
}

fn lock(ledger: &Mutex<Ledger>) -> MutexGuard<'_, Ledger> {
    ledger.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owning handle to one WAV blob.
pub struct AudioAsset {
    uri: AssetUri,
    sample_rate: u32,
    sample_count: usize,
    bytes: Box<[u8]>,
    ledger: Arc<Mutex<Ledger>>,
}

impl AudioAsset {
    pub fn uri(&self) -> &AssetUri {
        &self.uri
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// The complete WAV container, header included.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn duration_secs(&self) -> f64 {
        duration_secs(self.sample_count, self.sample_rate)
    }
}

impl fmt::Debug for AudioAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioAsset")
            .field("uri", &self.uri)
            .field("sample_rate", &self.sample_rate)
            .field("sample_count", &self.sample_count)
            .field("byte_len", &self.bytes.len())
            .finish()
    }
}

impl Drop for AudioAsset {
    fn drop(&mut self) {
        let mut ledger = lock(&self.ledger);
        if ledger.live.remove(&self.uri) {
            ledger.released += 1;
            log::debug!("Released asset {}", self.uri);
        }
    }
}

/// Mints playable blobs for one session and tracks which are still alive.
pub struct AssetStore {
    origin: String,
    ledger: Arc<Mutex<Ledger>>,
}

impl Default for AssetStore {
    fn default() -> Self {
        Self::new("voxgen")
    }
}

impl AssetStore {
    /// Create an empty store whose references are prefixed with `blob:{origin}/`.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ledger: Arc::default(),
        }
    }

    /// Encode `samples` as WAV and wrap the result in an owning handle.
    ///
    /// Returns the handle together with the audio duration in seconds.
    pub fn create_playable_asset(
        &self,
        samples: &[i16],
        sample_rate: u32,
    ) -> Result<(AudioAsset, f64), DecodeError> {
        let wav = encode_pcm_to_container(samples, sample_rate)?;
        let uri = AssetUri(format!("blob:{}/{}", self.origin, Uuid::new_v4()));
        lock(&self.ledger).live.insert(uri.clone());

        let asset = AudioAsset {
            uri,
            sample_rate,
            sample_count: samples.len(),
            bytes: wav.into_boxed_slice(),
            ledger: Arc::clone(&self.ledger),
        };
        let duration = asset.duration_secs();

        log::debug!(
            "Created asset {} ({} bytes, {duration:.2}s)",
            asset.uri,
            asset.byte_len()
        );
        Ok((asset, duration))
    }

    /// Invalidate the asset's reference and free its bytes.
    ///
    /// A handle minted by another store is still freed, against its own
    /// store; `false` reports that it did not belong here.
    pub fn release_asset(&self, asset: AudioAsset) -> bool {
        let ours = Arc::ptr_eq(&self.ledger, &asset.ledger);
        if !ours {
            log::warn!("Asset {} is not owned by this store", asset.uri);
        }
        drop(asset);
        ours
    }

    /// Whether `uri` still names a live blob of this store.
    pub fn is_live(&self, uri: &AssetUri) -> bool {
        lock(&self.ledger).live.contains(uri)
    }

    /// Number of blobs currently alive.
    pub fn live_count(&self) -> usize {
        lock(&self.ledger).live.len()
    }

    /// Number of blobs freed over the store's lifetime.
    pub fn released_count(&self) -> usize {
        lock(&self.ledger).released
    }
}
