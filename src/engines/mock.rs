//! Scripted collaborators for tests and offline demos.
//!
//! Replies are queued up front and handed out in order. When the queue runs
//! dry the synthesizer answers with a tenth of a second of silence and the
//! rewriter echoes a fixed line.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::TransportError;
use crate::rewrite::RewriteRequest;
use crate::voices::VoiceName;
use crate::{RewriteReply, ScriptRewriter, SpeechReply, SpeechSynthesizer};

/// Base64 of `samples` as headerless little-endian PCM, the way the speech model sends it.
pub fn pcm_payload(samples: &[i16]) -> String {
    let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    STANDARD.encode(bytes)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock speech model. Clones share their queue and captured requests.
#[derive(Clone, Default)]
pub struct MockSynthesizer {
    replies: Arc<Mutex<VecDeque<Result<SpeechReply, TransportError>>>>,
    requests: Arc<Mutex<Vec<(String, VoiceName)>>>,
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, reply: SpeechReply) {
        lock(&self.replies).push_back(Ok(reply));
    }

    pub fn push_error(&self, error: TransportError) {
        lock(&self.replies).push_back(Err(error));
    }

    pub fn calls(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Every `(text, voice)` pair received, oldest first.
    pub fn requests(&self) -> Vec<(String, VoiceName)> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        voice: VoiceName,
    ) -> Result<SpeechReply, TransportError> {
        lock(&self.requests).push((text.to_string(), voice));
        lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| Ok(SpeechReply::audio(pcm_payload(&[0; 2400]))))
    }
}

/// Mock text model. Clones share their queue and captured requests.
#[derive(Clone, Default)]
pub struct MockRewriter {
    replies: Arc<Mutex<VecDeque<Result<RewriteReply, TransportError>>>>,
    requests: Arc<Mutex<Vec<RewriteRequest>>>,
}

impl MockRewriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, reply: RewriteReply) {
        lock(&self.replies).push_back(Ok(reply));
    }

    pub fn push_error(&self, error: TransportError) {
        lock(&self.replies).push_back(Err(error));
    }

    pub fn calls(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn requests(&self) -> Vec<RewriteRequest> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl ScriptRewriter for MockRewriter {
    async fn rewrite(&self, request: &RewriteRequest) -> Result<RewriteReply, TransportError> {
        lock(&self.requests).push(request.clone());
        lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| Ok(RewriteReply::text("Mock rewrite")))
    }
}
