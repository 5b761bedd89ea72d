use async_trait::async_trait;
use reqwest::Client;

use crate::config::StudioConfig;
use crate::error::{StudioError, TransportError};
use crate::rewrite::RewriteRequest;
use crate::voices::VoiceName;
use crate::{RewriteReply, ScriptRewriter, SpeechReply, SpeechSynthesizer};

use super::types::{GenerateContentRequest, GenerateContentResponse};

/// Public endpoint of the Gemini API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini client serving both the text model and the speech model.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: String,
    rewrite_model: String,
    speech_model: String,
    temperature: f32,
}

impl GeminiClient {
    /// Build a client from `config`. Fails if no API key is configured.
    pub fn new(config: &StudioConfig) -> Result<Self, StudioError> {
        let api_key = config.require_api_key()?.to_string();
        Ok(Self {
            http: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            rewrite_model: config.rewrite_model.clone(),
            speech_model: config.speech_model.clone(),
            temperature: config.temperature,
        })
    }

    /// Point the client at another host, e.g. a proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, TransportError> {
        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            log::error!("Gemini API error {status} from {model}");
            return Err(TransportError(format!("Gemini API error {status}: {body}")));
        }

        serde_json::from_str(&body).map_err(|e| {
            log::error!("Unparseable Gemini response: {e}");
            TransportError(format!("invalid Gemini response: {e}"))
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for GeminiClient {
    async fn synthesize(
        &self,
        text: &str,
        voice: VoiceName,
    ) -> Result<SpeechReply, TransportError> {
        log::debug!("Requesting speech from {} with voice {voice}", self.speech_model);
        let request = GenerateContentRequest::speech(text, voice.as_str());
        let response = self.generate_content(&self.speech_model, &request).await?;
        Ok(response.into_speech_reply())
    }
}

#[async_trait]
impl ScriptRewriter for GeminiClient {
    async fn rewrite(&self, request: &RewriteRequest) -> Result<RewriteReply, TransportError> {
        log::debug!("Requesting rewrite from {}", self.rewrite_model);
        let body = GenerateContentRequest::text(
            &request.system_instruction,
            &request.content,
            self.temperature,
        );
        let response = self.generate_content(&self.rewrite_model, &body).await?;
        Ok(response.into_rewrite_reply())
    }
}
