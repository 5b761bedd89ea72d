//! Wire types for the `generateContent` endpoint.

use serde::{Deserialize, Serialize};

use crate::{RewriteReply, SpeechReply};

/// `finishReason` value the API uses for safety blocks.
pub const SAFETY_FINISH_REASON: &str = "SAFETY";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: Option<String>,
    pub data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    pub voice_config: VoiceConfig,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub response_modalities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Audio-only request for a prebuilt voice.
    pub fn speech(text: &str, voice_name: &str) -> Self {
        Self {
            system_instruction: None,
            contents: vec![Content {
                role: None,
                parts: vec![Part::text(text)],
            }],
            generation_config: GenerationConfig {
                temperature: None,
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: voice_name.to_string(),
                        },
                    },
                }),
            },
        }
    }

    /// Single-turn text request with a system instruction.
    pub fn text(system_instruction: &str, content: &str, temperature: f32) -> Self {
        Self {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::text(system_instruction)],
            }),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::text(content)],
            }],
            generation_config: GenerationConfig {
                temperature: Some(temperature),
                ..GenerationConfig::default()
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    fn first_candidate(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    fn first_part(&self) -> Option<&Part> {
        self.first_candidate()?.content.as_ref()?.parts.first()
    }

    fn refusal_reason(&self) -> Option<String> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
        {
            return Some(reason);
        }
        self.first_candidate()
            .and_then(|c| c.finish_reason.as_deref())
            .filter(|reason| *reason == SAFETY_FINISH_REASON)
            .map(str::to_string)
    }

    /// Audio from the first part, otherwise the refusal or text the model sent.
    pub fn into_speech_reply(self) -> SpeechReply {
        let part = self.first_part();
        SpeechReply {
            audio_payload: part
                .and_then(|p| p.inline_data.as_ref())
                .map(|d| d.data.clone()),
            text: part.and_then(|p| p.text.clone()),
            refusal_reason: self.refusal_reason(),
        }
    }

    /// Concatenated text parts of the first candidate.
    pub fn into_rewrite_reply(self) -> RewriteReply {
        let text: String = self
            .first_candidate()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect())
            .unwrap_or_default();
        RewriteReply {
            text: (!text.is_empty()).then_some(text),
            refusal_reason: self.refusal_reason(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn speech_request_shape() {
        let value = serde_json::to_value(GenerateContentRequest::speech("hi", "Kore")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "contents": [{ "parts": [{ "text": "hi" }] }],
                "generationConfig": {
                    "responseModalities": ["AUDIO"],
                    "speechConfig": {
                        "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": "Kore" } }
                    }
                }
            })
        );
    }

    #[test]
    fn text_request_shape() {
        let value =
            serde_json::to_value(GenerateContentRequest::text("sys", "body", 0.5)).unwrap();
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "sys");
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "body");
        assert_eq!(value["generationConfig"]["temperature"], 0.5);
        assert!(value["generationConfig"].get("responseModalities").is_none());
    }

    #[test]
    fn audio_response_yields_payload() {
        let reply = parse(
            r#"{"candidates":[{"content":{"role":"model","parts":[
                {"inlineData":{"mimeType":"audio/L16;codec=pcm;rate=24000","data":"AAA="}}
            ]},"finishReason":"STOP"}]}"#,
        )
        .into_speech_reply();
        assert_eq!(reply, SpeechReply::audio("AAA="));
    }

    #[test]
    fn safety_finish_is_refusal() {
        let reply = parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).into_speech_reply();
        assert_eq!(reply, SpeechReply::refused("SAFETY"));
    }

    #[test]
    fn blocked_prompt_is_refusal() {
        let reply = parse(r#"{"promptFeedback":{"blockReason":"PROHIBITED_CONTENT"}}"#)
            .into_speech_reply();
        assert_eq!(reply.refusal_reason.as_deref(), Some("PROHIBITED_CONTENT"));
        assert!(reply.audio_payload.is_none());
    }

    #[test]
    fn text_instead_of_audio_is_kept() {
        let reply = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"Sure, here you go"}]},"finishReason":"STOP"}]}"#,
        )
        .into_speech_reply();
        assert_eq!(reply, SpeechReply::text("Sure, here you go"));
    }

    #[test]
    fn rewrite_joins_text_parts() {
        let reply = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello, "},{"text":"world."}]}}]}"#,
        )
        .into_rewrite_reply();
        assert_eq!(reply, RewriteReply::text("Hello, world."));
    }

    #[test]
    fn empty_response_has_nothing() {
        assert_eq!(parse("{}").into_speech_reply(), SpeechReply::default());
        assert_eq!(parse("{}").into_rewrite_reply(), RewriteReply::default());
    }
}
