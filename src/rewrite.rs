//! AI script rewrite presets and the prompt template sent to the text model.

use serde::{Deserialize, Serialize};

/// System instruction shared by every editing preset.
pub const EDITOR_SYSTEM_INSTRUCTION: &str = "You are a professional voiceover copy editor. \
Output only the processed script, without any explanation, quotes, prefix or suffix. \
Keep the language fluent and suitable for reading aloud.";

/// System instruction for free-form generation from a topic.
pub const CREATOR_SYSTEM_INSTRUCTION: &str = "You are a professional voiceover script writer.";

/// Stand-in for an empty script in topic mode, so the model never sees empty input.
pub const EMPTY_SCRIPT_PLACEHOLDER: &str = "(none)";

/// A rewrite operation offered by the script editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteAction {
    Polish,
    Fix,
    Expand,
    PromoStyle,
    StoryStyle,
    Translate,
    /// Write a new script about `topic`; works on an empty script.
    Custom { topic: String },
}

impl RewriteAction {
    /// The six fixed presets, in toolbar order.
    pub const PRESETS: [RewriteAction; 6] = [
        RewriteAction::Polish,
        RewriteAction::Fix,
        RewriteAction::Expand,
        RewriteAction::PromoStyle,
        RewriteAction::StoryStyle,
        RewriteAction::Translate,
    ];

    pub fn system_instruction(&self) -> &'static str {
        match self {
            RewriteAction::Custom { .. } => CREATOR_SYSTEM_INSTRUCTION,
            _ => EDITOR_SYSTEM_INSTRUCTION,
        }
    }

    pub fn task(&self) -> String {
        match self {
            RewriteAction::Polish => "Polish this script so it reads more smoothly and naturally, \
                with more flair, suitable for high-quality voiceover."
                .to_string(),
            RewriteAction::Fix => "Correct typos and grammatical errors in this script \
                without changing its meaning."
                .to_string(),
            RewriteAction::Expand => "Expand this script around its core idea, adding detail \
                and vividness, increasing its length by about 50%."
                .to_string(),
            RewriteAction::PromoStyle => "Rewrite this script in the style of a rousing \
                promotional video: short sentences with a strong call to action."
                .to_string(),
            RewriteAction::StoryStyle => "Rewrite this script as a gently told story, \
                focusing on emotional build-up and vivid imagery."
                .to_string(),
            RewriteAction::Translate => "If the original is Chinese, translate it into idiomatic \
                English; if it is English, translate it into Chinese. Output only the translation."
                .to_string(),
            RewriteAction::Custom { topic } => format!(
                "Write an engaging voiceover script based on the following topic or requirements: {topic}"
            ),
        }
    }

    /// Whether the action can run on an empty script.
    pub fn accepts_empty_script(&self) -> bool {
        matches!(self, RewriteAction::Custom { .. })
    }

    /// Script text to send: the placeholder for an empty script in topic mode.
    pub fn input_text<'a>(&self, current: &'a str) -> &'a str {
        if self.accepts_empty_script() && current.is_empty() {
            EMPTY_SCRIPT_PLACEHOLDER
        } else {
            current
        }
    }
}

/// Prompt handed to the text model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRequest {
    pub system_instruction: String,
    pub content: String,
}

impl RewriteRequest {
    pub fn new(current_text: &str, system_instruction: &str, task: &str) -> Self {
        Self {
            system_instruction: system_instruction.to_string(),
            content: instruction_template(current_text, task),
        }
    }
}

/// Fixed template combining the current script with the task.
pub fn instruction_template(current_text: &str, task: &str) -> String {
    format!("Original content:\n\"{current_text}\"\n\nTask: {task}")
}
