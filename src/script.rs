//! Editable narration script with a character limit.

/// Smallest limit a deployment may configure.
pub const MIN_SCRIPT_CHARS: usize = 1000;
/// Largest limit a deployment may configure.
pub const MAX_SCRIPT_CHARS: usize = 2000;

/// Script text bounded to `max_chars` Unicode scalar values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptText {
    text: String,
    max_chars: usize,
}

impl Default for ScriptText {
    fn default() -> Self {
        Self::new(MAX_SCRIPT_CHARS)
    }
}

impl ScriptText {
    /// Empty script. `max_chars` is clamped to the supported range.
    pub fn new(max_chars: usize) -> Self {
        Self {
            text: String::new(),
            max_chars: max_chars.clamp(MIN_SCRIPT_CHARS, MAX_SCRIPT_CHARS),
        }
    }

    /// Replace the text, cutting it at the limit.
    ///
    /// Returns `true` if the input had to be truncated.
    pub fn set(&mut self, text: impl Into<String>) -> bool {
        let mut text = text.into();
        let truncated = match text.char_indices().nth(self.max_chars) {
            Some((cut, _)) => {
                text.truncate(cut);
                true
            }
            None => false,
        };
        if truncated {
            log::debug!("Script truncated to {} characters", self.max_chars);
        }
        self.text = text;
        truncated
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Text as it would be submitted for synthesis.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped() {
        assert_eq!(ScriptText::new(10).max_chars(), MIN_SCRIPT_CHARS);
        assert_eq!(ScriptText::new(5000).max_chars(), MAX_SCRIPT_CHARS);
        assert_eq!(ScriptText::new(1500).max_chars(), 1500);
    }

    #[test]
    fn truncates_on_char_boundaries() {
        let mut script = ScriptText::new(1000);
        let long = "语".repeat(1200);
        assert!(script.set(long));
        assert_eq!(script.char_count(), 1000);
        assert!(script.as_str().chars().all(|c| c == '语'));
    }

    #[test]
    fn short_text_is_kept_verbatim() {
        let mut script = ScriptText::default();
        assert!(!script.set("  hello  "));
        assert_eq!(script.as_str(), "  hello  ");
        assert_eq!(script.trimmed(), "hello");
    }

    #[test]
    fn whitespace_only_is_blank() {
        let mut script = ScriptText::default();
        assert!(script.is_blank());
        script.set(" \n\t ");
        assert!(script.is_blank());
        script.clear();
        assert_eq!(script.char_count(), 0);
    }
}
