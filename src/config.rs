//! Studio configuration.

use derive_builder::Builder;

use crate::error::StudioError;
use crate::script::MAX_SCRIPT_CHARS;
use crate::voices::{VoiceName, DEFAULT_VOICE};

/// Sample rate of the PCM returned by the speech model.
pub const SAMPLE_RATE: u32 = 24000;

/// Environment variables checked for the API credential, in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Settings for one studio session.
///
/// ```
/// use voxgen::config::StudioConfig;
///
/// let config = StudioConfig::builder()
///     .max_script_chars(1000usize)
///     .product("demo")
///     .build()?;
/// assert_eq!(config.sample_rate, 24000);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(default, setter(into), build_fn(validate = "Self::validate"))]
pub struct StudioConfig {
    /// Credential presented to the remote models.
    #[builder(setter(into, strip_option))]
    pub api_key: Option<String>,
    /// Rate used to interpret the model's headerless PCM.
    pub sample_rate: u32,
    /// Script length limit; clamped to 1000..=2000 by the editor.
    pub max_script_chars: usize,
    /// Prefix for exported file names and blob references.
    pub product: String,
    pub rewrite_model: String,
    pub speech_model: String,
    pub temperature: f32,
    pub default_voice: VoiceName,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            sample_rate: SAMPLE_RATE,
            max_script_chars: MAX_SCRIPT_CHARS,
            product: "voxgen".to_string(),
            rewrite_model: "gemini-2.5-flash".to_string(),
            speech_model: "gemini-2.5-flash-preview-tts".to_string(),
            temperature: 0.7,
            default_voice: DEFAULT_VOICE,
        }
    }
}

impl StudioConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.sample_rate == Some(0) {
            return Err("sample_rate must be positive".to_string());
        }
        if let Some(product) = &self.product {
            if product.trim().is_empty() {
                return Err("product name must not be empty".to_string());
            }
        }
        Ok(())
    }
}

impl StudioConfig {
    pub fn builder() -> StudioConfigBuilder {
        StudioConfigBuilder::default()
    }

    /// Defaults plus the API key from `GEMINI_API_KEY` or `API_KEY`.
    pub fn from_env() -> Self {
        let api_key = API_KEY_VARS.iter().find_map(|var| {
            std::env::var(var)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .inspect(|_| log::info!("Using API key from {var}"))
        });
        if api_key.is_none() {
            log::warn!("No API key found in {}", API_KEY_VARS.join(" or "));
        }
        Self {
            api_key,
            ..Self::default()
        }
    }

    /// The configured credential, or a configuration error naming where to set it.
    pub fn require_api_key(&self) -> Result<&str, StudioError> {
        self.api_key.as_deref().ok_or_else(|| {
            StudioError::Config(format!(
                "missing API key; set {}",
                API_KEY_VARS.join(" or ")
            ))
        })
    }
}
