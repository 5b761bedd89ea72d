//! Prebuilt voice personas offered for synthesis.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a prebuilt voice, as understood by the speech model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoiceName {
    Puck,
    Charon,
    Kore,
    Fenrir,
    Zephyr,
}

impl VoiceName {
    pub fn as_str(self) -> &'static str {
        match self {
            VoiceName::Puck => "Puck",
            VoiceName::Charon => "Charon",
            VoiceName::Kore => "Kore",
            VoiceName::Fenrir => "Fenrir",
            VoiceName::Zephyr => "Zephyr",
        }
    }

    /// Catalog entry for this voice.
    ///
    /// `VOICES` is laid out in declaration order, so the discriminant is the index.
    pub fn profile(self) -> &'static VoiceProfile {
        &VOICES[self as usize]
    }
}

impl fmt::Display for VoiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoiceName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VOICES
            .iter()
            .map(|v| v.id)
            .find(|id| id.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown voice '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// Read-only catalog entry describing one voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceProfile {
    pub id: VoiceName,
    pub name: &'static str,
    pub gender: Gender,
    pub description: &'static str,
}

pub const DEFAULT_VOICE: VoiceName = VoiceName::Kore;

pub static VOICES: [VoiceProfile; 5] = [
    VoiceProfile {
        id: VoiceName::Puck,
        name: "Puck",
        gender: Gender::Male,
        description: "Energetic with a slightly playful tone. Great for storytelling or light content.",
    },
    VoiceProfile {
        id: VoiceName::Charon,
        name: "Charon",
        gender: Gender::Male,
        description: "Deep, resonant and authoritative. Ideal for documentary narration or news.",
    },
    VoiceProfile {
        id: VoiceName::Kore,
        name: "Kore",
        gender: Gender::Female,
        description: "Calm, soothing and clear. Ideal for guided meditation, education or explainers.",
    },
    VoiceProfile {
        id: VoiceName::Fenrir,
        name: "Fenrir",
        gender: Gender::Male,
        description: "Rugged, intense and rousing. Suits game characters, ads or movie trailers.",
    },
    VoiceProfile {
        id: VoiceName::Zephyr,
        name: "Zephyr",
        gender: Gender::Female,
        description: "Light, airy and friendly. Ideal for virtual assistants or everyday conversation.",
    },
];
