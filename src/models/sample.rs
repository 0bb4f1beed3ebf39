use serde::{Deserialize, Serialize};

use super::{Emotion, EmotionScoreSet};

/// One fused observation produced by a sampling-loop tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionSample {
    /// Wall-clock time of the tick, Unix milliseconds
    pub timestamp: i64,
    /// Arg-max of `scores`
    pub dominant_emotion: Emotion,
    /// Probability of the dominant emotion (0-1)
    pub confidence: f64,
    /// Fused, normalized distribution
    pub scores: EmotionScoreSet,
    /// Normalized visual distribution that went into the fusion
    pub visual_scores: EmotionScoreSet,
    /// Normalized audio distribution that went into the fusion
    pub audio_scores: EmotionScoreSet,
}

/// Audio contribution to the fusion, as a percentage.
///
/// The visual contribution is `100 - audio`. Values above 100 are a caller
/// contract violation; use [`FusionWeight::clamped`] at the input boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FusionWeight(u8);

impl FusionWeight {
    pub const MAX: u8 = 100;

    /// Wrap a raw percentage as-is
    pub fn new(audio_percent: u8) -> Self {
        Self(audio_percent)
    }

    /// Clamp arbitrary user input into [0, 100]
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, Self::MAX as i64) as u8)
    }

    pub fn audio_percent(&self) -> u8 {
        self.0
    }

    pub fn visual_percent(&self) -> u8 {
        Self::MAX.saturating_sub(self.0)
    }
}

impl Default for FusionWeight {
    fn default() -> Self {
        Self(50)
    }
}

/// User-adjustable session settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Audio share of the fusion
    pub audio_weight: FusionWeight,
    /// Suppress all persistence writes while on
    pub privacy_mode: bool,
}
