use crate::models::{Emotion, EmotionScoreSet, FusionWeight};

use super::{dominant_emotion, normalize_scores};

/// Output of one fusion pass
#[derive(Debug, Clone, PartialEq)]
pub struct FusedScores {
    pub dominant_emotion: Emotion,
    pub confidence: f64,
    /// Normalized combined distribution
    pub scores: EmotionScoreSet,
}

/// Combine visual and audio distributions with a percentage weight.
///
/// For every emotion: `(visual * (100 - w) + audio * w) / 100`, then
/// normalize and pick the dominant emotion. The weight is not clamped here.
pub fn fuse(visual: &EmotionScoreSet, audio: &EmotionScoreSet, weight: FusionWeight) -> FusedScores {
    let audio_weight = weight.audio_percent() as f64;
    let visual_weight = 100.0 - audio_weight;

    let combined: EmotionScoreSet = Emotion::ALL
        .iter()
        .map(|&emotion| {
            let score =
                (visual.get(emotion) * visual_weight + audio.get(emotion) * audio_weight) / 100.0;
            (emotion, score)
        })
        .collect();

    let scores = normalize_scores(&combined);
    let dominant = dominant_emotion(&scores);

    FusedScores {
        dominant_emotion: dominant.emotion,
        confidence: dominant.confidence,
        scores,
    }
}
