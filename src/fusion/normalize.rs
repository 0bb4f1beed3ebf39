use crate::models::{Emotion, EmotionScoreSet};

/// Arg-max emotion of a distribution and its probability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dominant {
    pub emotion: Emotion,
    pub confidence: f64,
}

/// Normalize a partial score set into a probability distribution.
///
/// Every present key is divided by the sum of present values; absent keys
/// stay absent. A zero sum means no expressed signal and yields
/// `{Neutral: 1.0}`.
pub fn normalize_scores(scores: &EmotionScoreSet) -> EmotionScoreSet {
    let total = scores.total();
    if total == 0.0 {
        return EmotionScoreSet::neutral();
    }

    scores.iter().map(|(emotion, score)| (emotion, score / total)).collect()
}

/// Select the highest-scoring emotion.
///
/// Scans in display order with a strict comparison, so the earlier emotion
/// wins exact ties. Starts from Neutral at 0.
pub fn dominant_emotion(scores: &EmotionScoreSet) -> Dominant {
    let mut dominant = Dominant {
        emotion: Emotion::Neutral,
        confidence: 0.0,
    };

    for emotion in Emotion::ALL {
        let score = scores.get(emotion);
        if score > dominant.confidence {
            dominant = Dominant {
                emotion,
                confidence: score,
            };
        }
    }

    dominant
}
