use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Emotion, EmotionScoreSet};

use super::normalize_scores;

/// Expression probabilities as reported by the face model, keyed by its own
/// lowercase vocabulary (`neutral`, `happy`, ...). Values are in [0, 1] but
/// need not sum to 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceExpressions(pub HashMap<String, f64>);

impl FaceExpressions {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn with(mut self, label: &str, probability: f64) -> Self {
        self.0.insert(label.to_string(), probability);
        self
    }
}

/// Relabel face-model expressions into the emotion vocabulary and normalize.
///
/// Every emotion is present in the result. Unknown labels are ignored;
/// missing labels and non-finite or negative probabilities count as 0.
pub fn visual_scores(expressions: &FaceExpressions) -> EmotionScoreSet {
    let mut scores: EmotionScoreSet = Emotion::ALL.iter().map(|&e| (e, 0.0)).collect();

    for (label, &probability) in &expressions.0 {
        let Some(emotion) = Emotion::from_face_label(label) else {
            debug!("Ignoring unknown expression label {:?}", label);
            continue;
        };
        if !probability.is_finite() || probability < 0.0 {
            debug!("Ignoring malformed {} probability {}", label, probability);
            continue;
        }
        scores.insert(emotion, probability);
    }

    normalize_scores(&scores)
}
