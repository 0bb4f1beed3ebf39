use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed emotion vocabulary, declared in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Emotion {
    Neutral,
    Happy,
    Sad,
    Angry,
    Fearful,
    Disgusted,
    Surprised,
}

impl Emotion {
    /// All emotions in display order. Tie-breaks everywhere follow this order.
    pub const ALL: [Emotion; 7] = [
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Fearful,
        Emotion::Disgusted,
        Emotion::Surprised,
    ];

    /// Display label
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Neutral => "Neutral",
            Emotion::Happy => "Happy",
            Emotion::Sad => "Sad",
            Emotion::Angry => "Angry",
            Emotion::Fearful => "Fearful",
            Emotion::Disgusted => "Disgusted",
            Emotion::Surprised => "Surprised",
        }
    }

    /// Map a face-model expression label (lowercase vocabulary) to an emotion
    pub fn from_face_label(label: &str) -> Option<Emotion> {
        match label {
            "neutral" => Some(Emotion::Neutral),
            "happy" => Some(Emotion::Happy),
            "sad" => Some(Emotion::Sad),
            "angry" => Some(Emotion::Angry),
            "fearful" => Some(Emotion::Fearful),
            "disgusted" => Some(Emotion::Disgusted),
            "surprised" => Some(Emotion::Surprised),
            _ => None,
        }
    }

    /// Position in display order
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Sparse mapping from emotion to probability mass.
///
/// Absent keys read as 0. A normalized set has non-negative values summing
/// to 1.0; see [`crate::fusion::normalize_scores`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmotionScoreSet(BTreeMap<Emotion, f64>);

impl EmotionScoreSet {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// The canonical fallback distribution `{Neutral: 1.0}`
    pub fn neutral() -> Self {
        let mut set = Self::new();
        set.insert(Emotion::Neutral, 1.0);
        set
    }

    pub fn insert(&mut self, emotion: Emotion, score: f64) {
        self.0.insert(emotion, score);
    }

    /// Score for an emotion, 0 when absent
    pub fn get(&self, emotion: Emotion) -> f64 {
        self.0.get(&emotion).copied().unwrap_or(0.0)
    }

    /// Whether the key is present (a present 0 counts)
    pub fn contains(&self, emotion: Emotion) -> bool {
        self.0.contains_key(&emotion)
    }

    /// Present entries in display order
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        self.0.iter().map(|(&e, &s)| (e, s))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all present values
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }
}

impl FromIterator<(Emotion, f64)> for EmotionScoreSet {
    fn from_iter<I: IntoIterator<Item = (Emotion, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
