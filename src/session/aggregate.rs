use std::fmt;

use serde::Serialize;

use crate::models::{Emotion, EmotionSample};

/// Whole-session statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    /// Rounded seconds between the first and last sample
    pub duration_secs: i64,
    /// Most frequent dominant emotion, `None` for an empty session
    pub dominant_emotion: Option<Emotion>,
    /// Number of adjacent samples whose dominant emotion differs
    pub switches: usize,
    /// Dominant-emotion occurrence counts, indexed by display order
    pub counts: [usize; 7],
    pub sample_count: usize,
}

impl SessionStats {
    /// Duration label, e.g. `42s`
    pub fn duration_label(&self) -> String {
        format!("{}s", self.duration_secs)
    }

    /// Dominant emotion label, `N/A` for an empty session
    pub fn dominant_label(&self) -> &'static str {
        self.dominant_emotion.map(|e| e.as_str()).unwrap_or("N/A")
    }

    pub fn count(&self, emotion: Emotion) -> usize {
        self.counts[emotion.index()]
    }
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "duration={} dominant={} switches={}",
            self.duration_label(),
            self.dominant_label(),
            self.switches
        )
    }
}

/// Count how often each emotion was dominant
pub fn dominant_counts(history: &[EmotionSample]) -> [usize; 7] {
    let mut counts = [0usize; 7];
    for sample in history {
        counts[sample.dominant_emotion.index()] += 1;
    }
    counts
}

/// Summarize a session history
pub fn aggregate(history: &[EmotionSample]) -> SessionStats {
    let (Some(first), Some(last)) = (history.first(), history.last()) else {
        return SessionStats {
            duration_secs: 0,
            dominant_emotion: None,
            switches: 0,
            counts: [0; 7],
            sample_count: 0,
        };
    };

    let duration_secs = ((last.timestamp - first.timestamp) as f64 / 1000.0).round() as i64;

    let counts = dominant_counts(history);

    // >= hands ties to the later emotion
    let mut dominant = Emotion::Neutral;
    for emotion in Emotion::ALL {
        if counts[emotion.index()] >= counts[dominant.index()] {
            dominant = emotion;
        }
    }

    let switches = history
        .windows(2)
        .filter(|pair| pair[0].dominant_emotion != pair[1].dominant_emotion)
        .count();

    SessionStats {
        duration_secs,
        dominant_emotion: Some(dominant),
        switches,
        counts,
        sample_count: history.len(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::EmotionScoreSet;

    pub(crate) fn sample(timestamp: i64, emotion: Emotion) -> EmotionSample {
        let mut scores = EmotionScoreSet::new();
        scores.insert(emotion, 1.0);
        EmotionSample {
            timestamp,
            dominant_emotion: emotion,
            confidence: 1.0,
            scores: scores.clone(),
            visual_scores: scores,
            audio_scores: EmotionScoreSet::neutral(),
        }
    }

    #[test]
    fn test_empty_history() {
        let stats = aggregate(&[]);
        assert_eq!(stats.duration_secs, 0);
        assert_eq!(stats.dominant_emotion, None);
        assert_eq!(stats.switches, 0);
        assert_eq!(stats.duration_label(), "0s");
        assert_eq!(stats.dominant_label(), "N/A");
    }

    #[test]
    fn test_three_samples() {
        let history = vec![
            sample(10_000, Emotion::Happy),
            sample(11_200, Emotion::Happy),
            sample(12_600, Emotion::Sad),
        ];

        let stats = aggregate(&history);

        assert_eq!(stats.switches, 1);
        assert_eq!(stats.dominant_emotion, Some(Emotion::Happy));
        // 2.6s rounds to 3
        assert_eq!(stats.duration_secs, 3);
        assert_eq!(stats.count(Emotion::Happy), 2);
        assert_eq!(stats.sample_count, 3);
    }

    #[test]
    fn test_switches_count_every_change() {
        let history = vec![
            sample(0, Emotion::Angry),
            sample(100, Emotion::Neutral),
            sample(200, Emotion::Angry),
            sample(300, Emotion::Angry),
            sample(400, Emotion::Neutral),
        ];

        let stats = aggregate(&history);
        assert_eq!(stats.switches, 3);
        assert_eq!(stats.duration_secs, 0);
    }

    #[test]
    fn test_dominant_tie_goes_to_later_emotion() {
        let history = vec![
            sample(0, Emotion::Surprised),
            sample(1_000, Emotion::Sad),
            sample(2_000, Emotion::Surprised),
            sample(3_000, Emotion::Sad),
        ];
        assert_eq!(aggregate(&history).dominant_emotion, Some(Emotion::Surprised));

        let pair = vec![sample(0, Emotion::Sad), sample(1_000, Emotion::Surprised)];
        assert_eq!(aggregate(&pair).dominant_emotion, Some(Emotion::Surprised));

        // A strictly larger count still wins regardless of order
        let skewed = vec![
            sample(0, Emotion::Neutral),
            sample(1_000, Emotion::Neutral),
            sample(2_000, Emotion::Disgusted),
        ];
        assert_eq!(aggregate(&skewed).dominant_emotion, Some(Emotion::Neutral));
    }
}
