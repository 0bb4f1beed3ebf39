use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::models::{Emotion, EmotionSample, EmotionScoreSet};

use super::dominant_counts;

/// Number of most recent samples shown on the timeline
pub const TIMELINE_WINDOW: usize = 30;

/// One point on the timeline chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    /// `HH:MM:SS` in the requested time zone
    pub time: String,
    pub timestamp: i64,
    /// Score percentage (0-100) per emotion, in display order
    pub values: [f64; 7],
}

impl TimelinePoint {
    pub fn value(&self, emotion: Emotion) -> f64 {
        self.values[emotion.index()]
    }
}

/// One slice of the distribution chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DistributionBucket {
    pub emotion: Emotion,
    pub count: usize,
}

/// One row of a confidence-bar view
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBar {
    pub emotion: Emotion,
    /// Percentage (0-100)
    pub percent: f64,
}

impl ScoreBar {
    /// Percentage with one decimal, e.g. `42.5%`
    pub fn label(&self) -> String {
        format!("{:.1}%", self.percent)
    }
}

/// Format a Unix-millisecond timestamp as `HH:MM:SS`
pub fn format_time_label<Tz: TimeZone>(timestamp_ms: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .map(|utc| utc.with_timezone(tz).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}

/// Project the last [`TIMELINE_WINDOW`] samples onto a per-emotion timeline
pub fn timeline<Tz: TimeZone>(history: &[EmotionSample], tz: &Tz) -> Vec<TimelinePoint>
where
    Tz::Offset: std::fmt::Display,
{
    let start = history.len().saturating_sub(TIMELINE_WINDOW);

    history[start..]
        .iter()
        .map(|sample| {
            let mut values = [0.0; 7];
            for emotion in Emotion::ALL {
                values[emotion.index()] = sample.scores.get(emotion) * 100.0;
            }
            TimelinePoint {
                time: format_time_label(sample.timestamp, tz),
                timestamp: sample.timestamp,
                values,
            }
        })
        .collect()
}

/// Dominant-emotion counts over the whole history, non-zero buckets only
pub fn distribution(history: &[EmotionSample]) -> Vec<DistributionBucket> {
    let counts = dominant_counts(history);

    Emotion::ALL
        .iter()
        .map(|&emotion| DistributionBucket {
            emotion,
            count: counts[emotion.index()],
        })
        .filter(|bucket| bucket.count > 0)
        .collect()
}

/// Per-emotion percentages of a score set, in display order
pub fn score_bars(scores: &EmotionScoreSet) -> Vec<ScoreBar> {
    Emotion::ALL
        .iter()
        .map(|&emotion| ScoreBar {
            emotion,
            percent: scores.get(emotion) * 100.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::aggregate::tests::sample;

    #[test]
    fn test_time_label() {
        // 2023-11-14T22:13:20Z
        assert_eq!(format_time_label(1_700_000_000_000, &Utc), "22:13:20");
    }

    #[test]
    fn test_timeline_keeps_last_window() {
        let history: Vec<EmotionSample> = (0..45)
            .map(|i| sample(1_700_000_000_000 + i * 1_000, Emotion::Happy))
            .collect();

        let points = timeline(&history, &Utc);

        assert_eq!(points.len(), TIMELINE_WINDOW);
        assert_eq!(points[0].timestamp, history[15].timestamp);
        assert_eq!(points[0].time, "22:13:35");
        assert_eq!(points[0].value(Emotion::Happy), 100.0);
        assert_eq!(points[0].value(Emotion::Sad), 0.0);
    }

    #[test]
    fn test_timeline_short_history() {
        let history = vec![sample(0, Emotion::Neutral), sample(500, Emotion::Angry)];
        assert_eq!(timeline(&history, &Utc).len(), 2);
        assert!(timeline(&[], &Utc).is_empty());
    }

    #[test]
    fn test_distribution_skips_empty_buckets() {
        let history = vec![
            sample(0, Emotion::Surprised),
            sample(1, Emotion::Neutral),
            sample(2, Emotion::Surprised),
        ];

        let buckets = distribution(&history);

        assert_eq!(
            buckets,
            vec![
                DistributionBucket { emotion: Emotion::Neutral, count: 1 },
                DistributionBucket { emotion: Emotion::Surprised, count: 2 },
            ]
        );
        assert!(distribution(&[]).is_empty());
    }

    #[test]
    fn test_score_bars() {
        let scores: EmotionScoreSet = [(Emotion::Happy, 0.425), (Emotion::Neutral, 0.575)]
            .into_iter()
            .collect();

        let bars = score_bars(&scores);

        assert_eq!(bars.len(), 7);
        assert_eq!(bars[1].emotion, Emotion::Happy);
        assert_eq!(bars[1].label(), "42.5%");
        assert_eq!(bars[2].label(), "0.0%");
    }
}
