use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use crate::capture::ChartRenderer;
use crate::models::{Emotion, EmotionSample, EmotionScoreSet};
use crate::session::{score_bars, DistributionBucket, SessionStats, TimelinePoint};

const BAR_WIDTH: usize = 30;

/// Write a session history as a pretty-printed JSON array
pub fn write_session_json(samples: &[EmotionSample], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, samples).context("Failed to write JSON")?;
    Ok(())
}

/// Plain-text chart renderer writing into an in-memory buffer
#[derive(Debug, Default)]
pub struct TextChartRenderer {
    output: String,
}

impl TextChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered text so far
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }
}

impl ChartRenderer for TextChartRenderer {
    fn render_timeline(&mut self, points: &[TimelinePoint]) {
        if points.is_empty() {
            self.output.push_str("No data yet.\n");
            return;
        }
        for point in points {
            // Dominant series per point keeps the line readable
            let (index, value) = point
                .values
                .iter()
                .copied()
                .enumerate()
                .fold((0, f64::MIN), |best, cur| if cur.1 > best.1 { cur } else { best });
            let emotion = Emotion::ALL[index];
            let _ = writeln!(
                self.output,
                "{} {:<9} {:>5.1}% {}",
                point.time,
                emotion,
                value,
                bar(value / 100.0)
            );
        }
    }

    fn render_distribution(&mut self, buckets: &[DistributionBucket]) {
        let total: usize = buckets.iter().map(|b| b.count).sum();
        if total == 0 {
            self.output.push_str("No data yet.\n");
            return;
        }
        for bucket in buckets {
            let share = bucket.count as f64 / total as f64;
            let _ = writeln!(
                self.output,
                "{:<9} {:>6} {:>5.1}% {}",
                bucket.emotion,
                bucket.count,
                share * 100.0,
                bar(share)
            );
        }
    }
}

/// Format session statistics as labelled lines
pub fn format_stats(stats: &SessionStats) -> String {
    format!(
        "Session Duration: {}\nDominant Emotion: {}\nEmotion Switches: {}\n",
        stats.duration_label(),
        stats.dominant_label(),
        stats.switches
    )
}

/// Format per-emotion confidence bars for a score set
pub fn format_score_bars(scores: &EmotionScoreSet) -> String {
    let mut output = String::new();
    for score in score_bars(scores) {
        let _ = writeln!(
            output,
            "{:<9} {:>6} {}",
            score.emotion,
            score.label(),
            bar(score.percent / 100.0)
        );
    }
    output
}

fn bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled)
}
