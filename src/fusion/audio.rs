use crate::models::{Emotion, EmotionScoreSet};

use super::normalize_scores;

/// Tuning constants for the volume heuristic.
///
/// None of these are derived from a signal property. The defaults are the
/// reference values; changing them changes observable fusion output.
#[derive(Debug, Clone)]
pub struct AudioHeuristicConfig {
    /// Gain applied to the RMS level before clamping to 1.0
    pub amplification: f64,
    /// Share of volume attributed to Happy
    pub happy_weight: f64,
    /// Share of volume attributed to Angry
    pub angry_weight: f64,
    /// Share of volume attributed to Surprised
    pub surprised_weight: f64,
}

impl Default for AudioHeuristicConfig {
    fn default() -> Self {
        Self {
            amplification: 5.0,
            happy_weight: 0.3,
            angry_weight: 0.5,
            surprised_weight: 0.2,
        }
    }
}

/// Loudness of an unsigned 8-bit time-domain buffer in [0, 1].
///
/// Samples are centred on 128. Returns `None` for an empty buffer.
pub fn audio_volume(buffer: &[u8], amplification: f64) -> Option<f64> {
    if buffer.is_empty() {
        return None;
    }

    let sum: f64 = buffer
        .iter()
        .map(|&sample| {
            let value = sample as f64 / 128.0 - 1.0;
            value * value
        })
        .sum();
    let rms = (sum / buffer.len() as f64).sqrt();

    Some((rms * amplification).min(1.0))
}

/// Estimate emotion scores from instantaneous loudness.
///
/// Quiet input leans Neutral, loud input spreads over the "active" emotions.
/// No pitch or spectral analysis. A missing or empty buffer is silence.
pub fn estimate_audio_scores(buffer: Option<&[u8]>, config: &AudioHeuristicConfig) -> EmotionScoreSet {
    let Some(volume) = buffer.and_then(|b| audio_volume(b, config.amplification)) else {
        return EmotionScoreSet::neutral();
    };

    let raw: EmotionScoreSet = [
        (Emotion::Neutral, 1.0 - volume),
        (Emotion::Happy, volume * config.happy_weight),
        (Emotion::Sad, 0.0),
        (Emotion::Angry, volume * config.angry_weight),
        (Emotion::Fearful, 0.0),
        (Emotion::Disgusted, 0.0),
        (Emotion::Surprised, volume * config.surprised_weight),
    ]
    .into_iter()
    .collect();

    normalize_scores(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_no_buffer_is_neutral() {
        let config = AudioHeuristicConfig::default();
        assert_eq!(estimate_audio_scores(None, &config), EmotionScoreSet::neutral());
        assert_eq!(estimate_audio_scores(Some(&[]), &config), EmotionScoreSet::neutral());
    }

    #[test]
    fn test_silence_is_neutral() {
        let buffer = vec![128u8; 1024];
        assert_eq!(audio_volume(&buffer, 5.0), Some(0.0));

        let scores = estimate_audio_scores(Some(&buffer), &AudioHeuristicConfig::default());
        assert_eq!(scores.get(Emotion::Neutral), 1.0);
        for emotion in &Emotion::ALL[1..] {
            assert_eq!(scores.get(*emotion), 0.0);
        }
    }

    #[test]
    fn test_square_wave_saturates() {
        let buffer: Vec<u8> = (0..1024).map(|i| if i % 2 == 0 { 0 } else { 255 }).collect();
        assert_eq!(audio_volume(&buffer, 5.0), Some(1.0));

        let scores = estimate_audio_scores(Some(&buffer), &AudioHeuristicConfig::default());
        assert!(scores.get(Emotion::Neutral).abs() < EPS);
        assert!((scores.get(Emotion::Happy) - 0.3).abs() < EPS);
        assert!((scores.get(Emotion::Angry) - 0.5).abs() < EPS);
        assert!((scores.get(Emotion::Surprised) - 0.2).abs() < EPS);
        assert!((scores.total() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_partial_volume() {
        // Constant offset of 0.125 from centre gives RMS 0.125, volume 0.625
        let buffer = vec![144u8; 256];
        let volume = audio_volume(&buffer, 5.0).unwrap();
        assert!((volume - 0.625).abs() < EPS);

        let scores = estimate_audio_scores(Some(&buffer), &AudioHeuristicConfig::default());
        assert!((scores.get(Emotion::Neutral) - 0.375).abs() < EPS);
        assert!((scores.get(Emotion::Angry) - 0.3125).abs() < EPS);
    }

    #[test]
    fn test_amplification_is_configurable() {
        let buffer = vec![144u8; 256];
        let config = AudioHeuristicConfig {
            amplification: 1.0,
            ..Default::default()
        };
        let scores = estimate_audio_scores(Some(&buffer), &config);
        assert!((scores.get(Emotion::Neutral) - 0.875).abs() < EPS);
    }
}
