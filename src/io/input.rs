use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::fusion::FaceExpressions;
use crate::models::EmotionSample;

/// A recorded capture session: what the face model and the microphone
/// analyser reported on each display frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureRecording {
    pub frames: Vec<RecordedFrame>,
}

/// One display frame of a recording
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Face-model expressions, `null` when no face was detected
    #[serde(default)]
    pub expressions: Option<FaceExpressions>,
    /// Unsigned 8-bit time-domain audio snapshot, `null` when capture was off
    #[serde(default)]
    pub audio: Option<Vec<u8>>,
}

/// Parse a recorded capture file
pub fn parse_recording_file(path: &Path) -> Result<CaptureRecording> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_recording_json(&content)
}

/// Parse a recorded capture from a JSON string
pub fn parse_recording_json(json: &str) -> Result<CaptureRecording> {
    serde_json::from_str(json).context("Failed to parse capture recording JSON")
}

/// Parse an exported session (JSON array of samples)
pub fn parse_session_file(path: &Path) -> Result<Vec<EmotionSample>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_session_json(&content)
}

/// Parse an exported session from a JSON string
pub fn parse_session_json(json: &str) -> Result<Vec<EmotionSample>> {
    serde_json::from_str(json).context("Failed to parse session JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Emotion;

    #[test]
    fn test_parse_recording_json() {
        let json = r#"{
            "frames": [
                {"expressions": {"happy": 0.9, "neutral": 0.1}, "audio": [128, 130, 126]},
                {"expressions": null, "audio": null},
                {}
            ]
        }"#;

        let recording = parse_recording_json(json).unwrap();

        assert_eq!(recording.frames.len(), 3);
        let first = recording.frames[0].expressions.as_ref().unwrap();
        assert_eq!(first.0.get("happy"), Some(&0.9));
        assert_eq!(recording.frames[0].audio.as_deref(), Some(&[128u8, 130, 126][..]));
        assert!(recording.frames[1].expressions.is_none());
        assert!(recording.frames[2].audio.is_none());
    }

    #[test]
    fn test_parse_session_json() {
        let json = r#"[
            {
                "timestamp": 1000,
                "dominantEmotion": "Sad",
                "confidence": 0.6,
                "scores": {"Sad": 0.6, "Neutral": 0.4},
                "visualScores": {"Sad": 1.0},
                "audioScores": {"Neutral": 1.0}
            }
        ]"#;

        let samples = parse_session_json(json).unwrap();

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].dominant_emotion, Emotion::Sad);
        assert_eq!(samples[0].scores.get(Emotion::Neutral), 0.4);
    }

    #[test]
    fn test_parse_session_rejects_garbage() {
        assert!(parse_session_json("{not json").is_err());
    }
}
