use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{CaptureError, DetectorError};
use crate::fusion::FaceExpressions;
use crate::io::CaptureRecording;

use super::{FaceDetector, MediaCapture, VideoFrame};

const REPLAY_WIDTH: u32 = 640;
const REPLAY_HEIGHT: u32 = 480;

/// Media capture that plays back a recorded session frame by frame
pub struct ReplayCapture {
    recording: Arc<CaptureRecording>,
    cursor: usize,
    running: bool,
    fail_with: Option<CaptureError>,
}

impl ReplayCapture {
    pub fn new(recording: Arc<CaptureRecording>) -> Self {
        Self {
            recording,
            cursor: 0,
            running: false,
            fail_with: None,
        }
    }

    /// Make `start` fail as if device access was refused
    pub fn failing(recording: Arc<CaptureRecording>, error: CaptureError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::new(recording)
        }
    }

    /// Number of frames handed out so far
    pub fn frames_played(&self) -> usize {
        self.cursor
    }
}

#[async_trait]
impl MediaCapture for ReplayCapture {
    async fn start(&mut self) -> Result<(), CaptureError> {
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }
        info!("Replaying {} recorded frames", self.recording.frames.len());
        self.running = true;
        Ok(())
    }

    async fn wait_ready(&mut self) -> Result<(), CaptureError> {
        if self.running {
            Ok(())
        } else {
            Err(CaptureError::Unavailable("capture not started".to_string()))
        }
    }

    fn stop(&mut self) {
        if self.running {
            debug!("Replay stopped after {} frames", self.cursor);
        }
        self.running = false;
    }

    fn latest_frame(&mut self) -> Option<VideoFrame> {
        if !self.running || self.cursor >= self.recording.frames.len() {
            return None;
        }
        let frame = VideoFrame {
            index: self.cursor as u64,
            width: REPLAY_WIDTH,
            height: REPLAY_HEIGHT,
            pixels: Vec::new(),
        };
        self.cursor += 1;
        Some(frame)
    }

    fn audio_buffer(&self) -> Option<Vec<u8>> {
        // Audio snapshot belongs to the frame handed out last
        let current = self.cursor.checked_sub(1)?;
        self.recording.frames.get(current)?.audio.clone()
    }

    fn ended(&self) -> bool {
        self.cursor >= self.recording.frames.len()
    }
}

/// Face detector returning the expressions recorded for each frame
pub struct ReplayDetector {
    recording: Arc<CaptureRecording>,
    loaded: bool,
    fail_with: Option<DetectorError>,
}

impl ReplayDetector {
    pub fn new(recording: Arc<CaptureRecording>) -> Self {
        Self {
            recording,
            loaded: false,
            fail_with: None,
        }
    }

    /// Make `load` fail as if the model weights could not be fetched
    pub fn failing(recording: Arc<CaptureRecording>, error: DetectorError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::new(recording)
        }
    }
}

#[async_trait]
impl FaceDetector for ReplayDetector {
    async fn load(&mut self) -> Result<(), DetectorError> {
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }
        self.loaded = true;
        Ok(())
    }

    async fn detect(&mut self, frame: &VideoFrame) -> Option<FaceExpressions> {
        if !self.loaded {
            return None;
        }
        self.recording
            .frames
            .get(frame.index as usize)?
            .expressions
            .clone()
    }
}
