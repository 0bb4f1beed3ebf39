//! Capability interfaces for everything the fusion core consumes from the
//! outside world: camera/microphone, the face model, time, the display
//! refresh signal and chart rendering.

pub mod clock;
pub mod refresh;
pub mod replay;

pub use clock::*;
pub use refresh::*;
pub use replay::*;

use async_trait::async_trait;

use crate::error::{CaptureError, DetectorError};
use crate::fusion::FaceExpressions;
use crate::session::{DistributionBucket, TimelinePoint};

/// A single video frame handed to the face detector
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    /// Frame sequence number since acquisition started
    pub index: u64,
    pub width: u32,
    pub height: u32,
    /// Raw pixel data, layout defined by the capture backend
    pub pixels: Vec<u8>,
}

/// Camera and microphone acquisition
#[async_trait]
pub trait MediaCapture: Send {
    /// Begin acquisition. Fails when permissions are denied or devices missing.
    async fn start(&mut self) -> Result<(), CaptureError>;

    /// Resolve once the video stream has enough buffered data to analyze
    async fn wait_ready(&mut self) -> Result<(), CaptureError>;

    /// Halt acquisition and release devices
    fn stop(&mut self);

    /// Most recent video frame, if any
    fn latest_frame(&mut self) -> Option<VideoFrame>;

    /// Most recent unsigned 8-bit time-domain audio snapshot, `None` when
    /// audio capture is inactive
    fn audio_buffer(&self) -> Option<Vec<u8>>;

    /// Whether the stream has ended and no more frames will arrive
    fn ended(&self) -> bool {
        false
    }
}

/// Face-expression model
#[async_trait]
pub trait FaceDetector: Send {
    /// Initialize the model. Called before the first detection.
    async fn load(&mut self) -> Result<(), DetectorError>;

    /// Detect a single face and return its expression probabilities, `None`
    /// when no face is visible
    async fn detect(&mut self, frame: &VideoFrame) -> Option<FaceExpressions>;
}

/// Consumer of the chart projections
pub trait ChartRenderer {
    fn render_timeline(&mut self, points: &[TimelinePoint]);
    fn render_distribution(&mut self, buckets: &[DistributionBucket]);
}
