pub mod capture;
pub mod error;
pub mod fusion;
pub mod io;
pub mod models;
pub mod session;

pub use capture::{
    ChartRenderer, Clock, FaceDetector, ImmediateRefresh, IntervalRefresh, MediaCapture,
    RefreshSignal, ReplayCapture, ReplayDetector, SteppedClock, SystemClock, VideoFrame,
};
pub use error::{CaptureError, DetectorError, SessionError, StorageError};
pub use fusion::{
    dominant_emotion, estimate_audio_scores, fuse, normalize_scores, visual_scores,
    AudioHeuristicConfig, FaceExpressions, FusedScores,
};
pub use io::{
    parse_recording_file, parse_session_file, write_session_json, CaptureRecording, FileStore,
    KeyValueStore, MemoryStore, TextChartRenderer,
};
pub use models::{Emotion, EmotionSample, EmotionScoreSet, FusionWeight, Settings};
pub use session::{
    aggregate, distribution, score_bars, timeline, Command, HistoryStore, LoopState,
    SamplerConfig, SamplerHandle, SamplingLoop, SessionStats,
};
