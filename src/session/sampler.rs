use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::capture::{Clock, FaceDetector, MediaCapture, RefreshSignal};
use crate::error::SessionError;
use crate::fusion::{estimate_audio_scores, fuse, visual_scores, AudioHeuristicConfig};
use crate::io::KeyValueStore;
use crate::models::{EmotionSample, EmotionScoreSet, FusionWeight};

use super::HistoryStore;

/// Sampling loop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No acquisition, no ticking
    Idle,
    /// Acquisition running, one tick per display frame
    Active,
}

/// Control messages applied by [`SamplingLoop::run`] between ticks
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Stop,
    SetAudioWeight(FusionWeight),
    SetPrivacyMode(bool),
    Reset,
}

/// Configuration for the sampling loop
#[derive(Debug, Clone, Default)]
pub struct SamplerConfig {
    /// Initial audio share of the fusion
    pub audio_weight: FusionWeight,
    /// Audio heuristic tuning
    pub audio: AudioHeuristicConfig,
}

/// Summary of a finished [`SamplingLoop::run`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Samples appended during the run
    pub ticks: u64,
    /// Ticks whose result was dropped because the loop stopped mid-detection
    pub discarded: u64,
}

/// Cloneable handle for controlling a running loop from another task
#[derive(Debug, Clone)]
pub struct SamplerHandle {
    active: Arc<AtomicBool>,
    commands: mpsc::UnboundedSender<Command>,
}

impl SamplerHandle {
    /// Stop sampling. Takes effect immediately for any in-flight tick.
    pub fn stop(&self) {
        self.active.store(false, Ordering::SeqCst);
        let _ = self.commands.send(Command::Stop);
    }

    pub fn set_audio_weight(&self, weight: FusionWeight) {
        let _ = self.commands.send(Command::SetAudioWeight(weight));
    }

    pub fn set_privacy_mode(&self, enabled: bool) {
        let _ = self.commands.send(Command::SetPrivacyMode(enabled));
    }

    pub fn reset(&self) {
        let _ = self.commands.send(Command::Reset);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// What a single tick did
enum TickOutcome {
    Appended(EmotionSample),
    /// The video stream had no frame ready yet
    NoFrame,
    /// Stopped while the detection was in flight
    Discarded,
    Inactive,
}

/// Drives detect, adapt, fuse and append once per display frame
pub struct SamplingLoop<M, D, C> {
    capture: M,
    detector: D,
    clock: C,
    config: SamplerConfig,
    state: LoopState,
    active: Arc<AtomicBool>,
    model_loaded: bool,
    current: Option<EmotionSample>,
    session_id: Option<String>,
}

impl<M, D, C> SamplingLoop<M, D, C>
where
    M: MediaCapture,
    D: FaceDetector,
    C: Clock,
{
    pub fn new(capture: M, detector: D, clock: C, config: SamplerConfig) -> Self {
        Self {
            capture,
            detector,
            clock,
            config,
            state: LoopState::Idle,
            active: Arc::new(AtomicBool::new(false)),
            model_loaded: false,
            current: None,
            session_id: None,
        }
    }

    /// Create a control handle and the matching command receiver for [`run`](Self::run)
    pub fn handle(&self) -> (SamplerHandle, mpsc::UnboundedReceiver<Command>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = SamplerHandle {
            active: self.active.clone(),
            commands: tx,
        };
        (handle, rx)
    }

    /// Idle → Active.
    ///
    /// Loads the face model, starts acquisition and waits for the video
    /// stream to have data. Any failure leaves the loop Idle.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        if self.state == LoopState::Active {
            return Err(SessionError::InvalidTransition(
                "sampling loop is already active".to_string(),
            ));
        }

        if !self.model_loaded {
            self.detector.load().await?;
            self.model_loaded = true;
            debug!("Face detection model loaded");
        }

        self.capture.start().await?;
        if let Err(e) = self.capture.wait_ready().await {
            self.capture.stop();
            return Err(e.into());
        }

        let session_id = uuid::Uuid::new_v4().to_string();
        info!(session_id = %session_id, "Sampling started");
        self.session_id = Some(session_id);
        self.state = LoopState::Active;
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Active → Idle. Halts acquisition; idempotent.
    pub fn stop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        if self.state == LoopState::Idle {
            return;
        }
        self.capture.stop();
        self.state = LoopState::Idle;
        info!(
            session_id = self.session_id.as_deref().unwrap_or("-"),
            "Sampling stopped"
        );
    }

    /// Run one tick: detect, adapt, fuse, stamp, append.
    ///
    /// Returns `None` when the loop is not active, when no video frame is
    /// ready yet, or when it was stopped while the detection was in flight
    /// (the result is discarded).
    pub async fn tick<S: KeyValueStore>(
        &mut self,
        history: &mut HistoryStore<S>,
    ) -> Option<EmotionSample> {
        match self.advance(history).await {
            TickOutcome::Appended(sample) => Some(sample),
            _ => None,
        }
    }

    async fn advance<S: KeyValueStore>(&mut self, history: &mut HistoryStore<S>) -> TickOutcome {
        if !self.is_active() {
            return TickOutcome::Inactive;
        }

        let Some(frame) = self.capture.latest_frame() else {
            return TickOutcome::NoFrame;
        };
        let expressions = self.detector.detect(&frame).await;

        if !self.is_active() {
            debug!("Discarding tick result, sampling stopped during detection");
            return TickOutcome::Discarded;
        }

        let audio_buffer = self.capture.audio_buffer();

        let visual = match &expressions {
            Some(expressions) => visual_scores(expressions),
            None => EmotionScoreSet::neutral(),
        };
        let audio = estimate_audio_scores(audio_buffer.as_deref(), &self.config.audio);
        let fused = fuse(&visual, &audio, self.config.audio_weight);

        let sample = EmotionSample {
            timestamp: self.clock.now_ms(),
            dominant_emotion: fused.dominant_emotion,
            confidence: fused.confidence,
            scores: fused.scores,
            visual_scores: visual,
            audio_scores: audio,
        };

        debug!(
            "Tick: {} ({:.1}%), face={}",
            sample.dominant_emotion,
            sample.confidence * 100.0,
            expressions.is_some()
        );

        history.append(sample.clone());
        self.current = Some(sample.clone());
        TickOutcome::Appended(sample)
    }

    /// Tick once per display frame until stopped or the stream ends.
    ///
    /// Ticks never overlap: the next frame is awaited only after the current
    /// tick settles. Commands are applied between ticks, so all history
    /// mutations happen on this task.
    pub async fn run<S, R>(
        &mut self,
        history: &mut HistoryStore<S>,
        refresh: &mut R,
        commands: &mut mpsc::UnboundedReceiver<Command>,
    ) -> RunSummary
    where
        S: KeyValueStore,
        R: RefreshSignal,
    {
        let mut summary = RunSummary::default();
        let mut commands_open = true;

        while self.state == LoopState::Active {
            if !self.is_active() {
                self.stop();
                break;
            }
            if self.capture.ended() {
                info!("Capture stream ended");
                self.stop();
                break;
            }

            tokio::select! {
                biased;

                command = commands.recv(), if commands_open => match command {
                    Some(command) => self.apply(command, history),
                    None => commands_open = false,
                },

                _ = refresh.next_frame() => {
                    match self.advance(history).await {
                        TickOutcome::Appended(_) => summary.ticks += 1,
                        TickOutcome::Discarded => summary.discarded += 1,
                        TickOutcome::NoFrame | TickOutcome::Inactive => {}
                    }
                }
            }
        }

        info!(
            "Run finished: {} samples, {} discarded",
            summary.ticks, summary.discarded
        );
        summary
    }

    fn apply<S: KeyValueStore>(&mut self, command: Command, history: &mut HistoryStore<S>) {
        match command {
            Command::Stop => self.stop(),
            Command::SetAudioWeight(weight) => {
                debug!("Audio weight set to {}%", weight.audio_percent());
                self.config.audio_weight = weight;
            }
            Command::SetPrivacyMode(enabled) => history.set_privacy_mode(enabled),
            Command::Reset => {
                history.reset();
                self.current = None;
            }
        }
    }

    /// Whether ticks are currently allowed to run
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Latest sample of this session, `None` before the first tick or after a reset
    pub fn current(&self) -> Option<&EmotionSample> {
        self.current.as_ref()
    }

    pub fn audio_weight(&self) -> FusionWeight {
        self.config.audio_weight
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn capture(&self) -> &M {
        &self.capture
    }
}
