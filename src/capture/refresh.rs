use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Interval, MissedTickBehavior};

/// Display refresh signal: one tick is scheduled per repaint opportunity
#[async_trait]
pub trait RefreshSignal: Send {
    /// Wait for the next display frame
    async fn next_frame(&mut self);
}

#[async_trait]
impl<R: RefreshSignal + ?Sized> RefreshSignal for Box<R> {
    async fn next_frame(&mut self) {
        (**self).next_frame().await
    }
}

/// Refresh at a fixed frame rate.
///
/// Missed frames are skipped, so a slow tick never triggers a burst of
/// catch-up ticks.
pub struct IntervalRefresh {
    interval: Interval,
}

impl IntervalRefresh {
    pub fn new(fps: u32) -> Self {
        let period = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }
}

#[async_trait]
impl RefreshSignal for IntervalRefresh {
    async fn next_frame(&mut self) {
        self.interval.tick().await;
    }
}

/// Refresh as fast as the scheduler allows; used for offline replays
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateRefresh;

#[async_trait]
impl RefreshSignal for ImmediateRefresh {
    async fn next_frame(&mut self) {
        tokio::task::yield_now().await;
    }
}
