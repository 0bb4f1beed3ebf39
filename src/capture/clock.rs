use chrono::Utc;

/// Wall-clock source used to stamp samples
pub trait Clock: Send {
    /// Current time in Unix milliseconds
    fn now_ms(&mut self) -> i64;
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now_ms(&mut self) -> i64 {
        (**self).now_ms()
    }
}

/// System wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&mut self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Deterministic clock that advances by a fixed step on every reading
#[derive(Debug, Clone)]
pub struct SteppedClock {
    next_ms: i64,
    step_ms: i64,
}

impl SteppedClock {
    pub fn new(start_ms: i64, step_ms: i64) -> Self {
        Self {
            next_ms: start_ms,
            step_ms,
        }
    }
}

impl Clock for SteppedClock {
    fn now_ms(&mut self) -> i64 {
        let now = self.next_ms;
        self.next_ms += self.step_ms;
        now
    }
}
