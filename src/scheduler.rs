use std::time::{Duration, Instant};

/// Timer seam the engine rearms after every tick.
///
/// At most one tick is pending at any time: `schedule` replaces whatever was
/// pending before.
pub trait TickScheduler {
    /// Arms the next tick `period` from now, replacing any pending one.
    fn schedule(&mut self, period: Duration);

    /// Drops the pending tick, if any.
    fn cancel(&mut self);
}

/// Scheduler without a clock: records what the engine asked for.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    pending: Option<Duration>,
    armed_count: u64,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the period of the pending tick.
    #[must_use]
    pub fn pending(&self) -> Option<Duration> {
        self.pending
    }

    /// Returns how many times a tick has been armed.
    #[must_use]
    pub fn armed_count(&self) -> u64 {
        self.armed_count
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule(&mut self, period: Duration) {
        self.pending = Some(period);
        self.armed_count += 1;
    }

    fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Wall-clock scheduler polled by the terminal host.
#[derive(Debug, Clone, Default)]
pub struct DeadlineScheduler {
    deadline: Option<Instant>,
}

impl DeadlineScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when a tick is pending and its deadline has passed.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Returns the time left until the pending tick, or `None` when idle.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    fn schedule_from(&mut self, now: Instant, period: Duration) {
        self.deadline = Some(now + period);
    }
}

impl TickScheduler for DeadlineScheduler {
    fn schedule(&mut self, period: Duration) {
        self.schedule_from(Instant::now(), period);
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }
}
