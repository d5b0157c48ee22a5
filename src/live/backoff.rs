use std::time::Duration;

const DEFAULT_INITIAL: Duration = Duration::from_secs(1);
const DEFAULT_MAX: Duration = Duration::from_secs(30);
const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Reconnect policy for the monitor stream. The delay starts at the
/// initial value and doubles per consecutive failure up to the cap; after
/// `max_attempts` failures the feed gives up. At most one reconnect can be
/// armed at a time.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    max_attempts: u32,
    delay: Duration,
    attempts: u32,
    armed: bool,
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::new(DEFAULT_INITIAL, DEFAULT_MAX, DEFAULT_MAX_ATTEMPTS)
    }
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration, max_attempts: u32) -> Self {
        Backoff {
            initial,
            max,
            max_attempts,
            delay: initial,
            attempts: 0,
            armed: false,
        }
    }

    /// Registers a failure and arms a reconnect, returning the delay to
    /// wait. Returns `None` when a reconnect is already armed or the
    /// attempt budget is spent.
    pub fn arm(&mut self) -> Option<Duration> {
        if self.armed || self.attempts >= self.max_attempts {
            return None;
        }
        self.armed = true;
        self.attempts += 1;
        let delay = self.delay;
        self.delay = (self.delay * 2).min(self.max);
        Some(delay)
    }

    /// The armed reconnect has fired; another failure may arm again.
    pub fn fired(&mut self) {
        self.armed = false;
    }

    /// A connection was established; delay and attempt count reset.
    pub fn succeeded(&mut self) {
        self.delay = self.initial;
        self.attempts = 0;
        self.armed = false;
    }

    pub fn gave_up(&self) -> bool {
        self.attempts >= self.max_attempts && !self.armed
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}
