//! Abstraction for sleeping between attempts.
//!
//! Attempts are strictly sequential, so sleeping blocks the calling thread.
//! Tests substitute [`InstantSleeper`] or [`TrackingSleeper`] to run fast
//! and assert on the delays the engine requested.

use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Abstraction for blocking between attempts.
pub trait Sleeper: Send + Sync + std::fmt::Debug {
    /// Block the current thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Test sleeper that doesn't actually sleep.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    fn sleep(&self, _duration: Duration) {}
}

/// Test sleeper that records all sleep calls without sleeping.
#[derive(Debug, Clone)]
pub struct TrackingSleeper {
    calls: Arc<Mutex<Vec<Duration>>>,
}

impl TrackingSleeper {
    pub fn new() -> Self {
        Self { calls: Arc::new(Mutex::new(Vec::new())) }
    }

    /// All recorded sleep durations, in call order.
    pub fn calls(&self) -> Vec<Duration> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl Default for TrackingSleeper {
    fn default() -> Self {
        Self::new()
    }
}

impl Sleeper for TrackingSleeper {
    fn sleep(&self, duration: Duration) {
        self.calls.lock().unwrap().push(duration);
    }
}
