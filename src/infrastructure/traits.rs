//! I/O boundary traits for testability
//!
//! Timing and randomness are the only outside-world effects the visualizer
//! needs. Both sit behind traits so services can be tested with scripted
//! implementations.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use rand::Rng;

use crate::domain::Value;

/// Step pacing abstraction.
pub trait Pacer: Send + Sync {
    /// Block the current step for `duration`.
    fn pause(&self, duration: Duration);
}

/// Source of values for random inserts.
pub trait ValueSource: Send + Sync {
    /// Value in the inclusive range `min..=max`.
    fn next_value(&self, min: Value, max: Value) -> Value;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Pacer that sleeps the calling thread.
#[derive(Debug, Default)]
pub struct ThreadSleepPacer;

impl Pacer for ThreadSleepPacer {
    fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Pacer that never waits.
#[derive(Debug, Default)]
pub struct NoPacer;

impl Pacer for NoPacer {
    fn pause(&self, _duration: Duration) {}
}

/// Random values from the thread-local RNG.
#[derive(Debug, Default)]
pub struct ThreadRngSource;

impl ValueSource for ThreadRngSource {
    fn next_value(&self, min: Value, max: Value) -> Value {
        if min >= max {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }
}

// ============================================================
// SCRIPTED IMPLEMENTATIONS
// ============================================================

/// Value source replaying a fixed sequence, clamped to the requested range.
///
/// Once the script is exhausted it keeps returning `min`.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    values: Mutex<VecDeque<Value>>,
}

impl ScriptedSource {
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            values: Mutex::new(values.into_iter().collect()),
        }
    }
}

impl ValueSource for ScriptedSource {
    fn next_value(&self, min: Value, max: Value) -> Value {
        let next = self
            .values
            .lock()
            .ok()
            .and_then(|mut values| values.pop_front())
            .unwrap_or(min);
        next.clamp(min, max.max(min))
    }
}

/// Pacer that records requested pauses instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    pub fn total(&self) -> Duration {
        self.pauses().iter().sum()
    }
}

impl Pacer for RecordingPacer {
    fn pause(&self, duration: Duration) {
        if let Ok(mut pauses) = self.pauses.lock() {
            pauses.push(duration);
        }
    }
}
