#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Elapsed-time system that counts whole seconds of play.

use std::time::Duration;

use labyrinth_core::Event;

const SECOND: Duration = Duration::from_secs(1);

/// Pure system that turns simulation time into a whole-second play clock.
///
/// The clock starts when the run starts, keeps counting across level
/// transitions and stops for good once the run is complete.
#[derive(Debug, Default)]
pub struct Clock {
    running: bool,
    finished: bool,
    accumulator: Duration,
    elapsed_seconds: u64,
}

impl Clock {
    /// Creates a stopped clock reading zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and advances the clock.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::GameStarted if !self.finished => self.running = true,
                Event::TimeAdvanced { dt } if self.running => {
                    self.accumulator = self.accumulator.saturating_add(*dt);
                    self.resolve_whole_seconds();
                }
                Event::GameComplete { .. } => {
                    self.running = false;
                    self.finished = true;
                }
                _ => {}
            }
        }
    }

    /// Whole seconds counted so far.
    #[must_use]
    pub const fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Whether the clock is currently counting.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the run finished and the clock froze.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    fn resolve_whole_seconds(&mut self) {
        while self.accumulator >= SECOND {
            self.accumulator -= SECOND;
            self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        }
    }
}
