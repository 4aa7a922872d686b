//! Politeness pacing between provider queries and between categories.
//!
//! Delays are drawn uniformly from a configured `[min, max]` range. The actual
//! sleeping goes through [`Sleeper`] so the driver can be exercised without
//! waiting in tests.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inclusive range of seconds a pacing delay is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl DelayRange {
    pub const ZERO: DelayRange = DelayRange {
        min_secs: 0.0,
        max_secs: 0.0,
    };

    pub fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    /// Draw a delay from the range. Negative or inverted bounds are clamped so
    /// the result always lies in `[max(min, 0), max(min, max, 0)]`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let lo = self.min_secs.max(0.0);
        let hi = self.max_secs.max(lo);
        if hi <= lo {
            return Duration::from_secs_f64(lo);
        }
        Duration::from_secs_f64(rng.gen_range(lo..=hi))
    }
}

/// Blocks the current thread for a pacing delay.
pub trait Sleeper {
    fn sleep(&mut self, d: Duration);
}

/// Real sleeper backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, d: Duration) {
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }
}

/// Why the driver is pausing; recorded by the pacer for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseKind {
    Query,
    Category,
}

/// Applies randomized delays between queries and between categories.
pub struct Pacer<S: Sleeper = ThreadSleeper> {
    query: DelayRange,
    category: DelayRange,
    sleeper: S,
    rng: rand::rngs::ThreadRng,
}

impl Pacer<ThreadSleeper> {
    pub fn new(query: DelayRange, category: DelayRange) -> Self {
        Self::with_sleeper(query, category, ThreadSleeper)
    }
}

impl<S: Sleeper> Pacer<S> {
    pub fn with_sleeper(query: DelayRange, category: DelayRange, sleeper: S) -> Self {
        Self {
            query,
            category,
            sleeper,
            rng: rand::thread_rng(),
        }
    }

    /// Pause after a provider query, successful or not.
    pub fn after_query(&mut self) -> Duration {
        self.pause(PauseKind::Query)
    }

    /// Pause between two categories.
    pub fn between_categories(&mut self) -> Duration {
        self.pause(PauseKind::Category)
    }

    fn pause(&mut self, kind: PauseKind) -> Duration {
        let range = match kind {
            PauseKind::Query => self.query,
            PauseKind::Category => self.category,
        };
        let d = range.sample(&mut self.rng);
        tracing::trace!(?kind, delay_ms = d.as_millis() as u64, "pacing");
        self.sleeper.sleep(d);
        d
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<Duration>);

    impl Sleeper for Recorder {
        fn sleep(&mut self, d: Duration) {
            self.0.push(d);
        }
    }

    #[test]
    fn sample_stays_within_bounds() {
        let range = DelayRange::new(0.5, 1.5);
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let d = range.sample(&mut rng);
            assert!(d >= Duration::from_millis(500));
            assert!(d <= Duration::from_millis(1500));
        }
    }

    #[test]
    fn degenerate_and_inverted_ranges_clamp() {
        let mut rng = rand::thread_rng();
        assert_eq!(DelayRange::ZERO.sample(&mut rng), Duration::ZERO);
        assert_eq!(
            DelayRange::new(2.0, 1.0).sample(&mut rng),
            Duration::from_secs(2)
        );
        assert_eq!(DelayRange::new(-1.0, -0.5).sample(&mut rng), Duration::ZERO);
    }

    #[test]
    fn pacer_uses_distinct_ranges() {
        let mut pacer = Pacer::with_sleeper(
            DelayRange::new(0.1, 0.1),
            DelayRange::new(3.0, 3.0),
            Recorder::default(),
        );
        pacer.after_query();
        pacer.between_categories();
        assert_eq!(
            pacer.sleeper().0,
            vec![Duration::from_millis(100), Duration::from_secs(3)]
        );
    }
}
