//! Wall-clock instrumentation around engine phases.
//!
//! The engine itself never reads the clock. Callers wrap each phase call in
//! [`PhaseTimer::measure`] and read durations afterwards.

use std::time::{Duration, Instant};

/// A timed stage of one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Forced initial pulls.
    Init,
    /// Adaptive elimination rounds.
    Run,
    /// Extra pulls over the reporting window.
    Extract,
    /// Exhaustive verification.
    Brute,
}

impl Phase {
    const COUNT: usize = 4;

    fn slot(self) -> usize {
        match self {
            Phase::Init => 0,
            Phase::Run => 1,
            Phase::Extract => 2,
            Phase::Brute => 3,
        }
    }
}

/// Accumulated durations per [`Phase`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseTimer {
    durations: [Duration; Phase::COUNT],
}

impl PhaseTimer {
    /// Creates a timer with every phase at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f`, adds its wall-clock time to `phase`, and returns its output.
    pub fn measure<T>(&mut self, phase: Phase, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.durations[phase.slot()] += start.elapsed();
        out
    }

    /// Total time recorded for `phase`.
    pub fn get(&self, phase: Phase) -> Duration {
        self.durations[phase.slot()]
    }

    /// Total time recorded for `phase`, in milliseconds.
    pub fn millis(&self, phase: Phase) -> f64 {
        self.get(phase).as_secs_f64() * 1e3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_returns_value_and_accumulates() {
        let mut timer = PhaseTimer::new();
        let v = timer.measure(Phase::Init, || {
            std::thread::sleep(Duration::from_millis(2));
            41 + 1
        });
        assert_eq!(v, 42);
        assert!(timer.get(Phase::Init) >= Duration::from_millis(2));
        assert_eq!(timer.get(Phase::Run), Duration::ZERO);

        let before = timer.get(Phase::Init);
        timer.measure(Phase::Init, || std::thread::sleep(Duration::from_millis(1)));
        assert!(timer.get(Phase::Init) > before);
    }

    #[test]
    fn test_millis() {
        let mut timer = PhaseTimer::new();
        timer.measure(Phase::Brute, || std::thread::sleep(Duration::from_millis(3)));
        assert!(timer.millis(Phase::Brute) >= 3.0);
        assert_eq!(timer.millis(Phase::Extract), 0.0);
    }
}
