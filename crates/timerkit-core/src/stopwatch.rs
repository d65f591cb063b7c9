//! Elapsed-time stopwatch.
//!
//! Counts hundredths of a second, one per `tick()`. The host decides how often
//! to tick (every 10ms of wall time for a real stopwatch); the engine only
//! counts calls.

use serde::{Deserialize, Serialize};

use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopwatchState {
    Stopped,
    Running,
}

/// A recorded lap. Lap 1 is the oldest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lap {
    pub number: usize,
    pub elapsed_hundredths: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StopwatchEngine {
    running: bool,
    elapsed_hundredths: u64,
    /// Most recent first.
    laps: Vec<u64>,
}

impl StopwatchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> StopwatchState {
        if self.running {
            StopwatchState::Running
        } else {
            StopwatchState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed_hundredths(&self) -> u64 {
        self.elapsed_hundredths
    }

    /// Recorded laps, most recent first.
    pub fn laps(&self) -> Vec<Lap> {
        let total = self.laps.len();
        self.laps
            .iter()
            .enumerate()
            .map(|(i, &elapsed_hundredths)| Lap {
                number: total - i,
                elapsed_hundredths,
            })
            .collect()
    }

    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        Some(Event::StopwatchStarted {
            elapsed_hundredths: self.elapsed_hundredths,
        })
    }

    pub fn stop(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Event::StopwatchStopped {
            elapsed_hundredths: self.elapsed_hundredths,
        })
    }

    pub fn toggle(&mut self) -> Option<Event> {
        if self.running {
            self.stop()
        } else {
            self.start()
        }
    }

    /// Count one quantum. Returns the new elapsed value while running.
    pub fn tick(&mut self) -> Option<u64> {
        if !self.running {
            return None;
        }
        self.elapsed_hundredths += 1;
        Some(self.elapsed_hundredths)
    }

    pub fn lap(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.laps.insert(0, self.elapsed_hundredths);
        Some(Event::LapRecorded {
            number: self.laps.len(),
            elapsed_hundredths: self.elapsed_hundredths,
        })
    }

    pub fn reset(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.elapsed_hundredths = 0;
        self.laps.clear();
        Some(Event::StopwatchReset)
    }

    /// The secondary button: lap while running, reset while stopped.
    pub fn lap_or_reset(&mut self) -> Option<Event> {
        if self.running {
            self.lap()
        } else {
            self.reset()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_while_running() {
        let mut sw = StopwatchEngine::new();
        assert!(sw.tick().is_none());
        sw.start();
        for _ in 0..150 {
            sw.tick();
        }
        sw.stop();
        assert!(sw.tick().is_none());
        assert_eq!(sw.elapsed_hundredths(), 150);
        assert_eq!(sw.state(), StopwatchState::Stopped);
    }

    #[test]
    fn laps_are_most_recent_first() {
        let mut sw = StopwatchEngine::new();
        sw.toggle();
        sw.tick();
        sw.lap();
        sw.tick();
        sw.tick();
        sw.lap();
        let laps = sw.laps();
        assert_eq!(
            laps,
            vec![
                Lap { number: 2, elapsed_hundredths: 3 },
                Lap { number: 1, elapsed_hundredths: 1 },
            ]
        );
    }

    #[test]
    fn lap_requires_running_and_reset_requires_stopped() {
        let mut sw = StopwatchEngine::new();
        assert!(sw.lap().is_none());
        sw.start();
        sw.tick();
        assert!(sw.reset().is_none());
        assert_eq!(sw.elapsed_hundredths(), 1);
        sw.stop();
        assert!(sw.lap().is_none());
        assert!(sw.reset().is_some());
        assert_eq!(sw.elapsed_hundredths(), 0);
        assert!(sw.laps().is_empty());
    }

    #[test]
    fn secondary_button_switches_on_state() {
        let mut sw = StopwatchEngine::new();
        sw.start();
        sw.tick();
        assert!(matches!(sw.lap_or_reset(), Some(Event::LapRecorded { number: 1, .. })));
        sw.stop();
        assert!(matches!(sw.lap_or_reset(), Some(Event::StopwatchReset)));
    }
}
