//! Terminal host plumbing shared by the `run` commands: the clock, keyboard
//! input, cue playback and event output.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use timerkit_core::storage::SignalsConfig;
use timerkit_core::{Cue, Event, SignalSink};

/// How a run is driven and printed.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Deliver ticks back to back instead of waiting for the clock.
    pub fast: bool,
    /// Print events as JSON lines instead of text.
    pub json: bool,
}

pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
}

/// Fixed-cadence tick source.
pub struct Ticker {
    interval: Option<Interval>,
}

impl Ticker {
    pub fn new(period: Duration, fast: bool) -> Self {
        let interval = (!fast).then(|| {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        Self { interval }
    }

    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => tokio::task::yield_now().await,
        }
    }

    /// Restart the period from now, so a resume never delivers a burst of
    /// ticks missed while paused.
    pub fn restart(&mut self) {
        if let Some(interval) = self.interval.as_mut() {
            interval.reset();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Start,
    Pause,
    Reset,
    Next,
    Lap,
    Quit,
    Other,
}

impl Key {
    fn parse(line: &str) -> Self {
        match line.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('s') => Key::Start,
            Some('p') => Key::Pause,
            Some('r') => Key::Reset,
            Some('n') => Key::Next,
            Some('l') => Key::Lap,
            Some('q') => Key::Quit,
            _ => Key::Other,
        }
    }
}

/// Line-based keyboard commands from stdin.
pub struct Keys {
    lines: Option<Lines<BufReader<Stdin>>>,
}

impl Keys {
    pub fn new(enabled: bool) -> Self {
        let lines = enabled.then(|| BufReader::new(tokio::io::stdin()).lines());
        Self { lines }
    }

    /// Next command, or `None` once stdin is closed. Disabled input never
    /// resolves.
    pub async fn next(&mut self) -> Option<Key> {
        let Some(lines) = self.lines.as_mut() else {
            return std::future::pending().await;
        };
        let next = lines.next_line().await;
        match next {
            Ok(Some(line)) => Some(Key::parse(&line)),
            Ok(None) => {
                self.lines = None;
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "keyboard input closed");
                self.lines = None;
                None
            }
        }
    }
}

/// Rings the terminal bell for cues the user has enabled.
pub struct TerminalSignals {
    sound: bool,
    haptic: bool,
}

impl TerminalSignals {
    pub fn new(config: &SignalsConfig) -> Self {
        Self {
            sound: config.sound,
            haptic: config.haptic,
        }
    }

    fn bell(&self) {
        eprint!("\x07");
    }
}

impl SignalSink for TerminalSignals {
    fn on_tick_signal(&mut self, cue: Cue) {
        let ring = match cue {
            Cue::Beep => self.sound,
            // A terminal cannot vibrate; the bell stands in.
            Cue::Haptic => self.haptic,
            Cue::All => self.sound || self.haptic,
        };
        if ring {
            self.bell();
        }
    }

    fn on_completion(&mut self) {
        if self.sound {
            self.bell();
        }
    }
}

/// Event and text output for a run.
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn events(&self, events: &[Event]) -> Result<(), serde_json::Error> {
        if self.json {
            for event in events {
                println!("{}", serde_json::to_string(event)?);
            }
        }
        Ok(())
    }

    pub fn event(&self, event: Option<Event>) -> Result<(), serde_json::Error> {
        match event {
            Some(event) => self.events(std::slice::from_ref(&event)),
            None => Ok(()),
        }
    }

    pub fn text(&self, line: impl AsRef<str>) {
        if !self.json {
            println!("{}", line.as_ref());
        }
    }
}
