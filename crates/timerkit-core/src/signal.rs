//! Audio/haptic hook points.
//!
//! Engines never play sounds themselves. Each tick outcome carries an optional
//! [`Cue`] and a completion flag; a host either reads those directly or hands
//! the outcome to [`dispatch`] with its own [`SignalSink`].

use serde::{Deserialize, Serialize};

/// What the host should play for a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    /// Short countdown beep (3, 2, 1 seconds left).
    Beep,
    /// Vibration on the terminal second of a phase.
    Haptic,
    /// Beep and vibration together (cooking step finished).
    All,
}

/// Receiver for cues, supplied by the host.
pub trait SignalSink {
    fn on_tick_signal(&mut self, cue: Cue);
    fn on_completion(&mut self);
}

/// Anything a tick can produce that a sink cares about.
pub trait Signaled {
    fn cue(&self) -> Option<Cue>;
    fn completed(&self) -> bool;
}

/// Forward the cue and completion of a tick outcome to `sink`.
pub fn dispatch<S: Signaled + ?Sized>(outcome: &S, sink: &mut dyn SignalSink) {
    if let Some(cue) = outcome.cue() {
        sink.on_tick_signal(cue);
    }
    if outcome.completed() {
        sink.on_completion();
    }
}

/// Cue for a countdown value reached by a decrement.
pub(crate) fn countdown_cue(remaining: u32) -> Option<Cue> {
    match remaining {
        1..=3 => Some(Cue::Beep),
        0 => Some(Cue::Haptic),
        _ => None,
    }
}
