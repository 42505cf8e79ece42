use serde::{Deserialize, Serialize};

/// Playback state of the per-frame animation loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Playback {
    Stopped,
    Running,
    Paused,
}

/// Explicit state machine gating the per-frame tick. Pausing does not
/// cancel the frame-callback sequence: a paused tick still renders the
/// last frame, it only skips the updater and stats. `stop` is used by
/// teardown alone and is terminal; restarting after a stop is not
/// supported.
#[derive(Debug)]
pub struct Scheduler {
    state: Playback,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            state: Playback::Stopped,
        }
    }

    pub fn playback(&self) -> Playback {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == Playback::Running
    }

    /// Stopped -> Running; any other state is left alone
    pub fn start(&mut self) {
        if self.state == Playback::Stopped {
            self.state = Playback::Running;
            log::debug!("animation started");
        }
    }

    /// Flip Running <-> Paused and report the new state. Has no effect
    /// once stopped.
    pub fn toggle(&mut self) -> Playback {
        self.state = match self.state {
            Playback::Running => Playback::Paused,
            Playback::Paused => Playback::Running,
            Playback::Stopped => Playback::Stopped,
        };
        log::debug!("animation {:?}", self.state);
        self.state
    }

    pub fn pause(&mut self) {
        if self.state == Playback::Running {
            self.state = Playback::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == Playback::Paused {
            self.state = Playback::Running;
        }
    }

    /// Terminal transition used by teardown
    pub fn stop(&mut self) {
        self.state = Playback::Stopped;
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
