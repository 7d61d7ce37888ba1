use std::time::Duration;

use nearby_provider::Coordinate;
use tokio::time::Instant;

/// Trailing-edge, latest-wins throttle for viewport centres.
///
/// The first value offered in a quiet period arms a deadline one window
/// ahead; values offered before the deadline only replace the pending one.
/// While gated, values are held without arming anything until
/// [`open_gate`](Self::open_gate) is called.
#[derive(Debug)]
pub struct Throttle {
    window: Duration,
    pending: Option<Coordinate>,
    deadline: Option<Instant>,
    gated: bool,
}

impl Throttle {
    pub const fn gated(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            deadline: None,
            gated: true,
        }
    }

    pub fn offer(&mut self, coordinate: Coordinate, now: Instant) {
        self.pending = Some(coordinate);
        if !self.gated && self.deadline.is_none() {
            self.deadline = Some(now + self.window);
        }
    }

    /// Lift the gate, arming the deadline for a held value if there is one.
    pub fn open_gate(&mut self, now: Instant) {
        if !self.gated {
            return;
        }
        self.gated = false;
        if self.pending.is_some() && self.deadline.is_none() {
            self.deadline = Some(now + self.window);
        }
    }

    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Take the value due at the deadline and disarm.
    pub fn fire(&mut self) -> Option<Coordinate> {
        self.deadline = None;
        self.pending.take()
    }
}
