//! Animation cues and notices. Presentation reads these and discards them;
//! rule logic never reads them back.

use crate::types::{Piece, Side, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A piece was taken on `square`. Emitted once per capture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptureEvent {
    pub piece: Piece,
    pub square: Square,
    pub elapsed: f32,
    pub duration: f32,
}

/// A piece slid from `from` to `to`. Emitted once per committed move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveEvent {
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    pub elapsed: f32,
    pub duration: f32,
}

/// Shared by both cue kinds so the queues can be aged in one place.
pub(crate) trait Timed {
    fn age(&mut self, dt: f32);
    fn expired(&self) -> bool;
}

macro_rules! impl_timed {
    ($($ty:ty),*) => {$(
        impl Timed for $ty {
            fn age(&mut self, dt: f32) { self.elapsed += dt; }
            fn expired(&self) -> bool {
                // NaN on either side counts as expired
                self.elapsed.is_nan() || self.duration.is_nan() || self.elapsed >= self.duration
            }
        }

        impl $ty {
            /// Eased-animation progress in `[0, 1]`.
            pub fn progress(&self) -> f32 {
                if self.duration.is_nan() || self.duration <= 0.0 {
                    return 1.0;
                }
                (self.elapsed / self.duration).clamp(0.0, 1.0)
            }
        }
    )*};
}

impl_timed!(CaptureEvent, MoveEvent);

/// Ages every entry by `dt` and drops the ones whose display time is over.
pub(crate) fn age_queue<T: Timed>(queue: &mut Vec<T>, dt: f32) {
    for entry in queue.iter_mut() {
        entry.age(dt);
    }
    queue.retain(|entry| !entry.expired());
}

/// Check and end-of-game notices. Text is left to the host; `Display` gives a
/// plain English default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Notice {
    Check { checker: Side },
    Checkmate { winner: Side },
    Stalemate { winner: Side },
}

impl Notice {
    /// Whether the notice stays up for the rest of the game.
    pub fn is_final(&self) -> bool {
        !matches!(self, Notice::Check { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Check { checker } => write!(f, "{} gives check.", checker),
            Notice::Checkmate { winner } => write!(f, "Checkmate. {} wins.", winner),
            Notice::Stalemate { winner } => write!(f, "Stalemate. {} wins.", winner),
        }
    }
}
