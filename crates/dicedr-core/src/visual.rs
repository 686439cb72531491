//! Visual collaborator.
//!
//! Methods describe what should be shown with an [`AnimationCue`]; the host
//! draws it and reports how long the animation takes before the outcome may
//! be revealed.

use std::time::Duration;

use serde::Serialize;

use crate::limits::{ANIMATION_LONG, ANIMATION_SHORT, SLOT_BASE_DURATION, SLOT_SETTLE, SLOT_STAGGER};

/// Description of the animation that accompanies one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnimationCue {
    /// Spin the wheel so that `target_index` ends under the pointer.
    WheelSpin {
        /// Number of equal segments on the wheel.
        segments: usize,
        /// Index of the winning segment.
        target_index: usize,
        /// Full turns before settling.
        spins: f64,
    },
    /// Spin each reel and stop it on its pick.
    SlotSpin {
        /// Options drawn onto each reel, in display order.
        reels: Vec<Vec<String>>,
        /// The option each reel stops on.
        picks: Vec<String>,
    },
    /// Flip a coin landing on `label`.
    CoinFlip {
        /// The label shown face up.
        label: String,
        /// `true` when the first label won.
        first_side: bool,
    },
    /// Roll a die within `[min, max]` landing on `face`.
    DiceRoll {
        /// Lowest face.
        min: i64,
        /// Highest face.
        max: i64,
        /// The rolled face.
        face: i64,
    },
    /// Reveal one or more picks from a list.
    Reveal {
        /// The picked options.
        picks: Vec<String>,
    },
}

impl AnimationCue {
    /// How long this animation runs when played at full length.
    #[must_use]
    pub fn nominal_duration(&self) -> Duration {
        match self {
            Self::WheelSpin { .. } => ANIMATION_LONG,
            Self::SlotSpin { .. } => SLOT_SETTLE,
            Self::CoinFlip { .. } | Self::DiceRoll { .. } | Self::Reveal { .. } => ANIMATION_SHORT,
        }
    }
}

/// When slot reel `reel` (zero-based) stops, measured from the pull.
#[must_use]
pub fn reel_stop(reel: usize) -> Duration {
    let stagger = u32::try_from(reel).map_or(Duration::MAX, |n| SLOT_STAGGER.saturating_mul(n));
    SLOT_BASE_DURATION.saturating_add(stagger)
}

/// Host-side renderer for animation cues.
pub trait VisualHandle: Send + Sync {
    /// Starts the animation and returns how long to wait before completing.
    fn animate(&self, cue: &AnimationCue) -> Duration;
}

/// Visual that renders nothing and settles immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVisual;

impl VisualHandle for NoVisual {
    fn animate(&self, _cue: &AnimationCue) -> Duration {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reels_stop_in_sequence_and_last_stop_settles() {
        let stops: Vec<Duration> = (0..crate::limits::SLOT_REEL_COUNT).map(reel_stop).collect();

        assert_eq!(
            stops,
            [
                Duration::from_millis(1600),
                Duration::from_millis(1800),
                Duration::from_millis(2000)
            ]
        );
        assert_eq!(stops.last().copied(), Some(SLOT_SETTLE));
    }

    #[test]
    fn test_nominal_durations() {
        let wheel = AnimationCue::WheelSpin {
            segments: 4,
            target_index: 1,
            spins: 5.0,
        };
        let reveal = AnimationCue::Reveal { picks: Vec::new() };

        assert_eq!(wheel.nominal_duration(), ANIMATION_LONG);
        assert_eq!(reveal.nominal_duration(), ANIMATION_SHORT);
    }
}
