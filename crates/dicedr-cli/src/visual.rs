//! Terminal rendering of animation cues.

use std::time::Duration;

use dicedr_core::visual::{AnimationCue, VisualHandle, reel_stop};

/// Prints a one-line description of each cue. When `animate` is set the run
/// settles after the cue's nominal duration, otherwise immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalVisual {
    animate: bool,
}

impl TerminalVisual {
    /// Creates the visual.
    #[must_use]
    pub fn new(animate: bool) -> Self {
        Self { animate }
    }
}

/// The line printed for `cue`.
#[must_use]
pub fn describe(cue: &AnimationCue) -> String {
    match cue {
        AnimationCue::WheelSpin {
            segments, spins, ..
        } => format!("Spinning a {segments}-segment wheel {spins:.1} times..."),
        AnimationCue::SlotSpin { reels, .. } => {
            let stops: Vec<String> = (0..reels.len())
                .map(|reel| format!("{:.1}s", reel_stop(reel).as_secs_f64()))
                .collect();
            format!("Pulling the lever, reels stop at {}...", stops.join(", "))
        }
        AnimationCue::CoinFlip { .. } => "Flipping the coin...".to_owned(),
        AnimationCue::DiceRoll { min, max, .. } => format!("Rolling {min}..{max}..."),
        AnimationCue::Reveal { picks } => format!("Drawing {} from the list...", picks.len()),
    }
}

impl VisualHandle for TerminalVisual {
    fn animate(&self, cue: &AnimationCue) -> Duration {
        if !self.animate {
            return Duration::ZERO;
        }
        println!("{}", describe(cue));
        cue.nominal_duration()
    }
}
