//! Test visual: records every animation cue it is asked to play.

use std::sync::Mutex;
use std::time::Duration;

use dicedr_core::visual::{AnimationCue, VisualHandle};

/// Records cues and settles immediately.
#[derive(Debug, Default)]
pub struct RecordingVisual {
    cues: Mutex<Vec<AnimationCue>>,
}

impl RecordingVisual {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all cues played so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn cues(&self) -> Vec<AnimationCue> {
        self.cues.lock().unwrap().clone()
    }
}

impl VisualHandle for RecordingVisual {
    fn animate(&self, cue: &AnimationCue) -> Duration {
        self.cues.lock().unwrap().push(cue.clone());
        Duration::ZERO
    }
}
