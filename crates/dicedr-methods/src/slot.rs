//! Slot machine: three reels, each stopping on its own option.

use dicedr_core::completion::Completion;
use dicedr_core::error::MethodError;
use dicedr_core::limits::{SLOT_ITEMS_PER_REEL, SLOT_REEL_COUNT};
use dicedr_core::method::{PickerMethod, RunContext};
use dicedr_core::rng::{random_index, sample_without_replacement};
use dicedr_core::state::MethodState;
use dicedr_core::translate::Translate;
use dicedr_core::validation::ValidationResult;
use dicedr_core::visual::AnimationCue;
use serde_json::json;
use tracing::debug;

use crate::list::validate_options;

const DEFAULT_OPTIONS: [&str; 4] = ["Pizza", "Sushi", "Burgers", "Salad"];

/// The slot machine method.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotMethod;

impl PickerMethod for SlotMethod {
    fn id(&self) -> &str {
        "slot"
    }

    fn title_key(&self) -> &str {
        "method.slot.title"
    }

    fn subtitle_key(&self) -> &str {
        "method.slot.subtitle"
    }

    fn default_state(&self, _translate: &dyn Translate) -> MethodState {
        MethodState::from_parts(&DEFAULT_OPTIONS, &json!({}))
    }

    fn validate(&self, state: &MethodState, translate: &dyn Translate) -> ValidationResult {
        validate_options(state, translate)
    }

    fn run(&self, context: RunContext<'_>, done: Completion) -> Result<(), MethodError> {
        let items: Vec<String> = context.state.inputs_as()?;

        let mut reels = Vec::with_capacity(SLOT_REEL_COUNT);
        let mut picks = Vec::with_capacity(SLOT_REEL_COUNT);
        for _ in 0..SLOT_REEL_COUNT {
            let reel = sample_without_replacement(context.rng, &items, SLOT_ITEMS_PER_REEL)?;
            let stop = random_index(context.rng, reel.len())?;
            picks.push(reel[stop].clone());
            reels.push(reel);
        }

        let value = picks.join(" | ");
        debug!(%value, "reels stopped");
        let delay = context
            .visual
            .animate(&AnimationCue::SlotSpin { reels, picks });
        done.complete_after(delay, value, None);
        Ok(())
    }
}
