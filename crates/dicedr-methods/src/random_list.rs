//! Random list picker: draws one or more options at once.

use dicedr_core::completion::Completion;
use dicedr_core::error::MethodError;
use dicedr_core::limits::{MAX_PICK_COUNT, MIN_PICK_COUNT};
use dicedr_core::method::{PickerMethod, RunContext};
use dicedr_core::rng::{sample_with_replacement, sample_without_replacement};
use dicedr_core::state::MethodState;
use dicedr_core::translate::Translate;
use dicedr_core::validation::ValidationResult;
use dicedr_core::visual::AnimationCue;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::list::validate_options;

const DEFAULT_OPTIONS: [&str; 3] = ["Pizza", "Sushi", "Burgers"];

/// Random list settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RandomListSettings {
    /// How many options to draw.
    pub count: u32,
    /// Draw distinct options (no option appears twice in one result).
    pub no_repeat: bool,
}

impl Default for RandomListSettings {
    fn default() -> Self {
        Self {
            count: MIN_PICK_COUNT,
            no_repeat: false,
        }
    }
}

/// The random list method.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomListMethod;

impl PickerMethod for RandomListMethod {
    fn id(&self) -> &str {
        "random"
    }

    fn title_key(&self) -> &str {
        "method.random.title"
    }

    fn subtitle_key(&self) -> &str {
        "method.random.subtitle"
    }

    fn default_state(&self, _translate: &dyn Translate) -> MethodState {
        MethodState::from_parts(&DEFAULT_OPTIONS, &RandomListSettings::default())
    }

    fn validate(&self, state: &MethodState, translate: &dyn Translate) -> ValidationResult {
        validate_options(state, translate)
    }

    fn run(&self, context: RunContext<'_>, done: Completion) -> Result<(), MethodError> {
        let items: Vec<String> = context.state.inputs_as()?;
        let settings: RandomListSettings = context.state.settings_as()?;

        let requested = settings.count.clamp(MIN_PICK_COUNT, MAX_PICK_COUNT);
        let count = usize::try_from(requested).map_or(items.len(), |n| n.min(items.len()));
        let picks = if settings.no_repeat {
            sample_without_replacement(context.rng, &items, count)?
        } else {
            sample_with_replacement(context.rng, &items, count)?
        };

        let value = picks.join(", ");
        debug!(count, %value, "options picked");
        let delay = context.visual.animate(&AnimationCue::Reveal { picks });
        done.complete_after(delay, value, None);
        Ok(())
    }
}
