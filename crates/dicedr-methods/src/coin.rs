//! Coin flip between two labels.

use dicedr_core::completion::Completion;
use dicedr_core::error::MethodError;
use dicedr_core::method::{PickerMethod, RunContext};
use dicedr_core::state::MethodState;
use dicedr_core::translate::Translate;
use dicedr_core::validation::ValidationResult;
use dicedr_core::visual::AnimationCue;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

/// The two faces of the coin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinInputs {
    /// First label.
    pub a: String,
    /// Second label.
    pub b: String,
}

/// The coin method.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoinMethod;

impl PickerMethod for CoinMethod {
    fn id(&self) -> &str {
        "coin"
    }

    fn title_key(&self) -> &str {
        "method.coin.title"
    }

    fn subtitle_key(&self) -> &str {
        "method.coin.subtitle"
    }

    fn default_state(&self, translate: &dyn Translate) -> MethodState {
        let inputs = CoinInputs {
            a: translate.translate("coin.labelA"),
            b: translate.translate("coin.labelB"),
        };
        MethodState::from_parts(&inputs, &json!({}))
    }

    fn validate(&self, state: &MethodState, translate: &dyn Translate) -> ValidationResult {
        match state.inputs_as::<CoinInputs>() {
            Ok(inputs) if !inputs.a.trim().is_empty() && !inputs.b.trim().is_empty() => {
                ValidationResult::success()
            }
            Ok(_) => ValidationResult::failure(translate.translate("coin.labelsEmpty")),
            Err(_) => ValidationResult::failure(translate.translate("inputs.invalid")),
        }
    }

    fn run(&self, context: RunContext<'_>, done: Completion) -> Result<(), MethodError> {
        let inputs: CoinInputs = context.state.inputs_as()?;

        let first_side = context.rng.uniform() < 0.5;
        let label = if first_side { inputs.a } else { inputs.b };

        let delay = context.visual.animate(&AnimationCue::CoinFlip {
            label: label.clone(),
            first_side,
        });
        debug!(%label, first_side, "coin landed");
        done.complete_after(delay, label, None);
        Ok(())
    }
}
