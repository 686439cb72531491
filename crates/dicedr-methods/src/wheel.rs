//! Spinning wheel: one option wins, optionally removed for the next spin.

use dicedr_core::completion::Completion;
use dicedr_core::error::MethodError;
use dicedr_core::limits::{WHEEL_MAX_SPINS, WHEEL_MIN_SPINS};
use dicedr_core::method::{PickerMethod, RunContext};
use dicedr_core::rng::random_index;
use dicedr_core::state::MethodState;
use dicedr_core::translate::Translate;
use dicedr_core::validation::ValidationResult;
use dicedr_core::visual::AnimationCue;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::list::validate_options;

const DEFAULT_OPTIONS: [&str; 4] = ["Pizza", "Sushi", "Burgers", "Salad"];

/// Wheel settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WheelSettings {
    /// Remove the winning option from the wheel after each spin.
    pub no_repeat: bool,
}

/// The wheel method.
#[derive(Debug, Clone, Copy, Default)]
pub struct WheelMethod;

impl PickerMethod for WheelMethod {
    fn id(&self) -> &str {
        "wheel"
    }

    fn title_key(&self) -> &str {
        "method.wheel.title"
    }

    fn subtitle_key(&self) -> &str {
        "method.wheel.subtitle"
    }

    fn default_state(&self, _translate: &dyn Translate) -> MethodState {
        MethodState::from_parts(&DEFAULT_OPTIONS, &WheelSettings::default())
    }

    fn validate(&self, state: &MethodState, translate: &dyn Translate) -> ValidationResult {
        validate_options(state, translate)
    }

    fn run(&self, context: RunContext<'_>, done: Completion) -> Result<(), MethodError> {
        let items: Vec<String> = context.state.inputs_as()?;
        let settings: WheelSettings = context.state.settings_as()?;

        let index = random_index(context.rng, items.len())?;
        let spins = WHEEL_MIN_SPINS + context.rng.uniform() * (WHEEL_MAX_SPINS - WHEEL_MIN_SPINS);
        let delay = context.visual.animate(&AnimationCue::WheelSpin {
            segments: items.len(),
            target_index: index,
            spins,
        });

        let value = items[index].clone();
        debug!(index, %value, "wheel landed");
        let next_state = settings.no_repeat.then(|| {
            let remaining: Vec<&String> = items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| (i != index).then_some(item))
                .collect();
            context.state.with_inputs(json!(remaining))
        });

        done.complete_after(delay, value, next_state);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use dicedr_core::visual::NoVisual;
    use dicedr_test_support::{EchoTranslator, MockRandom, RecordingVisual, SequenceRandom};

    use super::*;

    fn state(items: &[&str], no_repeat: bool) -> MethodState {
        MethodState::from_parts(&items, &WheelSettings { no_repeat })
    }

    #[tokio::test]
    async fn test_run_reports_option_at_drawn_index() {
        let state = state(&["A", "B", "C", "D"], false);
        let mut rng = SequenceRandom::new(vec![2]).with_floats(vec![0.5]);
        let visual = RecordingVisual::new();
        let (done, pending) = Completion::channel("wheel");

        WheelMethod
            .run(
                RunContext {
                    state: &state,
                    translate: &EchoTranslator,
                    visual: &visual,
                    rng: &mut rng,
                },
                done,
            )
            .unwrap();

        let settled = pending.settled().await.unwrap();
        assert_eq!(settled.value, "C");
        assert!(settled.next_state.is_none());
        assert_eq!(
            visual.cues(),
            vec![AnimationCue::WheelSpin {
                segments: 4,
                target_index: 2,
                spins: 5.0,
            }]
        );
    }

    #[tokio::test]
    async fn test_no_repeat_removes_winner_from_next_state() {
        let state = state(&["A", "B", "C", "D"], true);
        let mut rng = SequenceRandom::new(vec![1]).with_floats(vec![0.0]);
        let (done, pending) = Completion::channel("wheel");

        WheelMethod
            .run(
                RunContext {
                    state: &state,
                    translate: &EchoTranslator,
                    visual: &NoVisual,
                    rng: &mut rng,
                },
                done,
            )
            .unwrap();

        let settled = pending.settled().await.unwrap();
        let next = settled.next_state.expect("no-repeat produces a next state");
        let remaining: Vec<String> = next.inputs_as().unwrap();
        assert_eq!(settled.value, "B");
        assert_eq!(remaining.len(), 3);
        assert!(!remaining.contains(&settled.value));
        assert_eq!(next.settings(), state.settings());
    }

    #[tokio::test]
    async fn test_run_with_malformed_inputs_fails_to_start() {
        let state = MethodState::new(json!({"a": 1}), json!({}));
        let (done, pending) = Completion::channel("wheel");

        let result = WheelMethod.run(
            RunContext {
                state: &state,
                translate: &EchoTranslator,
                visual: &NoVisual,
                rng: &mut MockRandom,
            },
            done,
        );

        assert!(matches!(result, Err(MethodError::MalformedState(_))));
        assert!(pending.settled().await.is_err());
    }

    #[test]
    fn test_default_state_is_valid() {
        let state = WheelMethod.default_state(&EchoTranslator);

        assert!(WheelMethod.validate(&state, &EchoTranslator).is_ok());
        assert_eq!(state.settings(), Some(&json!({"noRepeat": false})));
    }

    #[test]
    fn test_single_option_fails_validation() {
        let result = WheelMethod.validate(&state(&["A"], false), &EchoTranslator);
        assert_eq!(result.message(), "inputs.empty");
    }
}
