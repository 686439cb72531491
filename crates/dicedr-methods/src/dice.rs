//! Dice roll over an inclusive integer range.

use std::fmt;
use std::str::FromStr;

use dicedr_core::completion::Completion;
use dicedr_core::error::MethodError;
use dicedr_core::limits::{MAX_DICE_VALUE, MIN_DICE_VALUE};
use dicedr_core::method::{PickerMethod, RunContext};
use dicedr_core::state::MethodState;
use dicedr_core::translate::Translate;
use dicedr_core::validation::ValidationResult;
use dicedr_core::visual::AnimationCue;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::debug;

/// Named dice shapes offered alongside a custom range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DicePreset {
    /// Six-sided die.
    D6,
    /// Twenty-sided die.
    D20,
    /// Percentile die.
    D100,
    /// User-chosen bounds.
    #[default]
    Custom,
}

impl DicePreset {
    /// The `(min, max)` faces of a named preset; `None` for `Custom`.
    #[must_use]
    pub fn bounds(self) -> Option<(i64, i64)> {
        match self {
            Self::D6 => Some((1, 6)),
            Self::D20 => Some((1, 20)),
            Self::D100 => Some((1, 100)),
            Self::Custom => None,
        }
    }
}

impl fmt::Display for DicePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::D6 => "d6",
            Self::D20 => "d20",
            Self::D100 => "d100",
            Self::Custom => "custom",
        })
    }
}

/// The requested preset does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown dice preset: {0}")]
pub struct UnknownPreset(pub String);

impl FromStr for DicePreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "d6" => Ok(Self::D6),
            "d20" => Ok(Self::D20),
            "d100" => Ok(Self::D100),
            "custom" => Ok(Self::Custom),
            other => Err(UnknownPreset(other.to_owned())),
        }
    }
}

/// Dice inputs: an inclusive face range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceInputs {
    /// Which preset produced these bounds.
    #[serde(default)]
    pub preset: DicePreset,
    /// Lowest face.
    pub min: i64,
    /// Highest face.
    pub max: i64,
}

impl DiceInputs {
    /// Inputs for a named preset. `Custom` keeps the given fallback bounds.
    #[must_use]
    pub fn from_preset(preset: DicePreset, fallback: (i64, i64)) -> Self {
        let (min, max) = preset.bounds().unwrap_or(fallback);
        Self { preset, min, max }
    }
}

/// The dice method.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiceMethod;

impl PickerMethod for DiceMethod {
    fn id(&self) -> &str {
        "dice"
    }

    fn title_key(&self) -> &str {
        "method.dice.title"
    }

    fn subtitle_key(&self) -> &str {
        "method.dice.subtitle"
    }

    fn default_state(&self, _translate: &dyn Translate) -> MethodState {
        MethodState::from_parts(&DiceInputs::from_preset(DicePreset::D6, (1, 6)), &json!({}))
    }

    fn validate(&self, state: &MethodState, translate: &dyn Translate) -> ValidationResult {
        match state.inputs_as::<DiceInputs>() {
            Ok(inputs) if inputs.min < inputs.max => ValidationResult::success(),
            Ok(_) => ValidationResult::failure(translate.translate("dice.invalidRange")),
            Err(_) => ValidationResult::failure(translate.translate("inputs.invalid")),
        }
    }

    fn run(&self, context: RunContext<'_>, done: Completion) -> Result<(), MethodError> {
        let inputs: DiceInputs = context.state.inputs_as()?;

        // Bound the faces the way the editor does before rolling.
        let min = inputs.min.clamp(MIN_DICE_VALUE, MAX_DICE_VALUE);
        let max = inputs.max.max(min + 1).min(MAX_DICE_VALUE);
        let face = context.rng.int_range(min, max)?;

        let delay = context
            .visual
            .animate(&AnimationCue::DiceRoll { min, max, face });
        debug!(face, min, max, "dice rolled");
        done.complete_after(delay, face.to_string(), None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use dicedr_core::rng::StdRandomSource;
    use dicedr_core::visual::NoVisual;
    use dicedr_test_support::{EchoTranslator, SequenceRandom};

    use super::*;

    fn range(min: i64, max: i64) -> MethodState {
        MethodState::from_parts(
            &DiceInputs {
                preset: DicePreset::Custom,
                min,
                max,
            },
            &json!({}),
        )
    }

    async fn roll(state: &MethodState, rng: &mut dyn dicedr_core::rng::RandomSource) -> String {
        let (done, pending) = Completion::channel("dice");
        DiceMethod
            .run(
                RunContext {
                    state,
                    translate: &EchoTranslator,
                    visual: &NoVisual,
                    rng,
                },
                done,
            )
            .unwrap();
        pending.settled().await.unwrap().value
    }

    #[tokio::test]
    async fn test_roll_reports_drawn_face() {
        let mut rng = SequenceRandom::new(vec![4]);
        assert_eq!(roll(&range(1, 6), &mut rng).await, "4");
    }

    #[tokio::test]
    async fn test_rolls_stay_within_range() {
        let state = range(1, 6);
        let mut rng = StdRandomSource::seeded(6);

        for _ in 0..200 {
            let face: i64 = roll(&state, &mut rng).await.parse().unwrap();
            assert!((1..=6).contains(&face));
        }
    }

    #[tokio::test]
    async fn test_out_of_bounds_faces_are_clamped() {
        let state = range(-5000, 5000);
        let mut rng = StdRandomSource::seeded(9);

        for _ in 0..50 {
            let face: i64 = roll(&state, &mut rng).await.parse().unwrap();
            assert!((MIN_DICE_VALUE..=MAX_DICE_VALUE).contains(&face));
        }
    }

    #[test]
    fn test_degenerate_range_fails_validation() {
        for (min, max) in [(6, 6), (6, 1)] {
            let result = DiceMethod.validate(&range(min, max), &EchoTranslator);
            assert!(!result.is_ok());
            assert_eq!(result.message(), "dice.invalidRange");
        }
    }

    #[test]
    fn test_default_state_is_d6() {
        let state = DiceMethod.default_state(&EchoTranslator);

        let inputs: DiceInputs = state.inputs_as().unwrap();

        assert_eq!(inputs, DiceInputs::from_preset(DicePreset::D6, (0, 0)));
        assert_eq!(state.inputs(), Some(&json!({"preset": "d6", "min": 1, "max": 6})));
    }

    #[test]
    fn test_preset_names_round_trip_through_display() {
        for preset in [DicePreset::D6, DicePreset::D20, DicePreset::D100, DicePreset::Custom] {
            assert_eq!(preset.to_string().parse::<DicePreset>(), Ok(preset));
        }
    }

    #[test]
    fn test_inputs_without_preset_default_to_custom() {
        let state = MethodState::new(json!({"min": 1, "max": 6}), json!({}));

        let inputs: DiceInputs = state.inputs_as().unwrap();

        assert_eq!(inputs.preset, DicePreset::Custom);
    }
}
