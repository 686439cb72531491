//! The contract every randomization method implements.

use crate::completion::Completion;
use crate::error::MethodError;
use crate::rng::RandomSource;
use crate::state::MethodState;
use crate::translate::Translate;
use crate::validation::ValidationResult;
use crate::visual::VisualHandle;

/// Everything a method needs while running.
pub struct RunContext<'a> {
    /// The state the run executes against.
    pub state: &'a MethodState,
    /// Translation collaborator.
    pub translate: &'a dyn Translate,
    /// Renderer for the run's animation.
    pub visual: &'a dyn VisualHandle,
    /// The only source of randomness a method may use.
    pub rng: &'a mut dyn RandomSource,
}

/// A randomization method (wheel, dice, coin, ...).
///
/// Methods are registered once and then driven polymorphically by the run
/// controller: `validate` gates every run, `run` reports its outcome through
/// the supplied [`Completion`].
pub trait PickerMethod: Send + Sync {
    /// Stable identifier, used as storage and routing key.
    fn id(&self) -> &str;

    /// Localization key for the method's title.
    fn title_key(&self) -> &str;

    /// Localization key for the method's one-line description.
    fn subtitle_key(&self) -> &str;

    /// Initial state on first use or after an explicit reset. Must be
    /// deterministic given `translate`.
    fn default_state(&self, translate: &dyn Translate) -> MethodState;

    /// Pure check of whether `state` can produce a meaningful outcome.
    /// Failures carry a non-empty localized message.
    fn validate(&self, state: &MethodState, translate: &dyn Translate) -> ValidationResult;

    /// Performs the randomization and fulfils `done` exactly once, possibly
    /// after an animation delay.
    ///
    /// # Errors
    ///
    /// Returns `MethodError` if the run could not start; `done` is then
    /// dropped unfulfilled.
    fn run(&self, context: RunContext<'_>, done: Completion) -> Result<(), MethodError>;
}
