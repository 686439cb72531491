//! Instrumented method: a `PickerMethod` that records how it is driven.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use dicedr_core::completion::Completion;
use dicedr_core::error::MethodError;
use dicedr_core::method::{PickerMethod, RunContext};
use dicedr_core::state::MethodState;
use dicedr_core::translate::Translate;
use dicedr_core::validation::ValidationResult;
use serde_json::json;

/// How the instrumented method behaves when `run` is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunMode {
    Complete,
    Hold,
    Drop,
    Fail,
}

/// A method whose validity and completion behaviour are controlled by the
/// test. Counts `run` and `validate` invocations.
#[derive(Debug)]
pub struct InstrumentedMethod {
    id: String,
    title_key: String,
    outcome: String,
    mode: RunMode,
    valid: AtomicBool,
    runs: AtomicUsize,
    validations: AtomicUsize,
    held: Mutex<Vec<Completion>>,
}

impl InstrumentedMethod {
    /// A valid method that completes immediately with `outcome`.
    #[must_use]
    pub fn new(id: impl Into<String>, outcome: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            title_key: format!("method.{id}.title"),
            id,
            outcome: outcome.into(),
            mode: RunMode::Complete,
            valid: AtomicBool::new(true),
            runs: AtomicUsize::new(0),
            validations: AtomicUsize::new(0),
            held: Mutex::new(Vec::new()),
        }
    }

    /// Keeps each completion until [`release`](Self::release) is called.
    #[must_use]
    pub fn holding(mut self) -> Self {
        self.mode = RunMode::Hold;
        self
    }

    /// Drops each completion without fulfilling it.
    #[must_use]
    pub fn dropping(mut self) -> Self {
        self.mode = RunMode::Drop;
        self
    }

    /// Fails every run before it starts.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.mode = RunMode::Fail;
        self
    }

    /// Overrides the title key (an empty key makes the method invalid to register).
    #[must_use]
    pub fn with_title_key(mut self, title_key: impl Into<String>) -> Self {
        self.title_key = title_key.into();
        self
    }

    /// Sets whether `validate` passes.
    pub fn set_valid(&self, valid: bool) {
        self.valid.store(valid, Ordering::SeqCst);
    }

    /// Number of `run` calls so far.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    /// Number of `validate` calls so far.
    #[must_use]
    pub fn validate_count(&self) -> usize {
        self.validations.load(Ordering::SeqCst)
    }

    /// Completes the oldest held run with `value`. Returns `false` if nothing
    /// was held.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn release(&self, value: &str) -> bool {
        let next = {
            let mut held = self.held.lock().unwrap();
            if held.is_empty() {
                None
            } else {
                Some(held.remove(0))
            }
        };
        match next {
            Some(done) => {
                done.complete(value, None);
                true
            }
            None => false,
        }
    }
}

impl PickerMethod for InstrumentedMethod {
    fn id(&self) -> &str {
        &self.id
    }

    fn title_key(&self) -> &str {
        &self.title_key
    }

    fn subtitle_key(&self) -> &str {
        "method.instrumented.subtitle"
    }

    fn default_state(&self, _translate: &dyn Translate) -> MethodState {
        MethodState::new(json!(["first", "second"]), json!({}))
    }

    fn validate(&self, _state: &MethodState, translate: &dyn Translate) -> ValidationResult {
        self.validations.fetch_add(1, Ordering::SeqCst);
        if self.valid.load(Ordering::SeqCst) {
            ValidationResult::success()
        } else {
            ValidationResult::failure(translate.translate("inputs.empty"))
        }
    }

    fn run(&self, _context: RunContext<'_>, done: Completion) -> Result<(), MethodError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            RunMode::Complete => done.complete(self.outcome.clone(), None),
            RunMode::Hold => self.held.lock().unwrap().push(done),
            RunMode::Drop => drop(done),
            RunMode::Fail => {
                drop(done);
                return Err(MethodError::MalformedState("instrumented failure".into()));
            }
        }
        Ok(())
    }
}
