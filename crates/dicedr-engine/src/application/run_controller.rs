//! Run orchestration.
//!
//! The controller owns the application state and history. It is the only
//! place where a method is executed and where a settled outcome turns into
//! persisted state, a share token and a history entry.
//!
//! Locks are only ever held around synchronous work. The wait between a
//! method's `run` and its completion happens with no lock held, so other
//! operations (and runs of other methods) proceed during an animation.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use dicedr_core::clock::Clock;
use dicedr_core::completion::Completion;
use dicedr_core::method::{PickerMethod, RunContext};
use dicedr_core::rng::RandomSource;
use dicedr_core::state::MethodState;
use dicedr_core::translate::Translate;
use dicedr_core::validation::ValidationResult;
use dicedr_core::visual::VisualHandle;
use tracing::field::{Empty, display};
use tracing::{Span, debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::application::registry::MethodRegistry;
use crate::application::share_codec::{ShareCodec, SharePayload};
use crate::application::state_store::StateStore;
use crate::domain::app_state::AppState;
use crate::domain::history::{History, HistoryEntry};
use crate::error::{RegistryError, RunError};

/// Callback invoked with the current state and history after every change.
pub type Subscriber = Arc<dyn Fn(&AppState, &[HistoryEntry]) + Send + Sync>;

/// Handle returned by [`RunController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// What a successful `execute` produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Correlation id of the run, also recorded on its tracing span.
    pub run_id: Uuid,
    /// The method that ran.
    pub method_id: String,
    /// The reported outcome.
    pub value: String,
    /// The history entry recorded for the run.
    pub entry: HistoryEntry,
}

struct Session {
    app_state: AppState,
    history: History,
    in_flight: HashSet<String>,
}

/// Executes methods and keeps state, history and storage consistent.
pub struct RunController {
    registry: MethodRegistry,
    store: StateStore,
    translate: RwLock<Arc<dyn Translate>>,
    clock: Arc<dyn Clock>,
    rng: Mutex<Box<dyn RandomSource>>,
    visual: Arc<dyn VisualHandle>,
    session: Mutex<Session>,
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: AtomicU64,
}

/// Marks a method as running; unmarks it when dropped, including when the
/// `execute` future itself is dropped mid-run.
struct InFlight<'a> {
    controller: &'a RunController,
    method_id: String,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.controller.session().in_flight.remove(&self.method_id);
    }
}

impl RunController {
    /// Boots a controller: restores saved state and history, falls back to the
    /// first registered method if the saved one is unknown, and gives every
    /// registered method a state.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Empty` if `registry` has no methods.
    pub fn new(
        registry: MethodRegistry,
        store: StateStore,
        translate: Arc<dyn Translate>,
        clock: Arc<dyn Clock>,
        rng: Box<dyn RandomSource>,
        visual: Arc<dyn VisualHandle>,
    ) -> Result<Self, RegistryError> {
        let default_id = registry
            .default_method()
            .map(|m| m.id().to_owned())
            .ok_or(RegistryError::Empty)?;

        let mut app_state = store.load(&AppState::new(default_id.clone()));
        if !registry.has(&app_state.method_id) {
            warn!(
                method_id = %app_state.method_id,
                "saved method is not registered, using default"
            );
            app_state.method_id = default_id;
        }
        let history = store.load_history();

        let controller = Self {
            registry,
            store,
            translate: RwLock::new(translate),
            clock,
            rng: Mutex::new(rng),
            visual,
            session: Mutex::new(Session {
                app_state,
                history,
                in_flight: HashSet::new(),
            }),
            subscribers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
        };
        controller.ensure_method_states();
        Ok(controller)
    }

    /// Gives every registered method without a state its default state, and
    /// persists the result if anything was added.
    pub fn ensure_method_states(&self) {
        let translate = self.translator();
        let mut session = self.session();
        let mut added = 0_usize;
        for method in self.registry.all() {
            if session.app_state.method_state(method.id()).is_none() {
                session
                    .app_state
                    .method_states
                    .insert(method.id().to_owned(), method.default_state(&*translate));
                added += 1;
            }
        }
        if added > 0 {
            debug!(added, "initialized missing method states");
            self.store.save(&session.app_state);
        }
    }

    /// Runs `method_id` against its current state and waits for the outcome.
    ///
    /// # Errors
    ///
    /// - `RunError::UnknownMethod` if nothing is registered under `method_id`.
    /// - `RunError::AlreadyRunning` if a previous run has not settled.
    /// - `RunError::ValidationFailed` if the state is rejected; `run` is not
    ///   invoked and nothing changes.
    /// - `RunError::Method` if the method could not start.
    /// - `RunError::Abandoned` if the method dropped its completion.
    #[instrument(skip(self), fields(run_id = Empty))]
    pub async fn execute(&self, method_id: &str) -> Result<RunReport, RunError> {
        let run_id = Uuid::new_v4();
        Span::current().record("run_id", display(run_id));

        let method = self.method(method_id)?;
        let translate = self.translator();

        let state = {
            let mut session = self.session();
            let state = self.ensure_state(&mut session, method.as_ref(), &*translate);
            if session.in_flight.contains(method_id) {
                return Err(RunError::AlreadyRunning(method_id.to_owned()));
            }
            let validation = method.validate(&state, &*translate);
            if !validation.is_ok() {
                info!(reason = validation.message(), "run rejected by validation");
                return Err(RunError::ValidationFailed(validation.message().to_owned()));
            }
            session.in_flight.insert(method_id.to_owned());
            state
        };
        let in_flight = InFlight {
            controller: self,
            method_id: method_id.to_owned(),
        };

        let (done, pending) = Completion::channel(method_id);
        let started = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            method.run(
                RunContext {
                    state: &state,
                    translate: &*translate,
                    visual: &*self.visual,
                    rng: &mut **rng,
                },
                done,
            )
        };
        if let Err(e) = started {
            error!(error = %e, "method failed to start its run");
            return Err(e.into());
        }

        let settled = pending.settled().await.inspect_err(|e| {
            error!(error = %e, "run abandoned");
        })?;

        let entry = {
            // The method owns its whole state: the outcome replaces it.
            let next_state = settled.next_state.unwrap_or(state);
            let token = ShareCodec::encode(&SharePayload {
                method_id: method_id.to_owned(),
                method_state: next_state.clone(),
            });
            let mut session = self.session();
            session
                .app_state
                .method_states
                .insert(method_id.to_owned(), next_state);
            session.app_state.method_id = method_id.to_owned();
            let entry = HistoryEntry::new(
                settled.value.clone(),
                method_id,
                translate.translate(method.title_key()),
                token,
                self.clock.now(),
            );
            if entry.is_well_formed() {
                session.history.record(entry.clone());
                self.store.save_history(&session.history);
            } else {
                error!(
                    value = %settled.value,
                    "method settled with an empty outcome, not recorded in history"
                );
            }
            self.store.save(&session.app_state);
            entry
        };
        drop(in_flight);

        info!(value = %settled.value, "run settled");
        self.publish();
        Ok(RunReport {
            run_id,
            method_id: method_id.to_owned(),
            value: settled.value,
            entry,
        })
    }

    /// Validation probe for the method's current state. Never runs anything.
    ///
    /// # Errors
    ///
    /// Returns `RunError::UnknownMethod` if `method_id` is not registered.
    pub fn can_run(&self, method_id: &str) -> Result<ValidationResult, RunError> {
        let method = self.method(method_id)?;
        let translate = self.translator();
        let state = self
            .method_state(method_id)
            .unwrap_or_else(|| method.default_state(&*translate));
        Ok(method.validate(&state, &*translate))
    }

    /// `true` while a run of `method_id` awaits its outcome.
    #[must_use]
    pub fn is_running(&self, method_id: &str) -> bool {
        self.session().in_flight.contains(method_id)
    }

    /// Makes `method_id` the active method. An unknown id selects the default
    /// method instead. Returns the id actually selected.
    pub fn select_method(&self, method_id: &str) -> String {
        let method = match self.registry.get(method_id) {
            Some(method) => Arc::clone(method),
            None => {
                warn!(method_id, "unknown method, selecting default");
                match self.registry.default_method() {
                    Some(method) => Arc::clone(method),
                    None => return self.app_state().method_id,
                }
            }
        };
        let translate = self.translator();
        {
            let mut session = self.session();
            self.ensure_state(&mut session, method.as_ref(), &*translate);
            session.app_state.method_id = method.id().to_owned();
            self.store.save(&session.app_state);
        }
        self.publish();
        method.id().to_owned()
    }

    /// Applies a partial update (top-level keys replace) to a method's state,
    /// persists it and returns the validation of the new state.
    ///
    /// # Errors
    ///
    /// Returns `RunError::UnknownMethod` if `method_id` is not registered.
    pub fn update_method_state(
        &self,
        method_id: &str,
        patch: MethodState,
    ) -> Result<ValidationResult, RunError> {
        let method = self.method(method_id)?;
        let translate = self.translator();
        let validation = {
            let mut session = self.session();
            let mut state = self.ensure_state(&mut session, method.as_ref(), &*translate);
            state.merge(patch);
            let validation = method.validate(&state, &*translate);
            session
                .app_state
                .method_states
                .insert(method_id.to_owned(), state);
            self.store.save(&session.app_state);
            validation
        };
        self.publish();
        Ok(validation)
    }

    /// Restores a method's default state.
    ///
    /// # Errors
    ///
    /// Returns `RunError::UnknownMethod` if `method_id` is not registered.
    pub fn reset_method(&self, method_id: &str) -> Result<MethodState, RunError> {
        let method = self.method(method_id)?;
        let state = method.default_state(&*self.translator());
        {
            let mut session = self.session();
            session
                .app_state
                .method_states
                .insert(method_id.to_owned(), state.clone());
            self.store.save(&session.app_state);
        }
        self.publish();
        Ok(state)
    }

    /// The stored state of `method_id`.
    #[must_use]
    pub fn method_state(&self, method_id: &str) -> Option<MethodState> {
        self.session().app_state.method_state(method_id).cloned()
    }

    /// Snapshot of the application state.
    #[must_use]
    pub fn app_state(&self) -> AppState {
        self.session().app_state.clone()
    }

    /// Snapshot of the history, most recent first.
    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.session().history.entries().to_vec()
    }

    /// Empties the history.
    pub fn clear_history(&self) {
        {
            let mut session = self.session();
            session.history.clear();
            self.store.save_history(&session.history);
        }
        self.publish();
    }

    /// Share token for the current state of `method_id`.
    ///
    /// # Errors
    ///
    /// Returns `RunError::UnknownMethod` if `method_id` is not registered.
    pub fn share_token(&self, method_id: &str) -> Result<String, RunError> {
        let method = self.method(method_id)?;
        let method_state = self
            .method_state(method_id)
            .unwrap_or_else(|| method.default_state(&*self.translator()));
        Ok(ShareCodec::encode(&SharePayload {
            method_id: method_id.to_owned(),
            method_state,
        }))
    }

    /// Method-scoped fragment (`method/<id>?state=<token>`) for `method_id`.
    ///
    /// # Errors
    ///
    /// Returns `RunError::UnknownMethod` if `method_id` is not registered.
    pub fn share_fragment(&self, method_id: &str) -> Result<String, RunError> {
        let token = self.share_token(method_id)?;
        Ok(ShareCodec::fragment(method_id, &token))
    }

    /// Loads the state carried by `token` and makes its method active without
    /// running it. Returns the method id, or `None` if the token is invalid
    /// or names an unregistered method; state is untouched in that case.
    pub fn open_share(&self, token: &str) -> Option<String> {
        let Some(payload) = ShareCodec::decode(token) else {
            warn!("ignoring malformed share token");
            return None;
        };
        if !self.registry.has(&payload.method_id) {
            warn!(method_id = %payload.method_id, "ignoring share token for unknown method");
            return None;
        }
        {
            let mut session = self.session();
            session
                .app_state
                .method_states
                .insert(payload.method_id.clone(), payload.method_state);
            session.app_state.method_id.clone_from(&payload.method_id);
            self.store.save(&session.app_state);
        }
        self.publish();
        Some(payload.method_id)
    }

    /// Switches the translator and persists `language`. Existing history
    /// labels keep the language they were recorded in.
    pub fn set_language(&self, language: &str, translate: Arc<dyn Translate>) {
        *self
            .translate
            .write()
            .unwrap_or_else(PoisonError::into_inner) = translate;
        self.store.save_language(language);
        self.publish();
    }

    /// The active translator.
    #[must_use]
    pub fn translator(&self) -> Arc<dyn Translate> {
        Arc::clone(&self.translate.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Registers `subscriber` to be called after every state or history change.
    pub fn subscribe(
        &self,
        subscriber: impl Fn(&AppState, &[HistoryEntry]) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(subscriber)));
        id
    }

    /// Removes a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    /// The registered methods.
    #[must_use]
    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    fn method(&self, method_id: &str) -> Result<Arc<dyn PickerMethod>, RunError> {
        self.registry
            .get(method_id)
            .cloned()
            .ok_or_else(|| RunError::UnknownMethod(method_id.to_owned()))
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the method's state, creating and persisting the default first
    /// if it has none.
    fn ensure_state(
        &self,
        session: &mut Session,
        method: &dyn PickerMethod,
        translate: &dyn Translate,
    ) -> MethodState {
        if let Some(state) = session.app_state.method_state(method.id()) {
            return state.clone();
        }
        let state = method.default_state(translate);
        session
            .app_state
            .method_states
            .insert(method.id().to_owned(), state.clone());
        self.store.save(&session.app_state);
        state
    }

    /// Notifies subscribers with no lock held.
    fn publish(&self) {
        let (app_state, history) = {
            let session = self.session();
            (session.app_state.clone(), session.history.clone())
        };
        let subscribers: Vec<Subscriber> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect();
        for subscriber in subscribers {
            subscriber(&app_state, history.entries());
        }
    }
}

impl fmt::Debug for RunController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunController")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
