//! Dicedr command line entry point.

use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dicedr_core::clock::{Clock, SystemClock};
use dicedr_core::rng::{StdRandomSource, shuffled};
use dicedr_core::state::MethodState;
use dicedr_core::storage::{KeyValueStorage, MemoryStorage};
use dicedr_core::validation::ValidationResult;
use dicedr_engine::application::registry::MethodRegistry;
use dicedr_engine::application::run_controller::RunController;
use dicedr_engine::application::state_store::StateStore;
use dicedr_engine::error::RunError;
use dicedr_methods::list::{self, ExampleSet};
use serde_json::{Map, Value, json};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, Language};
use crate::error::AppError;
use crate::storage::FileStorage;
use crate::visual::TerminalVisual;

mod config;
mod error;
mod i18n;
mod storage;
mod visual;

/// Exit status when a method's state fails validation.
const VALIDATION_FAILED: u8 = 2;

/// Decision picker: spin a wheel, pick from a list, flip a coin, roll dice or pull a slot machine.
#[derive(Parser)]
#[command(name = "dicedr", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available methods
    List,

    /// Run a method (the active one by default)
    Run {
        /// Method id (wheel, random, coin, dice, slot)
        method: Option<String>,
    },

    /// Replace a method's inputs and/or settings with JSON values
    Edit {
        /// Method id
        method: String,
        /// New inputs as JSON, e.g. '["Tea", "Coffee"]' or '{"min": 1, "max": 20}'
        #[arg(long)]
        inputs: Option<String>,
        /// New settings as JSON, e.g. '{"noRepeat": true}'
        #[arg(long)]
        settings: Option<String>,
    },

    /// Set the options of a list method
    Items {
        /// Method id (wheel, random, slot)
        method: String,
        /// The options
        #[arg(required = true)]
        items: Vec<String>,
        /// Drop repeated options
        #[arg(long)]
        dedupe: bool,
        /// Shuffle the options
        #[arg(long)]
        shuffle: bool,
    },

    /// Load an example option list
    Example {
        /// Method id (wheel, random, slot)
        method: String,
        /// One of: food, movie, activity, chores
        #[arg(value_parser = ExampleSet::from_str)]
        set: ExampleSet,
    },

    /// Restore a method's default state
    Reset {
        /// Method id
        method: String,
    },

    /// Show the most recent results
    History {
        /// Remove every entry instead
        #[arg(long)]
        clear: bool,
    },

    /// Print a share link fragment for a method's current state
    Share {
        /// Method id (the active one by default)
        method: Option<String>,
    },

    /// Load a shared state without running it
    Open {
        /// A share token or a `method/<id>?state=<token>` fragment
        token: String,
    },

    /// Switch the display language
    Lang {
        /// Language code
        #[arg(value_enum)]
        code: Language,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<ExitCode, AppError> {
    let config = Config::from_env()?;
    let controller = build_controller(&config)?;

    match command {
        Commands::List => list_methods(&controller),
        Commands::Run { method } => run_method(&controller, method).await,
        Commands::Edit {
            method,
            inputs,
            settings,
        } => edit(&controller, &method, inputs.as_deref(), settings.as_deref()),
        Commands::Items {
            method,
            items,
            dedupe,
            shuffle,
        } => {
            let mut items = list::normalize(&items);
            if dedupe {
                items = list::unique(&items);
            }
            if shuffle {
                items = shuffled(&mut StdRandomSource::new(), &items)
                    .map_err(|e| RunError::Method(e.into()))?;
            }
            set_items(&controller, &method, items)
        }
        Commands::Example { method, set } => set_items(&controller, &method, set.items()),
        Commands::Reset { method } => {
            let state = controller.reset_method(&method)?;
            println!("{}", serde_json::to_string_pretty(&state)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::History { clear } => {
            if clear {
                controller.clear_history();
            } else {
                show_history(&controller);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Share { method } => {
            let method_id = method.unwrap_or_else(|| controller.app_state().method_id);
            println!("{}", controller.share_fragment(&method_id)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Open { token } => Ok(open(&controller, &token)),
        Commands::Lang { code } => {
            controller.set_language(code.code(), Arc::new(i18n::translator(code)));
            println!("{code}");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build_controller(config: &Config) -> Result<RunController, AppError> {
    let storage: Arc<dyn KeyValueStorage> = match FileStorage::open(&config.data_dir) {
        Ok(storage) => {
            info!(dir = %storage.dir().display(), "using data directory");
            Arc::new(storage)
        }
        Err(e) => {
            warn!(
                dir = %config.data_dir.display(),
                error = %e,
                "data directory unavailable, results will not be saved"
            );
            Arc::new(MemoryStorage::new())
        }
    };
    let store = StateStore::new(storage);
    let language = config.resolve_language(store.load_language().as_deref());
    info!(%language, "starting dicedr");

    let registry = MethodRegistry::from_methods(dicedr_methods::default_methods())?;
    let controller = RunController::new(
        registry,
        store,
        Arc::new(i18n::translator(language)),
        Arc::new(SystemClock),
        Box::new(StdRandomSource::new()),
        Arc::new(TerminalVisual::new(config.animate)),
    )?;
    Ok(controller)
}

fn list_methods(controller: &RunController) -> Result<ExitCode, AppError> {
    let active = controller.app_state().method_id;
    let translate = controller.translator();
    for method in controller.registry().all() {
        let marker = if method.id() == active { '*' } else { ' ' };
        let validation = controller.can_run(method.id())?;
        let status = if validation.is_ok() {
            String::new()
        } else {
            format!(" ({})", validation.message())
        };
        println!(
            "{marker} {:<7} {} - {}{status}",
            method.id(),
            translate.translate(method.title_key()),
            translate.translate(method.subtitle_key()),
        );
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_method(
    controller: &RunController,
    method: Option<String>,
) -> Result<ExitCode, AppError> {
    let method_id = method.unwrap_or_else(|| controller.app_state().method_id);
    match controller.execute(&method_id).await {
        Ok(report) => {
            println!("{}: {}", report.entry.method_label(), report.value);
            Ok(ExitCode::SUCCESS)
        }
        Err(RunError::ValidationFailed(message)) => {
            eprintln!("{message}");
            Ok(ExitCode::from(VALIDATION_FAILED))
        }
        Err(e) => Err(e.into()),
    }
}

fn edit(
    controller: &RunController,
    method_id: &str,
    inputs: Option<&str>,
    settings: Option<&str>,
) -> Result<ExitCode, AppError> {
    let mut patch = Map::new();
    if let Some(inputs) = inputs {
        patch.insert(MethodState::INPUTS.to_owned(), serde_json::from_str(inputs)?);
    }
    if let Some(settings) = settings {
        patch.insert(MethodState::SETTINGS.to_owned(), serde_json::from_str(settings)?);
    }
    if patch.is_empty() {
        let state = controller
            .method_state(method_id)
            .ok_or_else(|| RunError::UnknownMethod(method_id.to_owned()))?;
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(ExitCode::SUCCESS);
    }

    let validation = controller.update_method_state(method_id, MethodState::from(patch))?;
    Ok(report_validation(&validation))
}

fn set_items(
    controller: &RunController,
    method_id: &str,
    items: Vec<String>,
) -> Result<ExitCode, AppError> {
    let mut patch = Map::new();
    patch.insert(MethodState::INPUTS.to_owned(), json!(items));
    let validation = controller.update_method_state(method_id, MethodState::from(patch))?;
    Ok(report_validation(&validation))
}

fn report_validation(validation: &ValidationResult) -> ExitCode {
    if validation.is_ok() {
        println!("{validation}");
        ExitCode::SUCCESS
    } else {
        eprintln!("{}", validation.message());
        ExitCode::from(VALIDATION_FAILED)
    }
}

fn show_history(controller: &RunController) {
    let history = controller.history();
    if history.is_empty() {
        println!("No results yet.");
        return;
    }
    let now = SystemClock.now();
    for entry in &history {
        println!(
            "{:>9}  {:<14} {}",
            entry.age_label(now),
            entry.method_label(),
            entry.value()
        );
    }
}

fn open(controller: &RunController, token: &str) -> ExitCode {
    let token = token
        .rsplit_once("state=")
        .map_or(token, |(_, token)| token);
    if let Some(method_id) = controller.open_share(token) {
        let state = controller
            .method_state(&method_id)
            .map_or(Value::Null, |state| Value::Object(state.as_map().clone()));
        println!("{method_id}: {state}");
        ExitCode::SUCCESS
    } else {
        eprintln!("not a valid share token");
        ExitCode::FAILURE
    }
}
