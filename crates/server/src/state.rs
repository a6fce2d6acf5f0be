//! Application State
//!
//! Shared state across all handlers.

use std::path::PathBuf;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use parking_lot::RwLock;

use prompt_dashboard_config::{load_settings, load_settings_from, InterpreterConfig, Settings};
use prompt_dashboard_core::PromptInterpreter;
use prompt_dashboard_data::{DatasetStore, QueryEngine};
use prompt_dashboard_interpreter::{Lexicon, RuleBasedInterpreter};
use prompt_dashboard_llm::{HostedInterpreter, InterpretationService};

use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration wrapped in RwLock for hot-reload support
    pub config: Arc<RwLock<Settings>>,
    /// Current interpreter; replaced on config reload
    interpreter: Arc<RwLock<Arc<dyn PromptInterpreter>>>,
    /// Hosted service, probed by the readiness check
    hosted: Arc<RwLock<HostedInterpreter>>,
    pub engine: QueryEngine,
    pub metrics: Option<PrometheusHandle>,
    /// Environment name for config reload
    env: Option<String>,
    /// Directory holding `config/`; the working directory when unset
    base_dir: Option<PathBuf>,
}

/// Standard vocabulary extended with configured synonyms and keywords
pub fn build_lexicon(config: &InterpreterConfig) -> Lexicon {
    let lexicon = config
        .field_synonyms
        .iter()
        .fold(Lexicon::default(), |lexicon, synonym| {
            lexicon.with_field_synonym(&synonym.keyword, &synonym.field, synonym.dataset)
        });

    config
        .dataset_keywords
        .iter()
        .fold(lexicon, |lexicon, keyword| {
            lexicon.with_dataset_keyword(&keyword.keyword, keyword.dataset)
        })
}

fn build_service(config: &InterpreterConfig) -> (Arc<dyn PromptInterpreter>, HostedInterpreter) {
    let rules = RuleBasedInterpreter::with_lexicon(build_lexicon(config));
    let hosted = HostedInterpreter::from_config(&config.hosted);
    let service = InterpretationService::new(hosted.clone(), rules);
    (Arc::new(service), hosted)
}

impl AppState {
    /// State with an explicit interpreter and dataset store
    pub fn new(config: Settings, interpreter: Arc<dyn PromptInterpreter>, engine: QueryEngine) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            interpreter: Arc::new(RwLock::new(interpreter)),
            hosted: Arc::new(RwLock::new(HostedInterpreter::disabled())),
            engine,
            metrics: None,
            env: None,
            base_dir: None,
        }
    }

    /// Build the full application from settings: datasets, vocabulary and
    /// the hosted service with rule-based fallback
    pub fn from_settings(config: Settings) -> Result<Self, ServerError> {
        let store = match &config.data.directory {
            Some(dir) => {
                tracing::info!(directory = %dir, "Loading datasets from directory");
                DatasetStore::from_dir(dir)?
            }
            None => DatasetStore::embedded()?,
        };

        let (interpreter, hosted) = build_service(&config.interpreter);
        let mut state = Self::new(config, interpreter, QueryEngine::new(store));
        state.hosted = Arc::new(RwLock::new(hosted));
        Ok(state)
    }

    /// Remember where settings came from so reloads read the same files
    pub fn with_env(mut self, env: Option<String>) -> Self {
        self.env = env;
        self
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn with_hosted(self, hosted: HostedInterpreter) -> Self {
        *self.hosted.write() = hosted;
        self
    }

    /// Current interpreter; the lock is released before returning
    pub fn interpreter(&self) -> Arc<dyn PromptInterpreter> {
        self.interpreter.read().clone()
    }

    pub fn hosted(&self) -> HostedInterpreter {
        self.hosted.read().clone()
    }

    /// Reload configuration from files.
    ///
    /// The interpreter is rebuilt so vocabulary and hosted-service changes
    /// take effect. Server settings (port, CORS, timeout) need a restart.
    pub fn reload_config(&self) -> Result<(), ServerError> {
        let new_config = match &self.base_dir {
            Some(dir) => load_settings_from(dir, self.env.as_deref())?,
            None => load_settings(self.env.as_deref())?,
        };

        let (interpreter, hosted) = build_service(&new_config.interpreter);
        *self.interpreter.write() = interpreter;
        *self.hosted.write() = hosted;
        *self.config.write() = new_config;

        tracing::info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Get a read guard to the current configuration
    pub fn get_config(&self) -> parking_lot::RwLockReadGuard<'_, Settings> {
        self.config.read()
    }
}
