//! Page lifecycle: load once, derive domains, answer submissions.
//!
//! Ownership model:
//! - `PageController` owns the `PageConfig` and the `PageState`; nothing else
//!   mutates the state.
//! - The state moves `Pending` → `Loaded` or `Pending` → `Failed` exactly once.
//! - After load the content and domains are read-only; submissions never
//!   trigger a reload.

use tracing::{debug, info};

use crate::config::PageConfig;
use crate::data::{LoadState, SelectionTuple};
use crate::domains::AttributeDomains;
use crate::errors::RouteError;
use crate::loader::{BackgroundLoad, DatasetLoader};
use crate::matcher::{MatchOutcome, find_match, match_form};
use crate::render::{RecommendationCard, render_form, render_record};
use crate::source::LoadedContent;
use crate::types::AttributeName;

/// Explicit per-page state.
#[derive(Clone, Debug)]
pub struct PageState {
    /// Load progress.
    pub load: LoadState,
    /// Decoded dataset once loaded.
    pub content: Option<LoadedContent>,
    /// Option lists derived from `content`.
    pub domains: AttributeDomains,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            load: LoadState::Pending,
            content: None,
            domains: AttributeDomains::default(),
        }
    }
}

/// What a submission produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Rendered recommendation.
    Card(RecommendationCard),
    /// The dataset failed to load; the page stays unusable.
    LoadFailed(String),
    /// The dataset is still loading.
    StillLoading(String),
    /// Some selector attributes have no value.
    Incomplete {
        /// Configured user-facing message.
        message: String,
        /// Selectors without a value, in page order.
        missing: Vec<AttributeName>,
    },
    /// Valid selection with no matching recommendation.
    NoMatch(String),
}

impl SubmitOutcome {
    /// User-facing text for non-card outcomes.
    pub fn message(&self) -> Option<&str> {
        match self {
            SubmitOutcome::Card(_) => None,
            SubmitOutcome::LoadFailed(message)
            | SubmitOutcome::StillLoading(message)
            | SubmitOutcome::NoMatch(message)
            | SubmitOutcome::Incomplete { message, .. } => Some(message),
        }
    }

    /// Rendered card, if the submission matched.
    pub fn card(&self) -> Option<&RecommendationCard> {
        match self {
            SubmitOutcome::Card(card) => Some(card),
            _ => None,
        }
    }
}

/// Drives one page: configuration, load, and submissions.
pub struct PageController {
    config: PageConfig,
    loader: DatasetLoader,
    state: PageState,
    pending: Option<BackgroundLoad>,
}

impl PageController {
    /// Validate `config` and create a controller in the `Pending` state.
    pub fn new(config: PageConfig, loader: DatasetLoader) -> Result<Self, RouteError> {
        config.validate()?;
        Ok(Self {
            config,
            loader,
            state: PageState::default(),
            pending: None,
        })
    }

    /// Page configuration.
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Current page state.
    pub fn state(&self) -> &PageState {
        &self.state
    }

    /// Current load progress.
    pub fn load_state(&self) -> &LoadState {
        &self.state.load
    }

    /// Start the single background load. Has no effect once a load was started
    /// or has resolved.
    pub fn start(&mut self) {
        if self.pending.is_some() || self.state.load.is_resolved() {
            return;
        }
        self.pending = Some(self.loader.spawn(self.config.clone()));
    }

    /// Load on the calling thread. Returns the resolved state.
    pub fn load_blocking(&mut self) -> &LoadState {
        if let Some(pending) = self.pending.take() {
            let result = pending.wait();
            self.resolve(result);
        } else if !self.state.load.is_resolved() {
            let result = self.loader.load(&self.config);
            self.resolve(result);
        }
        &self.state.load
    }

    /// Pick up the background result if it is ready.
    pub fn poll(&mut self) -> &LoadState {
        if let Some(pending) = self.pending.as_mut()
            && let Some(result) = pending.try_take()
        {
            self.pending = None;
            self.resolve(result);
        }
        &self.state.load
    }

    /// Block until the background load (if any) resolves.
    pub fn wait(&mut self) -> &LoadState {
        if let Some(pending) = self.pending.take() {
            let result = pending.wait();
            self.resolve(result);
        }
        &self.state.load
    }

    /// Option domains; empty until loaded.
    pub fn domains(&self) -> &AttributeDomains {
        &self.state.domains
    }

    /// Selector names in page order; empty until loaded.
    pub fn selectors(&self) -> Vec<AttributeName> {
        self.state
            .content
            .as_ref()
            .map(LoadedContent::selectors)
            .unwrap_or_default()
    }

    /// Decoded dataset once loaded.
    pub fn content(&self) -> Option<&LoadedContent> {
        self.state.content.as_ref()
    }

    /// Answer a submission.
    ///
    /// Checks run in a fixed order: failed load, pending load, incomplete
    /// selection, missing match. Only a fully valid, matching selection renders.
    pub fn submit(&self, tuple: &SelectionTuple) -> SubmitOutcome {
        let messages = &self.config.messages;
        if matches!(self.state.load, LoadState::Failed(_)) {
            return SubmitOutcome::LoadFailed(messages.load_failed.clone());
        }
        let Some(content) = self.state.content.as_ref() else {
            return SubmitOutcome::StillLoading(messages.still_loading.clone());
        };

        let selectors = content.selectors();
        let missing: Vec<AttributeName> = tuple.missing(&selectors).into_iter().cloned().collect();
        if !missing.is_empty() {
            return SubmitOutcome::Incomplete {
                message: messages.selection_incomplete.clone(),
                missing,
            };
        }

        let card = match content {
            LoadedContent::Records(dataset) => match find_match(dataset, tuple) {
                MatchOutcome::Found(record) => Some(render_record(record, &self.config.card)),
                MatchOutcome::NotFound => None,
            },
            LoadedContent::Form(schema) => match match_form(schema, tuple) {
                MatchOutcome::Found(answers) => Some(render_form(&answers, &self.config.card)),
                MatchOutcome::NotFound => None,
            },
        };
        match card {
            Some(card) => SubmitOutcome::Card(card),
            None => {
                debug!(
                    "[route_planner:page] page='{}' no match for {:?}",
                    self.config.page_id, tuple
                );
                SubmitOutcome::NoMatch(messages.no_match.clone())
            }
        }
    }

    fn resolve(&mut self, result: Result<LoadedContent, RouteError>) {
        match result {
            Ok(content) => {
                self.state.domains = AttributeDomains::from_content(&content);
                info!(
                    "[route_planner:page] page='{}' ready: {} entries, {} selectors",
                    self.config.page_id,
                    content.len(),
                    self.state.domains.len()
                );
                self.state.content = Some(content);
                self.state.load = LoadState::Loaded;
            }
            Err(err) => {
                self.state.load = LoadState::Failed(err.to_string());
            }
        }
    }
}
