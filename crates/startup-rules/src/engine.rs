//! Startup Rule Engine Implementation

use crate::rule::{evaluate, Action, Comparison, RuleEntry, StartupRule};
use counter_store::{CounterStore, StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Engine error types
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Counter store error: {0}")]
    Store(#[from] StoreError),

    #[error("Startup rule '{id}' failed")]
    Action {
        id: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Store key for the launch counter (default: "startups_count")
    pub counter_key: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            counter_key: "startups_count".to_string(),
        }
    }
}

/// Outcome of a call to [`StartupRuleEngine::fire`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FireOutcome {
    /// The evaluation pass ran; carries the launch count it ran at and the
    /// ids of the rules that fired
    Fired { count: i64, fired: Vec<String> },
    /// The activation was a resume or back-navigation, nothing happened
    NotNewEntry,
    /// The engine already ran its pass during this process lifetime
    AlreadyFired,
}

/// Launch-count based rule engine.
///
/// Tracks how many times the application has reached its entry point and
/// invokes registered callbacks based on declarative comparison rules. The
/// counter is persisted through a [`CounterStore`]; everything else is
/// in-process state. One instance per process, owned by the composition
/// root.
///
/// Not thread-safe: `register` and `fire` must be called from the
/// application's single main execution context.
pub struct StartupRuleEngine<S: CounterStore> {
    store: S,
    config: EngineConfig,
    rules: Vec<StartupRule>,
    entries: Vec<RuleEntry>,
    /// Launch count as of construction, or of the fire pass once it ran
    count: i64,
    /// Set by the first qualifying fire pass; never cleared
    has_fired: bool,
}

impl<S: CounterStore> StartupRuleEngine<S> {
    /// Create an engine with the default configuration.
    pub fn new(store: S) -> Result<Self, EngineError> {
        Self::with_config(store, EngineConfig::default())
    }

    /// Create an engine reading and persisting its counter under
    /// `config.counter_key`.
    pub fn with_config(store: S, config: EngineConfig) -> Result<Self, EngineError> {
        let count = store.get(&config.counter_key)?;
        info!("Created startup rule engine at launch count {}", count);

        Ok(Self {
            store,
            config,
            rules: Vec::new(),
            entries: Vec::new(),
            count,
            has_fired: false,
        })
    }

    /// Register a rule firing `action` when the launch count relates to
    /// `threshold` as described by `comparison`.
    ///
    /// `id` names the rule in logs, errors and [`FireOutcome::Fired`].
    /// A non-persistent rule fires at most once during this instance's
    /// lifetime; a persistent rule fires on every matching pass. Thresholds
    /// are unconstrained, zero and negative values compare arithmetically.
    ///
    /// Register everything before the entry point calls [`fire`], rules
    /// cannot be removed later.
    ///
    /// [`fire`]: StartupRuleEngine::fire
    pub fn register(
        &mut self,
        id: impl Into<String>,
        threshold: i64,
        comparison: Comparison,
        action: Action,
        persistent: bool,
    ) {
        let id = id.into();
        let rule = self.rules.len();

        for &primitive in comparison.primitives() {
            self.entries.push(RuleEntry {
                primitive,
                threshold,
                rule,
            });
        }

        debug!(
            "Registered startup rule '{}' ({:?} {}, persistent: {})",
            id, comparison, threshold, persistent
        );

        self.rules.push(StartupRule {
            id,
            active: true,
            persistent,
            action,
        });
    }

    /// Run the once-per-process evaluation pass.
    ///
    /// Call this from the application's single designated entry point with
    /// `is_new_entry = true` only for a fresh launch (not a resume or
    /// back-navigation). The first qualifying call increments and persists
    /// the launch counter, then fires every matching rule; all later calls
    /// are no-ops for the rest of the process lifetime.
    ///
    /// Callback errors propagate out unmodified. A one-shot rule is
    /// consumed before its callback runs, so a failing callback still
    /// spends its single shot.
    pub fn fire(&mut self, is_new_entry: bool) -> Result<FireOutcome, EngineError> {
        if !is_new_entry {
            debug!("Skipping fire pass: not a fresh launch");
            return Ok(FireOutcome::NotNewEntry);
        }

        if self.has_fired {
            debug!("Skipping fire pass: already fired this process");
            return Ok(FireOutcome::AlreadyFired);
        }

        self.count += 1;
        self.store.set(&self.config.counter_key, self.count)?;
        self.has_fired = true;

        let matched = evaluate(self.count, &self.entries);
        let mut fired = Vec::new();

        for idx in matched {
            let rule = &mut self.rules[idx];

            if !rule.active {
                debug!("Skipping exhausted one-shot rule '{}'", rule.id);
                continue;
            }

            // Consume before invoking, the shot is spent even if the
            // callback fails.
            if !rule.persistent {
                rule.active = false;
            }

            debug!("Firing startup rule '{}'", rule.id);
            if let Err(source) = (rule.action)() {
                return Err(EngineError::Action {
                    id: rule.id.clone(),
                    source,
                });
            }

            fired.push(rule.id.clone());
        }

        info!(
            "Startup fire pass complete at launch count {}, {} rule(s) fired",
            self.count,
            fired.len()
        );

        Ok(FireOutcome::Fired {
            count: self.count,
            fired,
        })
    }

    /// Launch count as of construction, or of the fire pass once it ran.
    pub fn count(&self) -> i64 {
        self.count
    }

    /// Whether the evaluation pass already ran during this process lifetime.
    pub fn has_fired(&self) -> bool {
        self.has_fired
    }

    /// Number of registered rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}
