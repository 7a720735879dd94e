// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Binds routing decisions to live backends.
//!
//! Lifecycle: UNLOADED -> `load()` -> LOADED -> `unload()` -> UNLOADED.
//! Generation while UNLOADED fails with [`TierRouteError::NotLoaded`];
//! `load()` while LOADED is a no-op. A decided tier without a loaded backend
//! is substituted along [`Tier::fallback_chain`], and the substitution is
//! noted once in the decision's reason.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::json;
use tierroute_config::TierRouteConfig;
use tierroute_core::{
    ChatMessage, EmbeddingProvider, GenerationConfig, ModelBackend, Tier, TierRouteError,
    TokenStream, task_from_messages,
};
use tierroute_router::{RouteDecision, Router};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::history::{DEFAULT_HISTORY_CAPACITY, HistoryEntry, RoutingHistory, RoutingStats};

/// Per-call force flags. When several are set, the first in the order
/// local, production, reasoning wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides {
    pub force_local: bool,
    pub force_production: bool,
    pub force_reasoning: bool,
}

impl Overrides {
    /// No override: the router decides.
    pub fn none() -> Self {
        Self::default()
    }

    /// Force a single tier.
    pub fn force(tier: Tier) -> Self {
        let mut o = Self::default();
        match tier {
            Tier::Local => o.force_local = true,
            Tier::Production => o.force_production = true,
            Tier::Reasoning => o.force_reasoning = true,
        }
        o
    }

    pub fn forced_tier(&self) -> Option<Tier> {
        if self.force_local {
            Some(Tier::Local)
        } else if self.force_production {
            Some(Tier::Production)
        } else if self.force_reasoning {
            Some(Tier::Reasoning)
        } else {
            None
        }
    }
}

/// A resolved backend together with the decision that selected it.
pub struct Selection {
    /// Tier whose backend serves the call.
    pub tier: Tier,
    pub backend: Arc<dyn ModelBackend>,
    /// The decision; `decision.target` keeps the originally decided tier.
    pub decision: RouteDecision,
}

impl Selection {
    pub fn is_fallback(&self) -> bool {
        self.tier != self.decision.target
    }
}

impl std::fmt::Debug for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selection")
            .field("tier", &self.tier)
            .field("backend", &self.backend.name())
            .field("decision", &self.decision)
            .finish()
    }
}

/// Routes tasks to one of up to three tier backends.
pub struct Dispatcher {
    router: Arc<Router>,
    local: Arc<dyn ModelBackend>,
    backends: HashMap<Tier, Arc<dyn ModelBackend>>,
    history: RoutingHistory,
    loaded: AtomicBool,
    lifecycle: Mutex<()>,
}

impl Dispatcher {
    /// A dispatcher with only the local tier configured. Local is the
    /// terminal fallback and is always present.
    pub fn new(router: Arc<Router>, local: Arc<dyn ModelBackend>) -> Self {
        let mut backends: HashMap<Tier, Arc<dyn ModelBackend>> = HashMap::new();
        backends.insert(Tier::Local, local.clone());
        Self {
            router,
            local,
            backends,
            history: RoutingHistory::new(DEFAULT_HISTORY_CAPACITY),
            loaded: AtomicBool::new(false),
            lifecycle: Mutex::new(()),
        }
    }

    /// A dispatcher whose router and history follow `config`. Remote tiers
    /// are added with [`Dispatcher::with_backend`].
    pub fn from_config(
        config: &TierRouteConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        local: Arc<dyn ModelBackend>,
    ) -> Self {
        let router = Arc::new(Router::from_config(&config.router, embedder));
        Self::new(router, local).with_history_capacity(config.history.capacity)
    }

    /// Configures the backend for `tier`, replacing any previous one.
    pub fn with_backend(mut self, tier: Tier, backend: Arc<dyn ModelBackend>) -> Self {
        if tier == Tier::Local {
            self.local = backend.clone();
        }
        self.backends.insert(tier, backend);
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history = RoutingHistory::new(capacity);
        self
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Whether a backend is configured for `tier`.
    pub fn is_configured(&self, tier: Tier) -> bool {
        self.backends.contains_key(&tier)
    }

    /// Loads every configured backend. A no-op when already loaded.
    pub async fn load(&self) -> Result<(), TierRouteError> {
        let _guard = self.lifecycle.lock().await;
        if self.is_loaded() {
            debug!("dispatcher already loaded");
            return Ok(());
        }

        for tier in Tier::all() {
            if let Some(backend) = self.backends.get(&tier) {
                if backend.is_loaded() {
                    continue;
                }
                info!(tier = %tier, backend = backend.name(), "loading backend");
                backend.load().await?;
            }
        }

        self.loaded.store(true, Ordering::Release);
        info!(tiers = self.backends.len(), "dispatcher loaded");
        Ok(())
    }

    /// Unloads every configured backend. A no-op when already unloaded.
    pub async fn unload(&self) -> Result<(), TierRouteError> {
        let _guard = self.lifecycle.lock().await;
        if !self.is_loaded() {
            return Ok(());
        }

        self.loaded.store(false, Ordering::Release);
        for tier in Tier::all() {
            if let Some(backend) = self.backends.get(&tier) {
                info!(tier = %tier, backend = backend.name(), "unloading backend");
                backend.unload().await?;
            }
        }
        info!("dispatcher unloaded");
        Ok(())
    }

    /// The routing decision for `task`, with no side effects.
    pub fn route(&self, task: &str) -> RouteDecision {
        self.router.route(task)
    }

    fn available(&self, tier: Tier) -> Option<&Arc<dyn ModelBackend>> {
        self.backends.get(&tier).filter(|b| b.is_loaded())
    }

    /// Decides (or takes the forced tier) and resolves it to a loaded backend.
    ///
    /// The decided tier is tried first, then the rest of its fallback chain,
    /// then any other loaded tier. Fails with `NotLoaded` only when the
    /// dispatcher is unloaded or no backend at all is loaded.
    pub fn select_backend(
        &self,
        task: &str,
        overrides: Overrides,
    ) -> Result<Selection, TierRouteError> {
        if !self.is_loaded() {
            return Err(TierRouteError::NotLoaded("dispatcher".into()));
        }

        let decision = match overrides.forced_tier() {
            Some(tier) => RouteDecision::forced(tier),
            None => self.router.route(task),
        };
        self.resolve(decision)
    }

    fn resolve(&self, mut decision: RouteDecision) -> Result<Selection, TierRouteError> {
        let wanted = decision.target;
        let chain = wanted.fallback_chain();
        let candidates = chain.iter().copied().chain(
            Tier::FALLBACK_ORDER
                .iter()
                .copied()
                .filter(|t| !chain.contains(t)),
        );

        for tier in candidates {
            let Some(backend) = self.available(tier) else {
                continue;
            };
            if tier != wanted {
                let cause = TierRouteError::TierUnavailable { tier: wanted };
                decision.note_fallback();
                warn!(requested = %wanted, served = %tier, cause = %cause, "tier fallback");
            }
            return Ok(Selection {
                tier,
                backend: backend.clone(),
                decision,
            });
        }

        Err(TierRouteError::NotLoaded(format!(
            "no loaded backend can serve {wanted}"
        )))
    }

    fn record(&self, task: &str, selection: &Selection) {
        let decision = &selection.decision;
        info!(
            tier = %selection.tier,
            requested = %decision.target,
            confidence = decision.confidence,
            mode = %decision.mode,
            reason = %decision.reason,
            "dispatching"
        );
        self.history
            .record(HistoryEntry::new(task, selection.tier, decision));
    }

    /// Routes the last user message and generates a full response.
    pub async fn generate(
        &self,
        messages: &[ChatMessage],
        config: &GenerationConfig,
        overrides: Overrides,
    ) -> Result<String, TierRouteError> {
        let task = task_from_messages(messages);
        let selection = self.select_backend(task, overrides)?;
        self.record(task, &selection);
        selection.backend.generate(messages, config).await
    }

    /// Routes the last user message and streams the response. The history
    /// entry is recorded before the stream is returned, so it exists even if
    /// the caller drops the stream early.
    pub async fn generate_stream(
        &self,
        messages: &[ChatMessage],
        config: &GenerationConfig,
        overrides: Overrides,
    ) -> Result<TokenStream, TierRouteError> {
        let task = task_from_messages(messages);
        let selection = self.select_backend(task, overrides)?;
        self.record(task, &selection);
        selection.backend.generate_stream(messages, config).await
    }

    pub fn routing_stats(&self) -> RoutingStats {
        self.history.stats()
    }

    /// Every retained history entry, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.snapshot()
    }

    /// Loads a LoRA adapter on the local backend.
    pub fn load_lora(&self, adapter_path: &Path, adapter_name: &str) -> Result<(), TierRouteError> {
        self.local.load_lora(adapter_path, adapter_name)
    }

    pub fn unload_lora(&self, adapter_name: &str) -> Result<(), TierRouteError> {
        self.local.unload_lora(adapter_name)
    }

    pub fn set_active_lora(&self, adapter_name: &str) -> Result<(), TierRouteError> {
        self.local.set_active_lora(adapter_name)
    }

    /// Aggregated diagnostics for every tier plus router statistics.
    pub fn model_info(&self) -> serde_json::Value {
        let tier_info = |tier: Tier| {
            self.backends
                .get(&tier)
                .map_or(serde_json::Value::Null, |b| b.model_info())
        };
        json!({
            "type": "tiered",
            "loaded": self.is_loaded(),
            "local": tier_info(Tier::Local),
            "production": tier_info(Tier::Production),
            "reasoning": tier_info(Tier::Reasoning),
            "router": self.router.stats(),
            "history_entries": self.history.len(),
        })
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tiers: Vec<String> = Tier::all()
            .filter(|t| self.backends.contains_key(t))
            .map(|t| t.to_string())
            .collect();
        f.debug_struct("Dispatcher")
            .field("tiers", &tiers)
            .field("loaded", &self.is_loaded())
            .field("router", &self.router)
            .finish()
    }
}
