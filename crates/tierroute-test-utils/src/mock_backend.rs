// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generation backend for deterministic testing.
//!
//! `MockBackend` implements `ModelBackend` with pre-configured responses.
//! Responses are popped from a FIFO queue; when the queue is empty a default
//! text naming the backend is returned. Streaming splits the response on
//! whitespace and emits one token per word.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use tierroute_core::{
    ChatMessage, GenerationConfig, ModelBackend, TierRouteError, TokenStream, spawn_token_stream,
};

/// A mock backend that returns pre-configured responses.
pub struct MockBackend {
    name: String,
    responses: Mutex<VecDeque<String>>,
    loaded: AtomicBool,
    fail_generate: AtomicBool,
    load_count: AtomicUsize,
    unload_count: AtomicUsize,
    generate_calls: AtomicUsize,
    stream_calls: AtomicUsize,
    produced_tokens: Arc<AtomicUsize>,
    token_delay: Option<Duration>,
    supports_adapters: bool,
    adapters: std::sync::Mutex<Vec<String>>,
    active_adapter: std::sync::Mutex<Option<String>>,
    last_config: std::sync::Mutex<Option<GenerationConfig>>,
}

impl MockBackend {
    /// Create an unloaded mock backend with an empty response queue.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: Mutex::new(VecDeque::new()),
            loaded: AtomicBool::new(false),
            fail_generate: AtomicBool::new(false),
            load_count: AtomicUsize::new(0),
            unload_count: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
            stream_calls: AtomicUsize::new(0),
            produced_tokens: Arc::new(AtomicUsize::new(0)),
            token_delay: None,
            supports_adapters: false,
            adapters: std::sync::Mutex::new(Vec::new()),
            active_adapter: std::sync::Mutex::new(None),
            last_config: std::sync::Mutex::new(None),
        }
    }

    /// Pre-load the response queue.
    pub fn with_responses<I, S>(self, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            ..self
        }
    }

    /// Sleep before each streamed token.
    pub fn with_token_delay(mut self, delay: Duration) -> Self {
        self.token_delay = Some(delay);
        self
    }

    /// Accept LoRA adapter operations instead of ignoring them.
    pub fn with_adapter_support(mut self) -> Self {
        self.supports_adapters = true;
        self
    }

    /// Add a response to the end of the queue.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(text.into());
    }

    /// Make subsequent generation calls fail with a backend error.
    pub fn fail_generate(&self, fail: bool) {
        self.fail_generate.store(fail, Ordering::SeqCst);
    }

    /// Number of unloaded-to-loaded transitions.
    pub fn load_count(&self) -> usize {
        self.load_count.load(Ordering::SeqCst)
    }

    pub fn unload_count(&self) -> usize {
        self.unload_count.load(Ordering::SeqCst)
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn stream_calls(&self) -> usize {
        self.stream_calls.load(Ordering::SeqCst)
    }

    /// Tokens handed to consumers across all streams.
    pub fn produced_tokens(&self) -> usize {
        self.produced_tokens.load(Ordering::SeqCst)
    }

    /// Adapters currently loaded (only tracked with adapter support).
    pub fn adapters(&self) -> Vec<String> {
        self.adapters.lock().map(|a| a.clone()).unwrap_or_default()
    }

    pub fn active_adapter(&self) -> Option<String> {
        self.active_adapter.lock().ok().and_then(|a| a.clone())
    }

    /// The generation config passed to the most recent call.
    pub fn last_config(&self) -> Option<GenerationConfig> {
        self.last_config.lock().ok().and_then(|c| c.clone())
    }

    async fn begin_call(&self, config: &GenerationConfig) -> Result<String, TierRouteError> {
        if !self.is_loaded() {
            return Err(TierRouteError::NotLoaded(self.name.clone()));
        }
        if self.fail_generate.load(Ordering::SeqCst) {
            return Err(TierRouteError::backend(&self.name, "injected failure"));
        }
        if let Ok(mut last) = self.last_config.lock() {
            *last = Some(config.clone());
        }
        Ok(self
            .responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| format!("mock response from {}", self.name)))
    }
}

#[async_trait]
impl ModelBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> Result<(), TierRouteError> {
        if !self.loaded.swap(true, Ordering::SeqCst) {
            self.load_count.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn unload(&self) -> Result<(), TierRouteError> {
        if self.loaded.swap(false, Ordering::SeqCst) {
            self.unload_count.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    async fn generate(
        &self,
        _messages: &[ChatMessage],
        config: &GenerationConfig,
    ) -> Result<String, TierRouteError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.begin_call(config).await
    }

    async fn generate_stream(
        &self,
        _messages: &[ChatMessage],
        config: &GenerationConfig,
    ) -> Result<TokenStream, TierRouteError> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        let text = self.begin_call(config).await?;
        let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        let produced = self.produced_tokens.clone();
        let delay = self.token_delay;

        Ok(spawn_token_stream(1, move |sink| async move {
            for token in tokens {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                if sink.send(token).await.is_err() {
                    return;
                }
                produced.fetch_add(1, Ordering::SeqCst);
            }
        }))
    }

    fn load_lora(&self, adapter_path: &Path, adapter_name: &str) -> Result<(), TierRouteError> {
        if !self.supports_adapters {
            info!(backend = %self.name, adapter = adapter_name, "adapter hot-swap not supported");
            return Ok(());
        }
        info!(backend = %self.name, adapter = adapter_name, path = %adapter_path.display(), "adapter loaded");
        if let Ok(mut adapters) = self.adapters.lock() {
            adapters.push(adapter_name.to_string());
        }
        Ok(())
    }

    fn unload_lora(&self, adapter_name: &str) -> Result<(), TierRouteError> {
        if !self.supports_adapters {
            info!(backend = %self.name, adapter = adapter_name, "adapter hot-swap not supported");
            return Ok(());
        }
        if let Ok(mut adapters) = self.adapters.lock() {
            adapters.retain(|a| a != adapter_name);
        }
        if let Ok(mut active) = self.active_adapter.lock() {
            if active.as_deref() == Some(adapter_name) {
                *active = None;
            }
        }
        Ok(())
    }

    fn set_active_lora(&self, adapter_name: &str) -> Result<(), TierRouteError> {
        if !self.supports_adapters {
            info!(backend = %self.name, adapter = adapter_name, "adapter hot-swap not supported");
            return Ok(());
        }
        if !self.adapters().iter().any(|a| a == adapter_name) {
            return Err(TierRouteError::backend(
                &self.name,
                format!("adapter `{adapter_name}` is not loaded"),
            ));
        }
        if let Ok(mut active) = self.active_adapter.lock() {
            *active = Some(adapter_name.to_string());
        }
        Ok(())
    }

    fn model_info(&self) -> serde_json::Value {
        serde_json::json!({
            "backend": self.name,
            "provider": "mock",
            "loaded": self.is_loaded(),
            "generate_calls": self.generate_calls(),
            "stream_calls": self.stream_calls(),
            "active_adapter": self.active_adapter(),
        })
    }
}
