// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation backend trait (local inference engine or remote API client).

use std::path::Path;
use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;
use tracing::info;

use crate::error::TierRouteError;
use crate::types::{ChatMessage, GenerationConfig};

/// A finite, non-restartable stream of generated tokens in emission order.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String, TierRouteError>> + Send>>;

/// Uniform contract over heterogeneous generation backends.
///
/// Lifecycle methods take `&self`; implementations keep their loaded state
/// behind interior mutability so a backend can be shared as
/// `Arc<dyn ModelBackend>`. LoRA adapter operations default to a logged
/// no-op for backends without adapter hot-swap.
#[async_trait]
pub trait ModelBackend: Send + Sync + 'static {
    /// Returns the human-readable name of this backend instance.
    fn name(&self) -> &str;

    /// Loads the model or opens the client. Loading twice is a no-op.
    async fn load(&self) -> Result<(), TierRouteError>;

    /// Releases the model or client.
    async fn unload(&self) -> Result<(), TierRouteError>;

    /// Whether the backend can serve generation calls.
    fn is_loaded(&self) -> bool;

    /// Generates a complete response.
    async fn generate(
        &self,
        messages: &[ChatMessage],
        config: &GenerationConfig,
    ) -> Result<String, TierRouteError>;

    /// Generates a response as a stream of tokens.
    ///
    /// Dropping the returned stream must stop the producer side.
    async fn generate_stream(
        &self,
        messages: &[ChatMessage],
        config: &GenerationConfig,
    ) -> Result<TokenStream, TierRouteError>;

    /// Loads a LoRA adapter under the given name.
    fn load_lora(&self, adapter_path: &Path, adapter_name: &str) -> Result<(), TierRouteError> {
        info!(
            backend = self.name(),
            adapter = adapter_name,
            path = %adapter_path.display(),
            "adapter hot-swap not supported, ignoring load_lora"
        );
        Ok(())
    }

    /// Unloads a previously loaded LoRA adapter.
    fn unload_lora(&self, adapter_name: &str) -> Result<(), TierRouteError> {
        info!(
            backend = self.name(),
            adapter = adapter_name,
            "adapter hot-swap not supported, ignoring unload_lora"
        );
        Ok(())
    }

    /// Selects which loaded LoRA adapter is active.
    fn set_active_lora(&self, adapter_name: &str) -> Result<(), TierRouteError> {
        info!(
            backend = self.name(),
            adapter = adapter_name,
            "adapter hot-swap not supported, ignoring set_active_lora"
        );
        Ok(())
    }

    /// Structured diagnostics (provider, model id, loaded state, usage counters).
    fn model_info(&self) -> serde_json::Value;
}
