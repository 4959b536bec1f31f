//! Language-model client abstraction.
//!
//! The synthesis stage talks to a [`LanguageModel`] and never to a
//! concrete provider, so tests can substitute a scripted model and the
//! provider can change without touching pipeline code.

use crate::types::Result;
use async_trait::async_trait;

/// Generic language-model capability.
///
/// Implementations map provider failures onto the crate error taxonomy:
/// authorization problems become `SynthesisAuth`, throttling becomes
/// `SynthesisRateLimit`, and everything network-shaped becomes
/// `SynthesisTransport`.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a completion for a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check that the configured credentials work, with a minimal
    /// generation request.
    async fn verify_credentials(&self) -> Result<()>;

    /// Model identifier, for logging and report metadata.
    fn model_name(&self) -> &str;
}
