//! Language-model capability and provider clients.
//!
//! The pipeline depends only on the [`LanguageModel`] trait; the concrete
//! Gemini REST client lives behind it. Swapping providers means adding
//! another implementation, not touching synthesis code.

/// Core language-model trait.
pub mod client;
/// Gemini REST API client.
pub mod gemini;

pub use client::LanguageModel;
pub use gemini::GeminiClient;
