//! The `Generator` trait: the adapter interface for text-generation backends.

use async_trait::async_trait;

use super::GenerateError;

/// Turns one prompt into one completion.
///
/// Each call is independent: a single user message in, the model's text
/// out. Adapters hold no conversation state and do not retry.
///
/// # Object Safety
///
/// This trait is object-safe so callers can hold a `Box<dyn Generator>`
/// chosen at runtime from configuration.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Short backend name for logs (e.g. "anthropic").
    fn name(&self) -> &str;

    /// Send `prompt` and return the raw completion text.
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

// Compile-time assertion: Generator must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn Generator) {}
};
