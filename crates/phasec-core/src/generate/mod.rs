//! Text-generation backends.
//!
//! [`Generator`] is the single seam between the fill loop and a model
//! provider. Concrete adapters speak the Anthropic Messages API and the
//! OpenAI Chat Completions API; tests substitute a scripted double.

mod anthropic;
pub mod config;
mod error;
mod openai;
pub mod trait_def;

pub use anthropic::AnthropicGenerator;
pub use config::{GeneratorConfig, Provider, ProviderParseError};
pub use error::GenerateError;
pub use openai::OpenAiGenerator;
pub use trait_def::Generator;

use tracing::debug;

/// Build the adapter selected by `config.provider`.
///
/// Fails with [`GenerateError::MissingApiKey`] when the environment variable
/// named by `config.api_key_env` is unset or empty.
pub fn create_generator(config: &GeneratorConfig) -> Result<Box<dyn Generator>, GenerateError> {
    debug!(provider = %config.provider, model = %config.model, "create_generator: called");
    let api_key = config.api_key()?;
    match config.provider {
        Provider::Anthropic => Ok(Box::new(AnthropicGenerator::new(config, api_key)?)),
        Provider::OpenAi => Ok(Box::new(OpenAiGenerator::new(config, api_key)?)),
    }
}
