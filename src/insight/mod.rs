pub mod provider;

pub use provider::{OpenAiCompatibleGenerator, ProviderError, TextGenerator};

/// Confidence recorded on generated insights. The provider's own
/// confidence, if any, is not consulted.
pub const GENERATED_CONFIDENCE: f64 = 0.85;
