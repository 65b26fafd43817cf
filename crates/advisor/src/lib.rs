//! Generative-model integration: expense categorization and spending advice.
//!
//! Everything that talks to the model goes through the [`TextModel`] trait so
//! the callers (and the tests) never depend on the concrete HTTP client.

pub use categorize::categorize;
pub use gemini::GeminiClient;
pub use loan::{LoanEstimate, LoanTerms};
pub use suggest::suggest;

mod categorize;
mod gemini;
mod loan;
mod suggest;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("model returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("model returned an empty reply")]
    EmptyReply,
}

/// Single-turn text generation seam.
#[async_trait::async_trait]
pub trait TextModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisorError>;
}
