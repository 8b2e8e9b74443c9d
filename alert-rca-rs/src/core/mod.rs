//! Core abstractions
//!
//! - `AdviceSource`: the external chat-completion endpoint consulted for RCA text
//! - `ClientBuilder`: builds the long-lived HTTP transport used by advice sources

pub mod builder;
pub use builder::ClientBuilder;

use async_trait::async_trait;

use crate::error::Result;
use crate::services::openrouter::ChatCompletionRequest;

/// An external source of analysis text.
///
/// Implementations are shared by reference across concurrent requests and
/// must not hold per-request state.
#[async_trait]
pub trait AdviceSource: Send + Sync {
    /// The source name/identifier
    fn name(&self) -> &str;

    /// Model identifier placed in outgoing payloads
    fn model(&self) -> &str;

    /// Checks that a call can be attempted at all. The error's display text
    /// becomes the diagnostic of the heuristic fallback.
    fn preflight(&self) -> Result<()>;

    /// Sends one completion request and returns the trimmed text of the first choice
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<String>;
}
