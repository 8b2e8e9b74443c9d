//! # Alert RCA
//!
//! Root-cause analysis for infrastructure alerts.
//!
//! This crate provides:
//!
//! - An advice client for OpenAI-compatible chat endpoints (OpenRouter by default)
//! - Extraction and coercion of loosely structured model output into a fixed record
//! - A deterministic keyword heuristic used whenever the advice path cannot answer
//! - An event-driven step that persists and publishes the resulting records
//!
//! ## Architecture
//!
//! - `AdviceSource`: the seam between the engine and any chat backend
//! - `RcaEngine`: runs preflight, the remote call, parsing and coercion, falling
//!   back to the heuristic on any failure; `analyze` never returns an error
//! - `RootCauseAnalysisStep`: consumes `alert.detected`, emits `rca.completed`
//! - `RcaError`: error type for the client, configuration and the step

pub mod analysis;
pub use analysis::{AnalysisRequest, AnalysisResult, RcaEngine, ResolutionPath, RiskLevel};

pub mod core;
pub use core::{AdviceSource, ClientBuilder};

pub mod services;
pub use services::openrouter::OpenRouterClient;

pub mod error;
pub use error::{ErrorContext, RcaError, Result};

pub mod config;
pub use config::{AdvisorConfig, ConfigProvider};

pub mod pipeline;
pub use pipeline::{Alert, RcaRecord, RootCauseAnalysisStep};

mod util;

#[cfg(test)]
mod tests;

/// Analyze a request with the process-wide engine configured from the environment
pub async fn analyze_alert(request: &AnalysisRequest) -> AnalysisResult {
    RcaEngine::global().analyze(request).await
}
