//! Root-cause analysis
//!
//! - `prompt`: builds the chat payload sent to the advice source
//! - `extract`: recovers a JSON object from model text
//! - `coerce`: maps aliased model keys onto the canonical result
//! - `heuristic`: keyword fallback that needs no external call
//! - `risk`: the three-valued risk taxonomy shared by all paths
//! - `engine`: runs the tiers in order

pub mod coerce;
pub mod engine;
pub mod extract;
pub mod heuristic;
pub mod prompt;
pub mod risk;
mod types;

pub use engine::{Fallback, RcaEngine, PARSE_FAILURE};
pub use risk::{impact_from_risk, normalize_risk_level, RiskLevel};
pub use types::{AnalysisRequest, AnalysisResult, ResolutionPath};
