//! Event-driven alert handling
//!
//! [`RootCauseAnalysisStep`] consumes `alert.detected` payloads, runs the
//! [`RcaEngine`], persists the record and publishes `rca.completed`.

mod alert;
mod sinks;

use std::sync::Arc;

use chrono::Utc;
use log::{error, info};
use serde_json::Value;

pub use alert::{Alert, RcaFailure, RcaRecord};
pub use sinks::{ChannelEmitter, Event, EventEmitter, MemoryStateStore, StateStore};

use crate::analysis::RcaEngine;
use crate::error::{RcaError, Result};
use crate::util::truncate_string;

/// Step name used in logs and registrations
pub const STEP_NAME: &str = "RootCauseAnalysis";
/// Topic this step consumes
pub const SUBSCRIBES: &str = "alert.detected";
/// Topic this step publishes
pub const EMITS: &str = "rca.completed";
/// Scope holding completed records keyed by alert id
pub const RESULTS_SCOPE: &str = "rca-results";
/// Scope holding failure entries keyed by alert id
pub const FAILURES_SCOPE: &str = "rca-failures";

/// Turns detected alerts into persisted and published RCA records
pub struct RootCauseAnalysisStep {
    engine: Arc<RcaEngine>,
    state: Arc<dyn StateStore>,
    emitter: Arc<dyn EventEmitter>,
}

impl RootCauseAnalysisStep {
    pub fn new(
        engine: Arc<RcaEngine>,
        state: Arc<dyn StateStore>,
        emitter: Arc<dyn EventEmitter>,
    ) -> Self {
        Self {
            engine,
            state,
            emitter,
        }
    }

    pub fn name(&self) -> &'static str {
        STEP_NAME
    }

    /// Handle one `alert.detected` payload.
    ///
    /// Failures are recorded under `rca-failures` before being returned.
    pub async fn handle(&self, payload: Value) -> Result<RcaRecord> {
        let alert_id = payload
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();

        match self.process(payload).await {
            Ok(record) => Ok(record),
            Err(e) => {
                error!("{} failed for alert {}: {}", STEP_NAME, alert_id, e);
                self.record_failure(&alert_id, &e).await;
                Err(e)
            }
        }
    }

    async fn process(&self, payload: Value) -> Result<RcaRecord> {
        let alert: Alert = serde_json::from_value(payload)
            .map_err(|e| RcaError::validation(format!("Invalid alert payload: {}", e)))?;

        info!(
            "Starting RCA for alert {} ({} on {})",
            alert.id, alert.alert_type, alert.affected_resource
        );

        let analysis = self.engine.analyze(&alert.to_request()).await;
        let record = RcaRecord::from_analysis(&alert, analysis, Utc::now());
        let value = serde_json::to_value(&record)?;

        self.state.set(RESULTS_SCOPE, &alert.id, value.clone()).await?;
        self.emitter.emit(EMITS, value).await?;

        info!(
            "RCA completed for alert {}: {} (risk: {})",
            alert.id,
            truncate_string(&record.summary, 100),
            record.risk_level
        );

        Ok(record)
    }

    async fn record_failure(&self, alert_id: &str, err: &RcaError) {
        let failure = RcaFailure {
            alert_id: alert_id.to_string(),
            error: err.to_string(),
            timestamp: Utc::now(),
        };

        let stored = match serde_json::to_value(&failure) {
            Ok(value) => self.state.set(FAILURES_SCOPE, alert_id, value).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = stored {
            error!("Could not record RCA failure for alert {}: {}", alert_id, e);
        }
    }
}
