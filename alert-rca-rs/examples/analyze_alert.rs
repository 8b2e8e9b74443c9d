//! Alert RCA Example
//!
//! Runs one alert through the root-cause analysis step and prints the record.
//! Without `OPENROUTER_API_KEY` the keyword heuristic answers instead.
//!
//! To run this example:
//! ```
//! OPENROUTER_API_KEY=your_api_key cargo run --example analyze_alert
//! ```

use std::sync::Arc;

use alert_rca::{
    error::Result,
    pipeline::{ChannelEmitter, MemoryStateStore, RootCauseAnalysisStep},
    RcaEngine,
};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    println!("Alert RCA Example");

    let engine = RcaEngine::from_env();
    match engine.model() {
        Some(model) => println!("Advice model: {}", model),
        None => println!("No advice source configured, using heuristics"),
    }

    let (emitter, mut events) = ChannelEmitter::new();
    let step = RootCauseAnalysisStep::new(
        Arc::new(engine),
        Arc::new(MemoryStateStore::new()),
        Arc::new(emitter),
    );

    let alert = json!({
        "id": "alert-demo-1",
        "alertType": "cpu_spike",
        "severity": "warning",
        "metric": "cpu_usage",
        "currentValue": 95,
        "threshold": 80,
        "affectedResource": "web-01",
        "logs": ["worker pool saturated", "request queue depth 512"],
        "metadata": {"service": "checkout"}
    });

    let record = step.handle(alert).await?;

    println!("\nSummary:       {}", record.summary);
    println!("Root cause:    {}", record.root_cause);
    println!("Proposed fix:  {}", record.proposed_fix);
    println!("Risk level:    {}", record.risk_level);
    println!("Impact:        {}", record.estimated_impact);

    if let Some(event) = events.recv().await {
        println!("\nPublished on {}", event.topic);
    }

    Ok(())
}
