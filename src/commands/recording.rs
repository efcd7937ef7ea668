//! Recording command

use crate::capture::traits::{Clock, InputSource};
use crate::config::MacroConfig;
use crate::playback::timing::ThreadSleeper;
use crate::recorder::coordinator::MacroCoordinator;
use crate::recorder::state::MacroSummary;
use anyhow::Context;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

/// Record until `stop` resolves, then save the macro to `output`
pub async fn record_macro<S, F>(
    source: Arc<S>,
    clock: Arc<dyn Clock>,
    config: MacroConfig,
    output: &Path,
    stop: F,
) -> anyhow::Result<MacroSummary>
where
    S: InputSource + 'static,
    F: Future<Output = ()>,
{
    let mut coordinator =
        MacroCoordinator::with_timing(source, config, clock, Arc::new(ThreadSleeper));

    coordinator
        .start_recording()
        .context("Failed to start recording")?;

    stop.await;

    coordinator
        .stop_recording()
        .context("Failed to stop recording")?;

    let summary = coordinator.summary();
    tracing::info!(
        "Recorded {} events over {:.2}s",
        summary.total_events,
        summary.duration_secs
    );

    coordinator
        .save(output)
        .with_context(|| format!("Failed to save macro to {}", output.display()))?;

    Ok(summary)
}
