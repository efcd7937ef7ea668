use crate::recorder::log::EventLog;
use crate::recorder::state::MacroSummary;
use anyhow::Context;
use std::path::Path;

/// Summarize a stored macro without replaying it
pub fn inspect_macro(input: &Path) -> anyhow::Result<MacroSummary> {
    let log = EventLog::load(input).with_context(|| format!("Failed to read {}", input.display()))?;
    Ok(MacroSummary::of(&log))
}
