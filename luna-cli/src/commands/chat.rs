//! `luna chat "<text>"` — single-turn request (design §6.5).

use std::time::{SystemTime, UNIX_EPOCH};

use luna_core::Orchestrator;

use crate::output::{Output, OutputFormat};

#[derive(Debug, Clone, serde::Serialize)]
struct ChatReport {
    response: String,
    tier: String,
    tokens_used: u32,
    karma_earned: f64,
    used_fallback: bool,
}

impl Output for ChatReport {
    fn write_human<W: std::io::Write>(&self, mut writer: W) -> anyhow::Result<()> {
        writeln!(writer, "{}", self.response)?;
        Ok(())
    }
}

/// Run one chat turn and print the response.
pub async fn run_chat(orchestrator: &Orchestrator, text: &str, format: OutputFormat) -> anyhow::Result<()> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
    let (response, metrics) = orchestrator.handle_request(text, now).await?;

    let report = ChatReport {
        response,
        tier: metrics.tier.to_string(),
        tokens_used: metrics.tokens_used,
        karma_earned: metrics.karma_earned,
        used_fallback: metrics.used_fallback,
    };
    format.print_output(&report)
}
