//! `luna info` — prints `(age, pool, karma, generation, total_files)` (design §6.5).

use std::sync::Arc;

use luna_core::storage::StateStore;

use crate::output::{Output, OutputFormat};

#[derive(Debug, Clone, serde::Serialize)]
struct InfoReport {
    age: u32,
    current_token_pool: i64,
    max_token_pool: i64,
    current_karma: f64,
    karma_quota: f64,
    generation: u32,
    total_files: u32,
    karma_pool: f64,
}

impl Output for InfoReport {
    fn write_human<W: std::io::Write>(&self, mut writer: W) -> anyhow::Result<()> {
        writeln!(writer, "age:            {}", self.age)?;
        writeln!(writer, "token pool:     {}/{}", self.current_token_pool, self.max_token_pool)?;
        writeln!(writer, "karma:          {:.2}/{:.2}", self.current_karma, self.karma_quota)?;
        writeln!(writer, "generation:     {}", self.generation)?;
        writeln!(writer, "total files:    {}", self.total_files)?;
        writeln!(writer, "karma pool:     {:.2}", self.karma_pool)?;
        Ok(())
    }
}

/// Print a snapshot of the current persisted state.
pub async fn run_info(store: Arc<dyn StateStore>, format: OutputFormat) -> anyhow::Result<()> {
    let existential = store.load_existential_state().await?;
    let cfia = store.load_cfia_state().await?;

    let report = InfoReport {
        age: existential.age,
        current_token_pool: existential.current_token_pool,
        max_token_pool: existential.max_token_pool,
        current_karma: existential.current_karma,
        karma_quota: existential.karma_quota,
        generation: cfia.aiiq,
        total_files: cfia.total_files,
        karma_pool: cfia.karma_pool,
    };
    format.print_output(&report)
}
