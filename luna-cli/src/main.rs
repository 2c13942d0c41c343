use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use luna_core::arbiter::JudgeLlm;
use luna_core::error::Result as CoreResult;
use luna_core::llm::{ChatMessage, CompletionRequest, HttpLlmClient, LlmClient};
use luna_core::orchestrator::OrchestratorBuilder;
use luna_core::storage::FileStateStore;

mod commands;
mod config;
mod errors;
mod output;

use commands::{run_chat, run_info};
use config::LunaConfig;
use errors::exit_code_for;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "luna")]
#[command(about = "Resource-constrained inference governor")]
#[command(version)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the data directory used for persisted state.
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Raise the tracing level to DEBUG.
    #[arg(short, long)]
    verbose: bool,

    /// Output format for `info`.
    #[arg(long, value_enum, default_value = "human")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Single-turn request; prints the response.
    Chat {
        /// The user's message.
        text: String,
    },
    /// Print the current `(age, pool, karma, generation, total_files)`.
    Info,
}

/// Adapts [`HttpLlmClient`] to [`JudgeLlm`], distinguished only by its target
/// endpoint (design §4.4: "a lighter/cheaper LLM").
struct HttpJudgeLlm {
    client: HttpLlmClient,
}

#[async_trait::async_trait]
impl JudgeLlm for HttpJudgeLlm {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f64,
        max_tokens: u32,
    ) -> CoreResult<String> {
        let response = self
            .client
            .complete(CompletionRequest {
                model: "luna-judge".to_string(),
                messages: vec![
                    ChatMessage { role: "system".to_string(), content: system_prompt.to_string() },
                    ChatMessage { role: "user".to_string(), content: user_prompt.to_string() },
                ],
                temperature,
                top_p: 1.0,
                top_k: 40,
                max_tokens,
                stream: false,
                logit_bias: std::collections::HashMap::new(),
                presence_penalty: None,
                frequency_penalty: None,
                repetition_penalty: None,
            })
            .await?;
        Ok(response.content)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();
    } else {
        tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
    }

    let luna_config = LunaConfig::load(cli.config.as_deref())?;
    let data_dir = luna_config.resolve_data_dir(cli.data_dir.clone());
    std::fs::create_dir_all(&data_dir).ok();

    let request_timeout = std::time::Duration::from_secs(luna_config.request_timeout_secs);
    let llm_endpoint = luna_config.llm_endpoint.clone();
    let judge_endpoint = luna_config.judge_endpoint.clone().unwrap_or_else(|| luna_config.llm_endpoint.clone());
    let core_config = luna_config.into_core_config(data_dir.clone());

    let llm: Arc<dyn LlmClient> = Arc::new(HttpLlmClient::new(llm_endpoint, request_timeout));
    let judge: Arc<dyn JudgeLlm> = Arc::new(HttpJudgeLlm { client: HttpLlmClient::new(judge_endpoint, request_timeout) });
    let store = Arc::new(FileStateStore::new(data_dir));

    match cli.command {
        Commands::Chat { text } => {
            let orchestrator = OrchestratorBuilder::new(core_config, llm, judge, store).build();
            match run_chat(&orchestrator, &text, cli.format).await {
                Ok(()) => Ok(()),
                Err(err) => exit_with(err),
            }
        }
        Commands::Info => match run_info(store, cli.format).await {
            Ok(()) => Ok(()),
            Err(err) => exit_with(err),
        },
    }
}

fn exit_with(err: anyhow::Error) -> anyhow::Result<()> {
    eprintln!("error: {err:#}");
    let code = err
        .downcast_ref::<luna_core::Error>()
        .map_or(2, |core_err| exit_code_for(core_err) as i32);
    std::process::exit(code);
}
