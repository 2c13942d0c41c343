#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]

//! # Luna Core
//!
//! A resource-constrained inference governor: it decides whether a request
//! deserves a response, how many tokens it may spend, how the generation
//! parameters should be biased under pool pressure, how the response should
//! be scored against a reference answer, and how the lesson-cache file
//! layout should grow over the process's lifetime.
//!
//! ## Module Organization
//!
//! ### Pipeline stages
//! - [`rvc`]: Response Value Classifier — tiers a request's complexity and emotional stakes.
//! - [`existential`]: Existential Budget / Token Economy — go/no-go and karma accounting.
//! - [`controller`]: Three-Layer Inference Controller — pre/in/post-inference budget enforcement.
//! - [`arbiter`]: Gold-standard scoring, utility, karma delta, and lesson production.
//! - [`cfia`]: Constrained Factorial Intelligence Architecture — lesson-cache file lifecycle.
//! - [`retrieval`]: Tag-overlap lesson lookup for prompt injection.
//! - [`orchestrator`]: Wires the above into the full per-request pipeline.
//!
//! ### Support
//! - [`types`]: Shared entity structs, enums, and configuration.
//! - [`constants`]: Tuning tables as data (design §9 "rule tables as data").
//! - [`error`]: The closed `Error` taxonomy and `Result` alias.
//! - [`retry`]: Exponential-backoff retry policy for capability calls.
//! - [`llm`]: The main generation backend capability trait.
//! - [`personality`]: Trait-DNA/voice-profile and emergence-zone capability traits.
//! - [`memory_provider`]: Optional CARMA memory/retrieval capability trait.
//! - [`storage`]: Atomic filesystem persistence for all durable state.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use luna_core::llm::{ChatMessage, CompletionRequest, CompletionResponse, HttpLlmClient, LlmClient};
//! use luna_core::arbiter::JudgeLlm;
//! use luna_core::error::Result;
//! use luna_core::orchestrator::OrchestratorBuilder;
//! use luna_core::storage::FileStateStore;
//! use luna_core::types::LunaCoreConfig;
//!
//! struct SameBackendJudge(Arc<dyn LlmClient>);
//!
//! #[async_trait::async_trait]
//! impl JudgeLlm for SameBackendJudge {
//!     async fn complete(
//!         &self,
//!         system_prompt: &str,
//!         user_prompt: &str,
//!         temperature: f64,
//!         max_tokens: u32,
//!     ) -> Result<String> {
//!         let response = self
//!             .0
//!             .complete(CompletionRequest {
//!                 model: "luna-judge".to_string(),
//!                 messages: vec![
//!                     ChatMessage { role: "system".to_string(), content: system_prompt.to_string() },
//!                     ChatMessage { role: "user".to_string(), content: user_prompt.to_string() },
//!                 ],
//!                 temperature,
//!                 top_p: 1.0,
//!                 top_k: 40,
//!                 max_tokens,
//!                 stream: false,
//!                 logit_bias: std::collections::HashMap::new(),
//!                 presence_penalty: None,
//!                 frequency_penalty: None,
//!                 repetition_penalty: None,
//!             })
//!             .await?;
//!         Ok(response.content)
//!     }
//! }
//!
//! # async fn run() -> Result<()> {
//! let config = LunaCoreConfig::new("/var/lib/luna");
//! let llm: Arc<dyn LlmClient> =
//!     Arc::new(HttpLlmClient::new("http://localhost:8080/v1/chat/completions", config.request_timeout));
//! let judge: Arc<dyn JudgeLlm> = Arc::new(SameBackendJudge(Arc::clone(&llm)));
//! let store = Arc::new(FileStateStore::new(config.data_dir.clone()));
//! let orchestrator = OrchestratorBuilder::new(config, llm, judge, store).build();
//!
//! let (response, metrics) = orchestrator.handle_request("hi", 0).await?;
//! println!("{response} ({} tokens)", metrics.tokens_used);
//! # Ok(())
//! # }
//! ```

pub mod arbiter;
pub mod cfia;
pub mod constants;
pub mod controller;
pub mod error;
pub mod existential;
pub mod llm;
pub mod memory_provider;
pub mod orchestrator;
pub mod personality;
pub mod retrieval;
pub mod retry;
pub mod rvc;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use orchestrator::{Orchestrator, OrchestratorBuilder, RequestMetrics};
pub use types::{LunaCoreConfig, Tier};
