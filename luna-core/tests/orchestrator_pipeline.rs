//! Integration tests for the Orchestrator's full pipeline, backed by a real
//! `FileStateStore` on a temp directory and a mock LLM/judge pair.

use std::sync::Arc;

use async_trait::async_trait;
use luna_core::arbiter::JudgeLlm;
use luna_core::error::{Error, Result};
use luna_core::llm::{CompletionRequest, CompletionResponse, LlmClient};
use luna_core::orchestrator::OrchestratorBuilder;
use luna_core::storage::{FileStateStore, StateStore};
use luna_core::types::LunaCoreConfig;
use tempfile::TempDir;

struct EchoLlm;

#[async_trait]
impl LlmClient for EchoLlm {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse> {
        Ok(CompletionResponse { content: "Hello there, nice to meet you too.".to_string() })
    }
}

struct StubJudge;

#[async_trait]
impl JudgeLlm for StubJudge {
    async fn complete(&self, _system_prompt: &str, _user_prompt: &str, _temperature: f64, _max_tokens: u32) -> Result<String> {
        Ok("0.75".to_string())
    }
}

struct FailingLlm;

#[async_trait]
impl LlmClient for FailingLlm {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse> {
        Err(Error::BackendUnavailable("mock backend down".to_string()))
    }
}

fn build_orchestrator(data_dir: &std::path::Path, llm: Arc<dyn LlmClient>) -> luna_core::Orchestrator {
    let config = LunaCoreConfig::new(data_dir);
    let store = Arc::new(FileStateStore::new(data_dir));
    OrchestratorBuilder::new(config, llm, Arc::new(StubJudge), store).build()
}

#[tokio::test]
async fn a_full_turn_persists_state_across_orchestrator_instances() {
    let dir = TempDir::new().unwrap();
    let orchestrator = build_orchestrator(dir.path(), Arc::new(EchoLlm));

    let (response, metrics) = orchestrator.handle_request("hello there, how are you?", 1_000).await.unwrap();
    assert!(!response.is_empty());
    assert!(!metrics.used_fallback);

    // A fresh Orchestrator reading the same data directory sees the persisted state.
    let second = build_orchestrator(dir.path(), Arc::new(EchoLlm));
    let (_response, second_metrics) = second.handle_request("tell me something else", 1_001).await.unwrap();
    assert!(second_metrics.tokens_used > 0 || !second_metrics.should_respond);
}

#[tokio::test]
async fn a_failing_backend_falls_back_instead_of_erroring() {
    let dir = TempDir::new().unwrap();
    let orchestrator = build_orchestrator(dir.path(), Arc::new(FailingLlm));

    let (response, metrics) = orchestrator.handle_request("what do you think about this?", 2_000).await.unwrap();
    assert!(!response.is_empty());
    assert!(metrics.used_fallback);
}

#[tokio::test]
async fn repeated_turns_keep_charging_the_same_persisted_pool() {
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn StateStore> = Arc::new(FileStateStore::new(dir.path()));
    let config = LunaCoreConfig::new(dir.path());
    let orchestrator = OrchestratorBuilder::new(config, Arc::new(EchoLlm), Arc::new(StubJudge), Arc::clone(&store)).build();

    let before = store.load_existential_state().await.unwrap();
    for i in 0..10u64 {
        orchestrator.handle_request("what do you make of that?", i).await.unwrap();
    }
    let after = store.load_existential_state().await.unwrap();

    assert!(after.current_token_pool <= before.current_token_pool, "sustained requests should never grow the pool on their own");
}
