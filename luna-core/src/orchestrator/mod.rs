//! Orchestrator: wires the pipeline, enforces step ordering, handles
//! external I/O, persists state (design §4.6).

mod postprocess;
mod sanitize;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{instrument, warn};

use crate::arbiter::Arbiter;
use crate::constants::rvc as rvc_constants;
use crate::controller::token_bias::{NoOpTokenBiasTable, TokenBiasTable};
use crate::controller::{layer1, layer2, layer3};
use crate::error::Result;
use crate::existential::{self, ResponseContext};
use crate::llm::{ChatMessage, CompletionRequest, LlmClient};
use crate::memory_provider::MemoryProvider;
use crate::personality::{EmergenceZoneService, PersonalityProvider};
use crate::retrieval;
use crate::retry::RetryPolicy;
use crate::rvc::{self, Classifier};
use crate::storage::StateStore;
use crate::types::{CFIAState, EfficiencyGrade, ExistentialState, LunaCoreConfig, Tier};

pub use sanitize::sanitize_input;

const SENTINEL_RESPONSE: &str = "...";
const FALLBACK_QUALITY: f64 = 0.1;

/// Everything the Orchestrator reports back about one completed request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestMetrics {
    /// Tier RVC assigned to the input.
    pub tier: Tier,
    /// Whether the Existential Budget allowed a response.
    pub should_respond: bool,
    /// Tokens actually charged this request.
    pub tokens_used: u32,
    /// Karma earned from the Existential Budget formula.
    pub karma_earned: f64,
    /// Karma delta applied to the CFIA generational pool by the Arbiter.
    pub arbiter_karma_delta: f64,
    /// Whether the LLM call failed and a fallback response was used.
    pub used_fallback: bool,
    /// Which CFIA generation this request landed in.
    pub aiiq: u32,
}

/// Singleton pipeline owner: holds the injected capability providers and
/// drives one request at a time through the full sequence (design §5:
/// single-threaded cooperative scheduling per request).
pub struct Orchestrator {
    config: LunaCoreConfig,
    llm: Arc<dyn LlmClient>,
    judge_llm: Arc<dyn crate::arbiter::JudgeLlm>,
    personality: Arc<dyn PersonalityProvider>,
    emergence_zone: Option<Arc<dyn EmergenceZoneService>>,
    memory: Option<Arc<dyn MemoryProvider>>,
    token_bias: Arc<dyn TokenBiasTable>,
    store: Arc<dyn StateStore>,
    classifier: Classifier,
    arbiter: tokio::sync::Mutex<Arbiter>,
    retry: RetryPolicy,
}

/// Dependencies injected at construction; every field but the required ones
/// has a sensible default via [`OrchestratorBuilder`].
pub struct OrchestratorBuilder {
    config: LunaCoreConfig,
    llm: Arc<dyn LlmClient>,
    judge_llm: Arc<dyn crate::arbiter::JudgeLlm>,
    personality: Arc<dyn PersonalityProvider>,
    emergence_zone: Option<Arc<dyn EmergenceZoneService>>,
    memory: Option<Arc<dyn MemoryProvider>>,
    token_bias: Arc<dyn TokenBiasTable>,
    store: Arc<dyn StateStore>,
}

impl OrchestratorBuilder {
    /// Start a builder with the required LLM/judge clients and a state store;
    /// personality/emergence-zone/memory/token-bias default to no-ops.
    #[must_use]
    pub fn new(
        config: LunaCoreConfig,
        llm: Arc<dyn LlmClient>,
        judge_llm: Arc<dyn crate::arbiter::JudgeLlm>,
        store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            config,
            llm,
            judge_llm,
            personality: Arc::new(crate::personality::DefaultPersonalityProvider),
            emergence_zone: None,
            memory: None,
            token_bias: Arc::new(NoOpTokenBiasTable),
            store,
        }
    }

    /// Supply a personality provider.
    #[must_use]
    pub fn with_personality(mut self, personality: Arc<dyn PersonalityProvider>) -> Self {
        self.personality = personality;
        self
    }

    /// Supply an emergence-zone service.
    #[must_use]
    pub fn with_emergence_zone(mut self, service: Arc<dyn EmergenceZoneService>) -> Self {
        self.emergence_zone = Some(service);
        self
    }

    /// Supply a memory/retrieval provider (CARMA). Absence is meaningful:
    /// without one, the core falls back to its built-in template.
    #[must_use]
    pub fn with_memory(mut self, memory: Arc<dyn MemoryProvider>) -> Self {
        self.memory = Some(memory);
        self
    }

    /// Supply a tokenizer-specific token-bias table.
    #[must_use]
    pub fn with_token_bias(mut self, table: Arc<dyn TokenBiasTable>) -> Self {
        self.token_bias = table;
        self
    }

    /// Build the Orchestrator.
    #[must_use]
    pub fn build(self) -> Orchestrator {
        let retry = RetryPolicy::new(self.config.retry);
        Orchestrator {
            config: self.config,
            llm: self.llm,
            judge_llm: self.judge_llm,
            personality: self.personality,
            emergence_zone: self.emergence_zone,
            memory: self.memory,
            token_bias: self.token_bias,
            store: self.store,
            classifier: Classifier,
            arbiter: tokio::sync::Mutex::new(Arbiter::new()),
            retry,
        }
    }
}

impl Orchestrator {
    /// Run one request through the full pipeline (design §4.6, steps 1-11).
    #[instrument(skip(self, raw_input), fields(input_len = raw_input.len()))]
    pub async fn handle_request(&self, raw_input: &str, now: u64) -> Result<(String, RequestMetrics)> {
        // Step 1: validate and sanitize input.
        let input = sanitize_input(raw_input);

        let mut existential_state = self.store.load_existential_state().await?;
        if existential_state.total_responses == 0 && existential_state.age == 1 {
            existential_state.max_token_pool = self.config.economy.base_token_pool;
            existential_state.current_token_pool = self.config.economy.base_token_pool;
            existential_state.karma_quota = self.config.economy.base_karma_quota;
        }
        let mut cfia_state = self.store.load_cfia_state().await?;

        // Step 2: RVC tier assessment.
        let tier_assessment = self.classifier.classify(&input);

        // Step 3: Existential Budget go/no-go.
        let question_value = question_value_hint(&tier_assessment);
        let decision = existential::assess(&existential_state, tier_assessment.tier, question_value, now);

        if !decision.should_respond {
            self.store.save_existential_state(&existential_state).await?;
            self.store.save_cfia_state(&cfia_state).await?;
            return Ok((
                SENTINEL_RESPONSE.to_string(),
                RequestMetrics {
                    tier: tier_assessment.tier,
                    should_respond: false,
                    tokens_used: 0,
                    karma_earned: 0.0,
                    arbiter_karma_delta: 0.0,
                    used_fallback: false,
                    aiiq: cfia_state.aiiq,
                },
            ));
        }

        // Step 4: Layer I pre-inference. A wired CARMA provider's dynamic
        // prompt takes over from the built-in template (design §6.3); absence
        // falls back to the template exactly as before.
        let voice_profile = self.personality.voice_profile();
        let memory_retrieval = match self.memory.as_ref() {
            Some(provider) => provider.retrieve(&input).await.ok(),
            None => None,
        };
        let base_prompt = memory_retrieval
            .as_ref()
            .and_then(|retrieval| retrieval.dynamic_prompt.clone())
            .unwrap_or_else(|| self.base_prompt(&voice_profile));
        let layer1_out =
            layer1::conduct(existential_state.current_token_pool, false, &base_prompt);

        // Step 5: retrieve a prior lesson, if any, for prompt injection.
        let previous_learning = self.retrieve_previous_learning(&input, &cfia_state).await;
        let mut system_prompt = layer1_out.directive;
        if let Some(lesson_text) = previous_learning {
            system_prompt.push_str("\n\nPrevious learning:\n");
            system_prompt.push_str(&lesson_text);
        }
        if let Some(retrieval) = memory_retrieval.as_ref().filter(|r| !r.fragments.is_empty()) {
            system_prompt.push_str("\n\nRelevant memory:\n");
            for fragment in &retrieval.fragments {
                system_prompt.push_str(&fragment.content);
                system_prompt.push('\n');
            }
        }

        // Step 6: Layer II parameter finalization.
        let base_params = layer2::BaseParams { temperature: 0.7, top_p: 0.9, top_k: 40 };
        let final_params = layer2::conduct(
            layer1_out.resource_state,
            input.len(),
            base_params,
            tier_assessment.tier,
            existential_state.current_karma,
            decision.token_budget.max(0) as u32,
            self.token_bias.as_ref(),
        );

        // Step 7: invoke the LLM; on error/timeout, fall back.
        let request_start = Instant::now();
        let completion_request = CompletionRequest {
            model: "luna".to_string(),
            messages: vec![
                ChatMessage { role: "system".to_string(), content: system_prompt },
                ChatMessage { role: "user".to_string(), content: input.clone() },
            ],
            temperature: final_params.temperature,
            top_p: final_params.top_p,
            top_k: final_params.top_k,
            max_tokens: final_params.max_tokens,
            stream: false,
            logit_bias: final_params.logit_bias,
            presence_penalty: None,
            frequency_penalty: None,
            repetition_penalty: Some(final_params.repetition_penalty),
        };

        let llm = Arc::clone(&self.llm);
        let attempt = self.retry.execute(|| {
            let llm = Arc::clone(&llm);
            let request = completion_request.clone();
            async move { llm.complete(request).await }
        });
        let timed = tokio::time::timeout(self.config.request_timeout, attempt).await;

        let (raw_response, used_fallback, duration_secs, quality_hint) = match timed {
            Ok(Ok(response)) => {
                let duration = request_start.elapsed().as_secs_f64();
                (response.content, false, duration, None)
            }
            Ok(Err(err)) => {
                warn!(error = %err, "llm call failed after retries, using fallback response");
                (fallback_response(&tier_assessment, &input), true, request_start.elapsed().as_secs_f64(), Some(FALLBACK_QUALITY))
            }
            Err(_) => {
                warn!("llm call timed out, using fallback response");
                (
                    fallback_response(&tier_assessment, &input),
                    true,
                    self.config.request_timeout.as_secs_f64(),
                    Some(FALLBACK_QUALITY),
                )
            }
        };

        // Step 8: post-process.
        let response = postprocess::post_process(&raw_response, &voice_profile);

        // Step 9: Layer III accountability, Arbiter scoring, CFIA lesson store.
        let layer3_out = layer3::conduct(
            &response,
            quality_hint.unwrap_or(1.0),
            duration_secs,
            tier_assessment.tier,
            existential_state.current_token_pool,
        );

        let validation = rvc::validate_response_efficiency(
            &tier_assessment,
            layer3_out.token_cost,
            quality_hint.unwrap_or(layer3_out.reward_score.min(1.0)),
        );

        let context = infer_response_context(&input);
        let process_delta = existential::process_response_result(
            &mut existential_state,
            quality_hint.unwrap_or(validation.actual_efficiency.min(1.0)),
            layer3_out.token_cost,
            duration_secs,
            context,
            &self.config.economy,
            now,
        );

        let (emergence_active, _zone_name) = self
            .emergence_zone
            .as_ref()
            .map_or((false, None), |z| z.is_in_emergence_zone());

        let mut arbiter = self.arbiter.lock().await;
        let (assessment, shadow) = arbiter
            .assess_response(
                self.judge_llm.as_ref(),
                self.emergence_zone.as_deref(),
                emergence_active,
                &input,
                &response,
                Some(validation.efficiency_grade),
                layer3_out.token_cost,
                tier_assessment.max_token_budget,
                i64::try_from(now).unwrap_or(i64::MAX),
            )
            .await;
        drop(arbiter);

        let outcome = crate::cfia::process_lesson_addition(
            &mut cfia_state,
            lesson_size_kb(&assessment.cache_entry),
            now,
        )?;
        self.store_lesson(&outcome, &assessment.cache_entry, &mut cfia_state).await?;

        crate::cfia::update_karma_pool(&mut cfia_state, assessment.karma_delta, now);

        if let Ok(line) = serde_json::to_string(&shadow) {
            let _ = self.store.append_shadow_score(&line).await;
        }

        // Step 10: persist atomically.
        self.store.save_existential_state(&existential_state).await?;
        self.store.save_cfia_state(&cfia_state).await?;

        let grade_display = format!("{}", validation.efficiency_grade);
        let _ = grade_display; // diagnostic only; kept for future structured logging

        // Step 11: return.
        let metrics = RequestMetrics {
            tier: tier_assessment.tier,
            should_respond: true,
            tokens_used: layer3_out.token_cost,
            karma_earned: process_delta.karma_earned,
            arbiter_karma_delta: assessment.karma_delta,
            used_fallback,
            aiiq: cfia_state.aiiq,
        };

        Ok((response, metrics))
    }

    fn base_prompt(&self, voice: &crate::personality::VoiceProfile) -> String {
        let mut prompt = String::from("You are Luna, a resource-constrained assistant.");
        if voice.strict {
            prompt.push_str(" Maintain a strict, professional register.");
        }
        if voice.concision > 0.5 {
            prompt.push_str(" Prefer concise answers.");
        }
        prompt
    }

    #[instrument(skip(self, input, cfia_state))]
    async fn retrieve_previous_learning(&self, input: &str, cfia_state: &CFIAState) -> Option<String> {
        let mut all_lessons = Vec::new();
        for shard_id in cfia_state.file_registry.keys() {
            if let Ok(lessons) = self.store.load_lessons(shard_id).await {
                all_lessons.extend(lessons);
            }
        }
        retrieval::retrieve_best_match(&all_lessons, input).map(|lesson| lesson.gold_standard.clone())
    }

    async fn store_lesson(
        &self,
        outcome: &crate::cfia::LessonOutcome,
        lesson: &crate::types::Lesson,
        cfia_state: &mut CFIAState,
    ) -> Result<()> {
        match outcome {
            crate::cfia::LessonOutcome::Appended { shard_id } => {
                let mut lessons = self.store.load_lessons(shard_id).await.unwrap_or_default();
                lessons.push(lesson.clone());
                self.store.save_lessons(shard_id, &lessons).await?;
            }
            crate::cfia::LessonOutcome::Split { source_shard, new_shards } => {
                let mut existing = self.store.load_lessons(source_shard).await.unwrap_or_default();
                existing.push(lesson.clone());
                let midpoint = existing.len().div_ceil(2).max(1).min(existing.len());
                let (first_half, second_half) = existing.split_at(midpoint);
                self.store.save_lessons(&new_shards.0, first_half).await?;
                self.store.save_lessons(&new_shards.1, second_half).await?;
                if let Err(err) = self.store.delete_shard(source_shard).await {
                    warn!(shard = %source_shard, error = %err, "failed to delete source shard after split");
                }
                cfia_state.file_registry.entry(new_shards.0.clone()).and_modify(|info| {
                    info.content_count = first_half.len() as u64;
                });
                cfia_state.file_registry.entry(new_shards.1.clone()).and_modify(|info| {
                    info.content_count = second_half.len() as u64;
                });
            }
        }
        Ok(())
    }
}

fn question_value_hint(assessment: &crate::types::TierAssessment) -> f64 {
    (assessment.complexity_score * 0.6 + assessment.emotional_stakes * 0.4).clamp(0.0, 1.0)
}

fn infer_response_context(input: &str) -> ResponseContext {
    let lower = input.to_lowercase();
    let philosophical_hit =
        rvc_constants::token_bounds(Tier::Critical).0 > 0 && lower.contains("meaning");
    if philosophical_hit {
        ResponseContext::Philosophical
    } else if lower.contains("feel") || lower.contains("sad") || lower.contains("anxious") {
        ResponseContext::Emotional
    } else {
        ResponseContext::Neutral
    }
}

fn fallback_response(tier_assessment: &crate::types::TierAssessment, _input: &str) -> String {
    match tier_assessment.tier {
        Tier::Trivial => "Hello.".to_string(),
        Tier::Low | Tier::Moderate => "I'm not able to reach my reasoning backend right now.".to_string(),
        Tier::High | Tier::Critical | Tier::Maximum => {
            "My reasoning backend is unavailable; I can't give this the depth it deserves right now."
                .to_string()
        }
    }
}

fn lesson_size_kb(lesson: &crate::types::Lesson) -> f64 {
    let bytes = lesson.original_prompt.len()
        + lesson.suboptimal_response.len()
        + lesson.gold_standard.len();
    #[allow(clippy::cast_precision_loss)]
    let kb = bytes as f64 / 1024.0;
    kb.max(0.01)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbiter::JudgeLlm;
    use crate::error::Error;
    use crate::llm::CompletionResponse;
    use async_trait::async_trait;
    use std::collections::HashMap as StdHashMap;
    use std::sync::Mutex as StdMutex;

    struct EchoLlm;

    #[async_trait]
    impl LlmClient for EchoLlm {
        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse> {
            Ok(CompletionResponse { content: "Hello! Nice loop.".to_string() })
        }
    }

    struct StubJudge;

    #[async_trait]
    impl JudgeLlm for StubJudge {
        async fn complete(&self, _s: &str, _u: &str, _t: f64, _m: u32) -> Result<String> {
            Ok("0.8".to_string())
        }
    }

    struct InMemoryStore {
        existential: StdMutex<ExistentialState>,
        cfia: StdMutex<CFIAState>,
        lessons: StdMutex<StdHashMap<String, Vec<crate::types::Lesson>>>,
    }

    impl Default for InMemoryStore {
        fn default() -> Self {
            Self {
                existential: StdMutex::new(ExistentialState::default()),
                cfia: StdMutex::new(CFIAState::default()),
                lessons: StdMutex::new(StdHashMap::new()),
            }
        }
    }

    #[async_trait]
    impl StateStore for InMemoryStore {
        async fn load_existential_state(&self) -> Result<ExistentialState> {
            Ok(self.existential.lock().unwrap().clone())
        }
        async fn save_existential_state(&self, state: &ExistentialState) -> Result<()> {
            *self.existential.lock().unwrap() = state.clone();
            Ok(())
        }
        async fn load_cfia_state(&self) -> Result<CFIAState> {
            Ok(self.cfia.lock().unwrap().clone())
        }
        async fn save_cfia_state(&self, state: &CFIAState) -> Result<()> {
            *self.cfia.lock().unwrap() = state.clone();
            Ok(())
        }
        async fn load_lessons(&self, shard_id: &str) -> Result<Vec<crate::types::Lesson>> {
            Ok(self.lessons.lock().unwrap().get(shard_id).cloned().unwrap_or_default())
        }
        async fn save_lessons(&self, shard_id: &str, lessons: &[crate::types::Lesson]) -> Result<()> {
            self.lessons.lock().unwrap().insert(shard_id.to_string(), lessons.to_vec());
            Ok(())
        }
        async fn delete_shard(&self, shard_id: &str) -> Result<()> {
            self.lessons.lock().unwrap().remove(shard_id);
            Ok(())
        }
        async fn append_shadow_score(&self, _line: &str) -> Result<()> {
            Ok(())
        }
    }

    struct FailingLlm;

    #[async_trait]
    impl LlmClient for FailingLlm {
        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse> {
            Err(Error::BackendUnavailable("down".to_string()))
        }
    }

    #[tokio::test]
    async fn greeting_round_trips_through_the_pipeline() {
        let config = LunaCoreConfig::new(std::env::temp_dir());
        let orchestrator = OrchestratorBuilder::new(
            config,
            Arc::new(EchoLlm),
            Arc::new(StubJudge),
            Arc::new(InMemoryStore::default()),
        )
        .build();

        let (response, metrics) = orchestrator.handle_request("hi", 0).await.unwrap();
        assert!(!response.is_empty());
        assert!(metrics.should_respond);
        assert_eq!(metrics.tier, Tier::Trivial);
    }

    #[tokio::test]
    async fn backend_failure_falls_back_without_panicking() {
        let mut config = LunaCoreConfig::new(std::env::temp_dir());
        config.retry.max_retries = 0;
        let orchestrator = OrchestratorBuilder::new(
            config,
            Arc::new(FailingLlm),
            Arc::new(StubJudge),
            Arc::new(InMemoryStore::default()),
        )
        .build();

        let (_response, metrics) = orchestrator.handle_request("hi", 0).await.unwrap();
        assert!(metrics.used_fallback);
    }

    #[tokio::test]
    async fn zero_pool_refuses_low_value_question() {
        let config = LunaCoreConfig::new(std::env::temp_dir());
        let store = Arc::new(InMemoryStore::default());
        {
            let mut state = store.existential.lock().unwrap();
            state.current_token_pool = 0;
        }
        let orchestrator =
            OrchestratorBuilder::new(config, Arc::new(EchoLlm), Arc::new(StubJudge), store).build();

        let (response, metrics) = orchestrator.handle_request("hi", 0).await.unwrap();
        assert!(!metrics.should_respond);
        assert_eq!(response, SENTINEL_RESPONSE);
    }

    #[tokio::test]
    async fn custom_economy_config_seeds_a_fresh_state() {
        let mut config = LunaCoreConfig::new(std::env::temp_dir());
        config.economy.base_token_pool = 50_000;
        config.economy.base_karma_quota = 777.0;
        let store = Arc::new(InMemoryStore::default());
        let orchestrator =
            OrchestratorBuilder::new(config, Arc::new(EchoLlm), Arc::new(StubJudge), store.clone()).build();

        orchestrator.handle_request("hi", 0).await.unwrap();

        let state = store.existential.lock().unwrap();
        assert_eq!(state.max_token_pool, 50_000);
        assert_eq!(state.karma_quota, 777.0);
    }
}
