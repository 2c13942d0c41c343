//! Core entity structs (design §3.1).

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use super::enums::Tier;
use crate::constants::economy;

/// Produced by RVC; immutable within a request (design §3.1, §4.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierAssessment {
    /// The classified tier.
    pub tier: Tier,
    /// Weighted complexity signal in `[0, 1]`.
    pub complexity_score: f64,
    /// Weighted emotional-stakes signal in `[0, 1]`.
    pub emotional_stakes: f64,
    /// Non-stopword density in `[0, 1]`.
    pub semantic_density: f64,
    /// Ideal token count for this tier.
    pub target_token_count: u32,
    /// Ceiling token count for this tier.
    pub max_token_budget: u32,
    /// Minimum acceptable quality-per-token for this tier.
    pub efficiency_requirement: f64,
    /// Diagnostic explanation of the classification.
    pub reasoning: String,
    /// Diagnostic style hint.
    pub recommended_style: String,
}

/// One entry in [`ExistentialState::response_history`] (design §3.1 expansion).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponseHistoryEntry {
    /// Tokens spent on this response.
    pub tokens_used: u32,
    /// Judged quality in `[0, 1]`.
    pub quality: f64,
    /// Karma awarded for this response.
    pub karma_earned: f64,
    /// Wall-clock timestamp (seconds since epoch), for human-readable display.
    pub timestamp: i64,
}

/// Persistent budget/age/karma state (design §3.1, §4.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistentialState {
    /// Operational-maturity level; starts at 1.
    pub age: u32,
    /// Remaining tokens this generation (may be transiently <= 0).
    pub current_token_pool: i64,
    /// Pool ceiling for the current age.
    pub max_token_pool: i64,
    /// Karma required to age up.
    pub karma_quota: f64,
    /// Karma accumulated since the last age transition.
    pub current_karma: f64,
    /// Total responses produced across all generations.
    pub total_responses: u64,
    /// Monotonic seconds at the last age-up.
    pub last_age_up_ts: u64,
    /// Monotonic seconds at the last regression.
    pub last_regression_ts: u64,
    /// Minimum acceptable karma-per-response.
    pub survival_threshold: f64,
    /// Cached anxiety derived from pool/karma/age pressure.
    pub anxiety: f64,
    /// Count of regressions across the process lifetime.
    pub regression_count: u32,
    /// Highest age ever reached; never decreases.
    pub permanent_knowledge_level: u32,
    /// Bounded ring of the most recent responses, used for the rolling
    /// windows in age-transition checks.
    pub response_history: VecDeque<ResponseHistoryEntry>,
}

impl Default for ExistentialState {
    fn default() -> Self {
        Self {
            age: 1,
            current_token_pool: economy::BASE_TOKEN_POOL,
            max_token_pool: economy::BASE_TOKEN_POOL,
            karma_quota: economy::BASE_KARMA_QUOTA,
            current_karma: 0.0,
            total_responses: 0,
            last_age_up_ts: 0,
            last_regression_ts: 0,
            survival_threshold: economy::DEFAULT_SURVIVAL_THRESHOLD,
            anxiety: 0.0,
            regression_count: 0,
            permanent_knowledge_level: 1,
            response_history: VecDeque::with_capacity(economy::RESPONSE_HISTORY_CAP),
        }
    }
}

impl ExistentialState {
    /// Push a response onto the history ring, evicting the oldest entry once
    /// [`economy::RESPONSE_HISTORY_CAP`] is exceeded.
    pub fn record_response(&mut self, entry: ResponseHistoryEntry) {
        self.response_history.push_back(entry);
        while self.response_history.len() > economy::RESPONSE_HISTORY_CAP {
            self.response_history.pop_front();
        }
    }
}

/// One lesson-cache shard's bookkeeping (design §3.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Stable shard identifier (e.g. `file_3`).
    pub file_id: String,
    /// Approximate size of the shard's contents, in KB.
    pub size_kb: f64,
    /// Number of lessons stored in the shard.
    pub content_count: u64,
    /// Monotonic seconds of the last write.
    pub last_accessed: u64,
    /// Number of times this shard (or an ancestor) has split.
    pub split_count: u32,
}

/// Persistent CFIA lifecycle state (design §3.1, §4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CFIAState {
    /// Generation number.
    pub aiiq: u32,
    /// Dampening factor used by threshold growth.
    pub alpha: f64,
    /// Count of lesson-cache shards currently registered.
    pub total_files: u32,
    /// Shard-size ceiling, in KB.
    pub current_threshold_kb: f64,
    /// Random per-generation seed.
    pub generation_seed: u32,
    /// Generational health; 0 triggers a reset.
    pub karma_pool: f64,
    /// Monotonic seconds at generation birth.
    pub generation_birth_ts: u64,
    /// Monotonic seconds at the last AIIQ increment.
    pub last_aiiq_increment_ts: u64,
    /// Registered shards by id.
    pub file_registry: BTreeMap<String, FileInfo>,
}

impl Default for CFIAState {
    fn default() -> Self {
        Self {
            aiiq: crate::constants::cfia::INITIAL_AIIQ,
            alpha: crate::constants::cfia::DEFAULT_ALPHA,
            total_files: 0,
            current_threshold_kb: crate::constants::cfia::BASE_THRESHOLD_KB,
            generation_seed: 0,
            karma_pool: crate::constants::cfia::INITIAL_KARMA_POOL,
            generation_birth_ts: 0,
            last_aiiq_increment_ts: 0,
            file_registry: BTreeMap::new(),
        }
    }
}

/// The Arbiter's output; append-only to a CFIA-managed shard (design §3.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    /// The user's original prompt.
    pub original_prompt: String,
    /// The response that was actually produced.
    pub suboptimal_response: String,
    /// The Arbiter's reference answer.
    pub gold_standard: String,
    /// Utility score in `[0, 1]`.
    pub utility_score: f64,
    /// Karma delta awarded for this response.
    pub karma_delta: f64,
    /// Wall-clock timestamp.
    pub timestamp: i64,
    /// Extracted keyword tags used for retrieval.
    pub context_tags: Vec<String>,
    /// Structural depth feature of the prompt (lingua-calc integration).
    pub lingua_calc_depth: u32,
    /// Structural gain feature of the prompt.
    pub lingua_calc_gain: f64,
}

/// Per-request scoring result; not persisted directly (design §3.1, §4.4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbiterAssessment {
    /// The reference answer (or a marker string for bypass/fast paths).
    pub gold_standard: String,
    /// Utility score in `[0, 1]`.
    pub utility_score: f64,
    /// Karma delta to apply to the generational pool.
    pub karma_delta: f64,
    /// `max(0, 1 - utility_score)`.
    pub efficiency_gap: f64,
    /// Diagnostic word-overlap/grammar gap versus the gold standard.
    pub quality_gap: f64,
    /// Diagnostic explanation of the assessment.
    pub reasoning: String,
    /// The lesson this assessment produced.
    pub cache_entry: Lesson,
}

/// Per-request observational record, never surfaced back into the response
/// path (design §3.1, §4.4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowScore {
    /// Wall-clock timestamp.
    pub timestamp: i64,
    /// Whether this response favored a human-facing, low-penalty path.
    pub is_empathy_choice: bool,
    /// Whether this response favored strict token economy.
    pub is_efficiency_choice: bool,
    /// Utility score for this response.
    pub utility: f64,
    /// Karma delta for this response.
    pub karma_delta: f64,
    /// Tokens actually spent.
    pub tte_used: u32,
    /// Maximum tokens available for this response.
    pub max_tte: u32,
    /// Coarse personality-trait guess extracted from the prompt.
    pub trait_guess: String,
}

/// Running accumulator over a session's [`ShadowScore`] ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowScoreSummary {
    /// Total responses recorded.
    pub total_responses: u64,
    /// Count of responses classified as empathy choices.
    pub empathy_choices: u64,
    /// Count of responses classified as efficiency choices.
    pub efficiency_choices: u64,
    /// Sum of negative karma deltas (magnitude).
    pub total_karma_cost: f64,
    /// Sum of positive karma deltas.
    pub total_karma_gain: f64,
    /// `total_karma_gain - total_karma_cost`.
    pub net_karma_change: f64,
    /// Per-trait choice counts.
    pub choices_by_trait: BTreeMap<String, u64>,
    /// Wall-clock timestamp of the last time this summary was revealed to a caller.
    pub last_revelation_ts: Option<i64>,
}

impl Default for ShadowScoreSummary {
    fn default() -> Self {
        Self {
            total_responses: 0,
            empathy_choices: 0,
            efficiency_choices: 0,
            total_karma_cost: 0.0,
            total_karma_gain: 0.0,
            net_karma_change: 0.0,
            choices_by_trait: BTreeMap::new(),
            last_revelation_ts: None,
        }
    }
}

impl ShadowScoreSummary {
    /// Fold one more [`ShadowScore`] into the running summary.
    pub fn record(&mut self, score: &ShadowScore) {
        self.total_responses += 1;
        if score.is_empathy_choice {
            self.empathy_choices += 1;
        }
        if score.is_efficiency_choice {
            self.efficiency_choices += 1;
        }
        if score.karma_delta >= 0.0 {
            self.total_karma_gain += score.karma_delta;
        } else {
            self.total_karma_cost += -score.karma_delta;
        }
        self.net_karma_change = self.total_karma_gain - self.total_karma_cost;
        *self.choices_by_trait.entry(score.trait_guess.clone()).or_insert(0) += 1;
    }
}
