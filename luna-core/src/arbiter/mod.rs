//! Arbiter: gold-standard generation, utility scoring, karma delta, and
//! lesson storage (design §4.4).

pub mod gold;
pub mod scoring;
pub mod shadow;
pub mod tags;

pub use gold::{FifoCache, JudgeLlm};
pub use scoring::AdaptiveThresholds;

use crate::personality::EmergenceZoneService;
use crate::types::{ArbiterAssessment, EfficiencyGrade, Lesson, ShadowScore};

const EMERGENCE_ZONE_BYPASS_MARKER: &str = "EMERGENCE_ZONE_BYPASS";

/// Stateful Arbiter instance: owns the gold-standard/judge caches and the
/// adaptive-threshold learning history across requests.
pub struct Arbiter {
    gold_cache: FifoCache,
    judge_cache: FifoCache,
    thresholds: AdaptiveThresholds,
}

impl Default for Arbiter {
    fn default() -> Self {
        Self {
            gold_cache: FifoCache::default(),
            judge_cache: FifoCache::default(),
            thresholds: AdaptiveThresholds::default(),
        }
    }
}

impl Arbiter {
    /// Build a fresh Arbiter with empty caches and default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `adaptive_penalty_scaling` (diagnostic/logging only).
    #[must_use]
    pub fn penalty_scaling(&self) -> f64 {
        self.thresholds.penalty_scaling
    }

    /// Score a response and produce the lesson to store (design §4.4).
    ///
    /// `grade` is the RVC efficiency grade for this response, if computed.
    /// `emergence_zone` is consulted only when `emergence_zone_active` is true.
    #[allow(clippy::too_many_arguments)]
    pub async fn assess_response(
        &mut self,
        judge_llm: &dyn JudgeLlm,
        emergence_zone: Option<&dyn EmergenceZoneService>,
        emergence_zone_active: bool,
        user_prompt: &str,
        luna_response: &str,
        grade: Option<EfficiencyGrade>,
        tte_used: u32,
        max_tte: u32,
        timestamp: i64,
    ) -> (ArbiterAssessment, ShadowScore) {
        let r = if max_tte == 0 { 0.0 } else { f64::from(tte_used) / f64::from(max_tte) };
        let context_tags = tags::extract_context_tags(user_prompt);

        if emergence_zone_active {
            let mut karma_delta = 0.0;
            if let Some(service) = emergence_zone {
                let analysis = service.analyze_curiosity_response(luna_response);
                if analysis.curiosity_score > crate::constants::arbiter::CURIOSITY_BONUS_THRESHOLD {
                    karma_delta += analysis.curiosity_reward;
                }
            }

            let cache_entry = Lesson {
                original_prompt: user_prompt.to_string(),
                suboptimal_response: luna_response.to_string(),
                gold_standard: EMERGENCE_ZONE_BYPASS_MARKER.to_string(),
                utility_score: 1.0,
                karma_delta,
                timestamp,
                context_tags,
                lingua_calc_depth: 0,
                lingua_calc_gain: 0.0,
            };

            let assessment = ArbiterAssessment {
                gold_standard: EMERGENCE_ZONE_BYPASS_MARKER.to_string(),
                utility_score: 1.0,
                karma_delta,
                efficiency_gap: 0.0,
                quality_gap: 0.0,
                reasoning: "Emergence zone bypass".to_string(),
                cache_entry,
            };

            self.thresholds.record(scoring::LearningEntry {
                utility: 1.0,
                efficiency_ratio: r,
                karma_delta,
                timestamp,
            });

            let shadow = shadow::record(user_prompt, 1.0, karma_delta, tte_used, max_tte, timestamp);
            return (assessment, shadow);
        }

        let gold_standard =
            gold::generate_gold_standard(judge_llm, &mut self.gold_cache, user_prompt, luna_response).await;
        let quality = gold::judge_quality(judge_llm, &mut self.judge_cache, luna_response, &gold_standard).await;

        let utility = scoring::utility_score(quality, tte_used, max_tte);
        let karma_delta = scoring::karma_delta(grade, utility, tte_used, max_tte, self.thresholds.penalty_scaling);

        // Grade-A/B fast-path responses never reach the learning history
        // (mirrors the source's early `return` before `_update_adaptive_thresholds`).
        let took_fast_path = grade.is_some_and(|g| scoring::grade_fast_path_karma(g, r).is_some());
        if !took_fast_path {
            self.thresholds.record(scoring::LearningEntry {
                utility,
                efficiency_ratio: r,
                karma_delta,
                timestamp,
            });
        }

        let efficiency_gap = (1.0 - utility).max(0.0);
        let quality_gap = word_overlap_gap(luna_response, &gold_standard);
        let reasoning = format!(
            "utility={utility:.2} karma_delta={karma_delta:.2} quality={quality:.2} penalty_scaling={:.2}",
            self.thresholds.penalty_scaling
        );

        let cache_entry = Lesson {
            original_prompt: user_prompt.to_string(),
            suboptimal_response: luna_response.to_string(),
            gold_standard: gold_standard.clone(),
            utility_score: utility,
            karma_delta,
            timestamp,
            context_tags,
            lingua_calc_depth: 0,
            lingua_calc_gain: 0.0,
        };

        let assessment = ArbiterAssessment {
            gold_standard,
            utility_score: utility,
            karma_delta,
            efficiency_gap,
            quality_gap,
            reasoning,
            cache_entry,
        };

        let shadow = shadow::record(user_prompt, utility, karma_delta, tte_used, max_tte, timestamp);
        (assessment, shadow)
    }
}

/// Diagnostic word-overlap gap between a response and its gold standard: the
/// fraction of gold-standard words absent from the response.
fn word_overlap_gap(response: &str, gold_standard: &str) -> f64 {
    let response_words: std::collections::HashSet<String> =
        response.to_lowercase().split_whitespace().map(str::to_string).collect();
    let gold_words: Vec<String> = gold_standard.to_lowercase().split_whitespace().map(str::to_string).collect();

    if gold_words.is_empty() {
        return 0.0;
    }

    let missing = gold_words.iter().filter(|w| !response_words.contains(*w)).count();
    #[allow(clippy::cast_precision_loss)]
    let gap = missing as f64 / gold_words.len() as f64;
    gap
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use async_trait::async_trait;

    struct FailingJudge;

    #[async_trait]
    impl JudgeLlm for FailingJudge {
        async fn complete(&self, _s: &str, _u: &str, _t: f64, _m: u32) -> Result<String> {
            Err(crate::error::Error::BackendUnavailable("no judge".into()))
        }
    }

    #[tokio::test]
    async fn emergence_zone_bypass_sets_max_utility() {
        let mut arbiter = Arbiter::new();
        let (assessment, shadow) = arbiter
            .assess_response(&FailingJudge, None, true, "hi", "hello!", None, 2, 15, 0)
            .await;
        assert_eq!(assessment.utility_score, 1.0);
        assert_eq!(assessment.karma_delta, 0.0);
        assert_eq!(shadow.utility, 1.0);
    }

    #[tokio::test]
    async fn falls_back_to_rule_based_gold_standard_on_judge_failure() {
        let mut arbiter = Arbiter::new();
        let (assessment, _shadow) = arbiter
            .assess_response(&FailingJudge, None, false, "hi there", "Hello!", None, 3, 15, 0)
            .await;
        assert!(!assessment.gold_standard.is_empty());
        assert_eq!(assessment.utility_score, scoring::utility_score(0.1, 3, 15));
    }
}
