//! Layer III — Post-Inference Accountability Judge (design §4.3).

use crate::constants::{controller as cc, free_words as fw};
use crate::types::Tier;

/// Result of [`conduct`]: token cost debited and the diagnostic reward score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer3Output {
    /// Tokens charged against the pool for this response (free-word economy).
    pub token_cost: u32,
    /// Diagnostic reward score (not karma; see design §4.2/§4.3 distinction).
    pub reward_score: f64,
    /// `max(0, pool - token_cost)`.
    pub new_pool: i64,
}

/// Count the chargeable words in `completion` under the free-word economy
/// (design §4.3 step 1, §8 token-cost law).
#[must_use]
pub fn token_cost(completion: &str) -> u32 {
    let words: Vec<&str> = completion.split_whitespace().collect();

    let mut free_function_used = 0usize;
    let mut chargeable = 0u32;
    let mut function_seen = 0usize;
    let mut content_seen = 0usize;

    for word in &words {
        let normalized = word.trim_matches(|ch: char| !ch.is_alphanumeric()).to_lowercase();
        if fw::FREE_FUNCTION_WORDS.contains(&normalized.as_str()) {
            function_seen += 1;
            if function_seen > fw::FREE_FUNCTION_WORD_ALLOWANCE {
                chargeable += 1;
            } else {
                free_function_used += 1;
            }
        } else {
            content_seen += 1;
            let free_content_budget = fw::FREE_WORD_TOTAL_BUDGET.saturating_sub(free_function_used);
            if content_seen > free_content_budget {
                chargeable += 1;
            }
        }
    }

    chargeable
}

/// Compute the diagnostic reward score (design §4.3 step 2). Distinct from
/// the Existential Budget's `karma_earned`: no zero-guard on tokens/duration.
#[must_use]
pub fn reward_score(quality: f64, duration_secs: f64, free_words_used: u32, tier: Tier) -> f64 {
    let base = quality * 0.1;

    let word_multiplier = cc::WORD_MULTIPLIER_BANDS
        .iter()
        .find(|(ceiling, _)| free_words_used <= *ceiling)
        .map_or(2.0, |(_, mult)| *mult);

    let time_multiplier = cc::TIME_MULTIPLIER_BANDS
        .iter()
        .find(|(ceiling, _)| duration_secs <= *ceiling)
        .map_or(0.5, |(_, mult)| *mult);

    let mut survival_multiplier = word_multiplier * time_multiplier;
    if let Some(ceiling) = cc::reward_tier_ceiling(tier) {
        survival_multiplier = survival_multiplier.min(ceiling);
    }
    if quality < cc::REWARD_QUALITY_FLOOR {
        survival_multiplier = 1.0;
    }

    base * survival_multiplier
}

/// Run the post-inference accountability step (design §4.3 Layer III).
#[must_use]
pub fn conduct(
    completion: &str,
    quality: f64,
    duration_secs: f64,
    tier: Tier,
    pool: i64,
) -> Layer3Output {
    let cost = token_cost(completion);
    let free_words_used = completion.split_whitespace().count() as u32 - cost;
    let score = reward_score(quality, duration_secs, free_words_used, tier);
    let new_pool = (pool - i64::from(cost)).max(0);

    Layer3Output { token_cost: cost, reward_score: score, new_pool }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_content_words_cost_exactly_the_overage() {
        let completion = "apple ".repeat(30);
        let cost = token_cost(completion.trim());
        assert_eq!(cost, 10);
    }

    #[test]
    fn short_completion_is_entirely_free() {
        let cost = token_cost("Hello!");
        assert_eq!(cost, 0);
    }

    #[test]
    fn low_quality_forces_unit_survival_multiplier() {
        let low = reward_score(0.3, 1.0, 2, Tier::Trivial);
        let expected = 0.3 * 0.1 * 1.0;
        assert!((low - expected).abs() < 1e-9);
    }

    #[test]
    fn zero_duration_does_not_panic() {
        let score = reward_score(0.9, 0.0, 1, Tier::Trivial);
        assert!(score.is_finite());
    }
}
