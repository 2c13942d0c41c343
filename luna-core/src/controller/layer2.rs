//! Layer II — Inference-Time Logit Surgeon (design §4.3).

use std::collections::HashMap;

use crate::constants::controller as c;
use crate::types::{ResourceState, Tier};

use super::token_bias::TokenBiasTable;

/// Generation parameters the caller supplied; temperature/top_p/top_k pass
/// through untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseParams {
    /// Sampling temperature.
    pub temperature: f64,
    /// Nucleus sampling threshold.
    pub top_p: f64,
    /// Top-k sampling cutoff.
    pub top_k: u32,
}

/// Finalized generation parameters ready for the LLM call.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalParams {
    /// Always `1.0` (design §4.3 step 1).
    pub repetition_penalty: f64,
    /// Caller's temperature, unchanged.
    pub temperature: f64,
    /// Caller's top_p, unchanged.
    pub top_p: f64,
    /// Caller's top_k, unchanged.
    pub top_k: u32,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Per-token-id additive logit bias.
    pub logit_bias: HashMap<i64, f64>,
}

/// Compute final generation parameters and logit bias (design §4.3 Layer II).
#[must_use]
pub fn conduct(
    resource_state: ResourceState,
    current_length: usize,
    base: BaseParams,
    tier: Tier,
    karma: f64,
    rvc_budget: u32,
    bias_table: &dyn TokenBiasTable,
) -> FinalParams {
    let max_tokens = c::layer_ii_max_tokens(tier);
    let mut logit_bias: HashMap<i64, f64> = HashMap::new();

    apply_verbose_suppression(&mut logit_bias, resource_state, bias_table);
    apply_nice_loop_suppression(&mut logit_bias, tier, karma, bias_table);
    apply_length_bias(&mut logit_bias, current_length, bias_table);
    if tier == Tier::Low {
        apply_overspend_prevention(&mut logit_bias, rvc_budget, bias_table);
    }

    FinalParams {
        repetition_penalty: 1.0,
        temperature: base.temperature,
        top_p: base.top_p,
        top_k: base.top_k,
        max_tokens,
        logit_bias,
    }
}

fn apply_verbose_suppression(
    bias: &mut HashMap<i64, f64>,
    resource_state: ResourceState,
    bias_table: &dyn TokenBiasTable,
) {
    let strength = match resource_state {
        ResourceState::Scarce => c::VERBOSE_BIAS_SCARCE,
        ResourceState::Critical => c::VERBOSE_BIAS_CRITICAL,
        ResourceState::Debt => c::VERBOSE_BIAS_DEBT,
        ResourceState::Wealthy | ResourceState::Stable => return,
    };
    for id in bias_table.verbose_token_ids() {
        *bias.entry(id).or_insert(0.0) += strength;
    }
}

fn apply_nice_loop_suppression(
    bias: &mut HashMap<i64, f64>,
    tier: Tier,
    karma: f64,
    bias_table: &dyn TokenBiasTable,
) {
    if matches!(tier, Tier::Trivial | Tier::Low) {
        return;
    }
    let strength = c::NICE_LOOP_BASE_BIAS * ((100.0 - karma) / 100.0).clamp(0.0, 1.0);
    for id in bias_table.nice_loop_token_ids() {
        *bias.entry(id).or_insert(0.0) += strength;
    }
}

fn apply_length_bias(bias: &mut HashMap<i64, f64>, current_length: usize, bias_table: &dyn TokenBiasTable) {
    if current_length <= c::LENGTH_SOFT_CAP {
        return;
    }
    #[allow(clippy::cast_precision_loss)]
    let over = (current_length - c::LENGTH_SOFT_CAP) as f64;
    let penalty = (-c::LENGTH_PENALTY_STRENGTH * over).max(c::LENGTH_PENALTY_FLOOR);
    for id in bias_table.verbose_token_ids() {
        *bias.entry(id).or_insert(0.0) += penalty;
    }
}

fn apply_overspend_prevention(bias: &mut HashMap<i64, f64>, rvc_budget: u32, bias_table: &dyn TokenBiasTable) {
    if rvc_budget > c::OVERSPEND_PREVENTION_RVC_BUDGET_CEILING {
        return;
    }
    for id in bias_table.verbose_token_ids() {
        *bias.entry(id).or_insert(0.0) += c::VERBOSE_BIAS_CRITICAL;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::token_bias::NoOpTokenBiasTable;

    #[test]
    fn repetition_penalty_is_always_one() {
        let out = conduct(
            ResourceState::Wealthy,
            0,
            BaseParams { temperature: 0.7, top_p: 0.9, top_k: 40 },
            Tier::Moderate,
            100.0,
            100,
            &NoOpTokenBiasTable,
        );
        assert_eq!(out.repetition_penalty, 1.0);
    }

    #[test]
    fn max_tokens_matches_tier_ceiling() {
        let out = conduct(
            ResourceState::Stable,
            0,
            BaseParams { temperature: 0.7, top_p: 0.9, top_k: 40 },
            Tier::Critical,
            100.0,
            100,
            &NoOpTokenBiasTable,
        );
        assert_eq!(out.max_tokens, 1000);
    }

    #[test]
    fn no_op_bias_table_yields_empty_bias() {
        let out = conduct(
            ResourceState::Debt,
            200,
            BaseParams { temperature: 0.7, top_p: 0.9, top_k: 40 },
            Tier::High,
            10.0,
            2,
            &NoOpTokenBiasTable,
        );
        assert!(out.logit_bias.is_empty());
    }
}
