//! Existential Budget / Token Economy: per-request go/no-go, budget sizing,
//! karma accounting, and age transitions (design §4.2).

mod transitions;

use crate::constants::economy as c;
use crate::types::{AgeTransition, EconomyConfig, ExistentialState, ResponseHistoryEntry, Tier};

pub use transitions::{age_regression_check, age_up_check};

/// Outcome of [`assess`]: whether to respond and how many tokens to spend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Whether the budget allows a response at all.
    pub should_respond: bool,
    /// Tokens this response is allowed to spend.
    pub token_budget: i64,
    /// `[0, 1]` risk derived from the pool remaining after the spend.
    pub existential_risk: f64,
    /// Anxiety computed for this request.
    pub anxiety: f64,
}

/// Outcome of [`process_response_result`]: the karma/pool deltas applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delta {
    /// Karma awarded for this response.
    pub karma_earned: f64,
    /// Tokens spent.
    pub tokens_used: u32,
    /// Which age transition fired, if any.
    pub transition: AgeTransition,
}

/// A single go/no-go and budget-sizing decision (design §4.2, `assess`).
#[must_use]
pub fn assess(
    state: &ExistentialState,
    tier: Tier,
    question_value: f64,
    now: u64,
) -> Decision {
    let anxiety = compute_anxiety(state, now);
    let should_respond = decide_should_respond(state, anxiety, question_value);

    let (target_tokens, _) = crate::constants::rvc::token_bounds(tier);
    let mut anxiety_adjusted_budget = f64::from(target_tokens);

    if anxiety >= 0.8 {
        anxiety_adjusted_budget *= 1.0 - anxiety / 4.0;
    } else if anxiety >= 0.5 {
        anxiety_adjusted_budget *= 1.0 - anxiety / 2.0;
    }

    let karma_multiplier = state.current_karma / 100.0;
    let mut token_budget = if matches!(tier, Tier::High | Tier::Critical) && state.current_karma < 95.0 {
        let pressure_multiplier = (karma_multiplier * 0.7).max(0.3);
        anxiety_adjusted_budget * pressure_multiplier
    } else {
        anxiety_adjusted_budget * karma_multiplier
    };

    let ceiling = (state.current_token_pool - c::EMERGENCY_TOKEN_RESERVE).max(1) as f64;
    token_budget = token_budget.min(ceiling).max(1.0);
    let token_budget = token_budget.round() as i64;

    let remaining = state.current_token_pool - token_budget;
    let existential_risk = if state.max_token_pool > 0 {
        (1.0 - (remaining as f64 / state.max_token_pool as f64)).clamp(0.0, 1.0)
    } else {
        1.0
    };

    Decision { should_respond, token_budget, existential_risk, anxiety }
}

fn compute_anxiety(state: &ExistentialState, _now: u64) -> f64 {
    let pool_ratio = if state.max_token_pool > 0 {
        (state.current_token_pool as f64 / state.max_token_pool as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let karma_progress = if state.karma_quota > 0.0 {
        (state.current_karma / state.karma_quota).clamp(0.0, 1.0)
    } else {
        1.0
    };

    let mut anxiety = (1.0 - pool_ratio) * 0.6 + (1.0 - karma_progress) * 0.3;

    if state.age > 5 {
        anxiety += 0.05;
    }
    if state.current_token_pool <= c::EMERGENCY_TOKEN_RESERVE {
        anxiety += 0.2;
    }

    anxiety.clamp(0.0, 1.0)
}

fn decide_should_respond(state: &ExistentialState, anxiety: f64, question_value: f64) -> bool {
    if state.current_token_pool <= c::EMERGENCY_TOKEN_RESERVE {
        return question_value >= c::EMERGENCY_QUESTION_VALUE_THRESHOLD;
    }
    if anxiety >= c::HIGH_ANXIETY_THRESHOLD {
        return question_value >= c::HIGH_ANXIETY_QUESTION_VALUE_THRESHOLD;
    }
    if anxiety >= c::MODERATE_ANXIETY_THRESHOLD {
        return question_value >= c::MODERATE_ANXIETY_QUESTION_VALUE_THRESHOLD;
    }
    true
}

/// Context used by the karma formula's content-sensitive bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseContext {
    /// No special context bonus.
    Neutral,
    /// Philosophical content: `+2` flat bonus.
    Philosophical,
    /// Emotional content: `+1` flat bonus.
    Emotional,
}

/// Apply a response's outcome to `state`, computing karma via the Learned
/// Efficiency Paradox rule and running the age-transition checks (design §4.2).
pub fn process_response_result(
    state: &mut ExistentialState,
    quality: f64,
    tokens_used: u32,
    duration_secs: f64,
    context: ResponseContext,
    economy: &EconomyConfig,
    now: u64,
) -> Delta {
    let karma_earned = karma_earned(state, quality, tokens_used, duration_secs, context);

    state.current_token_pool -= i64::from(tokens_used);
    state.current_karma += karma_earned;
    state.total_responses += 1;

    let transition = if age_regression_check(state, economy, now) {
        AgeTransition::Regressed
    } else if age_up_check(state, economy, now) {
        AgeTransition::AgedUp
    } else {
        AgeTransition::Stable
    };

    state.record_response(ResponseHistoryEntry {
        tokens_used,
        quality,
        karma_earned,
        timestamp: now as i64,
    });

    update_survival_threshold(state);

    Delta { karma_earned, tokens_used, transition }
}

fn karma_earned(
    state: &ExistentialState,
    quality: f64,
    tokens_used: u32,
    duration_secs: f64,
    context: ResponseContext,
) -> f64 {
    let base = quality * 10.0;

    let efficiency = if tokens_used == 0 { f64::INFINITY } else { quality / f64::from(tokens_used) };

    let efficiency_bonus = if tokens_used == 0 {
        c::MAX_EFFICIENCY_BONUS
    } else {
        (efficiency * 100.0 * c::EFFICIENCY_REWARD_MULTIPLIER).min(c::MAX_EFFICIENCY_BONUS)
    };

    let verbosity_penalty =
        f64::from(tokens_used.saturating_sub(100)) * 0.01 * c::VERBOSITY_PENALTY_FACTOR;

    let speed_bonus = if duration_secs > 0.0 { ((quality / duration_secs) * 5.0).min(1.0) } else { 0.0 };

    let context_bonus = match context {
        ResponseContext::Philosophical => 2.0,
        ResponseContext::Emotional => 1.0,
        ResponseContext::Neutral => 0.0,
    };

    let age_efficiency_required =
        c::EFFICIENCY_REQUIREMENT_GROWTH.powi(state.age as i32 - 1);
    let age_penalty = if efficiency.is_finite() && efficiency < age_efficiency_required {
        (age_efficiency_required - efficiency) * 10.0
    } else {
        0.0
    };

    let mut total =
        base + efficiency_bonus - verbosity_penalty + speed_bonus + context_bonus - age_penalty;

    if total < state.survival_threshold {
        total *= 0.5;
    }

    total.max(0.0)
}

fn update_survival_threshold(state: &mut ExistentialState) {
    let window = state
        .response_history
        .iter()
        .rev()
        .take(c::SURVIVAL_THRESHOLD_WINDOW)
        .map(|entry| entry.karma_earned)
        .collect::<Vec<_>>();
    if window.is_empty() {
        return;
    }

    let avg = window.iter().sum::<f64>() / window.len() as f64;
    let ratio = if state.survival_threshold > 0.0 { avg / state.survival_threshold } else { 0.0 };

    let (lo, hi) = c::SURVIVAL_THRESHOLD_BOUNDS;
    if ratio > c::SURVIVAL_THRESHOLD_RAISE_RATIO {
        state.survival_threshold = (state.survival_threshold * c::SURVIVAL_THRESHOLD_RAISE_STEP).clamp(lo, hi);
    } else if ratio < c::SURVIVAL_THRESHOLD_LOWER_RATIO {
        state.survival_threshold = (state.survival_threshold * c::SURVIVAL_THRESHOLD_LOWER_STEP).clamp(lo, hi);
    }
}

/// Diagnostic snapshot for the CLI `info` command and logging (design §4.2).
#[derive(Debug, Clone, PartialEq)]
pub struct ExistentialStatus {
    /// Current age.
    pub age: u32,
    /// `current_token_pool / max_token_pool`, clamped to `[0, 1]`.
    pub pool_ratio: f64,
    /// `current_karma / karma_quota`, clamped to `[0, 1]`.
    pub karma_progress: f64,
    /// Last computed anxiety.
    pub anxiety: f64,
    /// Maturity bucket derived from learned-efficiency ratio.
    pub operational_maturity: crate::types::OperationalMaturity,
}

/// Snapshot the current budget/age/karma state for display (design §4.2).
#[must_use]
pub fn existential_status(state: &ExistentialState, now: u64) -> ExistentialStatus {
    use crate::types::OperationalMaturity;

    let pool_ratio = if state.max_token_pool > 0 {
        (state.current_token_pool as f64 / state.max_token_pool as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let karma_progress =
        if state.karma_quota > 0.0 { (state.current_karma / state.karma_quota).clamp(0.0, 1.0) } else { 1.0 };
    let anxiety = compute_anxiety(state, now);

    let learned_efficiency = transitions::rolling_mean_efficiency(state, c::AGE_UP_WINDOW);
    let requirement = c::EFFICIENCY_REQUIREMENT_GROWTH.powi(state.age as i32 - 1);
    let ratio = if requirement > 0.0 { learned_efficiency / requirement } else { 0.0 };

    let operational_maturity = if ratio < 0.5 {
        OperationalMaturity::Novice
    } else if ratio < 0.8 {
        OperationalMaturity::Intermediate
    } else if ratio < 1.0 {
        OperationalMaturity::Advanced
    } else if ratio < 1.5 {
        OperationalMaturity::Expert
    } else {
        OperationalMaturity::Master
    };

    ExistentialStatus { age: state.age, pool_ratio, karma_progress, anxiety, operational_maturity }
}

/// Human-readable hints based on the current state (design §4.2).
#[must_use]
pub fn survival_recommendations(state: &ExistentialState, now: u64) -> Vec<String> {
    let mut recs = Vec::new();
    let status = existential_status(state, now);

    if status.pool_ratio < 0.1 {
        recs.push("Token pool critically low; favor minimal responses.".to_string());
    }
    if status.karma_progress < 0.3 {
        recs.push("Karma progress is slow; prioritize high-efficiency answers.".to_string());
    }
    if status.anxiety >= c::HIGH_ANXIETY_THRESHOLD {
        recs.push("Anxiety is high; only answer high-value questions.".to_string());
    }
    if state.regression_count > 0 {
        recs.push(format!("Has regressed {} time(s); efficiency discipline needed.", state.regression_count));
    }
    if recs.is_empty() {
        recs.push("Operating within healthy bounds.".to_string());
    }
    recs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_tokens_gives_max_efficiency_bonus() {
        let state = ExistentialState::default();
        let karma = karma_earned(&state, 1.0, 0, 1.0, ResponseContext::Neutral);
        assert!(karma >= c::MAX_EFFICIENCY_BONUS - 1e-9 || karma == 0.0);
    }

    #[test]
    fn zero_duration_has_no_speed_bonus() {
        let state = ExistentialState::default();
        let with_zero_duration = karma_earned(&state, 0.5, 10, 0.0, ResponseContext::Neutral);
        assert!(with_zero_duration.is_finite());
    }

    #[test]
    fn debt_pool_requires_high_value_question() {
        let mut state = ExistentialState::default();
        state.current_token_pool = 0;
        let decision = assess(&state, Tier::Low, 0.5, 0);
        assert!(!decision.should_respond);
        let decision_high_value = assess(&state, Tier::Low, 0.9, 0);
        assert!(decision_high_value.should_respond);
    }

    #[test]
    fn pool_never_exceeds_max_after_response() {
        let mut state = ExistentialState::default();
        let economy = EconomyConfig { age_regression_enabled: false, ..EconomyConfig::default() };
        process_response_result(&mut state, 0.8, 20, 1.0, ResponseContext::Neutral, &economy, 0);
        assert!(state.current_token_pool <= state.max_token_pool);
    }
}
