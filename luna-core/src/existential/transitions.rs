//! Age-up and age-regression checks (design §4.2).

use crate::constants::economy as c;
use crate::types::{EconomyConfig, ExistentialState};

/// Mean `quality/tokens_used` over the most recent `window` responses,
/// dividing by the window's length even though `tokens_used == 0` entries
/// contribute no numerator term (mirrors the source's loop).
#[must_use]
pub fn rolling_mean_efficiency(state: &ExistentialState, window: usize) -> f64 {
    let recent: Vec<_> = state.response_history.iter().rev().take(window).collect();
    if recent.is_empty() {
        return 0.0;
    }

    let sum: f64 = recent
        .iter()
        .filter(|entry| entry.tokens_used > 0)
        .map(|entry| entry.quality / f64::from(entry.tokens_used))
        .sum();

    sum / recent.len() as f64
}

/// Age-up iff karma quota is met and, once enough history exists, the
/// rolling efficiency window clears the learned-efficiency threshold.
/// Mutates `state` in place and returns whether the transition fired.
pub fn age_up_check(state: &mut ExistentialState, economy: &EconomyConfig, now: u64) -> bool {
    if state.current_karma < state.karma_quota {
        return false;
    }

    if state.response_history.len() >= c::AGE_UP_WINDOW {
        let mean_efficiency = rolling_mean_efficiency(state, c::AGE_UP_WINDOW);
        if mean_efficiency < c::LEARNED_EFFICIENCY_THRESHOLD {
            return false;
        }
    }

    state.age += 1;
    state.max_token_pool = (state.max_token_pool as f64 * economy.pool_growth_rate).floor() as i64;
    state.current_token_pool = state.max_token_pool;
    state.karma_quota *= economy.karma_quota_growth_rate;
    state.current_karma = 0.0;
    state.anxiety /= 2.0;
    state.last_age_up_ts = now;
    state.permanent_knowledge_level = state.permanent_knowledge_level.max(state.age);
    true
}

/// Age-regression iff enabled, one of the distress conditions holds, the
/// cooldown has elapsed, and `age > 1`. Mutates `state` in place and returns
/// whether the transition fired.
pub fn age_regression_check(state: &mut ExistentialState, economy: &EconomyConfig, now: u64) -> bool {
    if !economy.age_regression_enabled || state.age <= 1 {
        return false;
    }

    if now.saturating_sub(state.last_regression_ts) < c::REGRESSION_COOLDOWN_SECS {
        return false;
    }

    let last_five: Vec<_> = state.response_history.iter().rev().take(c::REGRESSION_WINDOW).collect();
    let mean_karma_last_five = if last_five.is_empty() {
        0.0
    } else {
        last_five.iter().map(|e| e.karma_earned).sum::<f64>() / last_five.len() as f64
    };

    let distress = state.current_token_pool <= 0
        || state.current_karma < c::NEGATIVE_KARMA_REGRESSION_THRESHOLD
        || mean_karma_last_five < c::SURVIVAL_KARMA_REGRESSION_FRACTION * state.survival_threshold;

    if !distress {
        return false;
    }

    let age_before = state.age;
    state.age = (state.age - 1).max(1);
    state.max_token_pool =
        (economy.base_token_pool as f64 * economy.pool_growth_rate.powi(state.age as i32 - 1)) as i64;
    state.current_token_pool = state.max_token_pool;
    state.karma_quota *= c::REGRESSION_PENALTY_MULTIPLIER;
    state.current_karma = 0.0;
    state.anxiety = (state.anxiety + 0.5).min(1.0);
    state.survival_threshold = (state.survival_threshold * 1.1).min(c::SURVIVAL_THRESHOLD_BOUNDS.1);
    state.permanent_knowledge_level = state.permanent_knowledge_level.max(age_before);
    state.regression_count += 1;
    state.last_regression_ts = now;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResponseHistoryEntry;

    #[test]
    fn age_up_requires_karma_quota() {
        let mut state = ExistentialState::default();
        let economy = EconomyConfig::default();
        assert!(!age_up_check(&mut state, &economy, 0));
    }

    #[test]
    fn age_up_skips_efficiency_gate_with_sparse_history() {
        let mut state = ExistentialState::default();
        let economy = EconomyConfig::default();
        state.current_karma = state.karma_quota;
        assert!(age_up_check(&mut state, &economy, 0));
        assert_eq!(state.age, 2);
        assert_eq!(state.current_karma, 0.0);
        assert_eq!(state.current_token_pool, state.max_token_pool);
    }

    #[test]
    fn regression_is_noop_at_age_floor() {
        let mut state = ExistentialState::default();
        let economy = EconomyConfig::default();
        state.current_token_pool = 0;
        assert!(!age_regression_check(&mut state, &economy, 100_000));
        assert_eq!(state.age, 1);
        assert_eq!(state.regression_count, 0);
    }

    #[test]
    fn regression_fires_on_karma_debt() {
        let mut state = ExistentialState::default();
        let economy = EconomyConfig::default();
        state.age = 3;
        state.current_karma = -20.0;
        state.last_regression_ts = 0;
        for _ in 0..5 {
            state.record_response(ResponseHistoryEntry {
                tokens_used: 10,
                quality: 0.1,
                karma_earned: -1.0,
                timestamp: 0,
            });
        }
        assert!(age_regression_check(&mut state, &economy, c::REGRESSION_COOLDOWN_SECS + 1));
        assert_eq!(state.age, 2);
        assert_eq!(state.regression_count, 1);
        assert!(state.permanent_knowledge_level >= 3);
    }
}
