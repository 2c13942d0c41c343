//! Utility scoring, karma delta, and adaptive penalty scaling (design §4.4).

use std::collections::VecDeque;

use crate::constants::arbiter as c;
use crate::types::EfficiencyGrade;

/// `(utility, efficiency_ratio, karma_delta, timestamp)` learning-history entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningEntry {
    /// Utility score for the response.
    pub utility: f64,
    /// `tte_used / max_tte`.
    pub efficiency_ratio: f64,
    /// Karma delta awarded.
    pub karma_delta: f64,
    /// Wall-clock timestamp.
    pub timestamp: i64,
}

/// Adaptive, bounded-step thresholds the karma-delta formula consults
/// (design §4.4 "Adaptive penalty scaling").
#[derive(Debug, Clone)]
pub struct AdaptiveThresholds {
    /// Multiplies the granular overspend/underuse penalties.
    pub penalty_scaling: f64,
    /// Diagnostic-only utility threshold.
    pub utility_threshold: f64,
    /// Diagnostic-only efficiency threshold.
    pub efficiency_threshold: f64,
    /// Ring of the last [`crate::constants::arbiter::LEARNING_HISTORY_CAP`] entries.
    pub history: VecDeque<LearningEntry>,
}

impl Default for AdaptiveThresholds {
    fn default() -> Self {
        Self {
            penalty_scaling: c::DEFAULT_PENALTY_SCALING,
            utility_threshold: c::DEFAULT_UTILITY_THRESHOLD,
            efficiency_threshold: c::DEFAULT_EFFICIENCY_THRESHOLD,
            history: VecDeque::with_capacity(c::LEARNING_HISTORY_CAP),
        }
    }
}

impl AdaptiveThresholds {
    /// Append a new learning entry and, once enough history exists, step the
    /// thresholds per design §4.4.
    pub fn record(&mut self, entry: LearningEntry) {
        self.history.push_back(entry);
        while self.history.len() > c::LEARNING_HISTORY_CAP {
            self.history.pop_front();
        }

        if self.history.len() < c::ADAPTIVE_MIN_HISTORY {
            return;
        }

        let last_10: Vec<_> = self.history.iter().rev().take(10).collect();
        let n = last_10.len() as f64;
        let avg_utility = last_10.iter().map(|e| e.utility).sum::<f64>() / n;
        let avg_efficiency = last_10.iter().map(|e| e.efficiency_ratio).sum::<f64>() / n;
        let avg_karma = last_10.iter().map(|e| e.karma_delta).sum::<f64>() / n;

        if avg_utility < c::ADAPTIVE_STEP_DOWN_UTILITY_CEILING
            && avg_karma < c::ADAPTIVE_STEP_DOWN_KARMA_CEILING
        {
            self.penalty_scaling =
                (self.penalty_scaling - c::PENALTY_SCALING_STEP_DOWN).max(c::PENALTY_SCALING_BOUNDS.0);
            self.utility_threshold =
                (self.utility_threshold - c::UTILITY_THRESHOLD_STEP).max(c::UTILITY_THRESHOLD_BOUNDS.0);
        } else if avg_utility > c::ADAPTIVE_STEP_UP_UTILITY_FLOOR
            && avg_karma > c::ADAPTIVE_STEP_UP_KARMA_FLOOR
        {
            self.penalty_scaling =
                (self.penalty_scaling + c::PENALTY_SCALING_STEP_UP).min(c::PENALTY_SCALING_BOUNDS.1);
            self.utility_threshold =
                (self.utility_threshold + c::UTILITY_THRESHOLD_STEP).min(c::UTILITY_THRESHOLD_BOUNDS.1);
        }

        if avg_efficiency < c::ADAPTIVE_EFFICIENCY_LOW {
            self.efficiency_threshold =
                (self.efficiency_threshold - c::EFFICIENCY_THRESHOLD_STEP).max(c::EFFICIENCY_THRESHOLD_BOUNDS.0);
        } else if avg_efficiency > c::ADAPTIVE_EFFICIENCY_HIGH {
            self.efficiency_threshold =
                (self.efficiency_threshold + c::EFFICIENCY_THRESHOLD_STEP).min(c::EFFICIENCY_THRESHOLD_BOUNDS.1);
        }
    }
}

/// `efficiency_component` of the utility score (design §4.4).
#[must_use]
pub fn efficiency_component(tte_used: u32, max_tte: u32) -> f64 {
    if max_tte == 0 {
        return 0.0;
    }
    let r = f64::from(tte_used) / f64::from(max_tte);
    if (0.5..=0.7).contains(&r) {
        0.4
    } else if r < 0.2 {
        0.0
    } else if r < 0.5 {
        0.1
    } else if r > 0.7 {
        0.05
    } else {
        0.0
    }
}

/// `utility_score = min(1.0, quality_component + efficiency_component)`.
#[must_use]
pub fn utility_score(judge_quality: f64, tte_used: u32, max_tte: u32) -> f64 {
    let quality_component = c::QUALITY_COMPONENT_WEIGHT * judge_quality;
    (quality_component + efficiency_component(tte_used, max_tte)).min(1.0)
}

/// Karma delta for the A/B grade fast path (design §4.4).
#[must_use]
pub fn grade_fast_path_karma(grade: EfficiencyGrade, r: f64) -> Option<f64> {
    let base = match grade {
        EfficiencyGrade::A => c::GRADE_A_BASE_REWARD,
        EfficiencyGrade::B => c::GRADE_B_BASE_REWARD,
        _ => return None,
    };
    let (lo, hi) = c::GRADE_AB_EFFICIENCY_BAND;
    let bonus = if r >= lo && r <= hi { c::GRADE_AB_EFFICIENCY_BONUS } else { 0.0 };
    Some(base + bonus)
}

fn utility_band_karma(utility: f64) -> f64 {
    if utility >= 0.8 {
        5.0
    } else if utility >= 0.6 {
        2.0
    } else if utility >= 0.4 {
        0.0
    } else if utility >= 0.2 {
        -0.05
    } else {
        -0.1 - 0.5 * (0.2 - utility)
    }
}

fn granular_penalty(r: f64) -> f64 {
    if r > 1.5 {
        0.2 + ((r - 1.5) / 0.5) * 0.3
    } else if r > 1.2 {
        0.05 + ((r - 1.2) / 0.3) * 0.15
    } else if r > 1.0 {
        0.01 + ((r - 1.0) / 0.2) * 0.04
    } else if r < 0.05 {
        1.0 + ((0.05 - r) / 0.05) * 1.0
    } else if r < 0.1 {
        0.3 + ((0.1 - r) / 0.05) * 0.7
    } else if r < 0.2 {
        0.1 + ((0.2 - r) / 0.1) * 0.2
    } else {
        0.0
    }
}

/// Full karma-delta computation (design §4.4). `grade` is `None` when RVC
/// grading was not performed for this response.
#[must_use]
pub fn karma_delta(
    grade: Option<EfficiencyGrade>,
    utility: f64,
    tte_used: u32,
    max_tte: u32,
    penalty_scaling: f64,
) -> f64 {
    let r = if max_tte == 0 { 0.0 } else { f64::from(tte_used) / f64::from(max_tte) };

    if let Some(grade) = grade {
        if let Some(fast_path) = grade_fast_path_karma(grade, r) {
            return fast_path;
        }
    }

    let band_karma = utility_band_karma(utility);
    let penalty = if max_tte > 0 { granular_penalty(r) } else { 0.0 };

    (band_karma - penalty) * penalty_scaling
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_a_skips_utility_bands() {
        let karma = karma_delta(Some(EfficiencyGrade::A), 0.0, 10, 20, 1.0);
        assert_eq!(karma, c::GRADE_A_BASE_REWARD);
    }

    #[test]
    fn grade_a_gets_efficiency_bonus_in_band() {
        let karma = karma_delta(Some(EfficiencyGrade::A), 0.0, 5, 10, 1.0);
        assert_eq!(karma, c::GRADE_A_BASE_REWARD + c::GRADE_AB_EFFICIENCY_BONUS);
    }

    #[test]
    fn severe_underuse_is_heavily_penalized() {
        let karma = karma_delta(None, 0.9, 1, 100, 1.0);
        assert!(karma < utility_band_karma(0.9));
    }

    #[test]
    fn zero_max_tte_skips_granular_penalty() {
        let karma = karma_delta(None, 0.5, 0, 0, 1.0);
        assert_eq!(karma, utility_band_karma(0.5));
    }

    #[test]
    fn adaptive_thresholds_step_down_on_poor_history() {
        let mut thresholds = AdaptiveThresholds::default();
        for i in 0..10 {
            thresholds.record(LearningEntry {
                utility: 0.05,
                efficiency_ratio: 0.05,
                karma_delta: -4.0,
                timestamp: i,
            });
        }
        assert!(thresholds.penalty_scaling < c::DEFAULT_PENALTY_SCALING);
        assert!(thresholds.efficiency_threshold < c::DEFAULT_EFFICIENCY_THRESHOLD);
    }
}
