//! Response Value Classifier: the Rule of Minimal Sufficient Response (design §4.1).
//!
//! Classifies a user input's complexity and emotional stakes into a [`Tier`],
//! producing the token budget and efficiency requirement the rest of the
//! pipeline enforces.

mod classifier;
mod patterns;

pub use classifier::Classifier;

use crate::types::{EfficiencyGrade, TierAssessment};

/// Result of comparing an actual response against its [`TierAssessment`]
/// (design §4.1 diagnostic operation, §8 testable property).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EfficiencyValidation {
    /// Whether `actual_efficiency >= assessment.efficiency_requirement`.
    pub meets_efficiency_requirement: bool,
    /// `quality_score / max(actual_tokens, 1)`.
    pub actual_efficiency: f64,
    /// The tier's required efficiency.
    pub required_efficiency: f64,
    /// `required_efficiency - actual_efficiency` (can be negative).
    pub efficiency_gap: f64,
    /// Whether `actual_tokens <= assessment.max_token_budget`.
    pub token_usage_appropriate: bool,
    /// `max(0, actual_tokens - max_token_budget)`.
    pub overspend_penalty: u32,
    /// Letter grade from `actual_efficiency`.
    pub efficiency_grade: EfficiencyGrade,
}

/// Grade and score a realized response against the tier it was assessed at.
#[must_use]
pub fn validate_response_efficiency(
    assessment: &TierAssessment,
    actual_tokens: u32,
    quality_score: f64,
) -> EfficiencyValidation {
    let denom = f64::from(actual_tokens.max(1));
    let actual_efficiency = quality_score / denom;
    let meets_efficiency_requirement = actual_efficiency >= assessment.efficiency_requirement;
    let overspend_penalty = actual_tokens.saturating_sub(assessment.max_token_budget);

    let efficiency_grade = if actual_efficiency >= 0.9 {
        EfficiencyGrade::A
    } else if actual_efficiency >= 0.8 {
        EfficiencyGrade::B
    } else if actual_efficiency >= 0.7 {
        EfficiencyGrade::C
    } else if actual_efficiency >= 0.6 {
        EfficiencyGrade::D
    } else {
        EfficiencyGrade::F
    };

    EfficiencyValidation {
        meets_efficiency_requirement,
        actual_efficiency,
        required_efficiency: assessment.efficiency_requirement,
        efficiency_gap: assessment.efficiency_requirement - actual_efficiency,
        token_usage_appropriate: actual_tokens <= assessment.max_token_budget,
        overspend_penalty,
        efficiency_grade,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivial_response_grades_a_when_efficient() {
        let assessment = Classifier.classify("Hi there");
        let validation = validate_response_efficiency(&assessment, 3, 0.9);
        assert_eq!(validation.efficiency_grade, EfficiencyGrade::A);
        assert!(validation.meets_efficiency_requirement);
    }

    #[test]
    fn overspend_penalty_is_zero_within_budget() {
        let assessment = Classifier.classify("Explain quantum computing in simple terms");
        let validation =
            validate_response_efficiency(&assessment, assessment.max_token_budget, 0.8);
        assert_eq!(validation.overspend_penalty, 0);
    }
}
