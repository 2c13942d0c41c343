//! Response Value Classifier: tier assessment from raw user input (design §4.1).

use crate::constants::rvc as c;
use crate::types::{Tier, TierAssessment};

use super::patterns::{
    COMMON_WORDS, COMPLEXITY_CATEGORIES, EMOTIONAL_STAKES_PATTERNS, HIGH_COMPLEXITY_DOMAINS,
    PERSONAL_PRONOUNS, TRIVIAL_PATTERNS,
};

/// Stateless classifier; all tuning lives in [`crate::constants::rvc`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Classifier;

impl Classifier {
    /// Classify `user_input`, producing a full [`TierAssessment`].
    #[must_use]
    pub fn classify(&self, user_input: &str) -> TierAssessment {
        let normalized = user_input.to_lowercase();
        let normalized = normalized.trim();

        let complexity_score = complexity_score(normalized);
        let emotional_stakes = emotional_stakes(normalized);
        let semantic_density = semantic_density(normalized);
        let tier = determine_tier(complexity_score, emotional_stakes, semantic_density);

        let (target_token_count, max_token_budget) = c::token_bounds(tier);
        let efficiency_requirement = c::efficiency_requirement(tier);
        let reasoning = reasoning(tier, complexity_score, emotional_stakes, semantic_density);
        let recommended_style = recommended_style(tier, emotional_stakes);

        TierAssessment {
            tier,
            complexity_score,
            emotional_stakes,
            semantic_density,
            target_token_count,
            max_token_budget,
            efficiency_requirement,
            reasoning,
            recommended_style,
        }
    }
}

fn is_trivial(text: &str) -> bool {
    TRIVIAL_PATTERNS.iter().any(|p| p.is_match(text))
}

fn complexity_score(text: &str) -> f64 {
    if is_trivial(text) {
        return c::TRIVIAL_COMPLEXITY;
    }

    let mut domain_complexity = 0.0_f64;
    for (_domain, keywords) in HIGH_COMPLEXITY_DOMAINS.iter() {
        let matches = keywords.iter().filter(|kw| text.contains(*kw)).count();
        if matches > 0 {
            #[allow(clippy::cast_precision_loss)]
            let candidate = c::DOMAIN_FLOOR_BASE + (matches as f64) * c::DOMAIN_FLOOR_PER_MATCH;
            domain_complexity = domain_complexity.max(candidate);
        }
    }

    let mut score = 0.0_f64;
    for category in COMPLEXITY_CATEGORIES.iter() {
        for pattern in &category.patterns {
            #[allow(clippy::cast_precision_loss)]
            let matches = pattern.find_iter(text).count() as f64;
            score += matches * category.weight;
        }
    }

    let word_count = text.split_whitespace().count();
    if word_count > 20 {
        score += 0.15;
    } else if word_count > 10 {
        score += 0.05;
    }

    let question_count = text.matches('?').count();
    if question_count > 2 {
        score += 0.2;
    } else if question_count > 0 {
        score += 0.05;
    }

    if domain_complexity > c::DOMAIN_BLEND_THRESHOLD {
        (domain_complexity + score * c::DOMAIN_BLEND_RAW_WEIGHT).min(1.0)
    } else {
        score.min(1.0)
    }
}

fn emotional_stakes(text: &str) -> f64 {
    let mut score = 0.0_f64;
    for (weight, patterns) in EMOTIONAL_STAKES_PATTERNS.iter() {
        for pattern in patterns {
            #[allow(clippy::cast_precision_loss)]
            let matches = pattern.find_iter(text).count() as f64;
            score += matches * weight;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let pronoun_matches = PERSONAL_PRONOUNS.find_iter(text).count() as f64;
    score += pronoun_matches * 0.05;

    score.clamp(0.0, 1.0)
}

fn semantic_density(text: &str) -> f64 {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }
    if is_trivial(text) {
        return c::TRIVIAL_DENSITY;
    }

    let meaningful = words
        .iter()
        .filter(|w| !COMMON_WORDS.contains(&w.to_lowercase().as_str()))
        .count();

    #[allow(clippy::cast_precision_loss)]
    let density = meaningful as f64 / words.len() as f64;
    density.min(1.0)
}

fn determine_tier(complexity: f64, emotional_stakes: f64, semantic_density: f64) -> Tier {
    let combined = complexity * c::W_COMPLEXITY
        + emotional_stakes * c::W_STAKES
        + semantic_density * c::W_DENSITY;

    for (bound, tier) in c::TIER_BAND_UPPER_BOUNDS {
        if combined < bound {
            return tier;
        }
    }
    Tier::Maximum
}

fn reasoning(tier: Tier, complexity: f64, emotional_stakes: f64, semantic_density: f64) -> String {
    let mut parts = vec![
        match tier {
            Tier::Trivial => "Trivial input detected - minimal response required",
            Tier::Low => "Low complexity input - brief response appropriate",
            Tier::Moderate => "Moderate complexity - standard response length",
            Tier::High => "High complexity - substantial response justified",
            Tier::Critical => "Critical complexity - high token investment warranted",
            Tier::Maximum => "Maximum complexity - maximum token allocation",
        }
        .to_string(),
    ];

    if complexity > 0.5 {
        parts.push(format!("High complexity score: {complexity:.2}"));
    }
    if emotional_stakes > 0.5 {
        parts.push(format!("High emotional stakes: {emotional_stakes:.2}"));
    }
    if semantic_density > 0.5 {
        parts.push(format!("High semantic density: {semantic_density:.2}"));
    }

    parts.join(" | ")
}

fn recommended_style(tier: Tier, emotional_stakes: f64) -> String {
    let mut style = match tier {
        Tier::Trivial => "Concise and casual",
        Tier::Low => "Brief and friendly",
        Tier::Moderate => "Balanced and informative",
        Tier::High => "Substantial and thoughtful",
        Tier::Critical => "Comprehensive and deep",
        Tier::Maximum => "Maximum complexity and depth",
    }
    .to_string();

    if emotional_stakes > 0.7 {
        style.push_str(" with high emotional sensitivity");
    } else if emotional_stakes > 0.4 {
        style.push_str(" with moderate emotional sensitivity");
    }

    style
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_is_trivial() {
        let result = Classifier.classify("Hi there");
        assert_eq!(result.tier, Tier::Trivial);
        assert_eq!(result.target_token_count, 8);
    }

    #[test]
    fn philosophical_question_is_high_tier() {
        let result = Classifier
            .classify("What is the relationship between scarcity and functional intelligence?");
        assert!(matches!(result.tier, Tier::High | Tier::Critical | Tier::Maximum));
    }

    #[test]
    fn personal_crisis_raises_emotional_stakes() {
        let result = Classifier.classify("I need urgent advice about a personal crisis");
        assert!(result.emotional_stakes > 0.3);
    }

    #[test]
    fn empty_input_has_zero_density() {
        let result = Classifier.classify("   ");
        assert_eq!(result.semantic_density, 0.0);
    }
}
