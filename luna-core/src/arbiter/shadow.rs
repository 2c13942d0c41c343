//! Shadow Score ledger: observational recording, never fed back into the
//! response path (design §4.4, §3.1).

use crate::types::ShadowScore;

const TRAIT_KEYWORDS: &[(&str, &[&str])] = &[
    ("openness", &["curious", "imagine", "creative", "explore", "novel"]),
    ("conscientiousness", &["plan", "organize", "schedule", "careful", "detail"]),
    ("extraversion", &["party", "friends", "social", "talk", "people"]),
    ("agreeableness", &["help", "kind", "please", "thank", "sorry"]),
    ("neuroticism", &["anxious", "worried", "stressed", "afraid", "nervous"]),
];

/// Guess a Big-Five trait from keyword hits in `prompt`; `"unknown"` if none match.
#[must_use]
pub fn guess_trait(prompt: &str) -> String {
    let lower = prompt.to_lowercase();
    TRAIT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map_or_else(|| "unknown".to_string(), |(name, _)| (*name).to_string())
}

/// Classify whether a response favored empathy (low-penalty, human-facing)
/// or efficiency (strict token economy), from the same values already
/// computed for karma/utility.
#[must_use]
pub fn classify_choice(utility: f64, karma_delta: f64, tte_used: u32, max_tte: u32) -> (bool, bool) {
    let r = if max_tte == 0 { 0.0 } else { f64::from(tte_used) / f64::from(max_tte) };
    let is_empathy_choice = utility >= 0.6 && karma_delta >= 0.0 && r > 0.5;
    let is_efficiency_choice = r <= 0.5 && karma_delta >= 0.0;
    (is_empathy_choice, is_efficiency_choice)
}

/// Build a [`ShadowScore`] record for this response.
#[must_use]
pub fn record(
    prompt: &str,
    utility: f64,
    karma_delta: f64,
    tte_used: u32,
    max_tte: u32,
    timestamp: i64,
) -> ShadowScore {
    let (is_empathy_choice, is_efficiency_choice) = classify_choice(utility, karma_delta, tte_used, max_tte);
    ShadowScore {
        timestamp,
        is_empathy_choice,
        is_efficiency_choice,
        utility,
        karma_delta,
        tte_used,
        max_tte,
        trait_guess: guess_trait(prompt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmatched_prompt_guesses_unknown() {
        assert_eq!(guess_trait("zzz qqq"), "unknown");
    }

    #[test]
    fn anxious_prompt_guesses_neuroticism() {
        assert_eq!(guess_trait("I'm feeling really anxious"), "neuroticism");
    }
}
