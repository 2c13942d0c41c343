//! Gold-standard generation and judge-quality scoring (design §4.4).

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::constants::arbiter as c;
use crate::error::Result;

/// The "lighter/cheaper" LLM the Arbiter calls out-of-band for reference
/// answers and quality judging. Distinct from the main generation client so
/// a caller can point it at a smaller/cheaper model.
#[async_trait]
pub trait JudgeLlm: Send + Sync {
    /// Complete `user_prompt` under `system_prompt`, with the given sampling
    /// knobs. Implementations should apply their own timeout.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String>;
}

const GOLD_STANDARD_SYSTEM_PROMPT: &str =
    "You are Arbiter, a reference oracle. Given a user prompt, produce the single best, \
     most concise correct answer. Do not explain your reasoning; return only the answer.";

const JUDGE_SYSTEM_PROMPT: &str =
    "You are a strict grader. Compare the candidate response to the reference answer and \
     return a single number between 0 and 1 (or 0 and 10) indicating how well the candidate \
     matches the reference in correctness and completeness. Return only the number.";

/// Bounded FIFO cache keyed by `(user_prompt, counterpart)` pairs.
pub struct FifoCache {
    entries: std::collections::HashMap<(String, String), String>,
    order: VecDeque<(String, String)>,
    capacity: usize,
}

impl FifoCache {
    /// Build an empty cache bounded at `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { entries: std::collections::HashMap::new(), order: VecDeque::new(), capacity }
    }

    /// Look up a cached value.
    #[must_use]
    pub fn get(&self, key: &(String, String)) -> Option<&String> {
        self.entries.get(key)
    }

    /// Insert a value, evicting the oldest entry if at capacity.
    pub fn insert(&mut self, key: (String, String), value: String) {
        if !self.entries.contains_key(&key) {
            self.order.push_back(key.clone());
            if self.order.len() > self.capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.entries.remove(&oldest);
                }
            }
        }
        self.entries.insert(key, value);
    }
}

impl Default for FifoCache {
    fn default() -> Self {
        Self::new(c::MAX_CACHE_ENTRIES)
    }
}

/// Generate (or look up) the gold-standard reference answer for `user_prompt`.
///
/// On any client failure, falls back to a coarse rule-based answer so the
/// Arbiter's scoring path never blocks on the judge LLM being unavailable.
pub async fn generate_gold_standard(
    client: &dyn JudgeLlm,
    cache: &mut FifoCache,
    user_prompt: &str,
    luna_response: &str,
) -> String {
    let key = (user_prompt.to_string(), luna_response.to_string());
    if let Some(cached) = cache.get(&key) {
        return cached.clone();
    }

    let generated = client
        .complete(GOLD_STANDARD_SYSTEM_PROMPT, user_prompt, 0.3, 200)
        .await
        .map(|s| s.trim().trim_matches('"').to_string())
        .unwrap_or_else(|_| fallback_gold_standard(user_prompt));

    cache.insert(key, generated.clone());
    generated
}

/// Rule-based gold standard for simple, recognizable request shapes.
#[must_use]
pub fn fallback_gold_standard(user_prompt: &str) -> String {
    let lower = user_prompt.to_lowercase();
    if lower.contains("hi") || lower.contains("hello") || lower.contains("hey") {
        "Hello! How can I help?".to_string()
    } else if lower.contains("who are you") || lower.contains("what are you") {
        "I'm Luna, a resource-aware assistant.".to_string()
    } else if lower.contains("machine learning") || lower.contains("algorithm") {
        "A precise technical explanation of the concept, with concrete examples.".to_string()
    } else if lower.contains("meaning of life") || lower.contains("existential") {
        "A thoughtful philosophical reflection acknowledging the question's depth.".to_string()
    } else if lower.contains("anxious") || lower.contains("help") {
        "A warm, supportive response that validates the feeling and offers concrete help.".to_string()
    } else {
        "A clear, correct, and appropriately concise answer.".to_string()
    }
}

/// Score `candidate` against `gold_standard`, returning a value in `[0, 1]`.
///
/// On failure or an unparseable response, falls back to
/// [`crate::constants::arbiter::JUDGE_QUALITY_FALLBACK`].
pub async fn judge_quality(
    client: &dyn JudgeLlm,
    cache: &mut FifoCache,
    candidate: &str,
    gold_standard: &str,
) -> f64 {
    let key = (candidate.to_string(), gold_standard.to_string());
    if let Some(cached) = cache.get(&key) {
        return cached.parse().unwrap_or(c::JUDGE_QUALITY_FALLBACK);
    }

    let prompt = format!("Reference answer:\n{gold_standard}\n\nCandidate answer:\n{candidate}");
    let score = match client.complete(JUDGE_SYSTEM_PROMPT, &prompt, 0.0, 10).await {
        Ok(text) => parse_judge_score(&text).unwrap_or(c::JUDGE_QUALITY_FALLBACK),
        Err(_) => c::JUDGE_QUALITY_FALLBACK,
    };

    cache.insert(key, score.to_string());
    score
}

fn parse_judge_score(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let first_number: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let value: f64 = if first_number.is_empty() {
        trimmed.parse().ok()?
    } else {
        first_number.parse().ok()?
    };
    Some(if value > 1.0 { (value / 10.0).clamp(0.0, 1.0) } else { value.clamp(0.0, 1.0) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_0_to_1_scale() {
        assert_eq!(parse_judge_score("0.8"), Some(0.8));
    }

    #[test]
    fn parses_0_to_10_scale() {
        assert_eq!(parse_judge_score("8"), Some(0.8));
    }

    #[test]
    fn unparseable_text_returns_none() {
        assert_eq!(parse_judge_score("not a number"), None);
    }

    #[test]
    fn fifo_cache_evicts_oldest() {
        let mut cache = FifoCache::new(2);
        cache.insert(("a".into(), "1".into()), "x".into());
        cache.insert(("b".into(), "1".into()), "y".into());
        cache.insert(("c".into(), "1".into()), "z".into());
        assert!(cache.get(&("a".into(), "1".into())).is_none());
        assert!(cache.get(&("c".into(), "1".into())).is_some());
    }
}
