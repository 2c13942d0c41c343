//! Context-tag extraction for lesson storage/retrieval (design §4.4).

use crate::constants::context_tags::TAG_KEYWORDS;

/// Extract the coarse keyword tags present in `prompt` (substring match,
/// case-insensitive). Intentionally a coarse tagger, not an NLP classifier.
#[must_use]
pub fn extract_context_tags(prompt: &str) -> Vec<String> {
    let lower = prompt.to_lowercase();
    TAG_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(tag, _)| (*tag).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_is_tagged() {
        let tags = extract_context_tags("hey there!");
        assert!(tags.contains(&"greeting".to_string()));
    }

    #[test]
    fn untagged_prompt_yields_empty() {
        let tags = extract_context_tags("zzz qqq xyz");
        assert!(tags.is_empty());
    }
}
