//! Lesson retrieval: tag-overlap lookup of prior lessons for prompt
//! injection (design §4.4 "Retrieval").

use crate::arbiter::tags::extract_context_tags;
use crate::types::Lesson;

/// Return the single most-relevant prior lesson for `prompt`, by context-tag
/// overlap. Ties go to the most recent lesson: `lessons` must be scanned
/// newest-first, and only a strictly-greater overlap count replaces the
/// current best match, so the first lesson reached with that overlap count
/// wins.
#[must_use]
pub fn retrieve_best_match<'a>(lessons: &'a [Lesson], prompt: &str) -> Option<&'a Lesson> {
    let query_tags = extract_context_tags(prompt);
    if query_tags.is_empty() {
        return None;
    }

    let mut newest_first: Vec<&Lesson> = lessons.iter().collect();
    newest_first.sort_by_key(|lesson| std::cmp::Reverse(lesson.timestamp));

    let mut best: Option<(&Lesson, usize)> = None;
    for lesson in newest_first {
        let overlap = overlap_count(&query_tags, &lesson.context_tags);
        if overlap == 0 {
            continue;
        }
        match best {
            Some((_, best_overlap)) if overlap <= best_overlap => {}
            _ => best = Some((lesson, overlap)),
        }
    }
    best.map(|(lesson, _)| lesson)
}

fn overlap_count(query_tags: &[String], lesson_tags: &[String]) -> usize {
    query_tags.iter().filter(|tag| lesson_tags.contains(tag)).count()
}

/// Optional enrichment over the tag-overlap retriever: cross-fragment
/// scoring against an external memory/mycelium graph. No default
/// implementation is provided or required — the tag-overlap retriever
/// above is the mandatory fallback and the one that's actually tested.
pub trait MyceliumRetriever: Send + Sync {
    /// Score `lesson` against `prompt` using cross-fragment context beyond
    /// tag overlap; higher is more relevant.
    fn score(&self, prompt: &str, lesson: &Lesson) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(tags: &[&str], timestamp: i64) -> Lesson {
        Lesson {
            original_prompt: String::new(),
            suboptimal_response: String::new(),
            gold_standard: String::new(),
            utility_score: 0.0,
            karma_delta: 0.0,
            timestamp,
            context_tags: tags.iter().map(|s| (*s).to_string()).collect(),
            lingua_calc_depth: 0,
            lingua_calc_gain: 0.0,
        }
    }

    #[test]
    fn no_tags_in_query_yields_no_match() {
        let lessons = vec![lesson(&["greeting"], 1)];
        assert!(retrieve_best_match(&lessons, "zzz qqq").is_none());
    }

    #[test]
    fn picks_greatest_overlap() {
        let lessons = vec![lesson(&["greeting"], 1), lesson(&["greeting", "food"], 2)];
        let best = retrieve_best_match(&lessons, "hi, want some pizza?").unwrap();
        assert_eq!(best.timestamp, 2);
    }

    #[test]
    fn tie_goes_to_most_recent() {
        let lessons = vec![lesson(&["greeting"], 5), lesson(&["greeting"], 9), lesson(&["greeting"], 1)];
        let best = retrieve_best_match(&lessons, "hello!").unwrap();
        assert_eq!(best.timestamp, 9);
    }
}
