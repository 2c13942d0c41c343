//! Constrained Factorial Intelligence Architecture: file-granularity and
//! generational-lifecycle management (design §4.5).

mod diagnostics;

pub use diagnostics::{generation_status, growth_analysis, GenerationStatus, GrowthAnalysis};

use crate::constants::cfia as c;
use crate::error::{Error, Result};
use crate::types::{CFIAState, FileInfo};

/// What the caller (storage layer) must do with a lesson just accepted by
/// CFIA's bookkeeping. CFIA only decides; it never touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonOutcome {
    /// Append the lesson to this existing (or freshly registered) shard.
    Appended {
        /// Target shard id.
        shard_id: String,
    },
    /// `source_shard`'s contents must be partitioned oldest-first into two
    /// halves and written to the two new shard ids; the source shard is
    /// then deleted.
    Split {
        /// Shard being split.
        source_shard: String,
        /// The two new shard ids, in order.
        new_shards: (String, String),
    },
}

/// Register a brand-new lesson addition and return what the storage layer
/// must do (design §4.5, "Lesson addition algorithm").
pub fn process_lesson_addition(state: &mut CFIAState, lesson_kb: f64, now: u64) -> Result<LessonOutcome> {
    let granularity_threshold = state.current_threshold_kb * c::granularity_factor(state.aiiq);

    let target_id = select_target_shard(state);

    let Some(target_id) = target_id else {
        let shard_id = next_shard_id(state);
        state.file_registry.insert(
            shard_id.clone(),
            FileInfo { file_id: shard_id.clone(), size_kb: lesson_kb, content_count: 1, last_accessed: now, split_count: 0 },
        );
        sync_total_files(state);
        maybe_increment_aiiq(state, now);
        return Ok(LessonOutcome::Appended { shard_id });
    };

    let target = state
        .file_registry
        .get(&target_id)
        .ok_or_else(|| Error::Inconsistency(format!("selected shard {target_id} vanished")))?
        .clone();

    if target.size_kb + lesson_kb > granularity_threshold {
        let first = next_shard_id(state);
        let second = format!("file_{}", shard_ordinal(&first) + 1);

        state.file_registry.remove(&target_id);
        let half_size = (target.size_kb + lesson_kb) / 2.0;
        let half_count = target.content_count.div_ceil(2).max(1);
        for (id, count) in [(first.clone(), half_count), (second.clone(), target.content_count + 1 - half_count)] {
            state.file_registry.insert(
                id.clone(),
                FileInfo { file_id: id, size_kb: half_size, content_count: count, last_accessed: now, split_count: target.split_count + 1 },
            );
        }
        sync_total_files(state);
        maybe_increment_aiiq(state, now);
        return Ok(LessonOutcome::Split { source_shard: target_id, new_shards: (first, second) });
    }

    if let Some(entry) = state.file_registry.get_mut(&target_id) {
        entry.size_kb += lesson_kb;
        entry.content_count += 1;
        entry.last_accessed = now;
    }
    sync_total_files(state);
    maybe_increment_aiiq(state, now);
    Ok(LessonOutcome::Appended { shard_id: target_id })
}

/// `total_files` tracks the registered-shard count directly, so it stays
/// consistent across creations and splits rather than drifting via ad hoc increments.
fn sync_total_files(state: &mut CFIAState) {
    state.total_files = state.file_registry.len() as u32;
}

/// Select the shard with the most available space below `current_threshold_kb`
/// (the split-decision threshold is checked separately, after selection).
fn select_target_shard(state: &CFIAState) -> Option<String> {
    state
        .file_registry
        .values()
        .map(|info| (info.file_id.clone(), state.current_threshold_kb - info.size_kb))
        .filter(|(_, available_space)| *available_space > 0.0)
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(file_id, _)| file_id)
}

fn shard_ordinal(shard_id: &str) -> u32 {
    shard_id.strip_prefix("file_").and_then(|n| n.parse().ok()).unwrap_or(0)
}

fn next_shard_id(state: &CFIAState) -> String {
    let max_ordinal = state.file_registry.keys().map(|id| shard_ordinal(id)).max().unwrap_or(0);
    format!("file_{}", max_ordinal + 1)
}

fn maybe_increment_aiiq(state: &mut CFIAState, now: u64) {
    let capacity = c::factorial(state.aiiq);
    #[allow(clippy::cast_precision_loss)]
    if f64::from(state.total_files) < capacity {
        return;
    }
    increment_aiiq(state, now);
}

fn increment_aiiq(state: &mut CFIAState, now: u64) {
    state.aiiq += 1;
    state.current_threshold_kb = if state.aiiq == 2 {
        c::BASE_THRESHOLD_KB
    } else {
        state.current_threshold_kb + state.current_threshold_kb * (1.0 / f64::from(state.aiiq)) * state.alpha
    };
    state.last_aiiq_increment_ts = now;
}

/// Apply a karma delta to the generational karma pool, floored at 0, and
/// check for generational death/success (design §4.5).
pub fn update_karma_pool(state: &mut CFIAState, karma_delta: f64, now: u64) -> bool {
    state.karma_pool = (state.karma_pool + karma_delta).max(0.0);

    let capacity = c::factorial(state.aiiq);
    #[allow(clippy::cast_precision_loss)]
    let generational_success = f64::from(state.total_files) >= capacity;
    let generational_death = state.karma_pool <= 0.0;

    if generational_death || generational_success {
        reset_generation(state, now);
        true
    } else {
        false
    }
}

fn reset_generation(state: &mut CFIAState, now: u64) {
    state.aiiq += 1;
    state.generation_seed = rand::random();
    state.karma_pool = c::INITIAL_KARMA_POOL;
    state.current_threshold_kb = if state.aiiq == 2 {
        c::BASE_THRESHOLD_KB
    } else {
        state.current_threshold_kb + state.current_threshold_kb * (1.0 / f64::from(state.aiiq)) * state.alpha
    };
    state.generation_birth_ts = now;
    state.last_aiiq_increment_ts = now;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_lesson_creates_a_fresh_shard() {
        let mut state = CFIAState::default();
        let outcome = process_lesson_addition(&mut state, 10.0, 0).unwrap();
        assert_eq!(outcome, LessonOutcome::Appended { shard_id: "file_1".to_string() });
        assert_eq!(state.file_registry.len(), 1);
    }

    #[test]
    fn oversized_lesson_triggers_split() {
        let mut state = CFIAState::default();
        state.file_registry.insert(
            "file_1".to_string(),
            FileInfo { file_id: "file_1".to_string(), size_kb: 374.0, content_count: 5, last_accessed: 0, split_count: 0 },
        );
        let outcome = process_lesson_addition(&mut state, 5.0, 1).unwrap();
        match outcome {
            LessonOutcome::Split { source_shard, new_shards } => {
                assert_eq!(source_shard, "file_1");
                assert_eq!(new_shards, ("file_2".to_string(), "file_3".to_string()));
            }
            LessonOutcome::Appended { .. } => panic!("expected a split"),
        }
        assert_eq!(state.total_files, 2);
    }

    #[test]
    fn reaching_factorial_capacity_increments_aiiq() {
        let mut state = CFIAState::default();
        state.total_files = 1;
        state.file_registry.insert(
            "file_1".to_string(),
            FileInfo { file_id: "file_1".to_string(), size_kb: 374.0, content_count: 5, last_accessed: 0, split_count: 0 },
        );
        process_lesson_addition(&mut state, 5.0, 2).unwrap();
        assert_eq!(state.aiiq, 3);
    }

    #[test]
    fn karma_pool_floors_at_zero_and_resets_on_death() {
        let mut state = CFIAState::default();
        let reset = update_karma_pool(&mut state, -500.0, 10);
        assert!(reset);
        assert_eq!(state.karma_pool, c::INITIAL_KARMA_POOL);
        assert_eq!(state.aiiq, 3);
    }
}
