//! CFIA diagnostics: generation status and growth analysis. Logging/CLI
//! only, never consulted by [`super::process_lesson_addition`] or
//! [`super::update_karma_pool`] (design §4.5).

use crate::constants::cfia as c;
use crate::types::CFIAState;

/// Snapshot of the current generation's health.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStatus {
    /// Seconds since `generation_birth_ts`.
    pub age_seconds: u64,
    /// `age_seconds / 60`.
    pub age_minutes: u64,
    /// Shards still needed before the next AIIQ milestone, floored at 0.
    pub files_remaining: f64,
    /// `karma_pool > 0`.
    pub alive: bool,
    /// `total_files >= factorial(aiiq)`.
    pub successful: bool,
}

/// Report the current generation's age and distance from its next milestone.
#[must_use]
pub fn generation_status(state: &CFIAState, now: u64) -> GenerationStatus {
    let age_seconds = now.saturating_sub(state.generation_birth_ts);
    let capacity = c::factorial(state.aiiq);
    #[allow(clippy::cast_precision_loss)]
    let current = f64::from(state.total_files);
    GenerationStatus {
        age_seconds,
        age_minutes: age_seconds / 60,
        files_remaining: (capacity - current).max(0.0),
        alive: state.karma_pool > 0.0,
        successful: current >= capacity,
    }
}

/// Linear-vs-exponential file-growth comparison and capacity efficiency.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthAnalysis {
    /// Files that would exist under a naive one-per-increment linear model
    /// over the same elapsed generation time, using the observed rate.
    pub linear_projection: f64,
    /// `factorial(aiiq)`, the actual capacity ceiling for this generation.
    pub exponential_capacity: f64,
    /// `total_files / factorial(aiiq)`, in `[0, 1]` (clamped).
    pub capacity_efficiency: f64,
}

/// Compare the generation's observed linear growth rate against its
/// factorial capacity ceiling.
#[must_use]
pub fn growth_analysis(state: &CFIAState, now: u64) -> GrowthAnalysis {
    let age_seconds = now.saturating_sub(state.generation_birth_ts).max(1);
    #[allow(clippy::cast_precision_loss)]
    let total_files = f64::from(state.total_files);
    let rate_per_hour = total_files / (age_seconds as f64 / 3600.0);
    let exponential_capacity = c::factorial(state.aiiq);

    GrowthAnalysis {
        linear_projection: rate_per_hour,
        exponential_capacity,
        capacity_efficiency: (total_files / exponential_capacity).clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileInfo;

    #[test]
    fn fresh_generation_reports_files_remaining() {
        let state = CFIAState::default();
        let status = generation_status(&state, 100);
        assert_eq!(status.age_seconds, 100);
        assert!(status.alive);
        assert!(!status.successful);
        assert!(status.files_remaining > 0.0);
    }

    #[test]
    fn full_generation_is_successful() {
        let mut state = CFIAState::default();
        state.total_files = 2;
        state.file_registry.insert(
            "file_1".to_string(),
            FileInfo { file_id: "file_1".to_string(), size_kb: 1.0, content_count: 1, last_accessed: 0, split_count: 0 },
        );
        state.file_registry.insert(
            "file_2".to_string(),
            FileInfo { file_id: "file_2".to_string(), size_kb: 1.0, content_count: 1, last_accessed: 0, split_count: 0 },
        );
        let status = generation_status(&state, 0);
        assert!(status.successful);
        assert_eq!(status.files_remaining, 0.0);
    }

    #[test]
    fn growth_analysis_efficiency_is_clamped() {
        let mut state = CFIAState::default();
        state.total_files = 5;
        let analysis = growth_analysis(&state, 10);
        assert!(analysis.capacity_efficiency <= 1.0);
    }
}
