//! Shared data model (design §3.1).

pub mod config;
pub mod enums;
pub mod structs;

pub use config::{EconomyConfig, LunaCoreConfig};
pub use enums::{AgeTransition, EfficiencyGrade, OperationalMaturity, ResourceState, Tier};
pub use structs::{
    ArbiterAssessment, CFIAState, ExistentialState, FileInfo, Lesson, ResponseHistoryEntry,
    ShadowScore, ShadowScoreSummary, TierAssessment,
};
