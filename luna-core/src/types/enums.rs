//! Closed sum types (design §9: "sum types over class hierarchies").

use serde::{Deserialize, Serialize};

/// RVC's coarse classification of user input (design §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Greetings, acknowledgments, short interjections.
    Trivial,
    /// Short factual asks.
    Low,
    /// Everyday questions with some nuance.
    Moderate,
    /// Multi-step or emotionally loaded questions.
    High,
    /// Deep technical or philosophical questions.
    Critical,
    /// The most demanding inputs RVC recognizes.
    Maximum,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Tier::Trivial => "trivial",
            Tier::Low => "low",
            Tier::Moderate => "moderate",
            Tier::High => "high",
            Tier::Critical => "critical",
            Tier::Maximum => "maximum",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trivial" => Ok(Tier::Trivial),
            "low" => Ok(Tier::Low),
            "moderate" => Ok(Tier::Moderate),
            "high" => Ok(Tier::High),
            "critical" => Ok(Tier::Critical),
            "maximum" => Ok(Tier::Maximum),
            other => Err(format!("unrecognized tier: {other}")),
        }
    }
}

/// Pool-pressure classification driving prompt conditioning and logit bias
/// (design §4.3 Layer I).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceState {
    /// Pool comfortably large; no constraints applied.
    Wealthy,
    /// Pool healthy; normal operation.
    Stable,
    /// Pool getting low; brevity encouraged.
    Scarce,
    /// Pool nearly exhausted; strong brevity pressure.
    Critical,
    /// Pool at or below zero.
    Debt,
}

/// Outcome of an age-transition check for a single request (design §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeTransition {
    /// No age change this request.
    Stable,
    /// Karma quota met with sufficient efficiency; age incremented.
    AgedUp,
    /// Survival conditions failed; age decremented.
    Regressed,
}

/// Letter grade from [`crate::rvc::validate_response_efficiency`], consumed
/// by the Arbiter's karma-delta fast path (design §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EfficiencyGrade {
    /// `efficiency >= 0.9`.
    A,
    /// `efficiency >= 0.8`.
    B,
    /// `efficiency >= 0.7`.
    C,
    /// `efficiency >= 0.6`.
    D,
    /// `efficiency < 0.6`.
    F,
}

impl std::fmt::Display for EfficiencyGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = match self {
            EfficiencyGrade::A => 'A',
            EfficiencyGrade::B => 'B',
            EfficiencyGrade::C => 'C',
            EfficiencyGrade::D => 'D',
            EfficiencyGrade::F => 'F',
        };
        f.write_char(c)
    }
}

use std::fmt::Write as _;

/// Human-readable maturity ladder derived from learned-efficiency ratio
/// (design §4.2 diagnostic operations).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationalMaturity {
    /// `ratio < 0.5`.
    Novice,
    /// `ratio < 0.8`.
    Intermediate,
    /// `ratio < 1.0`.
    Advanced,
    /// `ratio < 1.5`.
    Expert,
    /// `ratio >= 1.5`.
    Master,
}

impl std::fmt::Display for OperationalMaturity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OperationalMaturity::Novice => "Novice",
            OperationalMaturity::Intermediate => "Intermediate",
            OperationalMaturity::Advanced => "Advanced",
            OperationalMaturity::Expert => "Expert",
            OperationalMaturity::Master => "Master",
        };
        f.write_str(s)
    }
}
