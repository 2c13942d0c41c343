//! Personality provider and emergence-zone capability traits (design §6.2).
//!
//! Both read-only, local data sources: no I/O, so they're synchronous. Each
//! has a trivial default implementation so the core runs standalone without
//! a personality subsystem wired in.

use std::collections::HashMap;

/// Trait DNA: a name, an age, and a weighted personality profile.
#[derive(Debug, Clone, PartialEq)]
pub struct TraitDna {
    /// Display name.
    pub name: String,
    /// Generational age (mirrors [`crate::types::ExistentialState::age`]).
    pub age: u32,
    /// Named personality-trait weights.
    pub personality_weights: HashMap<String, f64>,
}

/// Voice/style constraints applied to generated text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VoiceProfile {
    /// How terse responses should be, in `[0, 1]`.
    pub concision: f64,
    /// Whether a strict register is enforced.
    pub strict: bool,
    /// Whether a corporate-speak filter is applied.
    pub corporate_filter: bool,
    /// Phrases to strip from generated text during post-processing.
    pub banned_phrases: Vec<String>,
}

/// Read-only source of trait DNA and voice profile.
pub trait PersonalityProvider: Send + Sync {
    /// The current trait DNA.
    fn trait_dna(&self) -> TraitDna;

    /// The current voice profile.
    fn voice_profile(&self) -> VoiceProfile;
}

/// Neutral default: unnamed generation-1 personality, no style constraints.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPersonalityProvider;

impl PersonalityProvider for DefaultPersonalityProvider {
    fn trait_dna(&self) -> TraitDna {
        TraitDna { name: "Luna".to_string(), age: 1, personality_weights: HashMap::new() }
    }

    fn voice_profile(&self) -> VoiceProfile {
        VoiceProfile::default()
    }
}

/// Curiosity analysis result for a piece of generated text.
#[derive(Debug, Clone, PartialEq)]
pub struct CuriosityAnalysis {
    /// Curiosity signal in `[0, 1]`.
    pub curiosity_score: f64,
    /// Which elements contributed to the score.
    pub curiosity_elements: Vec<String>,
    /// Bonus to fold into karma delta when a curiosity threshold is met.
    pub curiosity_reward: f64,
}

/// Optional emergence-zone bypass consulted by the Arbiter (design §4.4).
pub trait EmergenceZoneService: Send + Sync {
    /// Whether the current request is inside an emergence zone, and its name.
    fn is_in_emergence_zone(&self) -> (bool, Option<String>);

    /// Analyze `text` for curiosity-driven content.
    fn analyze_curiosity_response(&self, text: &str) -> CuriosityAnalysis;
}

/// No-op default: never in an emergence zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpEmergenceZoneService;

impl EmergenceZoneService for NoOpEmergenceZoneService {
    fn is_in_emergence_zone(&self) -> (bool, Option<String>) {
        (false, None)
    }

    fn analyze_curiosity_response(&self, _text: &str) -> CuriosityAnalysis {
        CuriosityAnalysis { curiosity_score: 0.0, curiosity_elements: Vec::new(), curiosity_reward: 0.0 }
    }
}
