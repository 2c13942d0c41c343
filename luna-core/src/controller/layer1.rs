//! Layer I — Pre-Inference Budget Officer (design §4.3).

use crate::constants::controller as c;
use crate::types::ResourceState;

/// Output of [`conduct`]: resource classification, go/no-go, and the
/// scarcity directive to splice into the system prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer1Output {
    /// Pool-pressure classification.
    pub resource_state: ResourceState,
    /// Whether a response may be attempted at all.
    pub should_respond: bool,
    /// Scarcity directive block to append to the system prompt.
    pub directive: String,
}

/// Classify the pool into a [`ResourceState`] (design §4.3 step 1).
#[must_use]
pub fn classify_resource_state(pool: i64) -> ResourceState {
    if pool <= c::DEBT_THRESHOLD {
        ResourceState::Debt
    } else if pool < c::CRITICAL_THRESHOLD {
        ResourceState::Critical
    } else if pool < c::SCARCE_THRESHOLD {
        ResourceState::Scarce
    } else if pool < c::STABLE_THRESHOLD {
        ResourceState::Stable
    } else {
        ResourceState::Wealthy
    }
}

/// Pre-inference budget gate and prompt conditioning (design §4.3 Layer I).
#[must_use]
pub fn conduct(pool: i64, allow_debt_response: bool, base_prompt: &str) -> Layer1Output {
    let resource_state = classify_resource_state(pool);
    let should_respond = pool > 0 || (resource_state == ResourceState::Debt && allow_debt_response);

    let directive = match resource_state {
        ResourceState::Wealthy => "Explore freely; no length constraint.".to_string(),
        ResourceState::Stable => "Respond normally.".to_string(),
        ResourceState::Scarce => "Keep the response to 15 words or fewer.".to_string(),
        ResourceState::Critical => "Keep the response to 8-10 words or fewer.".to_string(),
        ResourceState::Debt => "Keep the response to 5-8 words or fewer.".to_string(),
    };
    let directive = format!("{base_prompt}\n\n[SCARCITY DIRECTIVE: {directive}] (pool={pool})");

    Layer1Output { resource_state, should_respond, directive }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debt_pool_blocks_response_by_default() {
        let out = conduct(0, false, "base");
        assert_eq!(out.resource_state, ResourceState::Debt);
        assert!(!out.should_respond);
    }

    #[test]
    fn debt_pool_can_allow_response_when_policy_permits() {
        let out = conduct(0, true, "base");
        assert!(out.should_respond);
    }

    #[test]
    fn wealthy_pool_always_responds() {
        let out = conduct(10_000, false, "base");
        assert_eq!(out.resource_state, ResourceState::Wealthy);
        assert!(out.should_respond);
    }
}
