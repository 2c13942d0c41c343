//! Optional memory/retrieval (CARMA) boundary (design §6.3).
//!
//! Unlike [`crate::personality::PersonalityProvider`], absence here has
//! first-class meaning: the Orchestrator holds `Option<Arc<dyn MemoryProvider>>`
//! rather than defaulting to a no-op implementation, because "no provider
//! wired in" and "provider wired in but returned nothing" fall back
//! differently (built-in template prompt vs. an empty fragment list).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One retrieved memory fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryFragment {
    /// Fragment text.
    pub content: String,
    /// Stable fragment identifier.
    pub id: String,
    /// When the fragment was recorded.
    pub timestamp: i64,
}

/// Result of a memory-provider retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRetrieval {
    /// Provider-defined pipeline stage that produced this result.
    pub stage: String,
    /// A ready-to-inject prompt fragment, if the provider computed one.
    pub dynamic_prompt: Option<String>,
    /// Retrieved fragments, most relevant first.
    pub fragments: Vec<MemoryFragment>,
}

/// External semantic/vector memory (CARMA). Optional: the core falls back
/// to a built-in playbook/template prompt when no provider is configured.
#[async_trait]
pub trait MemoryProvider: Send + Sync {
    /// Retrieve memory fragments relevant to `query`.
    async fn retrieve(&self, query: &str) -> Result<MemoryRetrieval>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubProvider;

    #[async_trait]
    impl MemoryProvider for StubProvider {
        async fn retrieve(&self, query: &str) -> Result<MemoryRetrieval> {
            Ok(MemoryRetrieval {
                stage: "stub".to_string(),
                dynamic_prompt: None,
                fragments: vec![MemoryFragment { content: query.to_string(), id: "1".to_string(), timestamp: 0 }],
            })
        }
    }

    #[tokio::test]
    async fn stub_provider_echoes_query() {
        let provider = StubProvider;
        let result = provider.retrieve("hello").await.unwrap();
        assert_eq!(result.fragments[0].content, "hello");
    }
}
