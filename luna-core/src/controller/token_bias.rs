//! Injected token-bias lookups for Layer II (design §4.3, §9 Open Questions).
//!
//! The concrete verbose/"Nice-loop" token ids are model- and
//! tokenizer-specific, so they are resolved through this trait rather than
//! hardcoded. A caller without a wired tokenizer still gets a functioning,
//! if less aggressive, Layer II via [`NoOpTokenBiasTable`].

/// Capability for looking up the token ids a resource-constrained Layer II
/// wants to bias against.
pub trait TokenBiasTable: Send + Sync {
    /// Token ids considered "verbose filler" for this tokenizer.
    fn verbose_token_ids(&self) -> Vec<i64>;

    /// Token ids considered pathological "Nice-loop" markers for this
    /// tokenizer (e.g. the id(s) for the literal token "Nice", repeated
    /// filler punctuation).
    fn nice_loop_token_ids(&self) -> Vec<i64>;
}

/// Default no-op table: empty lookups, so Layer II runs without biasing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpTokenBiasTable;

impl TokenBiasTable for NoOpTokenBiasTable {
    fn verbose_token_ids(&self) -> Vec<i64> {
        Vec::new()
    }

    fn nice_loop_token_ids(&self) -> Vec<i64> {
        Vec::new()
    }
}
