//! Ad hoc context-wrapping for library errors at the CLI boundary (design
//! §9.1: "library crates use `thiserror`, the CLI binary uses `anyhow`").

use anyhow::{Context, Result};

/// The three documented exit codes (design §6.5), beyond success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Input could not be sanitized into something processable.
    InputError = 1,
    /// A state file could not be read or written.
    IoError = 2,
    /// The LLM backend was unreachable after retries.
    BackendUnavailable = 3,
}

/// Map a `luna_core::Error` to the exit code its policy table (§7) assigns.
#[must_use]
pub fn exit_code_for(error: &luna_core::Error) -> ExitCode {
    match error {
        luna_core::Error::InputValidation(_) => ExitCode::InputError,
        luna_core::Error::BackendUnavailable(_) | luna_core::Error::BackendMalformed(_) => {
            ExitCode::BackendUnavailable
        }
        luna_core::Error::StateIOError { .. } | luna_core::Error::Serialization(_) => ExitCode::IoError,
        luna_core::Error::ParseError(_)
        | luna_core::Error::CFIASplitError { .. }
        | luna_core::Error::Inconsistency(_) => ExitCode::IoError,
    }
}

/// Wrap a core-crate `Result` with human-facing context, preserving the
/// ability to recover an exit code from the underlying error.
pub trait WithCliContext<T> {
    /// Attach `msg` as anyhow context.
    fn cli_context(self, msg: &str) -> Result<T>;
}

impl<T> WithCliContext<T> for luna_core::Result<T> {
    fn cli_context(self, msg: &str) -> Result<T> {
        self.with_context(|| msg.to_string())
    }
}
