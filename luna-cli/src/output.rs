//! Human/JSON output rendering (design §6.5 `--format` flag), adapted from
//! the teacher's `Output`/`OutputFormat` pair, trimmed to the two formats
//! the specification actually names.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

/// Selects how a command's result is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table/text.
    Human,
    /// Pretty-printed JSON, for scripting.
    Json,
}

/// Anything renderable in both formats.
pub trait Output {
    /// Render the human-readable form.
    fn write_human<W: Write>(&self, writer: W) -> anyhow::Result<()>;

    /// Render as pretty JSON. The default uses `Serialize`; types that don't
    /// derive it must override this.
    fn write_json<W: Write>(&self, writer: W) -> anyhow::Result<()>
    where
        Self: Serialize,
    {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

impl OutputFormat {
    /// Render `data` to `writer` in this format.
    pub fn write_output<T: Output + Serialize, W: Write>(&self, data: &T, writer: W) -> anyhow::Result<()> {
        match self {
            OutputFormat::Human => data.write_human(writer),
            OutputFormat::Json => data.write_json(writer),
        }
    }

    /// Render `data` to stdout in this format.
    pub fn print_output<T: Output + Serialize>(&self, data: &T) -> anyhow::Result<()> {
        self.write_output(data, io::stdout())
    }
}
