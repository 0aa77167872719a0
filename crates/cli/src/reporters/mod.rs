//! Output formats for analysis results.

mod json;
mod text;

pub use json::JsonReporter;
pub use text::TextReporter;

use clap::ValueEnum;
use orchestrator::Reporter;
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Json,
    Text,
}

impl Format {
    pub fn reporter<W: Write + Send + 'static>(self, writer: W) -> Box<dyn Reporter> {
        match self {
            Self::Json => Box::new(JsonReporter::new(writer)),
            Self::Text => Box::new(TextReporter::new(writer)),
        }
    }
}
