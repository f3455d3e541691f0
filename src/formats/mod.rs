//! Output formats for a computed [`Chart`]
//!
//! JSON is the flat serde record of the chart; text is a streaming report
//! written through `std::io::Write`.

pub mod text_writer;

use std::io::Write;
use std::str::FromStr;

use crate::core::assembler::Chart;
use crate::core::error::{ChartError, Result};

pub use text_writer::TextWriter;

/// Supported renderings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ChartError::invalid_input(format!(
                "unknown output format '{}' (expected text or json)",
                other
            ))),
        }
    }
}

/// Pretty-printed JSON
pub fn render_json(chart: &Chart) -> Result<String> {
    Ok(serde_json::to_string_pretty(chart)?)
}

/// Plain-text report
pub fn render_text(chart: &Chart) -> Result<String> {
    let mut writer = TextWriter::new(Vec::new());
    writer.write_chart(chart)?;
    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

/// Render in `format` straight to `out`
pub fn write_chart<W: Write>(chart: &Chart, format: OutputFormat, mut out: W) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, chart)?;
            writeln!(out)?;
        }
        OutputFormat::Text => TextWriter::new(out).write_chart(chart)?,
    }
    Ok(())
}
