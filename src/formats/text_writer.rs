//! Streaming plain-text chart report
//!
//! Writes directly to any `std::io::Write`. Section order and every list
//! order are fixed, so identical charts produce identical bytes.

use std::io::{self, Write};

use crate::core::assembler::Chart;
use crate::core::gates::gate_name;
use crate::core::models::{ActivationSet, Side};

/// Writes a [`Chart`] as a human-readable report.
pub struct TextWriter<W: Write> {
    writer: W,
}

impl<W: Write> TextWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write the full report
    pub fn write_chart(&mut self, chart: &Chart) -> io::Result<()> {
        self.write_summary(chart)?;
        writeln!(self.writer)?;
        self.write_side(Side::Personality, &chart.personality)?;
        writeln!(self.writer)?;
        self.write_side(Side::Design, &chart.design)?;
        writeln!(self.writer)?;
        self.write_bodygraph(chart)?;
        Ok(())
    }

    fn write_summary(&mut self, chart: &Chart) -> io::Result<()> {
        let w = &mut self.writer;
        writeln!(w, "Birth:       {}", chart.birth_instant.to_rfc3339())?;
        writeln!(w, "Design:      {}", chart.design_instant.to_rfc3339())?;
        writeln!(
            w,
            "Location:    {:.4}, {:.4}",
            chart.location.latitude, chart.location.longitude
        )?;
        writeln!(w, "Type:        {}", chart.energy_type)?;
        writeln!(w, "Strategy:    {}", chart.strategy)?;
        writeln!(w, "Authority:   {}", chart.authority)?;
        writeln!(w, "Definition:  {}", chart.definition.name())?;
        writeln!(w, "Profile:     {}", chart.profile.name())?;
        writeln!(w, "Cross:       {}", chart.incarnation_cross)?;
        writeln!(w, "Signature:   {}", chart.signature)?;
        writeln!(w, "Not-self:    {}", chart.not_self_theme)?;
        Ok(())
    }

    fn write_side(&mut self, side: Side, set: &ActivationSet) -> io::Result<()> {
        let title = match side {
            Side::Personality => "Personality",
            Side::Design => "Design",
        };
        writeln!(self.writer, "{}", title)?;
        for activation in set.iter() {
            writeln!(
                self.writer,
                "  {:<11} {:>5}  {:>9.4}°  {}",
                activation.body.name(),
                activation.notation(),
                activation.longitude.degrees(),
                gate_name(activation.gate).unwrap_or("")
            )?;
        }
        Ok(())
    }

    fn write_bodygraph(&mut self, chart: &Chart) -> io::Result<()> {
        let w = &mut self.writer;
        writeln!(w, "Defined centers: {}", or_none(&chart.defined_centers.to_string()))?;
        writeln!(w, "Open centers:    {}", or_none(&chart.open_centers().to_string()))?;
        writeln!(w, "Channels:")?;
        if chart.channels.is_empty() {
            writeln!(w, "  none")?;
        }
        for channel in &chart.channels {
            writeln!(
                w,
                "  {:<6} {} ({} - {})",
                channel.key(),
                channel.name,
                channel.center_a,
                channel.center_b
            )?;
        }
        let hanging: Vec<String> = chart.hanging_gates().iter().map(u8::to_string).collect();
        writeln!(w, "Hanging gates:   {}", or_none(&hanging.join(", ")))?;
        Ok(())
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

fn or_none(s: &str) -> &str {
    if s.is_empty() {
        "none"
    } else {
        s
    }
}
