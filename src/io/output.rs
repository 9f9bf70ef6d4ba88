use crate::core::{CheckReport, Severity};
use colored::*;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Terminal,
}

pub trait OutputWriter {
    fn write_reports(&mut self, reports: &[CheckReport]) -> anyhow::Result<()>;
}

pub fn create_writer(writer: Box<dyn Write>, format: OutputFormat) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_reports(&mut self, reports: &[CheckReport]) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(reports)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_report(&mut self, report: &CheckReport) -> anyhow::Result<()> {
        writeln!(self.writer, "{} {}", "Module".bold(), report.module.display())?;

        if report.findings.is_empty() {
            writeln!(self.writer, "  {}", "no findings".green())?;
            writeln!(self.writer)?;
            return Ok(());
        }

        for finding in &report.findings {
            let label = match finding.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow().bold(),
            };
            let position = if finding.location.line > 0 {
                format!("{}:{}", finding.location.file.display(), finding.location.line)
            } else {
                finding.location.file.display().to_string()
            };
            writeln!(
                self.writer,
                "  {label}[{}] {}: {}",
                finding.code.as_str().cyan(),
                position,
                finding.message()
            )?;
        }

        writeln!(
            self.writer,
            "  {} error(s), {} warning(s)",
            report.summary.errors, report.summary.warnings
        )?;
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_reports(&mut self, reports: &[CheckReport]) -> anyhow::Result<()> {
        for report in reports {
            self.write_report(report)?;
        }
        Ok(())
    }
}
