use std::io::{self, Write};

use colored::Colorize;
use itertools::Itertools;

use crate::{
    constants::{DOTS_PER_LINE, FAILURE_SEPARATOR, SUMMARY_SEPARATOR},
    core::{
        domain::{CommandResult, ReportMode, RunSummary},
        traits::reporter::Reporter,
    },
};

/// Prints `- <command>: ✓ (Time: 0.25s)` for every finished command.
#[derive(Debug)]
pub struct LineReporter<W> {
    out: W,
    color: bool,
}

impl<W: Write> LineReporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn glyph(&self, succeeded: bool) -> String {
        match (succeeded, self.color) {
            (true, true) => "✓".green().to_string(),
            (false, true) => "✗".red().to_string(),
            (true, false) => "✓".to_string(),
            (false, false) => "✗".to_string(),
        }
    }
}

impl<W: Write + Send> Reporter for LineReporter<W> {
    fn started(&mut self, total: usize) -> io::Result<()> {
        write_header(&mut self.out, total)
    }

    fn command_finished(&mut self, result: &CommandResult) -> io::Result<()> {
        let glyph = self.glyph(result.succeeded);
        writeln!(
            self.out,
            "- {}: {} (Time: {}s)",
            result.command,
            glyph,
            result.duration_ms as f64 / 1000.0
        )?;
        self.out.flush()
    }

    fn finished(&mut self, summary: &RunSummary) -> io::Result<()> {
        write_summary(&mut self.out, summary)
    }
}

/// Prints one dot per finished command, wrapping lines every
/// `DOTS_PER_LINE` dots.
#[derive(Debug)]
pub struct DotReporter<W> {
    out: W,
    dots: usize,
}

impl<W: Write> DotReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, dots: 0 }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Reporter for DotReporter<W> {
    fn started(&mut self, total: usize) -> io::Result<()> {
        write_header(&mut self.out, total)
    }

    fn command_finished(&mut self, _result: &CommandResult) -> io::Result<()> {
        self.out.write_all(b".")?;
        self.dots += 1;
        if self.dots % DOTS_PER_LINE == 0 {
            self.out.write_all(b"\n")?;
        }
        self.out.flush()
    }

    fn finished(&mut self, summary: &RunSummary) -> io::Result<()> {
        write_summary(&mut self.out, summary)
    }
}

/// Reporter selected at runtime from the configured mode.
#[derive(Debug)]
pub enum AnyReporter<W> {
    Line(LineReporter<W>),
    Dots(DotReporter<W>),
}

impl<W: Write> AnyReporter<W> {
    pub fn new(mode: ReportMode, out: W, color: bool) -> Self {
        match mode {
            ReportMode::Line => AnyReporter::Line(LineReporter::new(out, color)),
            ReportMode::Dots => AnyReporter::Dots(DotReporter::new(out)),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        match self {
            AnyReporter::Line(reporter) => reporter.into_inner(),
            AnyReporter::Dots(reporter) => reporter.into_inner(),
        }
    }
}

impl<W: Write + Send> Reporter for AnyReporter<W> {
    fn started(&mut self, total: usize) -> io::Result<()> {
        match self {
            AnyReporter::Line(reporter) => reporter.started(total),
            AnyReporter::Dots(reporter) => reporter.started(total),
        }
    }

    fn command_finished(&mut self, result: &CommandResult) -> io::Result<()> {
        match self {
            AnyReporter::Line(reporter) => reporter.command_finished(result),
            AnyReporter::Dots(reporter) => reporter.command_finished(result),
        }
    }

    fn finished(&mut self, summary: &RunSummary) -> io::Result<()> {
        match self {
            AnyReporter::Line(reporter) => reporter.finished(summary),
            AnyReporter::Dots(reporter) => reporter.finished(summary),
        }
    }
}

fn write_header<W: Write>(out: &mut W, total: usize) -> io::Result<()> {
    writeln!(out, "Running {} tests:", total)?;
    out.flush()
}

/// Failure outputs (if any), then the counts and the elapsed time.
pub fn write_summary<W: Write>(out: &mut W, summary: &RunSummary) -> io::Result<()> {
    if summary.failure_count > 0 {
        write!(out, "\n\n{}\n", FAILURE_SEPARATOR)?;
        let failures = summary
            .failure_outputs
            .iter()
            .map(|(command, output)| format!("--> {}\n\n{}", command, output))
            .join(&format!("\n\n{}\n", FAILURE_SEPARATOR));
        out.write_all(failures.as_bytes())?;
    }

    write!(
        out,
        "\n\n{}\nSUCCESSFUL TESTS: {}\nFAILED TESTS: {}\nTime: {} secs.\n",
        SUMMARY_SEPARATOR,
        summary.success_count,
        summary.failure_count,
        summary.elapsed_secs()
    )?;
    out.flush()
}
