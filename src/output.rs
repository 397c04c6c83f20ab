//! Output formatting for bootcli.
//!
//! Command output goes to stdout, diagnostics to stderr, once, after the run
//! has finished.
//!
//! - Text mode: `Error [CODE]: message`, one diagnostic per line
//! - JSON mode: one NDJSON record per diagnostic
//! - Quiet: warnings and notices are dropped, errors are always printed

use crate::diagnostics::{Diagnostic, Severity};
use crate::dispatch::CommandOutput;
use crate::runner::RunReport;
use std::io::{self, Write};

/// How to render a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// Write command output and diagnostics of `report`.
pub fn write_report<O: Write, E: Write>(
    report: &RunReport,
    options: OutputOptions,
    out: &mut O,
    err: &mut E,
) -> io::Result<()> {
    if let Some(output) = &report.output {
        write_output(output, out)?;
    }

    for diagnostic in report.diagnostics.iter() {
        if options.quiet && diagnostic.severity != Severity::Error {
            continue;
        }
        write_diagnostic(diagnostic, options.json, err)?;
    }

    out.flush()?;
    err.flush()
}

fn write_output<W: Write>(output: &CommandOutput, out: &mut W) -> io::Result<()> {
    match output {
        CommandOutput::Empty => Ok(()),
        CommandOutput::Text(text) if text.is_empty() => Ok(()),
        CommandOutput::Text(text) => writeln!(out, "{}", text),
        CommandOutput::Json(value) => {
            let rendered = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
            writeln!(out, "{}", rendered)
        }
    }
}

fn write_diagnostic<W: Write>(diagnostic: &Diagnostic, json: bool, err: &mut W) -> io::Result<()> {
    if json {
        let line = diagnostic.to_ndjson_line().map_err(io::Error::other)?;
        writeln!(err, "{}", line)
    } else {
        writeln!(err, "{}", diagnostic)
    }
}
