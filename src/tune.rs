//! Line-driven control loop for `negapost tune`.
//!
//! Each input line is one event. A control change renders once, from the
//! original, before the next line is read:
//!
//! ```text
//! exposure 1.3      → re-render
//! mode bw           → re-render
//! show              → print parameters
//! export            → write current render to the default output
//! export print.tif  → write current render to print.tif
//! reset             → neutral controls, re-render
//! quit
//! ```

use crate::controls::Control;
use crate::imaging::ImageBackend;
use crate::output;
use crate::session::Session;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum TuneCommand {
    Set(Control, String),
    Show,
    Reset,
    Export(Option<PathBuf>),
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("missing value for {0}")]
    MissingValue(&'static str),
}

/// Parse one input line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<TuneCommand>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "show" => TuneCommand::Show,
        "reset" => TuneCommand::Reset,
        "help" | "?" => TuneCommand::Help,
        "quit" | "exit" | "q" => TuneCommand::Quit,
        "export" | "save" => {
            TuneCommand::Export((!rest.is_empty()).then(|| PathBuf::from(rest)))
        }
        _ => {
            let control =
                Control::from_name(word).ok_or_else(|| ParseError::Unknown(word.to_string()))?;
            if rest.is_empty() {
                return Err(ParseError::MissingValue(control.name()));
            }
            TuneCommand::Set(control, rest.to_string())
        }
    };
    Ok(Some(command))
}

fn write_lines<W: Write>(out: &mut W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Drive `session` from `input` until `quit` or end of input.
///
/// Parse and export failures are reported on `out` and the loop continues.
/// Only I/O errors on `input`/`out` end it early.
pub fn run_tune<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    out: &mut W,
    backend: &dyn ImageBackend,
    default_output: &Path,
) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };
        debug!(?command, "tune command");

        match command {
            TuneCommand::Set(control, raw) => {
                session.set_control(control, raw.as_str());
                writeln!(
                    out,
                    "{}",
                    output::format_control_change(control, &raw, session.params())
                )?;
            }
            TuneCommand::Show => write_lines(out, &output::format_params(session.params()))?,
            TuneCommand::Reset => {
                session.reset_controls();
                writeln!(out, "Controls reset")?;
            }
            TuneCommand::Export(path) => {
                let path = path.as_deref().unwrap_or(default_output);
                match session.export(path, backend) {
                    Ok(()) => writeln!(out, "{}", output::format_export(path, session.rendered()))?,
                    Err(e) => writeln!(out, "{}", e)?,
                }
            }
            TuneCommand::Help => write_lines(out, &output::format_tune_help())?,
            TuneCommand::Quit => break,
        }
        out.flush()?;
    }
    Ok(())
}
