//! Command scripts.
//!
//! One command per line:
//!
//! ```text
//! # comment
//! A1: 5
//! B1: =A1*2
//! clear A1
//! print values
//! print texts
//! print size
//! ```
//!
//! Everything after `CELL:` (minus one leading space) is the cell text, so
//! `A1:` on its own sets the cell to the empty string. Cell names only need
//! to be A1 syntax here; whether they are in range is up to the sheet.

use std::io::Write;

use cellgrid_core::{Position, Sheet};
use tracing::debug;

use crate::error::{CliError, Result};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Set(Position, String),
    Clear(Position),
    Print(PrintTarget),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PrintTarget {
    Values,
    Texts,
    Size,
}

/// A command and the 1-based line it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub line: usize,
    pub command: Command,
}

/// Parse a whole script. Stops at the first malformed line.
pub fn parse_script(content: &str) -> Result<Vec<Statement>> {
    let mut statements = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim_end_matches('\r').trim_start();
        if text.trim().is_empty() || text.starts_with('#') {
            continue;
        }
        let command = parse_command(text).map_err(|message| CliError::Parse { line, message })?;
        statements.push(Statement { line, command });
    }
    Ok(statements)
}

fn parse_command(text: &str) -> std::result::Result<Command, String> {
    if let Some((head, rest)) = text.split_once(':')
        && let Some(pos) = Position::from_a1_unchecked(head.trim_end())
    {
        let value = rest.strip_prefix(' ').unwrap_or(rest);
        return Ok(Command::Set(pos, value.to_string()));
    }

    let mut words = text.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some("clear"), Some(cell), None) => Position::from_a1_unchecked(cell)
            .map(Command::Clear)
            .ok_or_else(|| format!("Invalid cell name: {}", cell)),
        (Some("print"), Some(target), None) => match target {
            "values" => Ok(Command::Print(PrintTarget::Values)),
            "texts" => Ok(Command::Print(PrintTarget::Texts)),
            "size" => Ok(Command::Print(PrintTarget::Size)),
            other => Err(format!("Unknown print target: {}", other)),
        },
        _ => Err(format!(
            "Expected 'CELL: TEXT', 'clear CELL' or 'print values|texts|size', got: {}",
            text
        )),
    }
}

/// Run statements against `sheet`, writing printed output to `out`.
///
/// Sheet errors do not stop the script; they are collected and returned.
pub fn run_script<W: Write>(
    sheet: &mut Sheet,
    statements: &[Statement],
    out: &mut W,
    separator: &str,
) -> Result<Vec<CliError>> {
    let mut failures = Vec::new();
    for statement in statements {
        let result = match &statement.command {
            Command::Set(pos, text) => sheet.set_cell(*pos, text),
            Command::Clear(pos) => sheet.clear_cell(*pos),
            Command::Print(target) => {
                print_sheet(sheet, *target, out, separator)?;
                Ok(())
            }
        };
        if let Err(source) = result {
            debug!(line = statement.line, error = %source, "command failed");
            failures.push(CliError::Sheet {
                line: statement.line,
                source,
            });
        }
    }
    Ok(failures)
}

pub fn print_sheet<W: Write>(
    sheet: &Sheet,
    target: PrintTarget,
    out: &mut W,
    separator: &str,
) -> Result<()> {
    match target {
        PrintTarget::Values => sheet.print_values_with(out, separator)?,
        PrintTarget::Texts => sheet.print_texts_with(out, separator)?,
        PrintTarget::Size => writeln!(out, "{}", sheet.printable_size())?,
    }
    Ok(())
}
