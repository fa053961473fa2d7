use std::io::{BufRead, Write};
use std::sync::OnceLock;

use anyhow::Result;
use log::{debug, warn};
use regex::Regex;
use thiserror::Error;

/// What the player asked for at a scenario prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// 0-based option index, guaranteed in range for the scenario.
    Choose(usize),
    SaveRequested,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("input closed while waiting for a selection")]
    Closed,
}

fn selection_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\s*(?:(?P<save>s|save)|(?P<number>\d+))\s*$")
            .expect("selection pattern is valid")
    })
}

/// Interpret one raw line. `None` means the line should be re-prompted.
pub fn parse_selection(line: &str, option_count: usize) -> Option<Selection> {
    let caps = selection_pattern().captures(line)?;
    if caps.name("save").is_some() {
        return Some(Selection::SaveRequested);
    }
    let number: usize = caps.name("number")?.as_str().parse().ok()?;
    if (1..=option_count).contains(&number) {
        Some(Selection::Choose(number - 1))
    } else {
        None
    }
}

/// Ask until the player gives a valid selection. Only a closed input stream
/// or a failed write escapes this loop.
pub fn read_selection<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    option_count: usize,
) -> Result<Selection> {
    loop {
        write!(
            output,
            "\nSelect option (1-{option_count}) or 'S' to Save & Quit: "
        )?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(InputError::Closed.into());
        }

        match parse_selection(&line, option_count) {
            Some(selection) => {
                debug!("Selection: {selection:?}");
                return Ok(selection);
            }
            None => {
                warn!("Rejected input: {:?}", line.trim());
                writeln!(
                    output,
                    "Invalid input. Please enter 1-{option_count} or 'S'."
                )?;
            }
        }
    }
}

/// Free-form line for menus. EOF reads as an empty answer.
pub fn read_line<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<String> {
    write!(output, "{prompt}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
