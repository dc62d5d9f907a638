use anyhow::{Context, Result};
use std::fmt;
use std::io::{self, BufRead, Write};

/// The user stopped answering. `Cancelled` is the clean variant that exits 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    Interrupted,
    Cancelled,
}

impl Interruption {
    pub fn exit_code(self) -> i32 {
        match self {
            Interruption::Interrupted => 1,
            Interruption::Cancelled => 0,
        }
    }
}

impl fmt::Display for Interruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interruption::Interrupted => write!(f, "Process interrupted. Exiting..."),
            Interruption::Cancelled => write!(f, "Process interrupted by user. Exiting..."),
        }
    }
}

impl std::error::Error for Interruption {}

/// Turns an interruption into a clean cancellation; other errors pass through.
pub fn cancel_cleanly(err: anyhow::Error) -> anyhow::Error {
    match err.downcast_ref::<Interruption>() {
        Some(Interruption::Interrupted) => Interruption::Cancelled.into(),
        _ => err,
    }
}

pub fn interruption_of(err: &anyhow::Error) -> Option<Interruption> {
    err.downcast_ref::<Interruption>().copied()
}

/// Source of answers to interactive questions.
pub trait Prompter {
    /// Shows `question` and returns the trimmed answer.
    /// End of input is reported as `Interruption::Interrupted`.
    fn ask(&mut self, question: &str) -> Result<String>;
}

pub struct StdinPrompter {
    stdin: io::Stdin,
}

impl StdinPrompter {
    pub fn new() -> Self {
        Self { stdin: io::stdin() }
    }
}

impl Default for StdinPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for StdinPrompter {
    fn ask(&mut self, question: &str) -> Result<String> {
        let mut stderr = io::stderr().lock();
        write!(stderr, "{}", question).context("failed to write prompt")?;
        stderr.flush().context("failed to write prompt")?;

        let mut line = String::new();
        let read = self
            .stdin
            .lock()
            .read_line(&mut line)
            .context("failed to read from stdin")?;
        if read == 0 {
            writeln!(stderr).ok();
            return Err(Interruption::Interrupted.into());
        }
        Ok(line.trim().to_string())
    }
}
