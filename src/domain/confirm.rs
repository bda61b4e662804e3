use std::io::{self, BufRead, Write};

use crate::error::{Error, Result};

/// Asks the operator a yes/no question before a destructive step.
pub trait Confirm {
    /// `true` only for an explicit affirmative answer.
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Writes the question to `output` and reads one line from `input`.
/// Only `y` (any case, surrounding whitespace ignored) counts as yes.
pub struct LineConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl LineConfirm<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Confirm for LineConfirm<R, W> {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        write!(self.output, "{} (y/n) ", question).map_err(Error::Prompt)?;
        self.output.flush().map_err(Error::Prompt)?;

        let mut answer = String::new();
        self.input.read_line(&mut answer).map_err(Error::Prompt)?;

        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }
}
