use std::fmt::Display;
use std::io::{self, BufRead, Write};

use tracing::trace;

/// Line-oriented console used by the menu.
///
/// Reading returns `None` once the input is exhausted.
pub struct Terminal<R, W> {
    input: R,
    output: W,
    mask_passwords: bool,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W, mask_passwords: bool) -> Self {
        Self {
            input,
            output,
            mask_passwords,
        }
    }

    pub fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    /// Prints `prompt` without a newline and reads one line, minus its line ending.
    pub fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            trace!("Input exhausted at prompt {:?}", prompt);
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Reads a password, without echo when masking is enabled.
    pub fn prompt_password(&mut self, prompt: &str) -> io::Result<Option<String>> {
        if !self.mask_passwords {
            return self.prompt(prompt);
        }
        self.output.flush()?;
        match rpassword::prompt_password(prompt) {
            Ok(password) => Ok(Some(password)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }
}
