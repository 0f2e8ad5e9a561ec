//! Interactive questions on the terminal.

use std::{
    fmt::Display,
    io::{BufRead, Write},
    str::FromStr,
};

/// Asks questions on `output` and reads the answers from `input`.
#[derive(Debug)]
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R, W> Prompter<R, W>
where
    R: BufRead,
    W: Write,
{
    /// Creates a new prompter.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consumes the prompter, returning the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Asks until the answer parses and passes `validate`.
    ///
    /// An empty answer, or the end of input, selects `default`. Surrounding whitespace is kept
    /// unless the answer only parses without it, so passwords are taken as typed.
    pub fn ask<T, F>(&mut self, question: &str, default: T, validate: F) -> eyre::Result<T>
    where
        T: FromStr + Display,
        T::Err: Display,
        F: Fn(&T) -> Result<(), &'static str>,
    {
        loop {
            write!(self.output, "{question} ({default}): ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(default)
            }

            let answer = line.trim_end_matches(['\n', '\r']);
            if answer.trim().is_empty() {
                return Ok(default)
            }

            match answer.parse::<T>().or_else(|err| answer.trim().parse::<T>().map_err(|_| err)) {
                Ok(value) => match validate(&value) {
                    Ok(()) => return Ok(value),
                    Err(reason) => writeln!(self.output, "Error: {reason}")?,
                },
                Err(err) => writeln!(self.output, "Error: {err}")?,
            }
        }
    }
}
