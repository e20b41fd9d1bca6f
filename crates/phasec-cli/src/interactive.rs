//! Line-oriented terminal prompts for `phasec init`.
//!
//! [`Prompter`] is generic over its input and output so the same code runs
//! against stdin/stdout and against in-memory buffers in tests.

use std::io::{BufRead, Write};
use std::ops::RangeInclusive;

use anyhow::{Context, Result, bail};

use phasec_core::ClosedSet;

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Write a line of text to the output.
    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}").context("failed to write prompt")
    }

    fn ask(&mut self, label: &str, default: Option<&str>) -> Result<String> {
        match default {
            Some(d) if !d.is_empty() => write!(self.output, "{label} [{d}]: "),
            _ => write!(self.output, "{label}: "),
        }
        .context("failed to write prompt")?;
        self.output.flush().context("failed to flush prompt")?;

        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .context("failed to read answer")?;
        if n == 0 {
            bail!("input ended before all questions were answered");
        }
        let answer = line.trim();
        Ok(match default {
            Some(d) if answer.is_empty() => d.to_owned(),
            _ => answer.to_owned(),
        })
    }

    /// Free-form answer; an empty answer yields `default`.
    pub fn text(&mut self, label: &str, default: &str) -> Result<String> {
        self.ask(label, Some(default))
    }

    /// Free-form answer that may not be empty; asks again until it isn't.
    pub fn required_text(&mut self, label: &str) -> Result<String> {
        loop {
            let answer = self.ask(label, None)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
        }
    }

    /// Phase count within `range`, with a default for an empty answer.
    pub fn phase_count(
        &mut self,
        label: &str,
        range: RangeInclusive<i64>,
        default: i64,
    ) -> Result<i64> {
        let default = default.to_string();
        loop {
            let answer = self.ask(label, Some(&default))?;
            match answer.parse::<i64>() {
                Ok(n) if range.contains(&n) => return Ok(n),
                Ok(_) => self.say(&format!(
                    "Phases must be between {} and {}.",
                    range.start(),
                    range.end()
                ))?,
                Err(_) => self.say(&format!("'{answer}' is not a valid integer."))?,
            }
        }
    }

    /// Entries until an empty line. With `required`, at least one.
    pub fn list(&mut self, label: &str, required: bool) -> Result<Vec<String>> {
        let label = format!("{label} (leave blank to finish)");
        let mut items = Vec::new();
        loop {
            let entry = self.ask(&label, Some(""))?;
            if !entry.is_empty() {
                items.push(entry);
            } else if required && items.is_empty() {
                self.say("At least one entry is required.")?;
            } else {
                return Ok(items);
            }
        }
    }

    /// One member of a closed set, shown with its allowed values.
    pub fn choice<T: ClosedSet>(&mut self, label: &str, default: T) -> Result<T> {
        let choices = T::choices();
        let label = format!("{label} ({choices})");
        loop {
            let answer = self.ask(&label, Some(default.as_str()))?;
            match answer.parse::<T>() {
                Ok(v) => return Ok(v),
                Err(_) => self.say(&format!("Invalid choice. Pick one of: {choices}"))?,
            }
        }
    }
}
