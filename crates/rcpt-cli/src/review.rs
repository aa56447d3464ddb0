//! Line-based prompts for reviewing candidate fields.

use std::io::{self, BufRead, Write};

use console::style;
use rust_decimal::Decimal;

use rcpt_core::coerce_amount;

/// Input that clears an optional field.
pub const CLEAR: &str = "-";

/// Prompts over any reader and writer, stdin and stdout in practice.
pub struct Reviewer<R, W> {
    input: R,
    output: W,
}

impl Reviewer<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Reviewer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// One trimmed line, or `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }

    /// Free text. Enter keeps `current`, `-` clears it.
    pub fn text(&mut self, label: &str, current: &str) -> io::Result<String> {
        write!(self.output, "{} [{}]: ", style(label).bold(), current)?;
        self.output.flush()?;

        Ok(match self.read_line()? {
            None => current.to_string(),
            Some(line) if line.is_empty() => current.to_string(),
            Some(line) if line == CLEAR => String::new(),
            Some(line) => line,
        })
    }

    /// Money amount. Enter keeps `current`, `-` clears it, anything
    /// unparseable asks again.
    pub fn amount(&mut self, label: &str, current: Option<Decimal>) -> io::Result<Option<Decimal>> {
        let shown = current.map(|v| format!("{:.2}", v)).unwrap_or_default();
        loop {
            write!(self.output, "{} [{}]: ", style(label).bold(), shown)?;
            self.output.flush()?;

            let line = match self.read_line()? {
                None => return Ok(current),
                Some(line) => line,
            };
            if line.is_empty() {
                return Ok(current);
            }
            if line == CLEAR {
                return Ok(None);
            }
            match coerce_amount(&line) {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(
                    self.output,
                    "{} Not an amount: {}",
                    style("✗").red(),
                    line
                )?,
            }
        }
    }

    /// Pick one option by number or exact name. Enter keeps the option at `default`.
    pub fn choose(&mut self, label: &str, options: &[String], default: usize) -> io::Result<String> {
        let default = default.min(options.len().saturating_sub(1));
        writeln!(self.output, "{}", style(label).bold())?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, option)?;
        }

        let fallback = options.get(default).cloned().unwrap_or_default();
        loop {
            write!(self.output, "Choice [{}]: ", default + 1)?;
            self.output.flush()?;

            let line = match self.read_line()? {
                None => return Ok(fallback),
                Some(line) => line,
            };
            if line.is_empty() {
                return Ok(fallback);
            }

            let by_number = line
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| options.get(i));
            let by_name = options.iter().find(|o| o.eq_ignore_ascii_case(&line));

            match by_number.or(by_name) {
                Some(choice) => return Ok(choice.clone()),
                None => writeln!(self.output, "{} No such option: {}", style("✗").red(), line)?,
            }
        }
    }

    /// Yes/no question. Anything but an explicit yes is no.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        write!(self.output, "{} [y/N]: ", question)?;
        self.output.flush()?;

        Ok(matches!(
            self.read_line()?.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("y") | Some("yes")
        ))
    }
}
