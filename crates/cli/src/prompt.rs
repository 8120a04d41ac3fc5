//! Interactive keyboard prompts.
//!
//! Malformed numbers are never fatal: the user is told and asked again.
//! Only a closed input stream ends collection early.

use std::io::{BufRead, Write};

use treasury_common::error::AppError;
use treasury_common::types::{Company, TreasuryParams};
use treasury_engine::input::{parse_number, parse_optional};

const RETRY_MESSAGE: &str = "Please enter a valid number.";

/// Line-oriented prompter over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask for a free-text answer.
    pub fn text(&mut self, prompt: &str) -> Result<String, AppError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "input closed before all answers were given",
            )));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Ask for a number until one parses.
    pub fn number(&mut self, prompt: &str) -> Result<f64, AppError> {
        loop {
            let answer = self.text(prompt)?;
            match parse_number(&answer) {
                Ok(value) => return Ok(value),
                Err(AppError::Parse { .. }) => writeln!(self.output, "{RETRY_MESSAGE}")?,
                Err(e) => return Err(e),
            }
        }
    }

    /// Ask for a number that may be left blank.
    pub fn optional_number(&mut self, prompt: &str) -> Result<Option<f64>, AppError> {
        loop {
            let answer = self.text(prompt)?;
            match parse_optional(&answer) {
                Ok(value) => return Ok(value),
                Err(AppError::Parse { .. }) => writeln!(self.output, "{RETRY_MESSAGE}")?,
                Err(e) => return Err(e),
            }
        }
    }

    /// Walk through every company field in order.
    pub fn collect(&mut self) -> Result<(Company, TreasuryParams), AppError> {
        writeln!(self.output, "=== BTC Treasury Company Analysis ===")?;

        let company = Company {
            name: self.text("Company Name: ")?,
            ticker: self.text("Ticker: ")?,
        };

        let params = TreasuryParams {
            shares_outstanding: self.number("Shares: ")?,
            share_price: self.number("Share Price (in USD): ")?,
            btc_nav: self.number("BTC NAV (in USD): ")?,
            fiat_debt: self.number("Fiat Debt (in USD): ")?,
            btc_yield_ytd: self.number("BTC Yield YTD %: ")?,
            months_since_start: self.number("YTD Months: ")?,
            current_mnav: self.number("Current mNAV: ")?,
            projected_yield: self.optional_number("Projected BTC Yield % (optional): ")?,
            risk_score: self.optional_number(
                "Risk Score (1 = neutral, >1 = riskier, <1 = safer, optional): ",
            )?,
        };

        Ok((company, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompter(script: &str) -> Prompter<&[u8], Vec<u8>> {
        Prompter::new(script.as_bytes(), Vec::new())
    }

    #[test]
    fn test_number_reprompts_until_valid() {
        let mut p = prompter("abc\n\n1,500\n");
        assert_eq!(p.number("Shares: ").unwrap(), 1500.0);

        let shown = String::from_utf8(p.output).unwrap();
        assert_eq!(shown.matches("Shares: ").count(), 3);
        assert_eq!(shown.matches(RETRY_MESSAGE).count(), 2);
    }

    #[test]
    fn test_optional_blank_is_none() {
        let mut p = prompter("\n");
        assert_eq!(p.optional_number("Risk: ").unwrap(), None);
    }

    #[test]
    fn test_optional_reprompts_on_garbage() {
        let mut p = prompter("high\n1.5\n");
        assert_eq!(p.optional_number("Risk: ").unwrap(), Some(1.5));
    }

    #[test]
    fn test_closed_input_is_error() {
        let mut p = prompter("");
        let err = p.number("Shares: ").unwrap_err();
        assert!(matches!(err, AppError::Io(ref e) if e.kind() == std::io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_text_strips_line_ending() {
        let mut p = prompter("Acme Corp\r\n");
        assert_eq!(p.text("Company Name: ").unwrap(), "Acme Corp");
    }
}
