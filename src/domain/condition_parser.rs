//! Condition expression parser.
//!
//! Character-level parser turning strategy-file expressions into typed
//! conditions, with a character offset in every error. Grammar:
//!
//! ```text
//! condition := indicator [ "(" param { "," param } ")" ] op [ rhs ]
//! op        := "<" | ">" | "<=" | ">=" | "==" | "!="
//! rhs       := number | reference-identifier
//! ```
//!
//! Examples: `RSI(14) < 30`, `SMA(50) > Close`, `Bollinger Bands(20, 2) < Close`,
//! `MACD > 0`. An omitted RHS compares against the literal 0.

use crate::domain::condition::{Comparison, Condition, Target};
use crate::domain::error::{ParseError, SigtraderError};
use crate::domain::indicator::Indicator;

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(ch) if ch == expected => {
                self.advance();
                Ok(())
            }
            Some(ch) => Err(ParseError {
                message: format!("expected '{}', found '{}'", expected, ch),
                position: self.pos,
            }),
            None => Err(ParseError {
                message: format!("expected '{}', found end of input", expected),
                position: self.pos,
            }),
        }
    }

    /// Indicator name: everything up to a '(' or an operator character,
    /// trimmed. Names may contain spaces and '%' ("Williams %R").
    fn parse_name(&mut self) -> Result<String, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch == '(' || is_operator_char(ch) {
                break;
            }
            self.advance();
        }
        let name = self.input[start..self.pos].trim_end().to_string();
        if name.is_empty() {
            return Err(ParseError {
                message: "expected indicator name".to_string(),
                position: start,
            });
        }
        Ok(name)
    }

    fn parse_number(&mut self) -> Result<f64, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        if matches!(self.peek(), Some('-') | Some('+')) {
            self.advance();
        }
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() || ch == '.' {
                self.advance();
            } else {
                break;
            }
        }
        let text = &self.input[start..self.pos];
        text.parse::<f64>().map_err(|_| ParseError {
            message: format!("expected number, found '{}'", self.peek_word_at(start)),
            position: start,
        })
    }

    fn parse_params(&mut self) -> Result<Vec<f64>, ParseError> {
        self.skip_whitespace();
        if self.peek() != Some('(') {
            return Ok(Vec::new());
        }
        self.advance();
        let mut params = vec![self.parse_number()?];
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.advance();
                    params.push(self.parse_number()?);
                }
                _ => break,
            }
        }
        self.expect_char(')')?;
        Ok(params)
    }

    fn parse_operator(&mut self) -> Result<Comparison, SigtraderError> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if is_operator_char(ch) {
                self.advance();
            } else {
                break;
            }
        }
        let text = &self.input[start..self.pos];
        if text.is_empty() {
            return Err(ParseError {
                message: "expected comparison operator".to_string(),
                position: start,
            }
            .into());
        }
        text.parse()
    }

    /// RHS: a number becomes a literal target, an identifier a reference,
    /// and end of input the literal-0 default.
    fn parse_target(&mut self) -> Result<Target, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            None => Ok(Target::Value(0.0)),
            Some(ch) if ch.is_ascii_digit() || ch == '-' || ch == '+' || ch == '.' => {
                Ok(Target::Value(self.parse_number()?))
            }
            Some(_) => {
                let start = self.pos;
                while let Some(ch) = self.peek() {
                    if ch.is_alphanumeric() || ch == '_' || ch == '%' {
                        self.advance();
                    } else {
                        break;
                    }
                }
                let ident = &self.input[start..self.pos];
                if ident.is_empty() {
                    return Err(ParseError {
                        message: format!("expected value or reference, found '{}'", self.peek_word_at(start)),
                        position: start,
                    });
                }
                Ok(Target::Reference(ident.to_string()))
            }
        }
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            None => Ok(()),
            Some(ch) => Err(ParseError {
                message: format!("unexpected trailing input starting at '{}'", ch),
                position: self.pos,
            }),
        }
    }

    fn peek_word_at(&self, pos: usize) -> String {
        self.input[pos..]
            .chars()
            .take_while(|c| !c.is_whitespace())
            .collect()
    }
}

fn is_operator_char(ch: char) -> bool {
    matches!(ch, '<' | '>' | '=' | '!')
}

/// Parse one condition expression.
pub fn parse_condition(input: &str) -> Result<Condition, SigtraderError> {
    let mut parser = Parser::new(input);
    let name = parser.parse_name()?;
    let params = parser.parse_params()?;
    let indicator = Indicator::from_spec(&name, &params)?;
    let comparison = parser.parse_operator()?;
    let target = parser.parse_target()?;
    parser.expect_end()?;
    Ok(Condition {
        indicator,
        comparison,
        target,
    })
}

/// Parse a bare indicator request such as `SMA(50)` or `Bollinger Bands(20, 2)`.
pub fn parse_indicator(input: &str) -> Result<Indicator, SigtraderError> {
    let mut parser = Parser::new(input);
    let name = parser.parse_name()?;
    let params = parser.parse_params()?;
    let indicator = Indicator::from_spec(&name, &params)?;
    parser.expect_end()?;
    Ok(indicator)
}
