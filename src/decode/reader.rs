use std::io::BufRead;

use tracing::warn;

use crate::options::DebugLevel;
use crate::text::string::count_quotes;
use crate::{Error, Result};

/// Character cursor over a line-oriented input.
///
/// Lines are read lazily and handed out without their terminators; empty
/// lines are skipped. The line counter is 1-based and counts every physical
/// line consumed, so positions in diagnostics match the source file.
pub struct StreamReader<R> {
    input: R,
    debug_level: DebugLevel,
    raw: String,
    line: Vec<char>,
    pos: usize,
    line_no: usize,
    buffered: bool,
    exhausted: bool,
}

impl<R: BufRead> StreamReader<R> {
    pub fn new(input: R, debug_level: DebugLevel) -> Self {
        Self {
            input,
            debug_level,
            raw: String::new(),
            line: Vec::new(),
            pos: 0,
            line_no: 0,
            buffered: false,
            exhausted: false,
        }
    }

    pub fn line(&self) -> usize {
        self.line_no
    }

    pub fn debug_level(&self) -> DebugLevel {
        self.debug_level
    }

    /// Whether another character is available, pulling the next non-empty
    /// line when the current one is used up.
    pub fn has_next(&mut self) -> Result<bool> {
        if self.buffered {
            return Ok(true);
        }
        if self.exhausted {
            return Ok(false);
        }
        loop {
            self.raw.clear();
            if self.input.read_line(&mut self.raw)? == 0 {
                self.exhausted = true;
                return Ok(false);
            }
            self.line_no += 1;
            let text = self.raw.trim_end_matches(['\n', '\r']);
            if text.is_empty() {
                continue;
            }
            if self.debug_level.satisfies_warning() {
                let quotes = count_quotes(text);
                if quotes % 2 != 0 {
                    warn!(line = self.line_no, quotes, "line has an odd number of quotation marks");
                }
            }
            self.line.clear();
            self.line.extend(text.chars());
            self.pos = 0;
            self.buffered = true;
            return Ok(true);
        }
    }

    pub fn next(&mut self) -> Result<char> {
        if !self.has_next()? {
            return Err(Error::end_of_stream(self.line_no));
        }
        let ch = self.line[self.pos];
        self.pos += 1;
        if self.pos >= self.line.len() {
            self.buffered = false;
        }
        Ok(ch)
    }

    /// The next character without consuming it.
    pub fn view(&mut self) -> Result<char> {
        if !self.has_next()? {
            return Err(Error::end_of_stream(self.line_no));
        }
        Ok(self.line[self.pos])
    }

    /// Consumes exactly `count` characters.
    pub fn next_n(&mut self, count: usize) -> Result<String> {
        let mut out = String::with_capacity(count);
        for _ in 0..count {
            out.push(self.next()?);
        }
        Ok(out)
    }
}
