//! Output buffer with tail-only prompt search.
//!
//! Only the last `search_depth` bytes are searched for the prompt, which
//! keeps prompt detection cheap on large outputs such as running configs.

use regex::Regex;
use vte::{Parser, Perform};

/// Collects printable text from a VT byte stream, dropping escape sequences.
struct TextCollector<'a> {
    out: &'a mut String,
}

impl Perform for TextCollector<'_> {
    fn print(&mut self, c: char) {
        self.out.push(c);
    }

    fn execute(&mut self, byte: u8) {
        // Carriage returns and other controls are dropped.
        if matches!(byte, b'\n' | b'\t') {
            self.out.push(byte as char);
        }
    }
}

/// Buffer for accumulating device output and searching its tail.
pub struct PatternBuffer {
    text: String,
    parser: Parser,
    search_depth: usize,
}

impl PatternBuffer {
    /// Create a new buffer searching the last `search_depth` bytes.
    pub fn new(search_depth: usize) -> Self {
        Self {
            text: String::with_capacity(4096),
            parser: Parser::new(),
            search_depth,
        }
    }

    /// Extend the buffer with raw channel data, stripping ANSI escapes.
    pub fn extend(&mut self, data: &[u8]) {
        let mut collector = TextCollector {
            out: &mut self.text,
        };
        self.parser.advance(&mut collector, data);
    }

    /// Search only the tail of the buffer.
    pub fn tail_contains(&self, pattern: &Regex) -> bool {
        let mut start = self.text.len().saturating_sub(self.search_depth);
        while !self.text.is_char_boundary(start) {
            start += 1;
        }
        pattern.is_match(&self.text[start..])
    }

    /// Take ownership of the buffer contents and reset.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}
