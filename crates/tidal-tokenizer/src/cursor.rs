use std::str::Chars;

use text_size::{TextRange, TextSize};

pub(crate) const EOF_CHAR: char = '\0';

#[derive(Clone)]
pub(crate) struct Cursor<'a> {
    text: &'a str,
    chars: Chars<'a>,
    token_start: TextSize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { text, chars: text.chars(), token_start: TextSize::new(0) }
    }

    pub(crate) fn offset(&self) -> TextSize {
        TextSize::new((self.text.len() - self.chars.as_str().len()) as u32)
    }

    pub(crate) fn token_range(&self) -> TextRange {
        TextRange::new(self.token_start, self.offset())
    }

    pub(crate) fn token_text(&self) -> &'a str {
        &self.text[self.token_range()]
    }

    pub(crate) fn reset_token(&mut self) {
        self.token_start = self.offset();
    }

    /// Unconsumed text.
    pub(crate) fn rest(&self) -> &'a str {
        self.chars.as_str()
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    pub(crate) fn peek(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF_CHAR)
    }

    pub(crate) fn second(&self) -> char {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next().unwrap_or(EOF_CHAR)
    }

    pub(crate) fn matches(&self, c: char) -> bool {
        !self.is_eof() && self.peek() == c
    }

    pub(crate) fn advance(&mut self) -> char {
        self.chars.next().unwrap_or(EOF_CHAR)
    }

    pub(crate) fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    pub(crate) fn advance_while(&mut self, f: impl Fn(char) -> bool + Copy) {
        while !self.is_eof() && f(self.peek()) {
            self.advance();
        }
    }
}
