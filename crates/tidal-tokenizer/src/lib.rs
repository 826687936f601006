//! Pull-based tokenizer for tidal source text.
//!
//! Besides ordinary tokens the tokenizer produces zero-width layout tokens
//! (`INDENT`, `DEDENT`, `SAME_INDENT`, `INVALID_INDENT`) from the leading
//! whitespace of every line with content. All state lives in the
//! [`Tokenizer`] value, so independent tokenizers never share anything.

mod classes;
mod comment;
mod cursor;
mod indent;

use cursor::Cursor;
use indent::{IndentStack, Indentation};
pub use tidal_syntax::SyntaxKind;
use tidal_syntax::SyntaxKind::*;
use tidal_syntax::TextRange;

/// Lexical mode of the tokenizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LexMode {
    /// At the start of a line, before its indentation was decided.
    #[default]
    LineStart,
    Body,
    LineComment,
    BlockComment,
    DocComment,
    /// A block comment ran into the end of input; the diagnostic token is
    /// still owed.
    Unterminated,
    /// Closing the remaining indentation levels.
    DrainEof,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
    /// Mode the tokenizer was in while producing this token.
    pub state: LexMode,
}

impl Token {
    pub fn text<'a>(&self, text: &'a str) -> &'a str {
        &text[self.range]
    }
}

#[derive(Debug, Clone, Default)]
struct LexState {
    mode: LexMode,
    indent: IndentStack,
    /// Leading whitespace width of the current line, once it was scanned.
    width: Option<u32>,
}

/// Snapshot of a tokenizer, see [`Tokenizer::checkpoint`].
#[derive(Clone)]
pub struct Checkpoint<'a> {
    cursor: Cursor<'a>,
    state: LexState,
}

pub struct Tokenizer<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
    state: LexState,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, cursor: Cursor::new(text), state: LexState::default() }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn mode(&self) -> LexMode {
        self.state.mode
    }

    /// Number of currently open indentation levels.
    pub fn indent_depth(&self) -> usize {
        self.state.indent.depth()
    }

    pub fn checkpoint(&self) -> Checkpoint<'a> {
        Checkpoint { cursor: self.cursor.clone(), state: self.state.clone() }
    }

    pub fn restore(&mut self, checkpoint: Checkpoint<'a>) {
        self.cursor = checkpoint.cursor;
        self.state = checkpoint.state;
    }

    /// Produces the next token. Once the input is exhausted and every
    /// indentation level is closed this keeps returning `EOF`.
    pub fn next_token(&mut self) -> Token {
        loop {
            if let Some(token) = self.step() {
                return token;
            }
        }
    }

    fn step(&mut self) -> Option<Token> {
        match self.state.mode {
            LexMode::Done => Some(self.zero_width(EOF, LexMode::Done)),
            LexMode::DrainEof => {
                if self.state.indent.pop() {
                    Some(self.zero_width(DEDENT, LexMode::DrainEof))
                } else {
                    self.state.mode = LexMode::Done;
                    Some(self.zero_width(EOF, LexMode::DrainEof))
                }
            }
            LexMode::Unterminated => {
                self.state.mode = LexMode::DrainEof;
                Some(self.zero_width(UNTERMINATED_COMMENT, LexMode::Unterminated))
            }
            LexMode::LineStart => self.line_start(),
            LexMode::Body | LexMode::LineComment | LexMode::BlockComment | LexMode::DocComment => {
                self.body()
            }
        }
    }

    fn line_start(&mut self) -> Option<Token> {
        let width = match self.state.width {
            Some(width) => width,
            None => {
                let width = self.leading_whitespace();
                let consumed = !self.cursor.token_range().is_empty();

                if self.cursor.is_eof() {
                    self.state.mode = LexMode::DrainEof;
                } else {
                    self.state.width = Some(width);
                }

                if consumed {
                    return Some(self.token(WHITESPACE, LexMode::LineStart));
                }
                if self.cursor.is_eof() {
                    return None;
                }
                width
            }
        };

        if comment::is_plain_line_comment(self.cursor.rest()) {
            self.state.width = None;
            return Some(self.comment(LexMode::LineStart));
        }

        let kind = match self.state.indent.decide(width) {
            Indentation::Dedent => return Some(self.zero_width(DEDENT, LexMode::LineStart)),
            Indentation::Indent => INDENT,
            Indentation::Same => SAME_INDENT,
            Indentation::Invalid => {
                tracing::trace!(width, depth = self.state.indent.depth(), "invalid indentation");
                INVALID_INDENT
            }
        };

        self.state.mode = LexMode::Body;
        self.state.width = None;
        Some(self.zero_width(kind, LexMode::LineStart))
    }

    /// Consumes whitespace and blank lines, returning the width of the last
    /// line's indentation.
    fn leading_whitespace(&mut self) -> u32 {
        let mut width = 0;
        loop {
            match self.cursor.peek() {
                ' ' | '\t' => width += 1,
                '\n' | '\r' => width = 0,
                _ => return width,
            }
            self.cursor.advance();
        }
    }

    fn body(&mut self) -> Option<Token> {
        if self.cursor.is_eof() {
            self.state.mode = LexMode::DrainEof;
            return None;
        }

        let kind = match self.cursor.peek() {
            ' ' | '\t' | '\n' | '\r' => return Some(self.whitespace()),
            '#' => return Some(self.comment(LexMode::Body)),
            _ => self.syntax_kind(),
        };
        Some(self.token(kind, LexMode::Body))
    }

    fn whitespace(&mut self) -> Token {
        let mut newline = false;
        let width = {
            let mut width = 0;
            loop {
                match self.cursor.peek() {
                    ' ' | '\t' => width += 1,
                    '\n' | '\r' => {
                        newline = true;
                        width = 0;
                    }
                    _ => break width,
                }
                self.cursor.advance();
            }
        };

        if newline {
            if self.cursor.is_eof() {
                self.state.mode = LexMode::DrainEof;
            } else {
                self.state.mode = LexMode::LineStart;
                self.state.width = Some(width);
            }
        }
        self.token(WHITESPACE, LexMode::Body)
    }

    fn token(&mut self, kind: SyntaxKind, state: LexMode) -> Token {
        let range = self.cursor.token_range();
        self.cursor.reset_token();
        Token { kind, range, state }
    }

    fn zero_width(&mut self, kind: SyntaxKind, state: LexMode) -> Token {
        debug_assert!(self.cursor.token_range().is_empty());
        Token { kind, range: TextRange::empty(self.cursor.offset()), state }
    }

    fn syntax_kind(&mut self) -> SyntaxKind {
        match self.cursor.advance() {
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            '[' => LEFT_BRACKET,
            ']' => RIGHT_BRACKET,
            '{' => LEFT_BRACE,
            '}' => RIGHT_BRACE,
            ',' => COMMA,
            ';' => SEMICOLON,
            '"' => self.string(),
            '\'' => self.char_literal(),
            first_char @ '0'..='9' => self.number(first_char),
            'r' | 'R' if self.cursor.matches('"') => {
                self.cursor.advance();
                self.raw_string()
            }
            first_char if is_ident_start(first_char) => {
                self.cursor.advance_while(is_ident_continue);
                classes::word(self.cursor.token_text()).unwrap_or(NAME)
            }
            first_char if classes::is_operator_char(first_char) => {
                self.cursor.advance_while(classes::is_operator_char);
                classes::operator(self.cursor.token_text())
            }
            _ => BAD_CHAR,
        }
    }

    fn number(&mut self, c: char) -> SyntaxKind {
        if c == '0' {
            match self.cursor.peek() {
                'b' | 'B' | 'o' | 'O' => {
                    self.cursor.advance();
                    self.digits(false);
                    return INT_NUMBER;
                }
                'x' | 'X' => {
                    self.cursor.advance();
                    self.digits(true);
                    return INT_NUMBER;
                }
                _ => {}
            }
        }
        self.digits(false);

        let mut kind = INT_NUMBER;
        if self.cursor.matches('.') && self.cursor.second().is_ascii_digit() {
            self.cursor.advance();
            self.digits(false);
            kind = FLOAT_NUMBER;
        }
        if self.float_exponent() {
            kind = FLOAT_NUMBER;
        }
        kind
    }

    fn digits(&mut self, allow_hex: bool) {
        self.cursor.advance_while(|c| c == '_' || c.is_ascii_digit() || (allow_hex && c.is_ascii_hexdigit()));
    }

    fn float_exponent(&mut self) -> bool {
        if !(self.cursor.matches('e') || self.cursor.matches('E')) {
            return false;
        }
        let rest = &self.cursor.rest()[1..];
        let digits = rest.strip_prefix(['+', '-']).unwrap_or(rest);
        if !digits.starts_with(|c: char| c.is_ascii_digit()) {
            return false;
        }

        self.cursor.advance_n(1 + rest.len() - digits.len());
        self.digits(false);
        true
    }

    fn string(&mut self) -> SyntaxKind {
        if self.cursor.rest().starts_with("\"\"") {
            self.cursor.advance_n(2);
            while !self.cursor.is_eof() && !self.cursor.rest().starts_with("\"\"\"") {
                self.cursor.advance();
            }
            self.cursor.advance_n(3);
            // A closing run longer than three quotes belongs to the string.
            self.cursor.advance_while(|c| c == '"');
            return STRING;
        }

        loop {
            match self.cursor.peek() {
                _ if self.cursor.is_eof() => break,
                '"' => {
                    self.cursor.advance();
                    break;
                }
                '\\' => {
                    self.cursor.advance();
                    if !matches!(self.cursor.peek(), '\n' | '\r') {
                        self.cursor.advance();
                    }
                }
                '\n' | '\r' => break,
                _ => {
                    self.cursor.advance();
                }
            }
        }
        STRING
    }

    fn raw_string(&mut self) -> SyntaxKind {
        loop {
            match self.cursor.peek() {
                _ if self.cursor.is_eof() => break,
                // `""` is a quote inside a raw string.
                '"' if self.cursor.second() == '"' => self.cursor.advance_n(2),
                '"' => {
                    self.cursor.advance();
                    break;
                }
                '\n' | '\r' => break,
                _ => {
                    self.cursor.advance();
                }
            }
        }
        STRING
    }

    fn char_literal(&mut self) -> SyntaxKind {
        match self.cursor.peek() {
            '\n' | '\r' => return CHAR,
            '\\' => {
                self.cursor.advance();
                if !matches!(self.cursor.peek(), '\n' | '\r') {
                    self.cursor.advance();
                }
            }
            _ => {
                self.cursor.advance();
            }
        }
        if self.cursor.matches('\'') {
            self.cursor.advance();
        }
        CHAR
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || (!c.is_ascii() && c.is_alphabetic())
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || (!c.is_ascii() && c.is_alphanumeric())
}

/// Tokens of `text` up to, but not including, `EOF`.
pub fn tokenize(text: &str) -> impl Iterator<Item = Token> + '_ {
    let mut tokenizer = Tokenizer::new(text);
    let mut done = false;
    std::iter::from_fn(move || {
        if done {
            return None;
        }
        let token = tokenizer.next_token();
        done = token.kind == EOF;
        (!done).then_some(token)
    })
}
