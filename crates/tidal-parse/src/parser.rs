use drop_bomb::DropBomb;
use tidal_errors::{Diagnostic, DiagnosticKind};
use tidal_syntax::SyntaxKind::{self, *};
use tidal_syntax::{Builder, SyntaxSet, SyntaxTree, TextRange, TextSize};
use tidal_tokenizer::{Token, Tokenizer};

pub(crate) struct Parser<'a> {
    text: &'a str,
    tokenizer: Tokenizer<'a>,
    /// Next significant token.
    current: Token,
    /// Trivia between the previous significant token and `current`.
    trivia: Vec<Token>,
    events: Vec<Event>,
    diagnostics: Vec<Diagnostic>,
    /// Indentation levels opened inside the current statement-level
    /// expression that still wait for their `DEDENT`.
    pub(crate) expr_indent: u32,
    consumed: u32,
    /// End of the last significant token consumed.
    last_end: TextSize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let mut parser = Self {
            text,
            tokenizer: Tokenizer::new(text),
            current: Token {
                kind: EOF,
                range: Default::default(),
                state: Default::default(),
            },
            trivia: Vec::new(),
            events: Vec::new(),
            diagnostics: Vec::new(),
            expr_indent: 0,
            consumed: 0,
            last_end: TextSize::new(0),
        };
        parser.fetch();
        parser
    }

    /// Pulls tokens until the next significant one, recording lexical errors
    /// exactly once.
    fn fetch(&mut self) {
        loop {
            let token = self.tokenizer.next_token();
            match token.kind {
                BAD_CHAR => self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::BadChar,
                    format!("unexpected character `{}`", token.text(self.text)),
                    token.range,
                )),
                INVALID_INDENT => self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::InvalidIndent,
                    "invalid indentation",
                    token.range,
                )),
                UNTERMINATED_COMMENT => self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::UnterminatedComment,
                    "unterminated comment",
                    token.range,
                )),
                _ => {}
            }

            if is_skipped(token.kind) {
                self.trivia.push(token);
            } else {
                self.current = token;
                return;
            }
        }
    }

    pub(crate) fn current(&self) -> SyntaxKind {
        self.current.kind
    }

    pub(crate) fn current_text(&self) -> &'a str {
        self.current.text(self.text)
    }

    /// Kind of the significant token `n` positions ahead.
    pub(crate) fn nth(&mut self, n: usize) -> SyntaxKind {
        if n == 0 {
            return self.current.kind;
        }

        let checkpoint = self.tokenizer.checkpoint();
        let mut kind = self.current.kind;
        for _ in 0..n {
            kind = loop {
                let token = self.tokenizer.next_token();
                if !is_skipped(token.kind) {
                    break token.kind;
                }
            };
        }
        self.tokenizer.restore(checkpoint);
        kind
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current.kind == kind
    }

    pub(crate) fn at_set(&self, set: &SyntaxSet) -> bool {
        set.contains(self.current.kind)
    }

    /// Word operators share token kinds, so contextual words such as `in`
    /// are matched by text.
    pub(crate) fn at_word(&self, kind: SyntaxKind, word: &str) -> bool {
        self.at(kind) && self.current_text() == word
    }

    pub(crate) fn has_whitespace_before(&self) -> bool {
        let start = usize::from(self.current.range.start());
        self.text[..start].chars().next_back().is_none_or(char::is_whitespace)
    }

    pub(crate) fn has_whitespace_after(&self) -> bool {
        let end = usize::from(self.current.range.end());
        self.text[end..].chars().next().is_none_or(char::is_whitespace)
    }

    /// An operator reads as unary when it hugs its operand but not what
    /// comes before it: `a -b`.
    pub(crate) fn unary_shaped(&self) -> bool {
        self.has_whitespace_before() && !self.has_whitespace_after()
    }

    /// Number of significant tokens consumed so far.
    pub(crate) fn consumed(&self) -> u32 {
        self.consumed
    }

    fn flush_trivia(&mut self) {
        self.events.extend(self.trivia.drain(..).map(Event::Token));
    }

    pub(crate) fn advance(&mut self) {
        if self.at(EOF) {
            return;
        }

        self.flush_trivia();
        self.events.push(Event::Token(self.current));
        self.consumed += 1;
        self.last_end = self.current.range.end();
        self.fetch();
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if !self.at(kind) {
            return false;
        }
        self.advance();
        true
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error(what);
        false
    }

    /// Layout inside an expression: indentation may open after an operator,
    /// a delimiter or an opening bracket, and closes again transparently.
    pub(crate) fn eat_layout(&mut self) {
        loop {
            match self.current() {
                INDENT => {
                    self.expr_indent += 1;
                    self.advance();
                }
                DEDENT if self.expr_indent > 0 => {
                    self.expr_indent -= 1;
                    self.advance();
                    self.eat(SAME_INDENT);
                }
                SAME_INDENT | INVALID_INDENT if self.expr_indent > 0 => self.advance(),
                _ => break,
            }
        }
    }

    pub(crate) fn start(&mut self) -> Marker {
        // Leading trivia belongs to the parent; the root has none.
        if !self.events.is_empty() {
            self.flush_trivia();
        }
        self.start_unflushed()
    }

    fn start_unflushed(&mut self) -> Marker {
        let pos = self.events.len() as u32;
        self.events.push(Event::TOMBSTONE);
        Marker::new(pos)
    }

    /// Reports that `what` was expected at the current token.
    pub(crate) fn error(&mut self, what: &str) {
        self.diagnostics.push(Diagnostic::expected(what, self.error_range()));
    }

    /// Layout tokens and `EOF` sit at the start of the next line, so errors
    /// there point just past the previous token instead.
    fn error_range(&self) -> TextRange {
        if self.current.kind.is_layout() || matches!(self.current.kind, INVALID_INDENT | EOF) {
            TextRange::empty(self.last_end)
        } else {
            self.current.range
        }
    }

    pub(crate) fn error_unexpected(&mut self, message: &str) {
        self.diagnostics.push(Diagnostic::new(
            DiagnosticKind::Unexpected,
            message,
            self.current.range,
        ));
    }

    /// Wraps the current token in an `ERROR` node. Bad characters were
    /// already reported by the tokenizer.
    pub(crate) fn err_and_bump(&mut self, what: &str) {
        let m = self.start();
        if !self.at(BAD_CHAR) {
            self.error(what);
        }
        self.advance();
        m.complete(self, ERROR);
    }

    pub(crate) fn err_recover(&mut self, what: &str, recovery: &SyntaxSet) {
        if self.at_set(recovery) || self.at(EOF) {
            self.error(what);
        } else {
            self.err_and_bump(what);
        }
    }

    pub(crate) fn finish(mut self) -> (SyntaxTree, Vec<Diagnostic>) {
        debug_assert!(self.at(EOF), "unparsed input at {:?}", self.current.range);
        // Trailing trivia goes to the root.
        let Some(Event::Finish) = self.events.pop() else {
            unreachable!("the root node must be completed last");
        };
        self.flush_trivia();
        self.events.push(Event::Finish);

        let Parser { text, mut events, diagnostics, .. } = self;
        let mut builder = Builder::new(text);
        let mut forward_parents = Vec::new();

        for i in 0..events.len() {
            match std::mem::replace(&mut events[i], Event::TOMBSTONE) {
                Event::Start { kind, forward_parent } => {
                    if kind == TOMBSTONE {
                        continue;
                    }

                    forward_parents.push(kind);
                    let mut idx = i;
                    let mut fp = forward_parent;
                    while let Some(fwd) = fp {
                        idx += fwd as usize;

                        fp = match std::mem::replace(&mut events[idx], Event::TOMBSTONE) {
                            Event::Start { kind, forward_parent } => {
                                if kind != TOMBSTONE {
                                    forward_parents.push(kind);
                                }
                                forward_parent
                            }
                            _ => unreachable!(),
                        };
                    }

                    for kind in forward_parents.drain(..).rev() {
                        builder.start_node(kind);
                    }
                }
                Event::Finish => builder.finish_node(),
                Event::Token(token) => builder.token(token.kind, token.range),
            }
        }

        (builder.finish(), diagnostics)
    }
}

/// Tokens the grammar never sees; they still end up in the tree.
fn is_skipped(kind: SyntaxKind) -> bool {
    kind.is_trivia() || kind == UNTERMINATED_COMMENT
}

enum Event {
    Start { kind: SyntaxKind, forward_parent: Option<u32> },
    Token(Token),
    Finish,
}

impl Event {
    const TOMBSTONE: Self = Event::Start { kind: TOMBSTONE, forward_parent: None };
}

pub(crate) struct Marker {
    position: u32,
    bomb: DropBomb,
}

impl Marker {
    fn new(pos: u32) -> Marker {
        Marker { position: pos, bomb: DropBomb::new("Marker must be completed") }
    }

    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.bomb.defuse();

        match &mut p.events[self.position as usize] {
            Event::Start { kind: slot, .. } => {
                *slot = kind;
            }
            _ => unreachable!(),
        }

        p.events.push(Event::Finish);
        CompletedMarker::new(self.position, kind)
    }
}

#[derive(Clone, Copy)]
pub(crate) struct CompletedMarker {
    pos: u32,
    kind: SyntaxKind,
}

impl CompletedMarker {
    fn new(pos: u32, kind: SyntaxKind) -> Self {
        CompletedMarker { pos, kind }
    }

    pub(crate) fn kind(self) -> SyntaxKind {
        self.kind
    }

    /// Starts a node that will become the parent of this one. Pending trivia
    /// stays where it is, so it ends up between the two.
    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let new_pos = p.start_unflushed();

        match &mut p.events[self.pos as usize] {
            Event::Start { forward_parent, .. } => {
                *forward_parent = Some(new_pos.position - self.pos);
            }
            _ => unreachable!(),
        }

        new_pos
    }
}
