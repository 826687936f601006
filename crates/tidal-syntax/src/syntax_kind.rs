//! Token and node kinds.
//!
//! Hosts bind to kinds by name (`SyntaxKind::name`, `SyntaxKind::from_name`),
//! never by discriminant, so reordering variants is not a breaking change for
//! them.

macro_rules! syntax_kinds {
    ($($kind:ident),* $(,)?) => {
        #[allow(non_camel_case_types)]
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
        #[repr(u16)]
        pub enum SyntaxKind {
            $($kind),*
        }

        impl SyntaxKind {
            const ALL: &'static [SyntaxKind] = &[$(SyntaxKind::$kind),*];
            pub const COUNT: usize = Self::ALL.len();

            /// Stable, host-visible identifier of this kind.
            pub const fn name(self) -> &'static str {
                match self {
                    $(SyntaxKind::$kind => stringify!($kind)),*
                }
            }
        }
    };
}

syntax_kinds! {
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACKET,
    RIGHT_BRACKET,
    LEFT_BRACE,
    RIGHT_BRACE,
    COMMA,
    SEMICOLON,
    COLON,
    EQ,
    DOT,

    // Operator precedence classes, lowest to highest. `OP2_SIGIL` and
    // `DOT_DOT` share a class with `OP2` and `OP6` respectively.
    OP0,
    OP1,
    OP2,
    OP2_SIGIL,
    OP3,
    OP4,
    OP5,
    OP6,
    DOT_DOT,
    OP7,
    OP8,
    OP9,
    OP10,

    LET_KW,
    VAR_KW,
    CONST_KW,
    BLOCK_KW,
    IF_KW,
    ELIF_KW,
    ELSE_KW,
    WHILE_KW,
    FOR_KW,
    PROC_KW,
    RETURN_KW,
    DISCARD_KW,

    NAME,
    INT_NUMBER,
    FLOAT_NUMBER,
    STRING,
    CHAR,

    WHITESPACE,
    LINE_COMMENT,
    BLOCK_COMMENT,
    DOC_COMMENT,

    INDENT,
    DEDENT,
    SAME_INDENT,
    INVALID_INDENT,
    BAD_CHAR,
    UNTERMINATED_COMMENT,
    EOF,

    FILE,
    STMT_LIST,
    LET_SECTION,
    VAR_SECTION,
    CONST_SECTION,
    IDENT_DEF,
    DECL_NAME,
    TYPE,
    BLOCK_STMT,
    BLOCK_LABEL,
    IF_STMT,
    IF_BRANCH,
    ELIF_BRANCH,
    ELSE_BRANCH,
    WHILE_STMT,
    FOR_STMT,
    PROC_DEF,
    ROUTINE,
    PARAM_LIST,
    PARAM,
    RETURN_TYPE,
    RETURN_STMT,
    DISCARD_STMT,
    EXPR_STMT,
    ASSIGN_STMT,
    DOC,

    LITERAL,
    NAME_REF,
    FIELD_NAME,
    ARRAY_EXPR,
    PAREN_EXPR,
    BINARY_EXPR,
    PREFIX_EXPR,
    SIGIL_EXPR,
    CALL_EXPR,
    COMMAND_EXPR,
    ARG_LIST,
    INDEX_EXPR,
    FIELD_EXPR,

    ERROR,
    TOMBSTONE,
}

/// The class of construct that opens a lexical scope.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ScopeKind {
    File,
    Block,
    Routine,
    Loop,
    Branch,
}

impl ScopeKind {
    pub const fn name(self) -> &'static str {
        match self {
            ScopeKind::File => "File",
            ScopeKind::Block => "Block",
            ScopeKind::Routine => "Routine",
            ScopeKind::Loop => "Loop",
            ScopeKind::Branch => "Branch",
        }
    }
}

/// Right-associative precedence class.
pub const RIGHT_ASSOC_CLASS: u8 = 10;

impl SyntaxKind {
    /// Looks up a kind by its stable name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Whitespace and non-documentation comments. Documentation comments are
    /// kept as tree nodes instead.
    pub const fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::WHITESPACE | SyntaxKind::LINE_COMMENT | SyntaxKind::BLOCK_COMMENT)
    }

    pub const fn is_layout(self) -> bool {
        matches!(
            self,
            SyntaxKind::INDENT | SyntaxKind::DEDENT | SyntaxKind::SAME_INDENT
        )
    }

    pub const fn is_keyword(self) -> bool {
        (self as u16) >= (SyntaxKind::LET_KW as u16) && (self as u16) <= (SyntaxKind::DISCARD_KW as u16)
    }

    /// Precedence class of an operator token, `0` binding loosest.
    pub const fn operator_class(self) -> Option<u8> {
        Some(match self {
            SyntaxKind::OP0 => 0,
            SyntaxKind::OP1 => 1,
            SyntaxKind::OP2 | SyntaxKind::OP2_SIGIL => 2,
            SyntaxKind::OP3 => 3,
            SyntaxKind::OP4 => 4,
            SyntaxKind::OP5 => 5,
            SyntaxKind::OP6 | SyntaxKind::DOT_DOT => 6,
            SyntaxKind::OP7 => 7,
            SyntaxKind::OP8 => 8,
            SyntaxKind::OP9 => 9,
            SyntaxKind::OP10 => 10,
            _ => return None,
        })
    }

    pub const fn is_operator(self) -> bool {
        self.operator_class().is_some()
    }

    pub const fn scope_kind(self) -> Option<ScopeKind> {
        Some(match self {
            SyntaxKind::FILE => ScopeKind::File,
            SyntaxKind::BLOCK_STMT => ScopeKind::Block,
            SyntaxKind::ROUTINE => ScopeKind::Routine,
            SyntaxKind::WHILE_STMT | SyntaxKind::FOR_STMT => ScopeKind::Loop,
            SyntaxKind::IF_BRANCH | SyntaxKind::ELIF_BRANCH | SyntaxKind::ELSE_BRANCH => {
                ScopeKind::Branch
            }
            _ => return None,
        })
    }

    pub const fn is_scope(self) -> bool {
        self.scope_kind().is_some()
    }
}
