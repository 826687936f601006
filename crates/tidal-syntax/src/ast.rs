use text_size::TextSize;

use crate::SyntaxKind::{self, *};
use crate::{SyntaxNode, SyntaxToken};

pub trait AstNode<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self>
    where
        Self: Sized;

    fn syntax(self) -> SyntaxNode<'a>;
}

macro_rules! ast_node {
    ($($(#[$meta:meta])* $name:ident => $kind:ident;)*) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name<'a>(SyntaxNode<'a>);

        impl<'a> AstNode<'a> for $name<'a> {
            fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
                (syntax.kind() == $kind).then_some(Self(syntax))
            }

            fn syntax(self) -> SyntaxNode<'a> {
                self.0
            }
        }
    )*};
}

ast_node! {
    File => FILE;
    StmtList => STMT_LIST;
    IdentDef => IDENT_DEF;
    /// A name that binds: `x` in `let x = 1`, parameters, loop variables,
    /// routine names.
    DeclName => DECL_NAME;
    /// A name that is looked up in enclosing scopes.
    NameRef => NAME_REF;
    BlockStmt => BLOCK_STMT;
    IfStmt => IF_STMT;
    WhileStmt => WHILE_STMT;
    ForStmt => FOR_STMT;
    ProcDef => PROC_DEF;
    Routine => ROUTINE;
    Param => PARAM;
    BinaryExpr => BINARY_EXPR;
    PrefixExpr => PREFIX_EXPR;
    SigilExpr => SIGIL_EXPR;
    ParenExpr => PAREN_EXPR;
    Literal => LITERAL;
    CallExpr => CALL_EXPR;
    CommandExpr => COMMAND_EXPR;
    FieldExpr => FIELD_EXPR;
    IndexExpr => INDEX_EXPR;
    ArrayExpr => ARRAY_EXPR;
}

fn child<'a, N: AstNode<'a>>(parent: SyntaxNode<'a>) -> Option<N> {
    parent.children().find_map(N::cast)
}

fn children<'a, N: AstNode<'a> + 'a>(parent: SyntaxNode<'a>) -> impl Iterator<Item = N> + 'a {
    parent.children().filter_map(N::cast)
}

fn token<'a>(parent: SyntaxNode<'a>, kind: SyntaxKind) -> Option<SyntaxToken<'a>> {
    parent.child_tokens().find(|token| token.kind() == kind)
}

/// Shared accessors for `DeclName` and `NameRef`.
pub trait HasName<'a>: AstNode<'a> + Copy {
    fn name_token(self) -> Option<SyntaxToken<'a>> {
        token(self.syntax(), NAME)
    }

    fn name(self) -> &'a str {
        self.name_token().map_or("", SyntaxToken::text)
    }

    /// Offset of the name itself, used for declared-before-used ordering.
    fn offset(self) -> TextSize {
        self.name_token().map_or_else(|| self.syntax().text_range().start(), |it| it.text_range().start())
    }
}

impl<'a> HasName<'a> for DeclName<'a> {}
impl<'a> HasName<'a> for NameRef<'a> {}

impl<'a> File<'a> {
    pub fn stmt_list(self) -> Option<StmtList<'a>> {
        child(self.0)
    }
}

impl<'a> StmtList<'a> {
    pub fn stmts(self) -> impl Iterator<Item = Stmt<'a>> + 'a {
        children(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclSectionKind {
    Let,
    Var,
    Const,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stmt<'a> {
    DeclSection(DeclSectionKind, SyntaxNode<'a>),
    Block(BlockStmt<'a>),
    If(IfStmt<'a>),
    While(WhileStmt<'a>),
    For(ForStmt<'a>),
    Proc(ProcDef<'a>),
    Return(SyntaxNode<'a>),
    Discard(SyntaxNode<'a>),
    Expr(SyntaxNode<'a>),
    Assign(SyntaxNode<'a>),
    Doc(SyntaxNode<'a>),
}

impl<'a> AstNode<'a> for Stmt<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
        Some(match syntax.kind() {
            LET_SECTION => Stmt::DeclSection(DeclSectionKind::Let, syntax),
            VAR_SECTION => Stmt::DeclSection(DeclSectionKind::Var, syntax),
            CONST_SECTION => Stmt::DeclSection(DeclSectionKind::Const, syntax),
            BLOCK_STMT => Stmt::Block(BlockStmt(syntax)),
            IF_STMT => Stmt::If(IfStmt(syntax)),
            WHILE_STMT => Stmt::While(WhileStmt(syntax)),
            FOR_STMT => Stmt::For(ForStmt(syntax)),
            PROC_DEF => Stmt::Proc(ProcDef(syntax)),
            RETURN_STMT => Stmt::Return(syntax),
            DISCARD_STMT => Stmt::Discard(syntax),
            EXPR_STMT => Stmt::Expr(syntax),
            ASSIGN_STMT => Stmt::Assign(syntax),
            DOC => Stmt::Doc(syntax),
            _ => return None,
        })
    }

    fn syntax(self) -> SyntaxNode<'a> {
        match self {
            Stmt::DeclSection(_, it)
            | Stmt::Return(it)
            | Stmt::Discard(it)
            | Stmt::Expr(it)
            | Stmt::Assign(it)
            | Stmt::Doc(it) => it,
            Stmt::Block(it) => it.0,
            Stmt::If(it) => it.0,
            Stmt::While(it) => it.0,
            Stmt::For(it) => it.0,
            Stmt::Proc(it) => it.0,
        }
    }
}

impl<'a> Stmt<'a> {
    /// Declarations of a `let`/`var`/`const` section.
    pub fn ident_defs(self) -> impl Iterator<Item = IdentDef<'a>> + 'a {
        let node = match self {
            Stmt::DeclSection(_, node) => Some(node),
            _ => None,
        };
        node.into_iter().flat_map(children::<IdentDef<'a>>)
    }
}

impl<'a> IdentDef<'a> {
    pub fn names(self) -> impl Iterator<Item = DeclName<'a>> + 'a {
        children(self.0)
    }

    pub fn ty(self) -> Option<Expr<'a>> {
        self.0.children().find(|it| it.kind() == TYPE).and_then(child::<Expr<'a>>)
    }

    pub fn initializer(self) -> Option<Expr<'a>> {
        child(self.0)
    }
}

impl<'a> BlockStmt<'a> {
    pub fn label(self) -> Option<&'a str> {
        let label = self.0.children().find(|it| it.kind() == BLOCK_LABEL)?;
        token(label, NAME).map(SyntaxToken::text)
    }

    pub fn body(self) -> Option<StmtList<'a>> {
        child(self.0)
    }
}

impl<'a> IfStmt<'a> {
    /// `if`, `elif` and `else` branches in source order.
    pub fn branches(self) -> impl Iterator<Item = SyntaxNode<'a>> + 'a {
        self.0.children().filter(|it| matches!(it.kind(), IF_BRANCH | ELIF_BRANCH | ELSE_BRANCH))
    }
}

impl<'a> WhileStmt<'a> {
    pub fn condition(self) -> Option<Expr<'a>> {
        child(self.0)
    }

    pub fn body(self) -> Option<StmtList<'a>> {
        child(self.0)
    }
}

impl<'a> ForStmt<'a> {
    pub fn vars(self) -> impl Iterator<Item = DeclName<'a>> + 'a {
        children(self.0)
    }

    pub fn iterable(self) -> Option<Expr<'a>> {
        child(self.0)
    }

    pub fn body(self) -> Option<StmtList<'a>> {
        child(self.0)
    }
}

impl<'a> ProcDef<'a> {
    pub fn name(self) -> Option<DeclName<'a>> {
        child(self.0)
    }

    pub fn routine(self) -> Option<Routine<'a>> {
        child(self.0)
    }
}

impl<'a> Routine<'a> {
    pub fn params(self) -> impl Iterator<Item = Param<'a>> + 'a {
        self.0.children().filter(|it| it.kind() == PARAM_LIST).flat_map(children::<Param<'a>>)
    }

    pub fn body(self) -> Option<StmtList<'a>> {
        child(self.0)
    }
}

impl<'a> Param<'a> {
    pub fn names(self) -> impl Iterator<Item = DeclName<'a>> + 'a {
        children(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expr<'a> {
    Literal(Literal<'a>),
    NameRef(NameRef<'a>),
    Binary(BinaryExpr<'a>),
    Prefix(PrefixExpr<'a>),
    Sigil(SigilExpr<'a>),
    Paren(ParenExpr<'a>),
    Call(CallExpr<'a>),
    Command(CommandExpr<'a>),
    Field(FieldExpr<'a>),
    Index(IndexExpr<'a>),
    Array(ArrayExpr<'a>),
}

impl<'a> AstNode<'a> for Expr<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
        Some(match syntax.kind() {
            LITERAL => Expr::Literal(Literal(syntax)),
            NAME_REF => Expr::NameRef(NameRef(syntax)),
            BINARY_EXPR => Expr::Binary(BinaryExpr(syntax)),
            PREFIX_EXPR => Expr::Prefix(PrefixExpr(syntax)),
            SIGIL_EXPR => Expr::Sigil(SigilExpr(syntax)),
            PAREN_EXPR => Expr::Paren(ParenExpr(syntax)),
            CALL_EXPR => Expr::Call(CallExpr(syntax)),
            COMMAND_EXPR => Expr::Command(CommandExpr(syntax)),
            FIELD_EXPR => Expr::Field(FieldExpr(syntax)),
            INDEX_EXPR => Expr::Index(IndexExpr(syntax)),
            ARRAY_EXPR => Expr::Array(ArrayExpr(syntax)),
            _ => return None,
        })
    }

    fn syntax(self) -> SyntaxNode<'a> {
        match self {
            Expr::Literal(it) => it.0,
            Expr::NameRef(it) => it.0,
            Expr::Binary(it) => it.0,
            Expr::Prefix(it) => it.0,
            Expr::Sigil(it) => it.0,
            Expr::Paren(it) => it.0,
            Expr::Call(it) => it.0,
            Expr::Command(it) => it.0,
            Expr::Field(it) => it.0,
            Expr::Index(it) => it.0,
            Expr::Array(it) => it.0,
        }
    }
}

impl<'a> Expr<'a> {
    pub fn kind(self) -> SyntaxKind {
        self.syntax().kind()
    }
}

fn operator<'a>(node: SyntaxNode<'a>) -> Option<SyntaxToken<'a>> {
    node.child_tokens().find(|token| token.kind().is_operator())
}

impl<'a> BinaryExpr<'a> {
    pub fn lhs(self) -> Option<Expr<'a>> {
        children(self.0).next()
    }

    pub fn op(self) -> Option<SyntaxToken<'a>> {
        operator(self.0)
    }

    pub fn rhs(self) -> Option<Expr<'a>> {
        children(self.0).nth(1)
    }

    /// Precedence class of the operator.
    pub fn class(self) -> Option<u8> {
        self.op()?.kind().operator_class()
    }
}

impl<'a> PrefixExpr<'a> {
    pub fn op(self) -> Option<SyntaxToken<'a>> {
        operator(self.0)
    }

    pub fn expr(self) -> Option<Expr<'a>> {
        child(self.0)
    }
}

impl<'a> SigilExpr<'a> {
    pub fn op(self) -> Option<SyntaxToken<'a>> {
        operator(self.0)
    }

    pub fn operand(self) -> Option<Expr<'a>> {
        child(self.0)
    }
}

impl<'a> ParenExpr<'a> {
    pub fn expr(self) -> Option<Expr<'a>> {
        child(self.0)
    }
}

impl<'a> Literal<'a> {
    pub fn token(self) -> Option<SyntaxToken<'a>> {
        self.0.child_tokens().find(|token| !token.is_trivia())
    }
}

fn args<'a>(node: SyntaxNode<'a>) -> impl Iterator<Item = Expr<'a>> + 'a {
    node.children().filter(|it| it.kind() == ARG_LIST).flat_map(children::<Expr<'a>>)
}

impl<'a> CallExpr<'a> {
    pub fn callee(self) -> Option<Expr<'a>> {
        child(self.0)
    }

    pub fn args(self) -> impl Iterator<Item = Expr<'a>> + 'a {
        args(self.0)
    }
}

impl<'a> CommandExpr<'a> {
    pub fn callee(self) -> Option<Expr<'a>> {
        child(self.0)
    }

    pub fn args(self) -> impl Iterator<Item = Expr<'a>> + 'a {
        args(self.0)
    }
}

impl<'a> FieldExpr<'a> {
    pub fn receiver(self) -> Option<Expr<'a>> {
        child(self.0)
    }

    pub fn field(self) -> Option<&'a str> {
        let field = self.0.children().find(|it| it.kind() == FIELD_NAME)?;
        token(field, NAME).map(SyntaxToken::text)
    }
}

impl<'a> IndexExpr<'a> {
    pub fn base(self) -> Option<Expr<'a>> {
        child(self.0)
    }

    pub fn args(self) -> impl Iterator<Item = Expr<'a>> + 'a {
        args(self.0)
    }
}

impl<'a> ArrayExpr<'a> {
    pub fn elements(self) -> impl Iterator<Item = Expr<'a>> + 'a {
        children(self.0)
    }
}
