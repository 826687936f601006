use expect_test::{Expect, expect};
use proptest::prelude::*;
use tidal_errors::DiagnosticKind;
use tidal_syntax::SyntaxKind::{self, *};
use tidal_syntax::ast::{AstNode as _, Expr, File, Stmt};

use crate::parse;

fn check(text: &str, expect: Expect) {
    let parse = parse(text);
    assert!(parse.diagnostics().is_empty(), "{}", parse.debug_dump());
    expect.assert_eq(&parse.tree().debug_dump());
}

fn stmt_kinds(text: &str) -> Vec<SyntaxKind> {
    let parse = parse(text);
    let file = File::cast(parse.tree().root()).unwrap();
    file.stmt_list().unwrap().stmts().map(|stmt| stmt.syntax().kind()).collect()
}

fn messages(text: &str) -> Vec<String> {
    parse(text).diagnostics().iter().map(|d| d.message().to_owned()).collect()
}

/// Renders the expression of the first statement with explicit parentheses.
fn shape(text: &str) -> String {
    let parse = parse(text);
    assert!(parse.diagnostics().is_empty(), "{}", parse.debug_dump());
    let file = File::cast(parse.tree().root()).unwrap();
    let stmt = file.stmt_list().unwrap().stmts().next().unwrap();
    let expr = stmt.syntax().children().find_map(Expr::cast).unwrap();
    render(expr)
}

fn list<'a>(exprs: impl Iterator<Item = Expr<'a>>) -> String {
    exprs.map(render).collect::<Vec<_>>().join(", ")
}

fn render(expr: Expr<'_>) -> String {
    match expr {
        Expr::Literal(_) | Expr::NameRef(_) => expr.syntax().text().to_owned(),
        Expr::Binary(it) => format!(
            "({} {} {})",
            render(it.lhs().unwrap()),
            it.op().unwrap().text(),
            render(it.rhs().unwrap())
        ),
        Expr::Prefix(it) => {
            let op = it.op().unwrap().text();
            let sep = if op.chars().all(char::is_alphabetic) { " " } else { "" };
            format!("({op}{sep}{})", render(it.expr().unwrap()))
        }
        Expr::Sigil(it) => format!("({}{})", it.op().unwrap().text(), render(it.operand().unwrap())),
        Expr::Paren(it) => render(it.expr().unwrap()),
        Expr::Call(it) => format!("{}({})", render(it.callee().unwrap()), list(it.args())),
        Expr::Command(it) => format!("{} {}", render(it.callee().unwrap()), list(it.args())),
        Expr::Field(it) => format!("{}.{}", render(it.receiver().unwrap()), it.field().unwrap()),
        Expr::Index(it) => format!("{}[{}]", render(it.base().unwrap()), list(it.args())),
        Expr::Array(it) => format!("[{}]", list(it.elements())),
    }
}

#[test]
fn right_associative_caret() {
    check(
        "a ^ b ^ c",
        expect![[r#"
            FILE@0..9
              STMT_LIST@0..9
                SAME_INDENT@0..0 ""
                EXPR_STMT@0..9
                  BINARY_EXPR@0..9
                    NAME_REF@0..1
                      NAME@0..1 "a"
                    WHITESPACE@1..2 " "
                    OP10@2..3 "^"
                    WHITESPACE@3..4 " "
                    BINARY_EXPR@4..9
                      NAME_REF@4..5
                        NAME@4..5 "b"
                      WHITESPACE@5..6 " "
                      OP10@6..7 "^"
                      WHITESPACE@7..8 " "
                      NAME_REF@8..9
                        NAME@8..9 "c"
        "#]],
    );
}

#[test]
fn continuation_lines_in_initializer() {
    check(
        "let x =\n  1 +\n  2\necho x\n",
        expect![[r#"
            FILE@0..25
              STMT_LIST@0..24
                SAME_INDENT@0..0 ""
                LET_SECTION@0..18
                  LET_KW@0..3 "let"
                  WHITESPACE@3..4 " "
                  IDENT_DEF@4..18
                    DECL_NAME@4..5
                      NAME@4..5 "x"
                    WHITESPACE@5..6 " "
                    EQ@6..7 "="
                    WHITESPACE@7..10 "\n  "
                    INDENT@10..10 ""
                    BINARY_EXPR@10..17
                      LITERAL@10..11
                        INT_NUMBER@10..11 "1"
                      WHITESPACE@11..12 " "
                      OP8@12..13 "+"
                      WHITESPACE@13..16 "\n  "
                      SAME_INDENT@16..16 ""
                      LITERAL@16..17
                        INT_NUMBER@16..17 "2"
                    WHITESPACE@17..18 "\n"
                    DEDENT@18..18 ""
                SAME_INDENT@18..18 ""
                EXPR_STMT@18..24
                  COMMAND_EXPR@18..24
                    NAME_REF@18..22
                      NAME@18..22 "echo"
                    WHITESPACE@22..23 " "
                    ARG_LIST@23..24
                      NAME_REF@23..24
                        NAME@23..24 "x"
              WHITESPACE@24..25 "\n"
        "#]],
    );
}

#[test]
fn operator_precedence() {
    assert_eq!(shape("1 + 2 ^ 3 or 4 > 5"), "((1 + (2 ^ 3)) or (4 > 5))");
    assert_eq!(shape("a - b - c"), "((a - b) - c)");
    assert_eq!(shape("a or b and c"), "(a or (b and c))");
    assert_eq!(shape("x == y and z"), "((x == y) and z)");
    assert_eq!(shape("1 .. 2 + 3"), "(1 .. (2 + 3))");
    assert_eq!(shape("a += b * c"), "(a += (b * c))");
    assert_eq!(shape("a -> b -> c"), "((a -> b) -> c)");
}

#[test]
fn user_defined_operators() {
    assert_eq!(shape("a <+> b +* c"), "(a <+> (b +* c))");
    assert_eq!(shape("a %% b ** c"), "((a %% b) ** c)");
    assert_eq!(shape("a & b | c"), "(a & (b | c))");
}

#[test]
fn parentheses_reset_precedence() {
    assert_eq!(shape("(a + b) * c"), "((a + b) * c)");
    assert_eq!(shape("a * (b + c)"), "(a * (b + c))");
}

#[test]
fn prefix_and_sigil_operators() {
    assert_eq!(shape("-a * b"), "((-a) * b)");
    assert_eq!(shape("a * -b"), "(a * (-b))");
    assert_eq!(shape("not a and b"), "((not a) and b)");
    assert_eq!(shape("@ a.b"), "(@a).b");
    assert_eq!(shape("$x & y"), "(($x) & y)");
}

#[test]
fn unary_shaped_operator_starts_a_command_argument() {
    assert_eq!(shape("echo -1"), "echo (-1)");
    assert_eq!(shape("echo - 1"), "(echo - 1)");
    assert_eq!(shape("echo a, b + 1"), "echo a, (b + 1)");
}

#[test]
fn postfix_expressions() {
    assert_eq!(shape("a.b(1)[2]"), "a.b(1)[2]");
    assert_eq!(shape("f([1, 2], g())"), "f([1, 2], g())");
    assert_eq!(shape("f (1)"), "f 1");
}

#[test]
fn multi_line_arguments() {
    let text = "foo(1,\n    2)\nbar\n";
    assert!(messages(text).is_empty(), "{:?}", messages(text));
    assert_eq!(stmt_kinds(text), [EXPR_STMT, EXPR_STMT]);
    assert_eq!(shape(text), "foo(1, 2)");
}

#[test]
fn statements() {
    let text = "\
let a = 1
var b: int
const c = 2
block outer:
  discard a
while a < 3:
  a = a + 1
for i, x in items:
  echo x
return
";
    assert!(messages(text).is_empty(), "{:?}", messages(text));
    assert_eq!(
        stmt_kinds(text),
        [
            LET_SECTION,
            VAR_SECTION,
            CONST_SECTION,
            BLOCK_STMT,
            WHILE_STMT,
            FOR_STMT,
            RETURN_STMT
        ]
    );
}

#[test]
fn if_elif_else() {
    let text = "if a:\n  b\nelif c:\n  d\nelse:\n  e\nf\n";
    assert!(messages(text).is_empty(), "{:?}", messages(text));

    let parse = parse(text);
    let file = File::cast(parse.tree().root()).unwrap();
    let stmts = file.stmt_list().unwrap().stmts().collect::<Vec<_>>();
    assert_eq!(stmts.len(), 2);

    let Stmt::If(if_stmt) = stmts[0] else { panic!("expected an if statement: {stmts:?}") };
    let branches = if_stmt.branches().map(|it| it.kind()).collect::<Vec<_>>();
    assert_eq!(branches, [IF_BRANCH, ELIF_BRANCH, ELSE_BRANCH]);
}

#[test]
fn inline_bodies() {
    let text = "if a: b\nelse: c\nblock: echo x\n";
    assert!(messages(text).is_empty(), "{:?}", messages(text));
    assert_eq!(stmt_kinds(text), [IF_STMT, BLOCK_STMT]);
}

#[test]
fn declaration_section_block() {
    let text = "var\n  a = 1\n  ## the count\n  b, c: int\nd\n";
    assert!(messages(text).is_empty(), "{:?}", messages(text));

    let parse = parse(text);
    let file = File::cast(parse.tree().root()).unwrap();
    let section = file.stmt_list().unwrap().stmts().next().unwrap();
    let names = section
        .ident_defs()
        .flat_map(|def| def.names())
        .map(|name| name.syntax().text().to_owned())
        .collect::<Vec<_>>();
    assert_eq!(names, ["a", "b", "c"]);
    assert_eq!(stmt_kinds(text), [VAR_SECTION, EXPR_STMT]);
}

#[test]
fn proc_definition() {
    let text = "proc add(a, b: int; c = 0): int =\n  ## Adds.\n  return a + b + c\nadd 1, 2\n";
    assert!(messages(text).is_empty(), "{:?}", messages(text));

    let parse = parse(text);
    let file = File::cast(parse.tree().root()).unwrap();
    let stmts = file.stmt_list().unwrap().stmts().collect::<Vec<_>>();
    let Stmt::Proc(proc_def) = stmts[0] else { panic!("expected a proc: {stmts:?}") };

    assert_eq!(proc_def.name().unwrap().syntax().text(), "add");
    let routine = proc_def.routine().unwrap();
    let params = routine
        .params()
        .flat_map(|param| param.names())
        .map(|name| name.syntax().text())
        .collect::<Vec<_>>();
    assert_eq!(params, ["a", "b", "c"]);
    assert_eq!(routine.body().unwrap().stmts().map(|it| it.syntax().kind()).collect::<Vec<_>>(), [
        DOC,
        RETURN_STMT
    ]);
    assert_eq!(stmts[1].syntax().kind(), EXPR_STMT);
}

#[test]
fn assignment() {
    assert_eq!(stmt_kinds("a = 1\na.b[0] = 2\n"), [ASSIGN_STMT, ASSIGN_STMT]);
}

#[test]
fn missing_name_recovers_at_statement_end() {
    let text = "let = 1\nlet y = 2\n";
    assert_eq!(messages(text), ["expected a name"]);
    assert_eq!(stmt_kinds(text), [LET_SECTION, LET_SECTION]);

    let parse = parse(text);
    let error = parse.tree().root().descendants().find(|node| node.kind() == ERROR).unwrap();
    assert_eq!(error.text(), "= 1");
    assert_eq!(error.parent().map(|node| node.kind()), Some(LET_SECTION));
}

#[test]
fn missing_name_at_end_of_line() {
    assert_eq!(messages("let\nlet y = 2\n"), ["expected a name"]);
}

#[test]
fn unclosed_call() {
    assert_eq!(messages("f(1, 2"), ["expected `)`"]);
}

#[test]
fn missing_colon() {
    assert_eq!(messages("while a\n  b\n"), ["expected `:`"]);
}

#[test]
fn unexpected_indentation() {
    let text = "a\n  b\nc\n";
    assert_eq!(messages(text), ["unexpected indentation"]);
    assert_eq!(stmt_kinds(text), [EXPR_STMT, EXPR_STMT]);
}

#[test]
fn lexical_errors_are_reported_once() {
    let parse = parse("a = `\n");
    let kinds = parse.diagnostics().iter().map(|d| d.kind()).collect::<Vec<_>>();
    assert_eq!(kinds, [DiagnosticKind::BadChar]);

    let parse = crate::parse("x #[ open");
    let kinds = parse.diagnostics().iter().map(|d| d.kind()).collect::<Vec<_>>();
    assert_eq!(kinds, [DiagnosticKind::UnterminatedComment]);

    let parse = crate::parse("if a:\n    b\n  c\n");
    let kinds = parse.diagnostics().iter().map(|d| d.kind()).collect::<Vec<_>>();
    assert_eq!(kinds, [DiagnosticKind::InvalidIndent]);
}

#[test]
fn doc_comments_are_tree_nodes() {
    let text = "## Module docs.\nlet a = 1 ## trailing\n";
    assert!(messages(text).is_empty(), "{:?}", messages(text));
    assert_eq!(stmt_kinds(text), [DOC, LET_SECTION, DOC]);
}

proptest! {
    #[test]
    fn parsing_is_lossless(text in "[a-z0-9 \n#\\[\\](),:;=+*<>@.^-]{0,80}") {
        let parse = parse(&text);
        let rebuilt: String =
            parse.tree().root().descendant_tokens().map(|token| token.text()).collect();
        prop_assert_eq!(rebuilt, text);
    }

    #[test]
    fn statement_keywords_never_panic(
        words in prop::collection::vec(
            prop::sample::select(vec![
                "let", "var", "if", "elif", "else", "while", "for", "in", "proc", "return",
                "x", "1", "=", ":", "(", ")", "[", "]", ",", "\n", "\n  ", "\n    ", "## d",
            ]),
            0..40,
        )
    ) {
        let text = words.join(" ");
        let parse = parse(&text);
        prop_assert_eq!(usize::from(parse.tree().root().text_range().len()), text.len());
    }
}
