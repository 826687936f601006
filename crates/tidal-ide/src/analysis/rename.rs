use crate::FilePosition;
use crate::rename::{RenameError, rename_declaration};

impl super::Analysis {
    /// Renames the declaration at the cursor, or the one the reference at the
    /// cursor resolves to, and returns the edited text. The file itself is
    /// left unchanged.
    pub fn rename(&self, position: FilePosition, new_name: &str) -> Result<String, RenameError> {
        let FilePosition { file, offset } = position;
        let range = self.declaration_at(file, offset).ok_or(RenameError::NoDeclaration)?;

        let tree = file.parse(self.db()).tree();
        let decl = super::decl_node(tree.root(), range).ok_or(RenameError::NoDeclaration)?;
        let renamed = rename_declaration(tree, decl, new_name)?;
        Ok(renamed.text().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use expect_test::{Expect, expect};

    use super::super::fixture;
    use crate::RenameError;

    #[track_caller]
    fn check(fixture: &str, new_name: &str, expect: Expect) {
        let (analysis, position, _) = fixture::load(fixture);
        let text = analysis.rename(position, new_name).expect("rename failed");
        expect.assert_eq(&text);
    }

    #[test]
    fn rename_from_reference() {
        check(
            r#"
proc fib(n: int): int =
  if n < 2:
    return n
  return fib(n - 1) + fib(n - 2)

echo fi$0b(10)
"#,
            "fibonacci",
            expect![[r#"

                proc fibonacci(n: int): int =
                  if n < 2:
                    return n
                  return fibonacci(n - 1) + fibonacci(n - 2)

                echo fibonacci(10)
            "#]],
        );
    }

    #[test]
    fn rename_leaves_shadowed_names() {
        check(
            r#"
let $0x = 1
block:
  let x = 2
  echo x
echo x
"#,
            "y",
            expect![[r#"

                let y = 1
                block:
                  let x = 2
                  echo x
                echo y
            "#]],
        );
    }

    #[test]
    fn rename_errors() {
        let (analysis, position, _) = fixture::load("let x = 1\necho $0x\n");
        assert_eq!(
            analysis.rename(position, "if"),
            Err(RenameError::InvalidName("if".to_owned()))
        );

        let (analysis, position, _) = fixture::load("echo $0x\n");
        assert_eq!(analysis.rename(position, "y"), Err(RenameError::NoDeclaration));
    }

    #[test]
    fn file_text_is_unchanged() {
        let (analysis, position, _) = fixture::load("var $0a = 1\na = a + 1\n");
        analysis.rename(position, "b").unwrap();
        assert_eq!(position.file.text(analysis.db()), "var a = 1\na = a + 1\n");
    }
}
