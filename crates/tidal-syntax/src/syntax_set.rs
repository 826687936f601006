use crate::SyntaxKind;

/// Set of kinds as one 128-bit mask, so recovery sets can be `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyntaxSet(u128);

const _: () = assert!(SyntaxKind::COUNT <= u128::BITS as usize, "SyntaxSet is too narrow");

impl SyntaxSet {
    pub const EMPTY: Self = Self(0);

    pub const fn new<const N: usize>(kinds: [SyntaxKind; N]) -> Self {
        let mut mask = 0;
        let mut i = 0;
        while i < N {
            mask |= bit(kinds[i]);
            i += 1;
        }
        Self(mask)
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        self.0 & bit(kind) != 0
    }
}

const fn bit(kind: SyntaxKind) -> u128 {
    1 << kind as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::*;

    #[test]
    fn membership() {
        const SET: SyntaxSet = SyntaxSet::new([LEFT_PAREN, SAME_INDENT, ERROR]);

        assert!(SET.contains(LEFT_PAREN));
        assert!(SET.contains(SAME_INDENT));
        assert!(SET.contains(ERROR));
        assert!(!SET.contains(DEDENT));
        assert!(!SyntaxSet::EMPTY.contains(LEFT_PAREN));
        assert!(SET.union(SyntaxSet::new([DEDENT])).contains(DEDENT));
    }
}
