/// What a line's leading whitespace means relative to the open blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Indentation {
    Indent,
    Same,
    /// One level closed; the same line must be checked again.
    Dedent,
    /// The width matches no open level.
    Invalid,
}

/// Open indentation widths, strictly increasing from bottom to top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct IndentStack {
    widths: Vec<u32>,
}

impl IndentStack {
    pub(crate) fn decide(&mut self, width: u32) -> Indentation {
        let len = self.widths.len();
        let top = self.widths.last().copied();
        let second = len.checked_sub(2).map(|index| self.widths[index]);

        match top {
            None if width > 0 => {
                self.widths.push(width);
                Indentation::Indent
            }
            None => Indentation::Same,
            Some(top) if width > top => {
                self.widths.push(width);
                Indentation::Indent
            }
            Some(top) if width == top => Indentation::Same,
            Some(_) if (len == 1 && width == 0) || second.is_some_and(|second| width <= second) => {
                self.widths.pop();
                Indentation::Dedent
            }
            Some(_) => Indentation::Invalid,
        }
    }

    /// Closes the innermost level, returning `false` once nothing is open.
    pub(crate) fn pop(&mut self) -> bool {
        self.widths.pop().is_some()
    }

    pub(crate) fn depth(&self) -> usize {
        self.widths.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line() {
        let mut stack = IndentStack::default();
        assert_eq!(stack.decide(0), Indentation::Same);
        assert_eq!(stack.depth(), 0);

        let mut stack = IndentStack::default();
        assert_eq!(stack.decide(2), Indentation::Indent);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn dedent_one_level_per_call() {
        let mut stack = IndentStack::default();
        stack.decide(2);
        stack.decide(4);
        stack.decide(6);

        assert_eq!(stack.decide(2), Indentation::Dedent);
        assert_eq!(stack.decide(2), Indentation::Dedent);
        assert_eq!(stack.decide(2), Indentation::Same);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn last_level_closes_at_zero() {
        let mut stack = IndentStack::default();
        stack.decide(4);
        assert_eq!(stack.decide(0), Indentation::Dedent);
        assert_eq!(stack.decide(0), Indentation::Same);
    }

    #[test]
    fn insufficient_dedent() {
        let mut stack = IndentStack::default();
        stack.decide(4);
        assert_eq!(stack.decide(2), Indentation::Invalid);
        assert_eq!(stack.depth(), 1);

        stack.decide(8);
        assert_eq!(stack.decide(6), Indentation::Invalid);
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn pop_drains() {
        let mut stack = IndentStack::default();
        stack.decide(2);
        stack.decide(3);
        assert!(stack.pop());
        assert!(stack.pop());
        assert!(!stack.pop());
    }
}
