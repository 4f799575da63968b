//! Condition stack driving `if`/`else`/`endif`.

use crate::result::{ScriptError, StackKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Branch {
    taken: bool,
    // Opened while an outer branch was already skipping; never flips.
    inert: bool,
}

/// One entry per open `if`, innermost last.
///
/// Skip mode is not stored anywhere: it is read off the innermost entry
/// every time it is needed.
#[derive(Debug, Clone, Default)]
pub struct ConditionStack {
    branches: Vec<Branch>,
}

impl ConditionStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a branch with an evaluated condition.
    pub fn push(&mut self, taken: bool) {
        self.branches.push(Branch {
            taken,
            inert: false,
        });
    }

    /// Open a branch inside a skipped region without evaluating it.
    pub fn push_skipped(&mut self) {
        self.branches.push(Branch {
            taken: false,
            inert: true,
        });
    }

    /// Close the innermost branch, returning whether it was taken.
    pub fn pop(&mut self) -> Result<bool, ScriptError> {
        self.branches
            .pop()
            .map(|branch| branch.taken)
            .ok_or(ScriptError::StackUnderflow(StackKind::Condition))
    }

    /// Flip the innermost branch for `else`.
    ///
    /// Returns `false` when there is no open branch. Branches opened inside
    /// a skipped region stay skipped.
    pub fn flip(&mut self) -> bool {
        match self.branches.last_mut() {
            Some(branch) => {
                if !branch.inert {
                    branch.taken = !branch.taken;
                }
                true
            }
            None => false,
        }
    }

    /// Whether the innermost branch was taken, if any is open.
    pub fn peek(&self) -> Option<bool> {
        self.branches.last().map(|branch| branch.taken)
    }

    /// Whether lines are currently being skipped.
    pub fn is_skipping(&self) -> bool {
        self.peek() == Some(false)
    }

    /// Number of open branches.
    pub fn depth(&self) -> usize {
        self.branches.len()
    }

    /// Whether no branch is open.
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_follows_top() {
        let mut stack = ConditionStack::new();
        assert!(!stack.is_skipping());

        stack.push(false);
        assert!(stack.is_skipping());

        stack.flip();
        assert!(!stack.is_skipping());

        assert_eq!(stack.pop().unwrap(), true);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_pop_underflow() {
        let mut stack = ConditionStack::new();
        assert!(matches!(
            stack.pop(),
            Err(ScriptError::StackUnderflow(StackKind::Condition))
        ));
    }

    #[test]
    fn test_flip_on_empty_is_noop() {
        let mut stack = ConditionStack::new();
        assert!(!stack.flip());
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_skipped_branch_never_flips() {
        let mut stack = ConditionStack::new();
        stack.push(false);
        stack.push_skipped();
        stack.flip();
        assert!(stack.is_skipping());
        stack.pop().unwrap();
        assert!(stack.is_skipping());
    }
}
