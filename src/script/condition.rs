//! Condition evaluation for `if` lines.

use std::sync::LazyLock;

use regex::Regex;

use crate::script::value::is_truthy_literal;

#[derive(Clone, Copy)]
enum Comparison {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl Comparison {
    /// `None` when a relational operand is not a number.
    fn apply(self, left: &str, right: &str) -> Option<bool> {
        let numbers = || Some((left.parse::<f64>().ok()?, right.parse::<f64>().ok()?));
        match self {
            Comparison::Eq => Some(left == right),
            Comparison::Ne => Some(left != right),
            Comparison::Gt => numbers().map(|(l, r)| l > r),
            Comparison::Lt => numbers().map(|(l, r)| l < r),
            Comparison::Ge => numbers().map(|(l, r)| l >= r),
            Comparison::Le => numbers().map(|(l, r)| l <= r),
        }
    }
}

// Tried in this order; the first pattern whose operands are usable decides.
static COMPARISONS: LazyLock<Vec<(Comparison, Regex)>> = LazyLock::new(|| {
    [
        (Comparison::Eq, "=="),
        (Comparison::Ne, "!="),
        (Comparison::Gt, ">"),
        (Comparison::Lt, "<"),
        (Comparison::Ge, ">="),
        (Comparison::Le, "<="),
    ]
    .into_iter()
    .map(|(cmp, symbol)| {
        let pattern = format!(r"^(.+)\s+{}\s+(.+)$", regex::escape(symbol));
        let regex = Regex::new(&pattern).expect("comparison pattern is valid");
        (cmp, regex)
    })
    .collect()
});

/// Evaluate already-resolved condition text.
///
/// `==` and `!=` compare the trimmed operands as strings. The relational
/// forms compare both sides as floating point and are passed over when
/// either side is not a number. Text that matches no comparison is read as
/// a literal: `true`, `yes` (any case) or `1`.
pub fn evaluate(text: &str) -> bool {
    let text = text.trim();

    for (cmp, regex) in COMPARISONS.iter() {
        let Some(caps) = regex.captures(text) else {
            continue;
        };
        let left = caps[1].trim();
        let right = caps[2].trim();

        if let Some(result) = cmp.apply(left, right) {
            return result;
        }
    }

    is_truthy_literal(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_equality() {
        assert!(evaluate("Steve == Steve"));
        assert!(!evaluate("Steve == Alex"));
        assert!(evaluate("Steve != Alex"));
        // No numeric coercion for equality
        assert!(!evaluate("5 == 5.0"));
    }

    #[test]
    fn test_numeric_comparisons() {
        assert!(evaluate("10 > 9.5"));
        assert!(evaluate("3 < 4"));
        assert!(evaluate("4 >= 4"));
        assert!(evaluate("4 <= 4"));
        assert!(!evaluate("2 >= 4"));
    }

    #[test]
    fn test_non_numeric_relational_falls_through() {
        assert!(!evaluate("abc > 1"));
        assert!(!evaluate(" < 1"));
    }

    #[test]
    fn test_apply_per_operator() {
        assert_eq!(Comparison::Eq.apply("a", "a"), Some(true));
        assert_eq!(Comparison::Ne.apply("a", "a"), Some(false));
        assert_eq!(Comparison::Gt.apply("2", "1.5"), Some(true));
        assert_eq!(Comparison::Le.apply("2", "1.5"), Some(false));
        assert_eq!(Comparison::Lt.apply("two", "3"), None);
        assert_eq!(Comparison::Ge.apply("3", ""), None);
    }

    #[test]
    fn test_requires_spaces_around_operator() {
        // Reads as a literal, not a comparison
        assert!(!evaluate("1==1"));
    }

    #[test]
    fn test_truthy_literals() {
        assert!(evaluate("true"));
        assert!(evaluate("YES"));
        assert!(evaluate("1"));
        assert!(!evaluate("false"));
        assert!(!evaluate(""));
        assert!(!evaluate("2"));
    }
}
