//! Comparison operators of the query language.
//!
//! Operators are found by substring scan over a flat fragment, so the order of
//! [`Op::PRIORITY`] matters: the first operator whose token occurs in the
//! fragment wins.

use std::cmp::Ordering;

/// Comparison operator of an atomic fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `==` case-insensitive equals.
    Eq,
    /// `=#=` case-sensitive equals.
    EqCase,
    /// `!#=` case-sensitive not-equals.
    NeCase,
    /// `!=` case-insensitive not-equals.
    Ne,
    /// `>=` greater than or equal.
    Gte,
    /// `<=` less than or equal.
    Lte,
    /// `>` greater than.
    Gt,
    /// `<` less than.
    Lt,
}

impl Op {
    /// Scan order used by [`Op::find_in`].
    pub const PRIORITY: [Op; 8] = [
        Op::Eq,
        Op::EqCase,
        Op::NeCase,
        Op::Ne,
        Op::Gte,
        Op::Lte,
        Op::Gt,
        Op::Lt,
    ];

    /// The operator's token in query text.
    pub fn token(self) -> &'static str {
        match self {
            Op::Eq => "==",
            Op::EqCase => "=#=",
            Op::NeCase => "!#=",
            Op::Ne => "!=",
            Op::Gte => ">=",
            Op::Lte => "<=",
            Op::Gt => ">",
            Op::Lt => "<",
        }
    }

    /// Finds the operator of `fragment`.
    ///
    /// Returns the operator and the byte offset of its first occurrence.
    pub fn find_in(fragment: &str) -> Option<(Op, usize)> {
        Op::PRIORITY
            .iter()
            .find_map(|op| fragment.find(op.token()).map(|at| (*op, at)))
    }

    /// Returns `true` for the equality family (`==`, `=#=`, `!=`, `!#=`).
    pub fn is_equality(self) -> bool {
        matches!(self, Op::Eq | Op::EqCase | Op::Ne | Op::NeCase)
    }

    /// Returns `true` for the negated equality operators.
    pub fn is_negated(self) -> bool {
        matches!(self, Op::Ne | Op::NeCase)
    }

    /// Returns `true` if string matching ignores case.
    pub fn ignores_case(self) -> bool {
        matches!(self, Op::Eq | Op::Ne)
    }

    /// Evaluates a relational operator given an ordering result.
    ///
    /// Equality operators are never decided by this method and yield `false`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}
