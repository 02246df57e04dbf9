//! fiql - FIQL-style filter queries evaluated against records.
//!
//! A query is a URL-safe string such as `name==ada*;born<1900,tags==math`.
//! It is evaluated against a record (a mapping from field name to [`Value`])
//! and yields a strict `true`/`false`. It supports:
//!
//! - Comparison operators: `==`, `!=` (case-insensitive), `=#=`, `!#=`
//!   (case-sensitive), `>`, `>=`, `<`, `<=`
//! - Boolean combinators: `;` (AND) binds tighter than `,` (OR)
//! - Grouping with parentheses
//! - Globs (`*`, `?`), `[substring]` matches and `a|b` alternations on text
//! - Inclusive `low~high` ranges on numbers and dates
//! - Prefixed date literals: `L<millis>`, `DTZ`, `DT`, `D`, `T`
//! - Sequence fields that match when any element matches
//!
//! # Quick Start
//!
//! ```rust
//! use fiql::{FieldMap, Value};
//!
//! let mut record = FieldMap::new();
//! record.insert("name".into(), Value::from("Ada Lovelace"));
//! record.insert("born".into(), Value::from(1815));
//! record.insert("tags".into(), Value::from(vec!["math", "engines"]));
//!
//! assert!(fiql::evaluate("name==ada*;born<1900", &record).unwrap());
//! assert!(fiql::evaluate("tags==engines,born==1900~1999", &record).unwrap());
//! assert!(!fiql::evaluate("name=#=ADA*", &record).unwrap());
//! ```
//!
//! # Reserved Characters
//!
//! `( ) ; , ~ | [ ]` and the operators are syntax. Prefix them with a
//! backslash to use them as data (`name==a\,b`), or percent-encode them in
//! the literal (`name==a%2Cb`). Literals are percent-decoded like URL query
//! values, so `+` stands for a space.
//!
//! # Objects
//!
//! Implement [`Filterable`] (or derive it with `fiql-macros`) to evaluate
//! queries directly against your own types with [`evaluate_object`] or the
//! collection helpers on [`Evaluator`].

mod compare;
mod date;
mod error;
mod escape;
mod eval;
mod glob;
mod literal;
mod op;
mod traits;
mod value;

// Re-export public API
pub use compare::Clause;
pub use error::{ErrorKind, FiqlError, Result};
pub use eval::{evaluate, evaluate_object, EvalOptions, Evaluator};
pub use op::Op;
pub use traits::{FieldMap, Filterable, Record, ToValue};
pub use value::{Number, Timestamp, Value};

/// Date literal parsing, exposed for callers that build records from text.
pub mod dates {
    pub use crate::date::parse;
}
