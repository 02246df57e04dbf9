//! Query evaluation: grouping, boolean combinators and operator dispatch.
//!
//! Evaluation runs in fixed stages:
//!
//! ```text
//! query ─ escape ─ resolve parentheses ─ split `,` (OR) ─ split `;` (AND) ─ clause
//! ```
//!
//! Parenthesized groups are resolved innermost first: each group is evaluated
//! and replaced by the text `true` or `false` until no parentheses remain.
//! The flat result is then split on `,`, and each OR branch on `;`, so `;`
//! binds tighter than `,`.

use chrono::{FixedOffset, Offset, Utc};

use crate::compare::Clause;
use crate::error::{FiqlError, Result};
use crate::escape::escape;
use crate::traits::{Filterable, Record};

/// Evaluation settings.
///
/// ```
/// use chrono::FixedOffset;
/// use fiql::EvalOptions;
///
/// let options = EvalOptions::default()
///     .offset(FixedOffset::east_opt(3600).unwrap())
///     .unescape_control_sequences(true);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalOptions {
    /// Zone used for `DT`, `D` and `T` date literals. Defaults to UTC.
    pub offset: FixedOffset,
    /// Turn `\n`, `\t` and `\r` in literals into control characters.
    ///
    /// Off by default: the sequences then only escape the following letter.
    pub unescape_control_sequences: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        EvalOptions {
            offset: Utc.fix(),
            unescape_control_sequences: false,
        }
    }
}

impl EvalOptions {
    /// Sets the zone for zone-less date literals.
    pub fn offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Enables or disables control-sequence unescaping in literals.
    pub fn unescape_control_sequences(mut self, enabled: bool) -> Self {
        self.unescape_control_sequences = enabled;
        self
    }
}

/// Evaluates queries with a fixed set of [`EvalOptions`].
///
/// # Example
///
/// ```
/// use fiql::{Evaluator, FieldMap, Value};
///
/// let mut ada = FieldMap::new();
/// ada.insert("name".into(), Value::from("Ada"));
/// ada.insert("born".into(), Value::from(1815));
///
/// let mut alan = FieldMap::new();
/// alan.insert("name".into(), Value::from("Alan"));
/// alan.insert("born".into(), Value::from(1912));
///
/// let evaluator = Evaluator::default();
/// assert!(evaluator.evaluate("name==a*;born<1900", &ada).unwrap());
///
/// let people = vec![ada, alan];
/// let found = evaluator.filter("born==1900~1999", &people).unwrap();
/// assert_eq!(found.len(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    options: EvalOptions,
}

impl Evaluator {
    /// Creates an evaluator with the given options.
    pub fn new(options: EvalOptions) -> Self {
        Evaluator { options }
    }

    /// Evaluates `query` against a record.
    pub fn evaluate<R: Record + ?Sized>(&self, query: &str, record: &R) -> Result<bool> {
        let escaped = escape(query);
        let result = self.resolve(escaped, record)?;
        tracing::debug!(query, result, "evaluated");
        Ok(result)
    }

    /// Evaluates `query` against the field map of an object.
    pub fn evaluate_object<T: Filterable + ?Sized>(&self, query: &str, object: &T) -> Result<bool> {
        self.evaluate(query, &object.to_field_map())
    }

    // ========================================================================
    // Collections
    // ========================================================================

    /// Returns references to the items matching `query`, in input order.
    ///
    /// The first evaluation error aborts the whole call.
    pub fn filter<'a, T: Filterable>(&self, query: &str, items: &'a [T]) -> Result<Vec<&'a T>> {
        let mut results = Vec::new();
        for item in items {
            if self.evaluate_object(query, item)? {
                results.push(item);
            }
        }
        Ok(results)
    }

    /// Counts the items matching `query`.
    pub fn count<T: Filterable>(&self, query: &str, items: &[T]) -> Result<usize> {
        Ok(self.filter(query, items)?.len())
    }

    /// Finds the first item matching `query`.
    pub fn find<'a, T: Filterable>(&self, query: &str, items: &'a [T]) -> Result<Option<&'a T>> {
        for item in items {
            if self.evaluate_object(query, item)? {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    // ========================================================================
    // Stages
    // ========================================================================

    /// Replaces the first closed group with its result until none remain.
    fn resolve<R: Record + ?Sized>(&self, mut expression: String, record: &R) -> Result<bool> {
        loop {
            let Some((open, close)) = innermost_group(&expression)? else {
                return self.combine(&expression, record);
            };

            let result = self.combine(&expression[open + 1..close], record)?;
            tracing::trace!(group = &expression[open..=close], result, "resolved group");
            expression.replace_range(open..=close, if result { "true" } else { "false" });
        }
    }

    /// Evaluates a flat fragment: OR over `,`, then AND over `;`.
    ///
    /// Every part is evaluated, even once the outcome is known.
    fn combine<R: Record + ?Sized>(&self, fragment: &str, record: &R) -> Result<bool> {
        if fragment.contains(',') {
            let parts = fragment
                .split(',')
                .map(|part| self.combine(part, record))
                .collect::<Result<Vec<bool>>>()?;
            Ok(parts.into_iter().any(|hit| hit))
        } else if fragment.contains(';') {
            let parts = fragment
                .split(';')
                .map(|part| self.dispatch(part, record))
                .collect::<Result<Vec<bool>>>()?;
            Ok(parts.into_iter().all(|hit| hit))
        } else {
            self.dispatch(fragment, record)
        }
    }

    /// Evaluates an atomic fragment.
    fn dispatch<R: Record + ?Sized>(&self, fragment: &str, record: &R) -> Result<bool> {
        match fragment {
            "true" => return Ok(true),
            "false" => return Ok(false),
            _ => {}
        }

        let clause = Clause::parse(fragment).ok_or_else(|| FiqlError::UnknownOperator {
            fragment: fragment.to_string(),
        })?;
        clause.matches(record.field(clause.selector), &self.options)
    }
}

/// Finds the group closed by the first `)`.
///
/// Returns byte offsets of its `(` and `)`, or `None` if the expression has
/// no parentheses at all.
fn innermost_group(expression: &str) -> Result<Option<(usize, usize)>> {
    let mut opens = Vec::new();

    for (index, c) in expression.char_indices() {
        match c {
            '(' => opens.push(index),
            ')' => {
                return match opens.pop() {
                    Some(open) => Ok(Some((open, index))),
                    None => Err(FiqlError::ExtraClosingParenthesis { position: index }),
                };
            }
            _ => {}
        }
    }

    if opens.is_empty() {
        Ok(None)
    } else {
        Err(FiqlError::UnclosedParenthesis)
    }
}

/// Evaluates `query` against a record with default options.
///
/// ```
/// use fiql::{FieldMap, Value};
///
/// let mut record = FieldMap::new();
/// record.insert("a".into(), Value::from(1));
///
/// assert!(fiql::evaluate("(a==1),(b==2)", &record).unwrap());
/// assert!(fiql::evaluate("(a==1", &record).unwrap_err().is_syntax());
/// ```
pub fn evaluate<R: Record + ?Sized>(query: &str, record: &R) -> Result<bool> {
    Evaluator::default().evaluate(query, record)
}

/// Evaluates `query` against an object's field map with default options.
pub fn evaluate_object<T: Filterable + ?Sized>(query: &str, object: &T) -> Result<bool> {
    Evaluator::default().evaluate_object(query, object)
}
