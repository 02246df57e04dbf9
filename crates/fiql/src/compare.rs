//! Typed comparison of a record field against a query literal.
//!
//! A [`Clause`] is one atomic comparison, `<selector><op><literal>`. How the
//! literal is read depends on the runtime type of the field:
//!
//! | Field | Equality (`==`, `=#=`, `!=`, `!#=`) | Relational (`>`, `>=`, `<`, `<=`) |
//! |-------|--------------------------------------|-----------------------------------|
//! | Null | literal is `null` | never |
//! | Text, Bool | glob, `[substring]`, `a\|b` alternation | never |
//! | Number | number or `low~high` range | number |
//! | Instant | date or `low~high` range | date |
//! | Sequence | any element matches | any element matches |

use std::borrow::Cow;

use chrono::FixedOffset;

use crate::date;
use crate::error::{FiqlError, Result};
use crate::eval::EvalOptions;
use crate::glob;
use crate::literal;
use crate::op::Op;
use crate::value::{Number, Timestamp, Value};

/// A single atomic comparison taken from a query.
///
/// ```
/// use fiql::{Clause, EvalOptions, Op, Value};
///
/// let clause = Clause::parse("name==ada*").unwrap();
/// assert_eq!(clause.selector, "name");
/// assert_eq!(clause.op, Op::Eq);
///
/// let hit = clause
///     .matches(Some(&Value::from("Ada Lovelace")), &EvalOptions::default())
///     .unwrap();
/// assert!(hit);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clause<'q> {
    /// Field name left of the operator.
    pub selector: &'q str,
    /// The comparison operator.
    pub op: Op,
    /// Raw text right of the operator, not yet percent-decoded.
    pub literal: &'q str,
}

impl<'q> Clause<'q> {
    /// Splits an atomic fragment at its operator.
    ///
    /// Returns `None` if the fragment contains no known operator.
    pub fn parse(fragment: &'q str) -> Option<Self> {
        let (op, at) = Op::find_in(fragment)?;
        Some(Clause {
            selector: &fragment[..at],
            op,
            literal: &fragment[at + op.token().len()..],
        })
    }

    /// Evaluates this clause against a field value.
    ///
    /// `None` means the record has no such field and behaves like
    /// [`Value::Null`].
    pub fn matches(&self, field: Option<&Value>, options: &EvalOptions) -> Result<bool> {
        let value = field.unwrap_or(&Value::Null);

        let result = if self.op.is_equality() {
            self.equals(value, options)? != self.op.is_negated()
        } else {
            self.relates(value, options)?
        };

        tracing::trace!(
            selector = self.selector,
            op = %self.op,
            field_type = value.type_name(),
            result,
            "compared"
        );
        Ok(result)
    }

    fn decoded(&self, options: &EvalOptions) -> Result<String> {
        literal::decode(self.literal, options.unescape_control_sequences)
    }

    // ------------------------------------------------------------------------
    // Equality family
    // ------------------------------------------------------------------------

    fn equals(&self, value: &Value, options: &EvalOptions) -> Result<bool> {
        if let (Value::Text(s), "") = (value, self.literal) {
            return Ok(s.is_empty());
        }

        let decoded = self.decoded(options)?;
        self.value_equals(value, &decoded, options)
    }

    fn value_equals(&self, value: &Value, decoded: &str, options: &EvalOptions) -> Result<bool> {
        match value {
            Value::Null => Ok(decoded == "null"),
            Value::Text(_) | Value::Bool(_) => self.text_equals(&text_form(value), decoded, options),
            Value::Number(n) => self.number_equals(*n, decoded),
            Value::Instant(t) => self.instant_equals(*t, decoded, options.offset),
            Value::Sequence(items) => {
                for item in items {
                    if self.element_equals(item, decoded, options)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    fn element_equals(&self, item: &Value, decoded: &str, options: &EvalOptions) -> Result<bool> {
        match item {
            // A bare `*` accepts any non-empty element.
            Value::Text(_) | Value::Bool(_) if self.literal == "*" => {
                Ok(!text_form(item).is_empty())
            }
            _ => self.value_equals(item, decoded, options),
        }
    }

    fn text_equals(&self, text: &str, decoded: &str, options: &EvalOptions) -> Result<bool> {
        let ignore_case = self.op.ignores_case();

        if let Some(alternation) = literal::alternation(self.literal) {
            for raw in alternation.options {
                let option = literal::decode(raw, options.unescape_control_sequences)?;
                let hit = if alternation.contains {
                    glob::string_contains(&option, text, ignore_case)?
                } else {
                    glob::string_equals(&option, text, ignore_case)?
                };
                if hit {
                    return Ok(true);
                }
            }
            return Ok(false);
        }

        if literal::bracketed(self.literal).is_some() {
            if let Some(inner) = literal::bracketed(decoded) {
                if glob::string_contains(inner, text, ignore_case)? {
                    return Ok(true);
                }
            }
        }

        glob::string_equals(decoded, text, ignore_case)
    }

    fn number_equals(&self, n: Number, decoded: &str) -> Result<bool> {
        let n = n.to_f64();
        match literal::range(self.selector, decoded)? {
            Some((low, high)) => Ok(n >= parse_number(low)? && n <= parse_number(high)?),
            None => Ok(n == parse_number(decoded)?),
        }
    }

    fn instant_equals(&self, t: Timestamp, decoded: &str, offset: FixedOffset) -> Result<bool> {
        match literal::range(self.selector, decoded)? {
            Some((low, high)) => {
                Ok(t >= date::parse(low, offset)? && t <= date::parse(high, offset)?)
            }
            None => Ok(t == date::parse(decoded, offset)?),
        }
    }

    // ------------------------------------------------------------------------
    // Relational family
    // ------------------------------------------------------------------------

    fn relates(&self, value: &Value, options: &EvalOptions) -> Result<bool> {
        if let (Value::Text(_), "") = (value, self.literal) {
            return Ok(false);
        }

        let decoded = self.decoded(options)?;
        match value {
            Value::Null | Value::Text(_) | Value::Bool(_) => Ok(false),
            Value::Number(n) => Ok(self.number_relates(*n, parse_number(&decoded)?)),
            Value::Instant(t) => Ok(self
                .op
                .eval_ordering(t.cmp(&date::parse(&decoded, options.offset)?))),
            Value::Sequence(items) => {
                let rhs = RelationalLiteral {
                    number: parse_number(&decoded).ok(),
                    instant: date::parse(&decoded, options.offset).ok(),
                };
                Ok(self.any_element_relates(items, &rhs))
            }
        }
    }

    fn number_relates(&self, n: Number, rhs: f64) -> bool {
        n.to_f64()
            .partial_cmp(&rhs)
            .is_some_and(|ordering| self.op.eval_ordering(ordering))
    }

    /// Each element is compared against the reading of the literal that fits
    /// its own type; an element whose reading failed to parse never matches.
    fn any_element_relates(&self, items: &[Value], rhs: &RelationalLiteral) -> bool {
        items.iter().any(|item| match item {
            Value::Number(n) => rhs.number.is_some_and(|r| self.number_relates(*n, r)),
            Value::Instant(t) => rhs.instant.is_some_and(|r| self.op.eval_ordering(t.cmp(&r))),
            Value::Sequence(inner) => self.any_element_relates(inner, rhs),
            Value::Null | Value::Text(_) | Value::Bool(_) => false,
        })
    }
}

/// Literal of a relational comparison read both as number and as date.
struct RelationalLiteral {
    number: Option<f64>,
    instant: Option<Timestamp>,
}

fn text_form(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Text(s) => Cow::Borrowed(s),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        _ => Cow::Borrowed(""),
    }
}

fn parse_number(literal: &str) -> Result<f64> {
    literal
        .trim()
        .parse::<f64>()
        .map_err(|source| FiqlError::InvalidNumber {
            literal: literal.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEW_YEAR_2020: i64 = 1_577_836_800_000;

    fn check(fragment: &str, value: Value) -> Result<bool> {
        let clause = Clause::parse(fragment).expect("fragment has an operator");
        clause.matches(Some(&value), &EvalOptions::default())
    }

    fn hit(fragment: &str, value: Value) -> bool {
        check(fragment, value).unwrap()
    }

    #[test]
    fn parse_splits_at_operator() {
        let clause = Clause::parse("age>=18").unwrap();
        assert_eq!(clause.selector, "age");
        assert_eq!(clause.op, Op::Gte);
        assert_eq!(clause.literal, "18");

        assert!(Clause::parse("age").is_none());
    }

    #[test]
    fn empty_literal_on_text() {
        assert!(hit("name==", Value::from("")));
        assert!(!hit("name==", Value::from("x")));
        assert!(hit("name!=", Value::from("x")));
    }

    #[test]
    fn null_field() {
        assert!(hit("name==null", Value::Null));
        assert!(!hit("name==x", Value::Null));
        assert!(hit("name!=x", Value::Null));
        assert!(!hit("name>5", Value::Null));

        let missing = Clause::parse("name==null").unwrap();
        assert!(missing.matches(None, &EvalOptions::default()).unwrap());
    }

    #[test]
    fn number_variants_compare_as_f64() {
        assert!(hit("n==1", Value::Number(Number::F64(1.0))));
        assert!(hit("n==1.0", Value::Number(Number::I64(1))));
        assert!(hit("n>=5", Value::Number(Number::U64(5))));
        assert!(!hit("n<5", Value::Number(Number::U64(5))));
        assert!(!hit("n>1", Value::Number(Number::F64(f64::NAN))));
    }

    #[test]
    fn string_case_sensitivity() {
        assert!(hit("name==ABC", Value::from("abc")));
        assert!(!hit("name=#=ABC", Value::from("abc")));
        assert!(hit("name!#=ABC", Value::from("abc")));
        assert!(!hit("name!=ABC", Value::from("abc")));
    }

    #[test]
    fn string_globs() {
        assert!(hit("name==abc*", Value::from("abcdef")));
        assert!(hit("name==[abc*]", Value::from("abcdef")));
        assert!(hit("name==[cd]", Value::from("abcdef")));
        assert!(!hit("name==cd", Value::from("abcdef")));
        assert!(hit("name==a?c", Value::from("abc")));
    }

    #[test]
    fn alternation() {
        assert!(hit("city==Berlin|Paris", Value::from("paris")));
        assert!(!hit("city==Berlin|Paris", Value::from("Rome")));
        assert!(hit("city==[erl|ari]", Value::from("Berlin")));
        assert!(!hit("city==erl|ari", Value::from("Berlin")));
        assert!(hit("city==R*|P*", Value::from("Rome")));
        assert!(!hit("city=#=berlin|paris", Value::from("Paris")));
    }

    #[test]
    fn percent_decoded_literal() {
        assert!(hit("name==a%2Cb", Value::from("a,b")));
        assert!(hit("name==New+York", Value::from("New York")));
        assert!(hit("city==Rome|New+York", Value::from("New York")));
        assert!(check("name==50%", Value::from("x")).unwrap_err().is_value());
    }

    #[test]
    fn bool_fields_compare_as_text() {
        assert!(hit("done==true", Value::from(true)));
        assert!(hit("done==TRUE", Value::from(true)));
        assert!(!hit("done=#=TRUE", Value::from(true)));
        assert!(hit("done!=true", Value::from(false)));
        assert!(hit("done==t*", Value::from(true)));
        assert!(!hit("done>1", Value::from(true)));
    }

    #[test]
    fn numbers() {
        assert!(hit("n==5", Value::from(5)));
        assert!(hit("n==5.0", Value::from(5u8)));
        assert!(hit("n!=6", Value::from(5)));
        assert!(hit("n>4.5", Value::from(5)));
        assert!(hit("n>=5", Value::from(5)));
        assert!(!hit("n<5", Value::from(5)));
        assert!(hit("n<=5", Value::from(5.0)));
        assert!(hit("n==1e3", Value::from(1000)));
    }

    #[test]
    fn number_ranges_are_inclusive() {
        assert!(hit("n==5~10", Value::from(5)));
        assert!(hit("n==5~10", Value::from(10)));
        assert!(hit("n==5~10", Value::from(7.5)));
        assert!(!hit("n==5~10", Value::from(4.999)));
        assert!(!hit("n==5~10", Value::from(10.001)));
        assert!(hit("n!=5~10", Value::from(11)));
    }

    #[test]
    fn malformed_numbers_and_ranges() {
        let err = check("n==abc", Value::from(1)).unwrap_err();
        assert!(matches!(err, FiqlError::InvalidNumber { .. }));

        let err = check("n==~10", Value::from(1)).unwrap_err();
        assert!(matches!(err, FiqlError::MalformedRange { .. }));
        assert!(err.is_syntax());

        assert!(check("n>abc", Value::from(1)).is_err());
    }

    #[test]
    fn relational_on_text_is_false() {
        assert!(!hit("name>", Value::from("abc")));
        assert!(!hit("name>a", Value::from("abc")));
        assert!(!hit("name<=zzz", Value::from("abc")));
    }

    #[test]
    fn instants() {
        let new_year = Value::Instant(Timestamp(NEW_YEAR_2020));
        assert!(hit("at==D2020-01-01", new_year.clone()));
        assert!(hit("at==DT2020-01-01+00:00:00", new_year.clone()));
        assert!(hit("at==L1577836800000", new_year.clone()));
        assert!(hit("at>D2019-12-31", new_year.clone()));
        assert!(hit("at<=D2020-01-01", new_year.clone()));
        assert!(!hit("at<D2020-01-01", new_year.clone()));
        assert!(hit("at==D2019-12-31~D2020-01-02", new_year.clone()));
        assert!(!hit("at==D2020-01-02~D2020-01-03", new_year.clone()));
    }

    #[test]
    fn malformed_dates() {
        let at = Value::Instant(Timestamp(NEW_YEAR_2020));
        let err = check("at==X2020-01-01", at.clone()).unwrap_err();
        assert!(matches!(err, FiqlError::MissingDateFormat { .. }));

        let err = check("at==~D2020-01-01", at.clone()).unwrap_err();
        assert!(matches!(err, FiqlError::MalformedRange { .. }));

        assert!(check("at>2020", at).is_err());
    }

    #[test]
    fn sequences_match_any_element() {
        let numbers = Value::from(vec![1, 7, 20]);
        assert!(hit("n>5", numbers.clone()));
        assert!(!hit("n>100", numbers.clone()));
        assert!(hit("n==7", numbers.clone()));
        assert!(hit("n==15~25", numbers.clone()));
        assert!(!hit("n==8", numbers.clone()));
        assert!(hit("n!=8", numbers));

        let tags = Value::from(vec!["red", "green"]);
        assert!(hit("tags==GREEN", tags.clone()));
        assert!(hit("tags==[ee]", tags.clone()));
        assert!(hit("tags==blue|red", tags.clone()));
        assert!(!hit("tags==blue", tags));
    }

    #[test]
    fn star_accepts_any_non_empty_element() {
        assert!(hit("tags==*", Value::from(vec!["", "x"])));
        assert!(!hit("tags==*", Value::from(vec![""])));
        assert!(!hit("tags==*", Value::Sequence(vec![])));
    }

    #[test]
    fn sequence_null_elements() {
        let items = Value::Sequence(vec![Value::Null, Value::from("a")]);
        assert!(hit("x==null", items.clone()));
        assert!(hit("x==a", items.clone()));
        assert!(!hit("x>1", items));
    }

    #[test]
    fn relational_sequences_dispatch_per_element_type() {
        let mixed = Value::Sequence(vec![
            Value::from("text"),
            Value::Instant(Timestamp(NEW_YEAR_2020)),
            Value::from(3),
        ]);
        // Only the number can read `2`.
        assert!(hit("x>2", mixed.clone()));
        // Only the instant can read a date literal.
        assert!(hit("x>D2019-01-01", mixed.clone()));
        assert!(!hit("x>D2021-01-01", mixed.clone()));
        // Unreadable literal matches nothing instead of failing.
        assert!(!hit("x>abc", mixed));
    }

    #[test]
    fn nested_sequences() {
        let nested = Value::Sequence(vec![Value::from(vec![1, 2]), Value::from(vec![30])]);
        assert!(hit("x>10", nested.clone()));
        assert!(hit("x==2", nested));
    }

    #[test]
    fn control_sequence_option() {
        let value = Value::from("a\nb");
        let clause = Clause::parse(r"x==a\nb").unwrap();

        assert!(!clause
            .matches(Some(&value), &EvalOptions::default())
            .unwrap());

        let unescaping = EvalOptions::default().unescape_control_sequences(true);
        assert!(clause.matches(Some(&value), &unescaping).unwrap());
    }

    #[test]
    fn control_sequences_stay_inert_by_default() {
        // Without unescaping, the backslash only makes the `n` literal.
        assert!(hit(r"x==a\nb", Value::from("anb")));
    }
}
