//! Adapter traits between caller types and the evaluator.
//!
//! [`Record`] is what the evaluator reads fields from. [`Filterable`] turns an
//! arbitrary object into a [`FieldMap`] and is usually derived with
//! `#[derive(Filterable)]` from the `fiql-macros` crate. [`ToValue`] converts
//! individual field types and is what the derive calls for each field.

use std::collections::{BTreeMap, HashMap};

use crate::value::{Number, Timestamp, Value};

/// Field name to value mapping consumed by the evaluator.
pub type FieldMap = HashMap<String, Value>;

/// A source of named field values.
///
/// Field names are case-sensitive. A field that is not present is treated
/// exactly like a field holding [`Value::Null`].
pub trait Record {
    /// Returns the value stored under `name`, if any.
    fn field(&self, name: &str) -> Option<&Value>;
}

impl Record for HashMap<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl Record for BTreeMap<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Option<&Value> {
        (**self).field(name)
    }
}

/// Types that can be evaluated against a query.
///
/// # Derive Usage
///
/// ```ignore
/// use fiql_macros::Filterable;
///
/// #[derive(Filterable)]
/// struct Contact {
///     #[fiql(rename = "FirstName")]
///     first_name: String,
///     country: u32,
///     #[fiql(skip)]
///     internal_id: u64,
/// }
///
/// assert!(fiql::evaluate_object("FirstName==ada", &contact)?);
/// ```
///
/// # Manual Implementation
///
/// ```
/// use fiql::{FieldMap, Filterable, ToValue};
///
/// struct Contact {
///     first_name: String,
///     country: u32,
/// }
///
/// impl Filterable for Contact {
///     fn to_field_map(&self) -> FieldMap {
///         let mut fields = FieldMap::new();
///         fields.insert("FirstName".into(), self.first_name.to_value());
///         fields.insert("Country".into(), self.country.to_value());
///         fields
///     }
/// }
///
/// let contact = Contact { first_name: "Ada".into(), country: 44 };
/// assert!(fiql::evaluate_object("FirstName==ada;Country==44", &contact).unwrap());
/// ```
pub trait Filterable {
    /// Builds the field map the query is evaluated against.
    fn to_field_map(&self) -> FieldMap;
}

impl Filterable for FieldMap {
    fn to_field_map(&self) -> FieldMap {
        self.clone()
    }
}

/// Conversion of a single field into a [`Value`].
///
/// Implemented for strings, booleans, all primitive numbers, [`Timestamp`],
/// chrono date types, `Option<T>` (`None` becomes [`Value::Null`]) and
/// sequences.
pub trait ToValue {
    /// Converts this field into a [`Value`].
    fn to_value(&self) -> Value;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToValue for Number {
    fn to_value(&self) -> Value {
        Value::Number(*self)
    }
}

impl ToValue for Timestamp {
    fn to_value(&self) -> Value {
        Value::Instant(*self)
    }
}

macro_rules! number_to_value {
    ($($source:ty),*) => {
        $(
            impl ToValue for $source {
                fn to_value(&self) -> Value {
                    Value::Number(Number::from(*self))
                }
            }
        )*
    };
}

number_to_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<Tz: chrono::TimeZone> ToValue for chrono::DateTime<Tz> {
    fn to_value(&self) -> Value {
        Value::Instant(Timestamp(self.timestamp_millis()))
    }
}

/// Naive date-times are taken as UTC.
impl ToValue for chrono::NaiveDateTime {
    fn to_value(&self) -> Value {
        Value::Instant(Timestamp(self.and_utc().timestamp_millis()))
    }
}

/// Naive dates are taken as midnight UTC.
impl ToValue for chrono::NaiveDate {
    fn to_value(&self) -> Value {
        self.and_time(chrono::NaiveTime::MIN).to_value()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::Sequence(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestItem {
        name: String,
        count: i32,
        nickname: Option<String>,
    }

    impl Filterable for TestItem {
        fn to_field_map(&self) -> FieldMap {
            let mut fields = FieldMap::new();
            fields.insert("name".into(), self.name.to_value());
            fields.insert("count".into(), self.count.to_value());
            fields.insert("nickname".into(), self.nickname.to_value());
            fields
        }
    }

    #[test]
    fn filterable_manual_impl() {
        let item = TestItem {
            name: "test".to_string(),
            count: 42,
            nickname: None,
        };

        let fields = item.to_field_map();
        assert_eq!(fields.field("name"), Some(&Value::from("test")));
        assert_eq!(fields.field("count"), Some(&Value::Number(Number::I64(42))));
        assert_eq!(fields.field("nickname"), Some(&Value::Null));
        assert_eq!(fields.field("unknown"), None);
    }

    #[test]
    fn btree_record() {
        let mut fields = BTreeMap::new();
        fields.insert("a".to_string(), Value::from(1));
        assert_eq!(fields.field("a"), Some(&Value::from(1)));
        assert_eq!(fields.field("A"), None);
    }

    #[test]
    fn sequences_convert_element_wise() {
        let tags = vec!["x".to_string(), "y".to_string()];
        assert_eq!(
            tags.to_value(),
            Value::Sequence(vec![Value::from("x"), Value::from("y")])
        );
    }

    #[test]
    fn naive_date_is_midnight_utc() {
        let date = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert_eq!(
            date.to_value(),
            Value::Instant(Timestamp::from_secs(1_577_836_800))
        );
    }
}
