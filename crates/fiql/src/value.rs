//! Runtime value types for field comparison.
//!
//! The [`Value`] enum is the closed set of types a record field can hold:
//! null, text, boolean, number, instant, or an ordered sequence of those.

/// Runtime value of a record field.
///
/// Records map field names to values of this type. The comparator matches on
/// the variant to decide how a right-hand literal is interpreted.
///
/// # Example
///
/// ```
/// use fiql::{FieldMap, Number, Value};
///
/// let mut record = FieldMap::new();
/// record.insert("name".into(), Value::from("Ada"));
/// record.insert("age".into(), Value::Number(Number::U64(36)));
/// record.insert("tags".into(), Value::from(vec!["math", "engines"]));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Field is null or absent.
    #[default]
    Null,
    /// String value.
    Text(String),
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// Point in time (milliseconds since Unix epoch).
    Instant(Timestamp),
    /// Ordered list of values, matched element-wise.
    Sequence(Vec<Value>),
}

impl Value {
    /// Returns `true` if this is a `Null` value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if this is a `Text` value.
    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// Returns `true` if this is a `Bool` value.
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if this is a `Number` value.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns `true` if this is an `Instant` value.
    pub fn is_instant(&self) -> bool {
        matches!(self, Value::Instant(_))
    }

    /// Returns `true` if this is a `Sequence` value.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the timestamp value, if present.
    pub fn as_instant(&self) -> Option<Timestamp> {
        match self {
            Value::Instant(t) => Some(*t),
            _ => None,
        }
    }

    /// Extracts the elements of a sequence, if present.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the variant, used in log output.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Text(_) => "text",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Instant(_) => "instant",
            Value::Sequence(_) => "sequence",
        }
    }
}

/// Numeric value supporting all common numeric types.
///
/// The variant records where the number came from; comparisons against
/// query literals always happen in `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )*
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// Timestamp value represented as milliseconds since Unix epoch.
///
/// ```
/// use fiql::Timestamp;
///
/// let ts = Timestamp::from_secs(1_577_836_800); // 2020-01-01T00:00:00Z
/// assert_eq!(ts.as_millis(), 1_577_836_800_000);
/// assert!(Timestamp(1000) < Timestamp(2000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Creates a new timestamp from seconds since Unix epoch.
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs * 1000)
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}

impl<Tz: chrono::TimeZone> From<chrono::DateTime<Tz>> for Timestamp {
    fn from(dt: chrono::DateTime<Tz>) -> Self {
        Timestamp(dt.timestamp_millis())
    }
}

// Conversions into Value

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<Timestamp> for Value {
    fn from(t: Timestamp) -> Self {
        Value::Instant(t)
    }
}

macro_rules! value_from_number {
    ($($source:ty),*) => {
        $(
            impl From<$source> for Value {
                fn from(n: $source) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

value_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}
