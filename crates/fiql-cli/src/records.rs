//! Reading JSON input and converting it into field maps.

use std::collections::HashSet;
use std::io::BufRead;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, FixedOffset};
use fiql::{FieldMap, Number, Timestamp, Value};
use serde_json::{Map, Value as Json};

use crate::cli::InputFormat;

/// Reads JSON objects from `reader`.
pub fn read_objects<R: BufRead>(reader: R, format: InputFormat) -> Result<Vec<Map<String, Json>>> {
    match format {
        InputFormat::Jsonl => {
            let mut objects = Vec::new();
            for (index, line) in reader.lines().enumerate() {
                let line = line.context("Input: failed to read line")?;
                if line.trim().is_empty() {
                    continue;
                }
                let json: Json = serde_json::from_str(&line)
                    .with_context(|| format!("Input: invalid JSON on line {}", index + 1))?;
                let object =
                    into_object(json).with_context(|| format!("Input: line {}", index + 1))?;
                objects.push(object);
            }
            Ok(objects)
        }
        InputFormat::Json => {
            let json: Json = serde_json::from_reader(reader).context("Input: invalid JSON document")?;
            match json {
                Json::Array(items) => items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| {
                        into_object(item).with_context(|| format!("Input: array element {index}"))
                    })
                    .collect(),
                other => Ok(vec![into_object(other).context("Input: document")?]),
            }
        }
    }
}

fn into_object(json: Json) -> Result<Map<String, Json>> {
    match json {
        Json::Object(map) => Ok(map),
        other => Err(anyhow!("expected a JSON object, found {}", json_type(&other))),
    }
}

fn json_type(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}

/// Converts JSON objects into records, treating some fields as dates.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    instants: HashSet<String>,
    offset: FixedOffset,
}

impl RecordBuilder {
    pub fn new<I, S>(instants: I, offset: FixedOffset) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RecordBuilder {
            instants: instants.into_iter().map(Into::into).collect(),
            offset,
        }
    }

    pub fn build(&self, object: &Map<String, Json>) -> Result<FieldMap> {
        object
            .iter()
            .map(|(name, json)| {
                let value = if self.instants.contains(name) {
                    self.instant(json)
                        .with_context(|| format!("Field '{name}': not a date"))?
                } else {
                    to_value(json)
                };
                Ok((name.clone(), value))
            })
            .collect()
    }

    fn instant(&self, json: &Json) -> Result<Value> {
        match json {
            Json::Null => Ok(Value::Null),
            Json::Number(n) => {
                let millis = match (n.as_i64(), n.as_f64()) {
                    (Some(millis), _) => millis,
                    (None, Some(f)) if in_epoch_range(f) => f as i64,
                    _ => bail!("{n} is out of range for epoch milliseconds"),
                };
                Ok(Value::Instant(Timestamp::from_millis(millis)))
            }
            Json::String(s) => {
                if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
                    return Ok(Value::Instant(Timestamp::from(parsed)));
                }
                let parsed = fiql::dates::parse(s, self.offset)
                    .with_context(|| format!("'{s}' is neither RFC 3339 nor a date literal"))?;
                Ok(Value::Instant(parsed))
            }
            Json::Array(items) => items
                .iter()
                .map(|item| self.instant(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Sequence),
            other => bail!("found {}", json_type(other)),
        }
    }
}

fn in_epoch_range(f: f64) -> bool {
    f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64
}

/// Maps JSON onto [`Value`]. Objects become the text of their JSON form.
pub fn to_value(json: &Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(Number::I64(i))
            } else if let Some(u) = n.as_u64() {
                Value::Number(Number::U64(u))
            } else {
                Value::Number(Number::F64(n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        Json::String(s) => Value::Text(s.clone()),
        Json::Array(items) => Value::Sequence(items.iter().map(to_value).collect()),
        Json::Object(_) => Value::Text(json.to_string()),
    }
}
