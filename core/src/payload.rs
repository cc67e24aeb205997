//! Field-by-field reader for JSON payloads returned by DTI.
//!
//! # Design
//! Every domain type implements `FromPayload` by pulling its keys one at a
//! time out of a `Fields` view. `Fields` remembers where it sits in the
//! document, so a failure deep inside a nested list reports the full path
//! (`data.outfit.wornItems[2].id`) instead of a bare key.
//!
//! Rules shared by every type:
//! - keys the reader never asks for are ignored;
//! - `null` is treated exactly like an absent key;
//! - integer fields accept JSON numbers or numeric strings (`"123"`);
//! - optional lists default to empty and skip `null` entries.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::MalformedResponseError;

/// A domain type that can be built from a JSON object.
pub trait FromPayload: Sized {
    fn from_payload(fields: &Fields<'_>) -> Result<Self, MalformedResponseError>;
}

/// Deserialize `value` as `T`, reporting errors relative to `path`.
pub fn from_value<T: FromPayload>(path: &str, value: &Value) -> Result<T, MalformedResponseError> {
    T::from_payload(&Fields::new(path, value)?)
}

/// A borrowed view of one JSON object plus its path in the document.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    path: String,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(path: impl Into<String>, value: &'a Value) -> Result<Self, MalformedResponseError> {
        let path = path.into();
        match value {
            Value::Object(map) => Ok(Self { path, map }),
            other => Err(MalformedResponseError::new(
                path,
                format!("expected object, got {}", describe(other)),
            )),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw value of `key`, or `None` when absent or null.
    pub fn value(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    pub fn has(&self, key: &str) -> bool {
        self.value(key).is_some()
    }

    pub fn error(&self, key: &str, reason: impl Into<String>) -> MalformedResponseError {
        MalformedResponseError::new(self.child(key), reason)
    }

    fn child(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    fn require(&self, key: &str) -> Result<&'a Value, MalformedResponseError> {
        self.value(key).ok_or_else(|| {
            let reason = if self.map.contains_key(key) {
                "required field is null"
            } else {
                "missing required field"
            };
            self.error(key, reason)
        })
    }

    /// A required integer, coerced from a number or a numeric string.
    pub fn id<T: TryFrom<u64>>(&self, key: &str) -> Result<T, MalformedResponseError> {
        let value = self.require(key)?;
        coerce(value).map_err(|reason| self.error(key, reason))
    }

    /// An optional integer with the same coercion as [`Fields::id`].
    pub fn opt_number<T: TryFrom<u64>>(&self, key: &str) -> Result<Option<T>, MalformedResponseError> {
        self.value(key)
            .map(|v| coerce(v).map_err(|reason| self.error(key, reason)))
            .transpose()
    }

    pub fn string(&self, key: &str) -> Result<String, MalformedResponseError> {
        let value = self.require(key)?;
        as_string(value).map_err(|reason| self.error(key, reason))
    }

    pub fn opt_string(&self, key: &str) -> Result<Option<String>, MalformedResponseError> {
        self.value(key)
            .map(|v| as_string(v).map_err(|reason| self.error(key, reason)))
            .transpose()
    }

    /// An optional boolean, `false` when absent.
    pub fn flag(&self, key: &str) -> Result<bool, MalformedResponseError> {
        match self.value(key) {
            None => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(self.error(key, format!("expected boolean, got {}", describe(other)))),
        }
    }

    /// A required string parsed with `FromStr`, e.g. an enum name.
    pub fn parse_str<T>(&self, key: &str) -> Result<T, MalformedResponseError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.string(key)?;
        raw.parse().map_err(|e: T::Err| self.error(key, e.to_string()))
    }

    /// A required RFC 3339 timestamp, normalized to UTC.
    pub fn timestamp(&self, key: &str) -> Result<DateTime<Utc>, MalformedResponseError> {
        let raw = self.string(key)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| self.error(key, format!("invalid timestamp {raw:?}: {e}")))
    }

    pub fn object(&self, key: &str) -> Result<Fields<'a>, MalformedResponseError> {
        let value = self.require(key)?;
        Fields::new(self.child(key), value)
    }

    pub fn opt_object(&self, key: &str) -> Result<Option<Fields<'a>>, MalformedResponseError> {
        self.value(key)
            .map(|v| Fields::new(self.child(key), v))
            .transpose()
    }

    /// A required nested object.
    pub fn parse<T: FromPayload>(&self, key: &str) -> Result<T, MalformedResponseError> {
        T::from_payload(&self.object(key)?)
    }

    pub fn opt_parse<T: FromPayload>(&self, key: &str) -> Result<Option<T>, MalformedResponseError> {
        self.opt_object(key)?
            .map(|f| T::from_payload(&f))
            .transpose()
    }

    /// An optional list of objects. Absent means empty.
    pub fn list<T: FromPayload>(&self, key: &str) -> Result<Vec<T>, MalformedResponseError> {
        self.list_with(key, |f| T::from_payload(f))
    }

    pub fn list_with<T>(
        &self,
        key: &str,
        parse: impl FnMut(&Fields<'a>) -> Result<T, MalformedResponseError>,
    ) -> Result<Vec<T>, MalformedResponseError> {
        self.objects(key)?.iter().map(parse).collect()
    }

    /// Like [`Fields::list`] but a bare object counts as a one-element list.
    /// DTI collapses single-result lookups this way.
    pub fn one_or_many<T: FromPayload>(&self, key: &str) -> Result<Vec<T>, MalformedResponseError> {
        match self.value(key) {
            Some(Value::Object(_)) => Ok(vec![self.parse(key)?]),
            _ => self.list(key),
        }
    }

    /// Sub-objects of an optional list, skipping `null` entries.
    pub fn objects(&self, key: &str) -> Result<Vec<Fields<'a>>, MalformedResponseError> {
        let Some(value) = self.value(key) else {
            return Ok(Vec::new());
        };
        let items = value
            .as_array()
            .ok_or_else(|| self.error(key, format!("expected array, got {}", describe(value))))?;
        items
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_null())
            .map(|(i, v)| Fields::new(format!("{}[{i}]", self.child(key)), v))
            .collect()
    }

    /// An optional list of strings.
    pub fn strings(&self, key: &str) -> Result<Vec<String>, MalformedResponseError> {
        let Some(value) = self.value(key) else {
            return Ok(Vec::new());
        };
        let items = value
            .as_array()
            .ok_or_else(|| self.error(key, format!("expected array, got {}", describe(value))))?;
        items
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_null())
            .map(|(i, v)| {
                as_string(v).map_err(|reason| MalformedResponseError::new(format!("{}[{i}]", self.child(key)), reason))
            })
            .collect()
    }
}

fn coerce<T: TryFrom<u64>>(value: &Value) -> Result<T, String> {
    let n = match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| format!("expected non-negative integer, got {n}"))?,
        // Plain digits only: no sign, padding or exponent.
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s
            .parse::<u64>()
            .map_err(|_| format!("integer {s} out of range"))?,
        Value::String(s) => return Err(format!("expected integer, got string {s:?}")),
        other => return Err(format!("expected integer, got {}", describe(other))),
    };
    T::try_from(n).map_err(|_| format!("integer {n} out of range"))
}

fn as_string(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(format!("expected string, got {}", describe(other))),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    struct Named {
        id: u32,
        name: String,
        tags: Vec<String>,
    }

    impl FromPayload for Named {
        fn from_payload(fields: &Fields<'_>) -> Result<Self, MalformedResponseError> {
            Ok(Self {
                id: fields.id("id")?,
                name: fields.string("name")?,
                tags: fields.strings("tags")?,
            })
        }
    }

    #[derive(Debug, PartialEq)]
    struct Group {
        members: Vec<Named>,
    }

    impl FromPayload for Group {
        fn from_payload(fields: &Fields<'_>) -> Result<Self, MalformedResponseError> {
            Ok(Self {
                members: fields.list("members")?,
            })
        }
    }

    #[test]
    fn numeric_string_is_coerced() {
        let named: Named = from_value("item", &json!({"id": "123", "name": "Blue Background"})).unwrap();
        assert_eq!(named.id, 123);
        assert_eq!(named.name, "Blue Background");
        assert!(named.tags.is_empty());
    }

    #[test]
    fn padded_or_signed_numeric_strings_are_rejected() {
        for id in [" 12 ", "+12", "-12", "1e3", ""] {
            let err = from_value::<Named>("item", &json!({"id": id, "name": "x"})).unwrap_err();
            assert_eq!(err.field, "item.id", "{id:?}");
            assert_eq!(err.reason, format!("expected integer, got string {id:?}"));
        }
    }

    #[test]
    fn missing_key_names_the_field() {
        let err = from_value::<Named>("item", &json!({"id": 5})).unwrap_err();
        assert_eq!(err.field, "item.name");
        assert_eq!(err.reason, "missing required field");
    }

    #[test]
    fn null_required_key_is_reported_as_null() {
        let err = from_value::<Named>("item", &json!({"id": 5, "name": null})).unwrap_err();
        assert_eq!(err.field, "item.name");
        assert_eq!(err.reason, "required field is null");
    }

    #[test]
    fn non_numeric_string_fails() {
        let err = from_value::<Named>("item", &json!({"id": "abc", "name": "x"})).unwrap_err();
        assert_eq!(err.field, "item.id");
        assert!(err.reason.contains("\"abc\""), "{}", err.reason);
    }

    #[test]
    fn negative_and_fractional_numbers_fail() {
        assert!(from_value::<Named>("", &json!({"id": -1, "name": "x"})).is_err());
        assert!(from_value::<Named>("", &json!({"id": 1.5, "name": "x"})).is_err());
    }

    #[test]
    fn overflow_fails() {
        let err = from_value::<Named>("", &json!({"id": "4294967296", "name": "x"})).unwrap_err();
        assert_eq!(err.field, "id");
        assert!(err.reason.contains("out of range"));
    }

    #[test]
    fn extra_keys_are_ignored() {
        let named: Named =
            from_value("", &json!({"id": 1, "name": "x", "brandNewField": {"nested": true}})).unwrap();
        assert_eq!(named.id, 1);
    }

    #[test]
    fn nested_list_errors_carry_index() {
        let payload = json!({"members": [{"id": 1, "name": "a"}, {"id": 2}]});
        let err = from_value::<Group>("group", &payload).unwrap_err();
        assert_eq!(err.field, "group.members[1].name");
    }

    #[test]
    fn null_list_entries_are_skipped() {
        let payload = json!({"members": [null, {"id": 1, "name": "a"}]});
        let group: Group = from_value("", &payload).unwrap();
        assert_eq!(group.members.len(), 1);
    }

    #[test]
    fn absent_list_defaults_to_empty() {
        let group: Group = from_value("", &json!({"members": null})).unwrap();
        assert!(group.members.is_empty());
    }

    #[test]
    fn wrong_container_type_fails() {
        let err = from_value::<Group>("g", &json!({"members": {"id": 1}})).unwrap_err();
        assert_eq!(err.field, "g.members");
        assert_eq!(err.reason, "expected array, got object");

        let err = from_value::<Named>("n", &json!([1, 2])).unwrap_err();
        assert_eq!(err.field, "n");
    }

    #[test]
    fn one_or_many_accepts_bare_object() {
        let value = json!({"hit": {"id": 1, "name": "a"}, "hits": [{"id": 2, "name": "b"}]});
        let fields = Fields::new("", &value).unwrap();
        assert_eq!(fields.one_or_many::<Named>("hit").unwrap().len(), 1);
        assert_eq!(fields.one_or_many::<Named>("hits").unwrap()[0].id, 2);
    }

    #[test]
    fn deserializing_twice_yields_equal_values() {
        let payload = json!({"members": [{"id": "7", "name": "a", "tags": ["x"]}]});
        let first: Group = from_value("", &payload).unwrap();
        let second: Group = from_value("", &payload).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn flag_defaults_and_rejects_strings() {
        let value = json!({"yes": true, "bad": "true"});
        let fields = Fields::new("", &value).unwrap();
        assert!(fields.flag("yes").unwrap());
        assert!(!fields.flag("absent").unwrap());
        assert!(fields.flag("bad").is_err());
    }

    #[test]
    fn timestamp_is_normalized_to_utc() {
        let value = json!({"at": "2015-05-06T04:37:32+02:00"});
        let fields = Fields::new("", &value).unwrap();
        let at = fields.timestamp("at").unwrap();
        assert_eq!(at.to_rfc3339(), "2015-05-06T02:37:32+00:00");
    }
}
