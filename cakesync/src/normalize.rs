//! Field normalization: desired configuration to wire-ready form body.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use crate::schema::Schema;
use crate::status::value_text;

const REDACTED: &str = "********";

/// Prepared request body.
///
/// Keys are already in wire form (`status_codes_csv`, `tags[]`). Secret fields are
/// remembered so diagnostics can mask them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Form {
    fields: BTreeMap<String, Value>,
    secrets: BTreeSet<String>,
}

impl Form {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// URL-encoded form pairs. Arrays expand to one pair per element.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.fields.len());
        for (key, value) in &self.fields {
            match value {
                Value::Array(items) => {
                    pairs.extend(items.iter().map(|item| (key.clone(), value_text(item))));
                }
                other => pairs.push((key.clone(), value_text(other))),
            }
        }
        pairs
    }

    /// JSON rendering with secret values masked.
    pub fn redacted(&self) -> String {
        let masked: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| {
                let v = if self.secrets.contains(k) {
                    Value::from(REDACTED)
                } else {
                    v.clone()
                };
                (k.clone(), v)
            })
            .collect();
        Value::Object(masked).to_string()
    }
}

/// Value the caller left unset.
///
/// `false` and `0` are real values and are sent as-is.
pub fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Append `/` unless already present.
pub fn ensure_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

/// Build the wire body for `raw` according to `schema`.
pub fn prepare(schema: &Schema, raw: &Map<String, Value>) -> Form {
    let mut form = Form::default();

    for (key, value) in raw {
        if is_unset(value) {
            continue;
        }

        let value = if schema.slash_terminated.contains(&key.as_str()) {
            match value {
                Value::String(url) => Value::from(ensure_trailing_slash(url)),
                other => other.clone(),
            }
        } else {
            value.clone()
        };

        let (wire_key, value) = if schema.csv_fields.contains(&key.as_str()) {
            let joined = match &value {
                Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(","),
                other => value_text(other),
            };
            (format!("{}_csv", key), Value::from(joined))
        } else if schema.list_fields.contains(&key.as_str()) {
            let list = match value {
                Value::Array(_) => value,
                scalar => Value::Array(vec![scalar]),
            };
            (format!("{}[]", key), list)
        } else {
            (key.clone(), value)
        };

        if schema.is_secret(key) {
            form.secrets.insert(wire_key.clone());
        }
        form.insert(wire_key, value);
    }

    form
}
