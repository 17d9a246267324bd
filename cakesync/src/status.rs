//! Reconciliation outcome and snapshot diffing.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// Terminal result of a reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Status {
    pub success: bool,
    pub changed: bool,
    pub message: String,
}

impl Status {
    pub fn changed(message: impl Into<String>) -> Self {
        Self {
            success: true,
            changed: true,
            message: message.into(),
        }
    }

    pub fn unchanged(message: impl Into<String>) -> Self {
        Self {
            success: true,
            changed: false,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            changed: false,
            message: message.into(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match (self.success, self.changed) {
            (false, _) => "failed",
            (true, true) => "changed",
            (true, false) => "ok",
        };
        if self.message.is_empty() {
            write!(f, "{}", state)
        } else {
            write!(f, "{}: {}", state, self.message)
        }
    }
}

/// Textual form of a JSON value. Strings are taken verbatim, everything else as JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Symmetric difference of two snapshots flattened to `(key, text)` pairs.
pub fn difference(
    before: &Map<String, Value>,
    after: &Map<String, Value>,
) -> BTreeSet<(String, String)> {
    let flatten = |snapshot: &Map<String, Value>| -> BTreeSet<(String, String)> {
        snapshot
            .iter()
            .map(|(k, v)| (k.clone(), value_text(v)))
            .collect()
    };
    let before = flatten(before);
    let after = flatten(after);
    before.symmetric_difference(&after).cloned().collect()
}

/// Render a difference as `key=value` pairs.
pub fn format_difference(diff: &BTreeSet<(String, String)>) -> String {
    diff.iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}
