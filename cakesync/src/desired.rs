//! Desired configuration supplied by the caller, validated against a resource catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::normalize::is_unset;
use crate::schema::{FieldKind, FieldSpec, Schema};
use crate::status::value_text;

/// Whether the resource should exist remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    Present,
    Absent,
}

impl FromStr for DesiredState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "present" => Ok(DesiredState::Present),
            "absent" => Ok(DesiredState::Absent),
            other => Err(Error::InvalidState(other.to_string())),
        }
    }
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesiredState::Present => write!(f, "present"),
            DesiredState::Absent => write!(f, "absent"),
        }
    }
}

/// Target state for one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct DesiredConfig {
    pub state: DesiredState,
    pub fields: Map<String, Value>,
}

impl DesiredConfig {
    pub fn new(state: DesiredState, fields: Map<String, Value>) -> Self {
        Self { state, fields }
    }

    /// Split a flat mapping into `state` and the remaining resource fields.
    pub fn from_map(mut map: Map<String, Value>) -> Result<Self> {
        let state = match map.remove("state") {
            Some(Value::String(s)) => s.parse()?,
            Some(other) => return Err(Error::InvalidState(value_text(&other))),
            None => return Err(Error::MissingField("state".to_string())),
        };
        Ok(Self::new(state, map))
    }

    /// Check every field against the catalog and coerce values to their declared type.
    ///
    /// Unset values pass through untouched; the normalizer drops them.
    pub fn validate(self, schema: &Schema) -> Result<Self> {
        let mut fields = Map::new();
        for (name, value) in self.fields {
            let spec = schema
                .field(&name)
                .ok_or_else(|| Error::UnknownField(name.clone()))?;
            let value = if is_unset(&value) {
                value
            } else {
                let coerced = coerce(spec, value)?;
                check_choices(spec, &coerced)?;
                coerced
            };
            fields.insert(name, value);
        }

        let is_set = |name: &str| fields.get(name).is_some_and(|v| !is_unset(v));
        match self.state {
            DesiredState::Present => {
                if let Some(missing) = schema
                    .catalog
                    .iter()
                    .find(|f| f.required && !is_set(f.name))
                {
                    return Err(Error::MissingField(missing.name.to_string()));
                }
            }
            DesiredState::Absent => {
                if !is_set(schema.identity) {
                    return Err(Error::MissingField(schema.identity.to_string()));
                }
            }
        }

        Ok(Self {
            state: self.state,
            fields,
        })
    }
}

fn invalid(spec: &FieldSpec) -> Error {
    Error::InvalidType {
        field: spec.name.to_string(),
        expected: spec.kind.as_str(),
    }
}

fn coerce(spec: &FieldSpec, value: Value) -> Result<Value> {
    match (spec.kind, value) {
        (FieldKind::Str, Value::String(s)) => Ok(Value::String(s)),
        (FieldKind::Str, v @ (Value::Number(_) | Value::Bool(_))) => {
            Ok(Value::String(v.to_string()))
        }
        (FieldKind::Int, Value::Number(n)) if n.is_i64() => Ok(Value::Number(n)),
        (FieldKind::Int, Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| invalid(spec)),
        (FieldKind::Bool, Value::Bool(b)) => Ok(Value::Bool(b)),
        (FieldKind::Bool, Value::String(s)) => match s.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
            _ => Err(invalid(spec)),
        },
        (FieldKind::Bool, Value::Number(n)) => match n.as_i64() {
            Some(1) => Ok(Value::Bool(true)),
            Some(0) => Ok(Value::Bool(false)),
            _ => Err(invalid(spec)),
        },
        (FieldKind::List, Value::Array(items)) => Ok(Value::Array(items)),
        (FieldKind::List, Value::String(s)) => Ok(Value::Array(
            s.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(Value::from)
                .collect(),
        )),
        (FieldKind::List, v @ (Value::Number(_) | Value::Bool(_))) => Ok(Value::Array(vec![v])),
        _ => Err(invalid(spec)),
    }
}

fn check_choices(spec: &FieldSpec, value: &Value) -> Result<()> {
    if spec.choices.is_empty() {
        return Ok(());
    }
    let got = value_text(value);
    if spec.choices.contains(&got.as_str()) {
        Ok(())
    } else {
        Err(Error::InvalidChoice {
            field: spec.name.to_string(),
            allowed: spec.choices.join(", "),
            got,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciler::ResourceKind;
    use serde_json::json;

    fn config(value: Value) -> DesiredConfig {
        DesiredConfig::from_map(value.as_object().cloned().unwrap()).unwrap()
    }

    fn uptime_present() -> Value {
        json!({
            "state": "present",
            "name": "Example",
            "test_type": "HTTP",
            "website_url": "https://example.com",
            "check_rate": 300
        })
    }

    #[test]
    fn state_is_split_from_fields() {
        let desired = config(uptime_present());
        assert_eq!(desired.state, DesiredState::Present);
        assert!(!desired.fields.contains_key("state"));
        assert_eq!(desired.fields.len(), 4);
    }

    #[test]
    fn missing_or_bad_state_rejected() {
        let err = DesiredConfig::from_map(Map::new()).unwrap_err();
        assert!(matches!(err, Error::MissingField(ref f) if f == "state"));

        let map = json!({"state": "gone"}).as_object().cloned().unwrap();
        assert!(matches!(
            DesiredConfig::from_map(map),
            Err(Error::InvalidState(_))
        ));
    }

    #[test]
    fn valid_uptime_config_passes() {
        let desired = config(uptime_present())
            .validate(ResourceKind::Uptime.schema())
            .unwrap();
        assert_eq!(desired.fields["check_rate"], json!(300));
    }

    #[test]
    fn unknown_field_rejected() {
        let mut value = uptime_present();
        value["colour"] = json!("blue");
        let err = config(value).validate(ResourceKind::Uptime.schema()).unwrap_err();
        assert!(matches!(err, Error::UnknownField(ref f) if f == "colour"));
    }

    #[test]
    fn check_rate_outside_choices_rejected() {
        let mut value = uptime_present();
        value["check_rate"] = json!(45);
        let err = config(value).validate(ResourceKind::Uptime.schema()).unwrap_err();
        assert!(matches!(err, Error::InvalidChoice { ref field, .. } if field == "check_rate"));
    }

    #[test]
    fn test_type_outside_choices_rejected() {
        let mut value = uptime_present();
        value["test_type"] = json!("SMTP");
        assert!(config(value).validate(ResourceKind::Uptime.schema()).is_err());
    }

    #[test]
    fn strings_coerced_to_declared_types() {
        let mut value = uptime_present();
        value["check_rate"] = json!("1800");
        value["paused"] = json!("no");
        value["tags"] = json!("prod, web");
        let desired = config(value).validate(ResourceKind::Uptime.schema()).unwrap();
        assert_eq!(desired.fields["check_rate"], json!(1800));
        assert_eq!(desired.fields["paused"], json!(false));
        assert_eq!(desired.fields["tags"], json!(["prod", "web"]));
    }

    #[test]
    fn numeric_booleans_accepted() {
        let mut value = uptime_present();
        value["paused"] = json!(1);
        value["follow_redirects"] = json!(0);
        let desired = config(value).validate(ResourceKind::Uptime.schema()).unwrap();
        assert_eq!(desired.fields["paused"], json!(true));
        assert_eq!(desired.fields["follow_redirects"], json!(false));

        let mut value = uptime_present();
        value["paused"] = json!(2);
        let err = config(value).validate(ResourceKind::Uptime.schema()).unwrap_err();
        assert!(matches!(err, Error::InvalidType { ref field, .. } if field == "paused"));
    }

    #[test]
    fn wrong_type_rejected() {
        let mut value = uptime_present();
        value["port"] = json!("eighty");
        let err = config(value).validate(ResourceKind::Uptime.schema()).unwrap_err();
        assert!(matches!(err, Error::InvalidType { ref field, .. } if field == "port"));
    }

    #[test]
    fn present_requires_required_fields() {
        let value = json!({"state": "present", "name": "Example"});
        let err = config(value).validate(ResourceKind::Uptime.schema()).unwrap_err();
        assert!(matches!(err, Error::MissingField(_)));
    }

    #[test]
    fn absent_only_requires_identity() {
        let value = json!({"state": "absent", "name": "Example"});
        assert!(config(value).validate(ResourceKind::Uptime.schema()).is_ok());

        let value = json!({"state": "absent", "website_url": "https://example.com"});
        let err = config(value).validate(ResourceKind::Uptime.schema()).unwrap_err();
        assert!(matches!(err, Error::MissingField(ref f) if f == "name"));
    }

    #[test]
    fn null_optional_values_allowed() {
        let mut value = uptime_present();
        value["host"] = Value::Null;
        value["tags"] = json!([]);
        assert!(config(value).validate(ResourceKind::Uptime.schema()).is_ok());
    }

    #[test]
    fn ssl_check_rate_choices() {
        let value = json!({
            "state": "present",
            "website_url": "https://example.com",
            "check_rate": 2073600
        });
        assert!(config(value).validate(ResourceKind::Ssl.schema()).is_ok());

        let value = json!({
            "state": "present",
            "website_url": "https://example.com",
            "check_rate": 30
        });
        assert!(config(value).validate(ResourceKind::Ssl.schema()).is_err());
    }
}
