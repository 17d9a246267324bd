//! Static per-resource schema: wire encoding rules, immutable fields, create defaults
//! and the typed parameter catalog used to validate desired configuration.

use serde_json::Value;

/// Declared type of a catalog field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Str,
    Int,
    Bool,
    List,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Str => "string",
            FieldKind::Int => "integer",
            FieldKind::Bool => "boolean",
            FieldKind::List => "list",
        }
    }
}

/// One accepted parameter of a resource.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Allowed values in textual form; empty means unrestricted.
    pub choices: &'static [&'static str],
    /// Redacted from diagnostics.
    pub secret: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            choices: &[],
            secret: false,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            choices: &[],
            secret: false,
        }
    }

    pub const fn choices(self, choices: &'static [&'static str]) -> Self {
        Self { choices, ..self }
    }

    pub const fn secret(self) -> Self {
        Self {
            secret: true,
            ..self
        }
    }
}

/// Constant value injected on create.
#[derive(Debug, Clone, Copy)]
pub enum Literal {
    Str(&'static str),
    Int(i64),
    Bool(bool),
}

impl Literal {
    pub fn to_value(self) -> Value {
        match self {
            Literal::Str(s) => Value::from(s),
            Literal::Int(n) => Value::from(n),
            Literal::Bool(b) => Value::from(b),
        }
    }
}

/// Everything the reconciler needs to know about one kind of remote resource.
#[derive(Debug)]
pub struct Schema {
    /// Human label used in status messages.
    pub label: &'static str,
    /// Collection path on the remote API.
    pub url_path: &'static str,
    /// Field matched against the remote inventory.
    pub identity: &'static str,
    /// Sent as a single `<field>_csv` string.
    pub csv_fields: &'static [&'static str],
    /// Sent as repeated `<field>[]` parameters.
    pub list_fields: &'static [&'static str],
    pub immutable_fields: &'static [&'static str],
    pub defaults: &'static [(&'static str, Literal)],
    /// URL fields forced to end with `/`.
    pub slash_terminated: &'static [&'static str],
    pub catalog: &'static [FieldSpec],
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.catalog.iter().find(|f| f.name == name)
    }

    pub fn is_secret(&self, name: &str) -> bool {
        self.field(name).is_some_and(|f| f.secret)
    }
}
