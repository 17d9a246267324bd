//! SSL (TLS certificate) test schema.
//!
//! Tests are identified by their website url, which the API stores with a trailing slash.

use crate::schema::{FieldKind, FieldSpec, Literal, Schema};

pub static SCHEMA: Schema = Schema {
    label: "ssl test",
    url_path: "/v1/ssl",
    identity: "website_url",
    csv_fields: &[],
    list_fields: &["alert_at", "contact_groups"],
    immutable_fields: &[],
    defaults: &[
        ("check_rate", Literal::Int(1800)),
        ("alert_reminder", Literal::Bool(true)),
        ("alert_expiry", Literal::Bool(true)),
        ("alert_broken", Literal::Bool(true)),
        ("alert_mixed", Literal::Bool(true)),
    ],
    slash_terminated: &["website_url"],
    catalog: &[
        FieldSpec::required("website_url", FieldKind::Str),
        FieldSpec::optional("check_rate", FieldKind::Int)
            .choices(&["300", "600", "1800", "86400", "2073600"]),
        FieldSpec::optional("contact_groups", FieldKind::List),
        FieldSpec::optional("alert_at", FieldKind::List),
        FieldSpec::optional("alert_reminder", FieldKind::Bool),
        FieldSpec::optional("alert_expiry", FieldKind::Bool),
        FieldSpec::optional("alert_broken", FieldKind::Bool),
        FieldSpec::optional("alert_mixed", FieldKind::Bool),
        FieldSpec::optional("follow_redirects", FieldKind::Bool),
        FieldSpec::optional("paused", FieldKind::Bool),
        FieldSpec::optional("hostname", FieldKind::Str),
        FieldSpec::optional("user_agent", FieldKind::Str),
    ],
};
