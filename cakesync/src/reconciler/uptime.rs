//! Uptime test schema.

use crate::schema::{FieldKind, FieldSpec, Literal, Schema};

pub static SCHEMA: Schema = Schema {
    label: "uptime test",
    url_path: "/v1/uptime",
    identity: "name",
    csv_fields: &["status_codes"],
    list_fields: &["contact_groups", "dns_ip", "regions", "tags"],
    immutable_fields: &["website_url", "test_type"],
    defaults: &[("test_type", Literal::Str("HTTP")), ("check_rate", Literal::Int(300))],
    slash_terminated: &[],
    catalog: &[
        FieldSpec::required("name", FieldKind::Str),
        FieldSpec::required("test_type", FieldKind::Str)
            .choices(&["DNS", "HEAD", "HTTP", "PING", "SSH", "TCP"]),
        FieldSpec::required("website_url", FieldKind::Str),
        FieldSpec::required("check_rate", FieldKind::Int)
            .choices(&["0", "30", "60", "300", "900", "1800", "3600", "86400"]),
        FieldSpec::optional("basic_username", FieldKind::Str),
        FieldSpec::optional("basic_password", FieldKind::Str).secret(),
        FieldSpec::optional("confirmation", FieldKind::Int),
        FieldSpec::optional("contact_groups", FieldKind::List),
        FieldSpec::optional("custom_header", FieldKind::Str),
        FieldSpec::optional("do_not_find", FieldKind::Bool),
        FieldSpec::optional("dns_ip", FieldKind::List),
        FieldSpec::optional("dns_server", FieldKind::Str),
        FieldSpec::optional("enable_ssl_alert", FieldKind::Bool),
        FieldSpec::optional("final_endpoint", FieldKind::Str),
        FieldSpec::optional("find_string", FieldKind::Str),
        FieldSpec::optional("follow_redirects", FieldKind::Bool),
        FieldSpec::optional("host", FieldKind::Str),
        FieldSpec::optional("include_header", FieldKind::Bool),
        FieldSpec::optional("paused", FieldKind::Bool),
        FieldSpec::optional("port", FieldKind::Int),
        FieldSpec::optional("post_body", FieldKind::Str),
        FieldSpec::optional("post_raw", FieldKind::Str),
        FieldSpec::optional("regions", FieldKind::List),
        FieldSpec::optional("status_codes", FieldKind::List),
        FieldSpec::optional("tags", FieldKind::List),
        FieldSpec::optional("timeout", FieldKind::Int),
        FieldSpec::optional("trigger_rate", FieldKind::Int),
        FieldSpec::optional("use_jar", FieldKind::Bool),
        FieldSpec::optional("user_agent", FieldKind::Str),
    ],
};
