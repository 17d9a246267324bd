//! Reconciliation of one declared resource against the remote inventory.
//!
//! A [`Reconciler`] resolves the resource by its identity field, then creates, updates or
//! deletes it to match the desired state. Both resource kinds share the algorithm; they
//! differ only in their static [`Schema`].

pub mod ssl;
pub mod uptime;

use std::fmt;

use reqwest::{Method, StatusCode};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::client::{ApiClient, Failure};
use crate::desired::{DesiredConfig, DesiredState};
use crate::error::Result;
use crate::normalize::{self, Form};
use crate::schema::Schema;
use crate::status::{Status, difference, format_difference, value_text};

/// Listing page size.
pub const PAGE_LIMIT: u32 = 100;

/// One remote resource as returned by the API.
pub type Snapshot = Map<String, Value>;

/// Supported kinds of remote resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Uptime,
    Ssl,
}

impl ResourceKind {
    pub fn schema(&self) -> &'static Schema {
        match self {
            ResourceKind::Uptime => &uptime::SCHEMA,
            ResourceKind::Ssl => &ssl::SCHEMA,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.schema().label)
    }
}

/// Drives one resource towards its desired state.
pub struct Reconciler {
    client: ApiClient,
    kind: ResourceKind,
    desired: DesiredConfig,
    form: Form,
    remote_id: Option<String>,
}

impl Reconciler {
    /// Validate `desired` against the kind's catalog and prepare the request body.
    pub fn new(client: ApiClient, kind: ResourceKind, desired: DesiredConfig) -> Result<Self> {
        let desired = desired.validate(kind.schema())?;
        let form = normalize::prepare(kind.schema(), &desired.fields);
        Ok(Self {
            client,
            kind,
            desired,
            form,
            remote_id: None,
        })
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Prepared wire body.
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Identifier of the matched remote resource, once resolved.
    pub fn remote_id(&self) -> Option<&str> {
        self.remote_id.as_deref()
    }

    fn schema(&self) -> &'static Schema {
        self.kind.schema()
    }

    fn resource_path(&self, id: &str) -> String {
        format!("{}/{}", self.schema().url_path, id)
    }

    /// Identity in wire form, matched verbatim against remote entries.
    fn identity(&self) -> Option<String> {
        self.form.get(self.schema().identity).map(value_text)
    }

    /// Every remote resource of this kind, or an empty list if the listing failed.
    pub async fn fetch_all(&self) -> Vec<Snapshot> {
        self.try_fetch_all().await.unwrap_or_else(|failure| {
            warn!("Listing {}s failed: {}", self.kind, failure.message);
            Vec::new()
        })
    }

    /// Walk the paginated listing.
    pub async fn try_fetch_all(&self) -> std::result::Result<Vec<Snapshot>, Failure> {
        let mut snapshots = Vec::new();
        let mut page: u64 = 1;

        loop {
            let path = format!(
                "{}?page={}&limit={}",
                self.schema().url_path,
                page,
                PAGE_LIMIT
            );
            let (_, body) = self
                .client
                .request(Method::GET, &path, None)
                .await
                .into_result()?;
            let body = body.unwrap_or(Value::Null);

            let entries = body
                .get("data")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            snapshots.extend(entries.iter().filter_map(|e| e.as_object().cloned()));

            let page_count = body
                .pointer("/metadata/page_count")
                .and_then(Value::as_u64)
                .unwrap_or(1);
            if entries.is_empty() || page >= page_count {
                break;
            }
            page += 1;
        }

        debug!("Fetched {} {}s", snapshots.len(), self.kind);
        Ok(snapshots)
    }

    /// First remote entry whose identity matches, if any.
    pub async fn find(&mut self) -> Option<Snapshot> {
        self.try_find().await.unwrap_or_else(|failure| {
            warn!("Looking up {} failed: {}", self.kind, failure.message);
            None
        })
    }

    /// Like [`Reconciler::find`] but surfaces listing failures.
    pub async fn try_find(&mut self) -> std::result::Result<Option<Snapshot>, Failure> {
        // Resolution always reflects the live listing, never an id from an earlier call.
        self.remote_id = None;
        let Some(identity) = self.identity() else {
            return Ok(None);
        };
        let field = self.schema().identity;

        let found = self.try_fetch_all().await?.into_iter().find(|entry| {
            entry.get(field).map(value_text).as_deref() == Some(identity.as_str())
        });

        self.remote_id = found.as_ref().and_then(|entry| entry.get("id")).map(value_text);
        if let Some(id) = &self.remote_id {
            debug!("Resolved {} {} to id {}", self.kind, identity, id);
        }
        Ok(found)
    }

    /// Detail representation of the matched resource.
    pub async fn retrieve(&mut self) -> Option<Snapshot> {
        self.try_retrieve().await.unwrap_or_else(|failure| {
            warn!("Retrieving {} failed: {}", self.kind, failure.message);
            None
        })
    }

    pub async fn try_retrieve(&mut self) -> std::result::Result<Option<Snapshot>, Failure> {
        self.try_find().await?;
        let Some(id) = self.remote_id.clone() else {
            return Ok(None);
        };

        let (_, body) = self
            .client
            .request(Method::GET, &self.resource_path(&id), None)
            .await
            .into_result()?;
        Ok(body
            .as_ref()
            .and_then(|b| b.get("data"))
            .and_then(Value::as_object)
            .cloned())
    }

    /// Create the resource, filling in create-time defaults.
    pub async fn create(&mut self) -> Status {
        let label = self.schema().label;
        if let Some(id) = &self.remote_id {
            return Status::failed(format!("{} already exists with id {}", label, id));
        }

        let mut form = self.form.clone();
        for (field, literal) in self.schema().defaults {
            if !form.contains_key(field) {
                form.insert(*field, literal.to_value());
            }
        }

        info!("Creating {}", label);
        let (status, body) = match self
            .client
            .request(Method::POST, self.schema().url_path, Some(&form))
            .await
            .into_result()
        {
            Ok(ok) => ok,
            Err(failure) => return failure.into(),
        };
        if status != StatusCode::CREATED {
            debug!("Create {} answered {} instead of 201", label, status);
        }

        match body.as_ref().and_then(|b| b.pointer("/data/new_id")) {
            Some(id) => self.remote_id = Some(value_text(id)),
            None => warn!("Create {} response carried no new_id", label),
        }
        Status::changed(format!("{} created", label))
    }

    /// Update the matched resource and report what the remote side changed.
    ///
    /// The PUT is always issued; whether anything changed is decided afterwards by
    /// diffing the detail representation before and after.
    pub async fn update(&mut self) -> Status {
        let label = self.schema().label;
        if self.remote_id.is_none() {
            return Status::failed(format!("{} not found for update", label));
        }

        let before = match self.try_retrieve().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return Status::failed(format!("{} not found for update", label)),
            Err(failure) => return failure.into(),
        };

        if let Some(field) = self.immutable_violation(&before) {
            warn!("Refusing to update {}: {} differs", label, field);
            return Status::failed(format!("{} is immutable, delete and recreate", field));
        }

        let Some(id) = self.remote_id.clone() else {
            return Status::failed(format!("{} not found for update", label));
        };
        info!("Updating {} {}", label, id);
        if let Err(failure) = self
            .client
            .request(Method::PUT, &self.resource_path(&id), Some(&self.form))
            .await
            .into_result()
        {
            return failure.into();
        }

        // The PUT was applied, so a failed re-read still counts as a change.
        let after = match self.try_retrieve().await {
            Ok(snapshot) => snapshot.unwrap_or_default(),
            Err(failure) => {
                warn!("Re-reading {} {} after update failed", label, id);
                return Status::changed(format!(
                    "{} updated, re-reading it failed: {}",
                    label, failure.message
                ));
            }
        };

        let diff = difference(&before, &after);
        if diff.is_empty() {
            Status::unchanged("")
        } else {
            Status::changed(format_difference(&diff))
        }
    }

    /// First immutable field whose desired value differs from `current`.
    fn immutable_violation(&self, current: &Snapshot) -> Option<&'static str> {
        self.schema().immutable_fields.iter().copied().find(|field| {
            self.form.get(field).is_some_and(|desired| {
                current.get(*field).map(value_text) != Some(value_text(desired))
            })
        })
    }

    /// Delete the matched resource. Deleting something absent is a successful no-op.
    pub async fn delete(&mut self) -> Status {
        let label = self.schema().label;
        let Some(id) = self.remote_id.clone() else {
            return Status::unchanged(format!("{} not found for deletion", label));
        };

        info!("Deleting {} {}", label, id);
        match self
            .client
            .request(Method::DELETE, &self.resource_path(&id), None)
            .await
            .into_result()
        {
            Ok(_) => {
                self.remote_id = None;
                Status::changed(format!("{} deleted", label))
            }
            Err(failure) => failure.into(),
        }
    }

    /// One full fetch-decide-act cycle.
    pub async fn sync(&mut self) -> Status {
        info!(
            "Reconciling {} {} (state: {})",
            self.kind,
            self.identity().unwrap_or_default(),
            self.desired.state
        );

        if let Err(failure) = self.try_find().await {
            return failure.into();
        }

        let state = self.desired.state;
        let status = match state {
            DesiredState::Present if self.remote_id.is_some() => self.update().await,
            DesiredState::Present => self.create().await,
            DesiredState::Absent => self.delete().await,
        };

        if status.success {
            info!("Reconciled {}: {}", self.kind, status);
        } else {
            warn!("Reconciling {} failed: {}", self.kind, status.message);
        }
        status
    }
}
