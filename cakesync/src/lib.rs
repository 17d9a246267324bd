//! cakesync: converge StatusCake uptime and SSL tests to a declared configuration.
//!
//! One [`Reconciler::sync`] call performs a full fetch-decide-act cycle against the live
//! API and returns a [`Status`] saying whether it succeeded and whether anything changed.

pub mod client;
pub mod desired;
pub mod error;
pub mod normalize;
pub mod reconciler;
pub mod schema;
pub mod status;

pub use client::{ApiClient, ClientConfig, DEFAULT_BASE_URL, Failure, Outcome};
pub use desired::{DesiredConfig, DesiredState};
pub use error::{Error, Result};
pub use normalize::Form;
pub use reconciler::{Reconciler, ResourceKind, Snapshot};
pub use status::Status;
