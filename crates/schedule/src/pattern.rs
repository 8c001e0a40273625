use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::anchor::AnchorTime;

/// Opaque identifier of a downstream service/source to poll.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ServiceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A named schedule: a circular set of anchor times, optionally restricted
/// to an explicit set of services.
///
/// `services == None` marks the default (catch-all) pattern; validation
/// guarantees exactly one exists per configuration.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub name: String,
    /// Ascending, unique, grid-aligned. Normalized once at load.
    pub anchors: Vec<AnchorTime>,
    pub services: Option<BTreeSet<ServiceId>>,
}

impl Pattern {
    pub fn is_default(&self) -> bool {
        self.services.is_none()
    }

    /// Whether this pattern explicitly lists `service`.
    pub fn claims(&self, service: &ServiceId) -> bool {
        self.services
            .as_ref()
            .is_some_and(|services| services.contains(service))
    }
}
