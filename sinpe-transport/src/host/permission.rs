//! Permission gates.

use async_trait::async_trait;
use std::collections::HashSet;
use tracing::debug;

use crate::transport::{Capability, PermissionGate, PermissionStatus};

/// Grants every capability. For hosts without a permission model.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrantAll;

#[async_trait]
impl PermissionGate for GrantAll {
    async fn check_and_request(&self, _capability: Capability) -> PermissionStatus {
        PermissionStatus::Granted
    }
}

/// Grants a fixed set of capabilities.
#[derive(Debug, Clone, Default)]
pub struct StaticPermissions {
    granted: HashSet<Capability>,
}

impl StaticPermissions {
    /// Grants exactly `granted`.
    pub fn new(granted: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            granted: granted.into_iter().collect(),
        }
    }

    /// Grants nothing.
    pub fn deny_all() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PermissionGate for StaticPermissions {
    async fn check_and_request(&self, capability: Capability) -> PermissionStatus {
        let status = if self.granted.contains(&capability) {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        };
        debug!(?capability, ?status, "Permission check");
        status
    }
}
