//! Change notification
//!
//! The authorization manager publishes one [`AuthorizationConfigurationChanged`]
//! event after every committed mutation. Subscribers (permission caches,
//! authorizers) use it to drop state derived from the old configuration.

use crate::error::Result;
use crate::types::{PrivilegeId, RoleId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// What was changed by a committed mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ConfigurationChange {
    RoleAdded(RoleId),
    RoleUpdated(RoleId),
    RoleDeleted(RoleId),
    PrivilegeAdded(PrivilegeId),
    PrivilegeUpdated(PrivilegeId),
    PrivilegeDeleted(PrivilegeId),
}

impl ConfigurationChange {
    /// Id of the role or privilege affected by the change
    pub fn subject(&self) -> &str {
        match self {
            Self::RoleAdded(id)
            | Self::RoleUpdated(id)
            | Self::RoleDeleted(id)
            | Self::PrivilegeAdded(id)
            | Self::PrivilegeUpdated(id)
            | Self::PrivilegeDeleted(id) => id,
        }
    }
}

/// Event signalling that authorization configuration has changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationConfigurationChanged {
    /// Unique event identifier
    pub id: String,

    pub change: ConfigurationChange,

    pub timestamp: DateTime<Utc>,
}

impl AuthorizationConfigurationChanged {
    pub fn new(change: ConfigurationChange) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            change,
            timestamp: Utc::now(),
        }
    }
}

/// Sink for configuration change events
///
/// `publish` is called synchronously from the mutating operation and must not
/// wait for subscribers to finish their own work.
pub trait ChangeNotifier: Send + Sync {
    fn publish(&self, event: AuthorizationConfigurationChanged) -> Result<()>;
}

/// [`ChangeNotifier`] backed by a `tokio::sync::broadcast` channel
///
/// Publishing never blocks. Having no subscribers is not an error; a
/// subscriber that falls more than `capacity` events behind loses the oldest
/// ones and observes `RecvError::Lagged`.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<AuthorizationConfigurationChanged>,
}

impl BroadcastNotifier {
    /// Default channel capacity
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Create a notifier with the given channel capacity
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<AuthorizationConfigurationChanged> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl ChangeNotifier for BroadcastNotifier {
    fn publish(&self, event: AuthorizationConfigurationChanged) -> Result<()> {
        match self.sender.send(event) {
            Ok(receivers) => debug!("Configuration change delivered to {} subscribers", receivers),
            Err(broadcast::error::SendError(event)) => {
                debug!("No subscribers for configuration change {:?}", event.change)
            }
        }
        Ok(())
    }
}
