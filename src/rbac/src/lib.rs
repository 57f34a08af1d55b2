//! # CretoAI RBAC
//!
//! Management layer for role-based access control configuration.
//!
//! ## Features
//!
//! - **Role and privilege CRUD** over a pluggable configuration store
//! - **Privilege descriptors** rendering canonical permission strings per privilege type
//! - **Method inheritance** expanding `create` into `create,read` when privileges are added
//! - **Change notification** after every committed mutation, over a broadcast channel
//! - **In-memory and JSON file stores** with optimistic versioning
//!
//! ## Example
//!
//! ```rust
//! use cretoai_rbac::{
//!     AuthorizationManager, BroadcastNotifier, DefaultAuthorizationManager,
//!     DescriptorRegistry, InMemoryConfigurationStore, MethodInheritance, Privilege, Role,
//! };
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let notifier = Arc::new(BroadcastNotifier::default());
//! let mut changes = notifier.subscribe();
//!
//! let manager = DefaultAuthorizationManager::new(
//!     Arc::new(InMemoryConfigurationStore::new()),
//!     Arc::new(MethodInheritance::default()),
//!     notifier.clone(),
//!     Arc::new(DescriptorRegistry::with_defaults()),
//! );
//!
//! let privilege = manager.add_privilege(
//!     &Privilege::new("users-create", "Create users", "method")
//!         .with_property("permission", "nexus:users")
//!         .with_property("method", "create"),
//! )?;
//! assert_eq!(privilege.permission.as_deref(), Some("nexus:users:create,read"));
//!
//! manager.add_role(&Role::new("user-admin", "User admin").with_privilege("users-create"))?;
//!
//! assert!(changes.try_recv().is_ok());
//! assert!(changes.try_recv().is_ok());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod convert;
pub mod descriptor;
pub mod error;
pub mod inheritance;
pub mod manager;
pub mod notify;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::RbacConfig;
pub use convert::ModelConverter;
pub use descriptor::{
    DescriptorRegistry, MethodPrivilegeDescriptor, PrivilegeDescriptor,
    WildcardPrivilegeDescriptor,
};
pub use error::{RbacError, Result};
pub use inheritance::{InheritanceResolver, MethodInheritance};
pub use manager::{AuthorizationManager, DefaultAuthorizationManager, SOURCE};
pub use notify::{
    AuthorizationConfigurationChanged, BroadcastNotifier, ChangeNotifier, ConfigurationChange,
};
pub use store::{
    ConfigurationStore, FileConfigurationStore, InMemoryConfigurationStore, SecurityConfiguration,
};
pub use types::{Privilege, PrivilegeId, PrivilegeRecord, Role, RoleId, RoleRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
