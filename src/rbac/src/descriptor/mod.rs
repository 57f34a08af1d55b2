//! Privilege descriptors
//!
//! A descriptor owns one privilege type and knows how to render the canonical
//! permission string for privileges of that type. Descriptors are collected in
//! a [`DescriptorRegistry`], built once at startup and shared by `Arc`.
//!
//! # Example
//!
//! ```rust
//! use cretoai_rbac::descriptor::{DescriptorRegistry, MethodPrivilegeDescriptor};
//! use cretoai_rbac::types::PrivilegeRecord;
//!
//! let registry = DescriptorRegistry::new().with(MethodPrivilegeDescriptor::new());
//!
//! let mut record = PrivilegeRecord {
//!     id: "repo-read".to_string(),
//!     name: "Repo Read".to_string(),
//!     privilege_type: "method".to_string(),
//!     ..Default::default()
//! };
//! record.set_property("permission", "nexus:repositories");
//! record.set_property("method", "read");
//!
//! let descriptor = registry.lookup("method").unwrap();
//! assert_eq!(descriptor.render_permission(&record), "nexus:repositories:read");
//! ```

mod method;
mod wildcard;

pub use method::MethodPrivilegeDescriptor;
pub use wildcard::WildcardPrivilegeDescriptor;

use crate::types::PrivilegeRecord;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Type-specific privilege handler
pub trait PrivilegeDescriptor: Send + Sync {
    /// Privilege type tag handled by this descriptor
    fn privilege_type(&self) -> &str;

    /// Render the canonical permission string for a privilege record
    fn render_permission(&self, record: &PrivilegeRecord) -> String;
}

/// Ordered collection of privilege descriptors
///
/// Lookups scan in registration order and the first descriptor whose type
/// matches wins. Registering a second descriptor for an existing type is
/// allowed, but it is shadowed by the first one.
#[derive(Clone, Default)]
pub struct DescriptorRegistry {
    descriptors: Vec<Arc<dyn PrivilegeDescriptor>>,
}

impl DescriptorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in `method` and `wildcard` descriptors
    pub fn with_defaults() -> Self {
        Self::new()
            .with(MethodPrivilegeDescriptor::new())
            .with(WildcardPrivilegeDescriptor::new())
    }

    /// Builder-style registration
    pub fn with(mut self, descriptor: impl PrivilegeDescriptor + 'static) -> Self {
        self.register(Arc::new(descriptor));
        self
    }

    /// Append a descriptor to the registry
    pub fn register(&mut self, descriptor: Arc<dyn PrivilegeDescriptor>) {
        let privilege_type = descriptor.privilege_type();
        if self.lookup(privilege_type).is_some() {
            warn!(
                "Descriptor for privilege type '{}' is already registered; the new one will be shadowed",
                privilege_type
            );
        }
        self.descriptors.push(descriptor);
    }

    /// Find the descriptor for a privilege type
    pub fn lookup(&self, privilege_type: &str) -> Option<&dyn PrivilegeDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.privilege_type() == privilege_type)
            .map(|d| d.as_ref())
    }

    /// Registered type tags in registration order (duplicates included)
    pub fn types(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.privilege_type()).collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl fmt::Debug for DescriptorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorRegistry")
            .field("types", &self.types())
            .finish()
    }
}
