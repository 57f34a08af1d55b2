//! Domain and persisted RBAC types

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Unique role identifier
pub type RoleId = String;

/// Unique privilege identifier
pub type PrivilegeId = String;

/// Role as seen by callers of the authorization manager
///
/// A role bundles privileges and nested roles that are granted together.
/// Nested roles may form a graph; cycles are not rejected here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Role {
    /// Role identifier (unique within a source)
    pub role_id: RoleId,

    /// Opaque version token used by the store for optimistic concurrency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Display name
    pub name: String,

    /// Source the role was loaded from
    #[serde(default)]
    pub source: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub read_only: bool,

    /// Granted privilege ids
    #[serde(default)]
    pub privileges: Option<HashSet<PrivilegeId>>,

    /// Nested role ids
    #[serde(default)]
    pub roles: Option<HashSet<RoleId>>,
}

impl Role {
    /// Create a new role with no privileges or nested roles
    pub fn new(role_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            role_id: role_id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Grant a privilege to this role
    pub fn with_privilege(mut self, privilege_id: impl Into<String>) -> Self {
        self.privileges
            .get_or_insert_with(HashSet::new)
            .insert(privilege_id.into());
        self
    }

    /// Nest another role inside this one
    pub fn with_role(mut self, role_id: impl Into<String>) -> Self {
        self.roles
            .get_or_insert_with(HashSet::new)
            .insert(role_id.into());
        self
    }

    /// Check whether the role grants the given privilege directly
    pub fn has_privilege(&self, privilege_id: &str) -> bool {
        self.privileges
            .as_ref()
            .is_some_and(|p| p.contains(privilege_id))
    }
}

/// Privilege as seen by callers of the authorization manager
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Privilege {
    /// Privilege identifier
    pub id: PrivilegeId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub read_only: bool,

    /// Type tag selecting the privilege descriptor
    #[serde(rename = "type")]
    pub privilege_type: String,

    /// Type-specific properties, interpreted by the descriptor
    #[serde(default)]
    pub properties: Option<HashMap<String, String>>,

    /// Permission string rendered by the descriptor; never persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,
}

impl Privilege {
    /// Create a new privilege of the given type
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        privilege_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            privilege_type: privilege_type.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Set a type-specific property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get a property value
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|p| p.get(key))
            .map(String::as_str)
    }
}

/// Persisted form of a [`Role`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: RoleId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub read_only: bool,

    #[serde(default)]
    pub privileges: HashSet<PrivilegeId>,

    #[serde(default)]
    pub roles: HashSet<RoleId>,
}

/// Persisted form of a [`Privilege`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrivilegeRecord {
    pub id: PrivilegeId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub read_only: bool,

    #[serde(rename = "type")]
    pub privilege_type: String,

    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl PrivilegeRecord {
    /// Get a property value
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Set a property value, replacing any previous one
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }
}
