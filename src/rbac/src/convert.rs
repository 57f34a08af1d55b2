//! Domain <-> record conversion
//!
//! Conversions copy collections by value so domain objects never share state
//! with records. Absent domain collections become empty record collections.

use crate::descriptor::DescriptorRegistry;
use crate::types::{Privilege, PrivilegeRecord, Role, RoleRecord};
use std::sync::Arc;

/// Stateless mapping between domain objects and persisted records
#[derive(Debug, Clone)]
pub struct ModelConverter {
    /// Source tag stamped on every converted role
    source: &'static str,

    /// Descriptors used to render permission strings
    descriptors: Arc<DescriptorRegistry>,
}

impl ModelConverter {
    pub fn new(source: &'static str, descriptors: Arc<DescriptorRegistry>) -> Self {
        Self {
            source,
            descriptors,
        }
    }

    /// Source tag stamped on converted roles
    pub fn source(&self) -> &'static str {
        self.source
    }

    pub fn to_domain_role(&self, record: &RoleRecord) -> Role {
        Role {
            role_id: record.id.clone(),
            version: record.version.clone(),
            name: record.name.clone(),
            source: self.source.to_string(),
            description: record.description.clone(),
            read_only: record.read_only,
            privileges: Some(record.privileges.clone()),
            roles: Some(record.roles.clone()),
        }
    }

    pub fn to_record_role(&self, role: &Role) -> RoleRecord {
        RoleRecord {
            id: role.role_id.clone(),
            version: role.version.clone(),
            name: role.name.clone(),
            description: role.description.clone(),
            read_only: role.read_only,
            privileges: role.privileges.clone().unwrap_or_default(),
            roles: role.roles.clone().unwrap_or_default(),
        }
    }

    /// Convert a record, rendering its permission with the matching descriptor
    pub fn to_domain_privilege(&self, record: &PrivilegeRecord) -> Privilege {
        let permission = self
            .descriptors
            .lookup(&record.privilege_type)
            .map(|descriptor| descriptor.render_permission(record));

        Privilege {
            id: record.id.clone(),
            version: record.version.clone(),
            name: record.name.clone(),
            description: record.description.clone(),
            read_only: record.read_only,
            privilege_type: record.privilege_type.clone(),
            properties: Some(record.properties.clone()),
            permission,
        }
    }

    pub fn to_record_privilege(&self, privilege: &Privilege) -> PrivilegeRecord {
        PrivilegeRecord {
            id: privilege.id.clone(),
            version: privilege.version.clone(),
            name: privilege.name.clone(),
            description: privilege.description.clone(),
            read_only: privilege.read_only,
            privilege_type: privilege.privilege_type.clone(),
            properties: privilege.properties.clone().unwrap_or_default(),
        }
    }
}
