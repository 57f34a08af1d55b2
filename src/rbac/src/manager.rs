//! Authorization manager
//!
//! Orchestrates role and privilege CRUD on top of a [`ConfigurationStore`]:
//! converts domain objects to records, expands inherited methods for new
//! privileges, and publishes one change event per committed mutation.
//!
//! # Architecture
//!
//! ```text
//! caller → convert → [expand methods] → store → notify → convert → caller
//!                     (add_privilege)            (mutations only)
//! ```

use crate::convert::ModelConverter;
use crate::descriptor::{DescriptorRegistry, MethodPrivilegeDescriptor};
use crate::error::Result;
use crate::inheritance::InheritanceResolver;
use crate::notify::{AuthorizationConfigurationChanged, ChangeNotifier, ConfigurationChange};
use crate::store::ConfigurationStore;
use crate::types::{Privilege, PrivilegeRecord, Role};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Source tag of roles managed by [`DefaultAuthorizationManager`]
pub const SOURCE: &str = "default";

/// Role and privilege management for one authorization source
pub trait AuthorizationManager: Send + Sync {
    /// Source tag stamped on every role this manager returns
    fn source(&self) -> &str;

    /// Whether the manager accepts mutations
    fn supports_write(&self) -> bool;

    fn list_roles(&self) -> Result<Vec<Role>>;

    fn get_role(&self, role_id: &str) -> Result<Role>;

    fn add_role(&self, role: &Role) -> Result<Role>;

    fn update_role(&self, role: &Role) -> Result<Role>;

    fn delete_role(&self, role_id: &str) -> Result<()>;

    fn list_privileges(&self) -> Result<Vec<Privilege>>;

    fn get_privilege(&self, privilege_id: &str) -> Result<Privilege>;

    fn add_privilege(&self, privilege: &Privilege) -> Result<Privilege>;

    fn update_privilege(&self, privilege: &Privilege) -> Result<Privilege>;

    fn delete_privilege(&self, privilege_id: &str) -> Result<()>;
}

/// Default [`AuthorizationManager`]
///
/// Holds no RBAC state of its own; all reads and writes go to the store.
/// Safe to share across threads when its collaborators are.
pub struct DefaultAuthorizationManager {
    store: Arc<dyn ConfigurationStore>,
    inheritance: Arc<dyn InheritanceResolver>,
    notifier: Arc<dyn ChangeNotifier>,
    converter: ModelConverter,
}

impl DefaultAuthorizationManager {
    pub fn new(
        store: Arc<dyn ConfigurationStore>,
        inheritance: Arc<dyn InheritanceResolver>,
        notifier: Arc<dyn ChangeNotifier>,
        descriptors: Arc<DescriptorRegistry>,
    ) -> Self {
        info!("Authorization manager initialized with descriptors {:?}", descriptors.types());

        Self {
            store,
            inheritance,
            notifier,
            converter: ModelConverter::new(SOURCE, descriptors),
        }
    }

    pub fn converter(&self) -> &ModelConverter {
        &self.converter
    }

    /// Replace the method property with the methods it implies
    ///
    /// Privileges without a method property are left alone, as is the
    /// property when the resolver returns nothing.
    fn expand_inherited_methods(&self, record: &mut PrivilegeRecord) {
        let Some(method) = record.property(MethodPrivilegeDescriptor::P_METHOD) else {
            return;
        };

        let methods = self.inheritance.inherited_methods(method);
        if methods.is_empty() {
            return;
        }

        let expanded = methods.join(",");
        debug!(
            "Expanded methods of privilege '{}': {} -> {}",
            record.id, method, expanded
        );
        record.set_property(MethodPrivilegeDescriptor::P_METHOD, expanded);
    }

    fn fire_changed(&self, change: ConfigurationChange) -> Result<()> {
        info!("Authorization configuration changed: {:?}", change);
        self.notifier.publish(AuthorizationConfigurationChanged::new(change))
    }
}

impl AuthorizationManager for DefaultAuthorizationManager {
    fn source(&self) -> &str {
        self.converter.source()
    }

    fn supports_write(&self) -> bool {
        true
    }

    fn list_roles(&self) -> Result<Vec<Role>> {
        let records = self.store.list_roles()?;
        debug!("Listing {} roles", records.len());

        let mut roles: Vec<Role> = records
            .iter()
            .map(|r| self.converter.to_domain_role(r))
            .collect();
        roles.sort_by(|a, b| a.role_id.cmp(&b.role_id));
        Ok(roles)
    }

    fn get_role(&self, role_id: &str) -> Result<Role> {
        let record = self.store.read_role(role_id)?;
        Ok(self.converter.to_domain_role(&record))
    }

    fn add_role(&self, role: &Role) -> Result<Role> {
        // The store may assign the id, so convert back from the same record
        let mut record = self.converter.to_record_role(role);
        self.store.create_role(&mut record)?;

        self.fire_changed(ConfigurationChange::RoleAdded(record.id.clone()))?;
        Ok(self.converter.to_domain_role(&record))
    }

    fn update_role(&self, role: &Role) -> Result<Role> {
        let mut record = self.converter.to_record_role(role);
        self.store.update_role(&mut record)?;

        self.fire_changed(ConfigurationChange::RoleUpdated(record.id.clone()))?;
        Ok(self.converter.to_domain_role(&record))
    }

    fn delete_role(&self, role_id: &str) -> Result<()> {
        self.store.delete_role(role_id)?;
        self.fire_changed(ConfigurationChange::RoleDeleted(role_id.to_string()))
    }

    fn list_privileges(&self) -> Result<Vec<Privilege>> {
        let records = self.store.list_privileges()?;
        debug!("Listing {} privileges", records.len());

        let mut privileges: Vec<Privilege> = records
            .iter()
            .map(|p| self.converter.to_domain_privilege(p))
            .collect();
        privileges.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(privileges)
    }

    fn get_privilege(&self, privilege_id: &str) -> Result<Privilege> {
        let record = self.store.read_privilege(privilege_id)?;
        Ok(self.converter.to_domain_privilege(&record))
    }

    fn add_privilege(&self, privilege: &Privilege) -> Result<Privilege> {
        let mut record = self.converter.to_record_privilege(privilege);
        // create implies read
        self.expand_inherited_methods(&mut record);

        self.store.create_privilege(&mut record)?;

        self.fire_changed(ConfigurationChange::PrivilegeAdded(record.id.clone()))?;
        Ok(self.converter.to_domain_privilege(&record))
    }

    fn update_privilege(&self, privilege: &Privilege) -> Result<Privilege> {
        let mut record = self.converter.to_record_privilege(privilege);
        self.store.update_privilege(&mut record)?;

        self.fire_changed(ConfigurationChange::PrivilegeUpdated(record.id.clone()))?;
        Ok(self.converter.to_domain_privilege(&record))
    }

    fn delete_privilege(&self, privilege_id: &str) -> Result<()> {
        self.store.delete_privilege(privilege_id)?;
        self.fire_changed(ConfigurationChange::PrivilegeDeleted(
            privilege_id.to_string(),
        ))
    }
}

impl fmt::Debug for DefaultAuthorizationManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultAuthorizationManager")
            .field("source", &self.converter.source())
            .field("converter", &self.converter)
            .finish_non_exhaustive()
    }
}
