//! Method-based privileges (`permission` + `method`)

use super::PrivilegeDescriptor;
use crate::types::PrivilegeRecord;

/// Descriptor for privileges that grant a set of methods on a permission domain
///
/// Renders `"{permission}:{method}"`, e.g. `nexus:repositories:create,read`.
/// A missing property renders as `*`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodPrivilegeDescriptor;

impl MethodPrivilegeDescriptor {
    /// Privilege type tag
    pub const TYPE: &'static str = "method";

    /// Comma-joined list of granted methods
    pub const P_METHOD: &'static str = "method";

    /// Permission domain the methods apply to
    pub const P_PERMISSION: &'static str = "permission";

    pub fn new() -> Self {
        Self
    }
}

impl PrivilegeDescriptor for MethodPrivilegeDescriptor {
    fn privilege_type(&self) -> &str {
        Self::TYPE
    }

    fn render_permission(&self, record: &PrivilegeRecord) -> String {
        let permission = record.property(Self::P_PERMISSION).unwrap_or("*");
        let method = record.property(Self::P_METHOD).unwrap_or("*");
        format!("{}:{}", permission, method)
    }
}
