//! Free-form wildcard privileges

use super::PrivilegeDescriptor;
use crate::types::PrivilegeRecord;

/// Descriptor whose permission string is the `pattern` property, verbatim
#[derive(Debug, Clone, Copy, Default)]
pub struct WildcardPrivilegeDescriptor;

impl WildcardPrivilegeDescriptor {
    pub const TYPE: &'static str = "wildcard";

    pub const P_PATTERN: &'static str = "pattern";

    pub fn new() -> Self {
        Self
    }
}

impl PrivilegeDescriptor for WildcardPrivilegeDescriptor {
    fn privilege_type(&self) -> &str {
        Self::TYPE
    }

    fn render_permission(&self, record: &PrivilegeRecord) -> String {
        record
            .property(Self::P_PATTERN)
            .unwrap_or_default()
            .to_string()
    }
}
