//! Method inheritance
//!
//! Some methods imply others: whoever may `create` an entity must also be able
//! to `read` it. The [`InheritanceResolver`] answers which methods a declared
//! method value implies, and the authorization manager uses the answer to
//! expand method privileges when they are created.

use std::collections::{HashMap, HashSet};

/// Resolves the full set of methods implied by a method value
pub trait InheritanceResolver: Send + Sync {
    /// Return the ordered sequence of methods implied by `method`
    ///
    /// `method` is the raw property value and may be a single method name or
    /// a comma-joined list. The result includes the declared methods.
    fn inherited_methods(&self, method: &str) -> Vec<String>;
}

/// Rule-based method inheritance with transitive expansion
///
/// Each rule maps a method to the methods it implies, in order. Expansion is
/// depth-first: a method is emitted, then everything it implies. Every method
/// is emitted at most once, so cyclic rules terminate.
///
/// # Example
///
/// ```rust
/// use cretoai_rbac::inheritance::{InheritanceResolver, MethodInheritance};
///
/// let inheritance = MethodInheritance::default();
/// assert_eq!(inheritance.inherited_methods("create"), vec!["create", "read"]);
/// assert_eq!(inheritance.inherited_methods("read"), vec!["read"]);
/// ```
#[derive(Debug, Clone)]
pub struct MethodInheritance {
    rules: HashMap<String, Vec<String>>,
}

impl MethodInheritance {
    /// Create a resolver with no rules; every method implies only itself
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Add or replace the rule for `method`
    pub fn with_rule<I, S>(mut self, method: impl Into<String>, implied: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_rule(method, implied);
        self
    }

    /// Add or replace the rule for `method`
    pub fn set_rule<I, S>(&mut self, method: impl Into<String>, implied: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules
            .insert(method.into(), implied.into_iter().map(Into::into).collect());
    }

    /// Methods directly implied by `method`
    pub fn rule(&self, method: &str) -> Option<&[String]> {
        self.rules.get(method).map(Vec::as_slice)
    }

    fn expand(&self, method: &str, seen: &mut HashSet<String>, out: &mut Vec<String>) {
        if !seen.insert(method.to_string()) {
            return;
        }
        out.push(method.to_string());

        if let Some(implied) = self.rules.get(method) {
            for next in implied {
                self.expand(next, seen, out);
            }
        }
    }
}

impl Default for MethodInheritance {
    /// `create`, `update` and `delete` each imply `read`
    fn default() -> Self {
        Self::empty()
            .with_rule("create", ["read"])
            .with_rule("update", ["read"])
            .with_rule("delete", ["read"])
    }
}

impl InheritanceResolver for MethodInheritance {
    fn inherited_methods(&self, method: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for declared in method.split(',').map(str::trim).filter(|m| !m.is_empty()) {
            self.expand(declared, &mut seen, &mut out);
        }

        out
    }
}
