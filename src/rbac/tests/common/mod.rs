//! Shared test helpers: recording collaborators and logging setup

#![allow(dead_code)]

use cretoai_rbac::{
    AuthorizationConfigurationChanged, ChangeNotifier, ConfigurationStore,
    DefaultAuthorizationManager, DescriptorRegistry, InMemoryConfigurationStore,
    InheritanceResolver, MethodInheritance, PrivilegeRecord, RbacError, Result, RoleRecord,
};
use parking_lot::Mutex;
use std::sync::{Arc, Once};

static TRACING: Once = Once::new();

/// Install a test subscriber honouring `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn,cretoai_rbac=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Ordered log of store commits and notifications
pub type Journal = Arc<Mutex<Vec<String>>>;

/// Notifier that records every event and writes `notify:<change>` to a journal
#[derive(Default)]
pub struct RecordingNotifier {
    pub events: Mutex<Vec<AuthorizationConfigurationChanged>>,
    pub journal: Journal,
}

impl RecordingNotifier {
    pub fn with_journal(journal: Journal) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            journal,
        }
    }

    pub fn count(&self) -> usize {
        self.events.lock().len()
    }
}

impl ChangeNotifier for RecordingNotifier {
    fn publish(&self, event: AuthorizationConfigurationChanged) -> Result<()> {
        self.journal
            .lock()
            .push(format!("notify:{}", event.change.subject()));
        self.events.lock().push(event);
        Ok(())
    }
}

/// Notifier whose publish always fails
pub struct FailingNotifier;

impl ChangeNotifier for FailingNotifier {
    fn publish(&self, _event: AuthorizationConfigurationChanged) -> Result<()> {
        Err(RbacError::Notification("event bus unavailable".to_string()))
    }
}

/// Store wrapper writing `commit:<op>:<id>` to a journal after each successful mutation
pub struct JournalingStore {
    inner: InMemoryConfigurationStore,
    journal: Journal,
}

impl JournalingStore {
    pub fn new(journal: Journal) -> Self {
        Self {
            inner: InMemoryConfigurationStore::new(),
            journal,
        }
    }

    fn commit<T>(&self, op: &str, id: &str, result: Result<T>) -> Result<T> {
        if result.is_ok() {
            self.journal.lock().push(format!("commit:{}:{}", op, id));
        }
        result
    }
}

impl ConfigurationStore for JournalingStore {
    fn list_roles(&self) -> Result<Vec<RoleRecord>> {
        self.inner.list_roles()
    }

    fn read_role(&self, id: &str) -> Result<RoleRecord> {
        self.inner.read_role(id)
    }

    fn create_role(&self, role: &mut RoleRecord) -> Result<()> {
        let result = self.inner.create_role(role);
        self.commit("create_role", &role.id, result)
    }

    fn update_role(&self, role: &mut RoleRecord) -> Result<()> {
        let result = self.inner.update_role(role);
        self.commit("update_role", &role.id, result)
    }

    fn delete_role(&self, id: &str) -> Result<()> {
        let result = self.inner.delete_role(id);
        self.commit("delete_role", id, result)
    }

    fn list_privileges(&self) -> Result<Vec<PrivilegeRecord>> {
        self.inner.list_privileges()
    }

    fn read_privilege(&self, id: &str) -> Result<PrivilegeRecord> {
        self.inner.read_privilege(id)
    }

    fn create_privilege(&self, privilege: &mut PrivilegeRecord) -> Result<()> {
        let result = self.inner.create_privilege(privilege);
        self.commit("create_privilege", &privilege.id, result)
    }

    fn update_privilege(&self, privilege: &mut PrivilegeRecord) -> Result<()> {
        let result = self.inner.update_privilege(privilege);
        self.commit("update_privilege", &privilege.id, result)
    }

    fn delete_privilege(&self, id: &str) -> Result<()> {
        let result = self.inner.delete_privilege(id);
        self.commit("delete_privilege", id, result)
    }
}

/// Manager wired to an in-memory store and a recording notifier
pub struct Harness {
    pub manager: DefaultAuthorizationManager,
    pub store: Arc<JournalingStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub journal: Journal,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(
            MethodInheritance::default(),
            DescriptorRegistry::with_defaults(),
        )
    }

    pub fn with(
        inheritance: impl InheritanceResolver + 'static,
        descriptors: DescriptorRegistry,
    ) -> Self {
        init_tracing();

        let journal: Journal = Arc::default();
        let store = Arc::new(JournalingStore::new(journal.clone()));
        let notifier = Arc::new(RecordingNotifier::with_journal(journal.clone()));
        let manager = DefaultAuthorizationManager::new(
            store.clone(),
            Arc::new(inheritance),
            notifier.clone(),
            Arc::new(descriptors),
        );

        Self {
            manager,
            store,
            notifier,
            journal,
        }
    }

    pub fn journal(&self) -> Vec<String> {
        self.journal.lock().clone()
    }
}
