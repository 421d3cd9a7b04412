//! Namespace handlers and the registry that mounts them.

pub mod admin_channel;
pub mod default_channel;

use std::{collections::BTreeMap, sync::Arc};

use crate::domain::{NamespaceHandler, NamespacePath};

pub use admin_channel::AdminChannel;
pub use default_channel::DefaultChannel;

/// Handlers keyed by the namespace they are mounted on.
#[derive(Default, Clone)]
pub struct NamespaceRegistry {
    handlers: BTreeMap<NamespacePath, Arc<dyn NamespaceHandler>>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `/` and `/admin` mounted.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DefaultChannel));
        registry.register(Arc::new(AdminChannel));
        registry
    }

    /// Mount a handler, replacing any handler already on the same path.
    pub fn register(&mut self, handler: Arc<dyn NamespaceHandler>) {
        self.handlers.insert(handler.path(), handler);
    }

    pub fn get(&self, namespace: &NamespacePath) -> Option<Arc<dyn NamespaceHandler>> {
        self.handlers.get(namespace).cloned()
    }

    /// Mounted namespaces in path order.
    pub fn paths(&self) -> Vec<NamespacePath> {
        self.handlers.keys().cloned().collect()
    }
}
