use std::sync::{Arc, Mutex};
use std::time::Duration;

use moka::policy::EvictionPolicy;
use moka::sync::Cache;

use crate::config::SessionConfig;
use crate::engine::ValidatorEngine;

/// Engine shared between the validating task and report producers
pub type SharedEngine = Arc<Mutex<ValidatorEngine>>;

/// Registry of validation sessions keyed by document name
///
/// Bounded by `max_sessions`, evicting the least recently used engine first,
/// and drops engines that have not been looked up for `idle_ttl_seconds`. The registry is owned by its caller; there is no
/// process-wide instance.
pub struct SessionRegistry {
    sessions: Cache<String, SharedEngine>,
}

impl SessionRegistry {
    pub fn new(config: &SessionConfig) -> Self {
        let sessions = Cache::builder()
            .max_capacity(config.max_sessions)
            .eviction_policy(EvictionPolicy::lru())
            .time_to_idle(Duration::from_secs(config.idle_ttl_seconds))
            .build();

        Self { sessions }
    }

    /// Register a fresh engine for `document_name`, replacing any older one
    pub fn create_engine(&self, document_name: &str) -> SharedEngine {
        let engine = Arc::new(Mutex::new(ValidatorEngine::new(document_name)));
        self.sessions
            .insert(document_name.to_string(), Arc::clone(&engine));
        tracing::debug!(document = document_name, "validation session created");
        engine
    }

    /// Engine registered for `document_name`, the same instance on every call
    pub fn get_engine(&self, document_name: &str) -> Option<SharedEngine> {
        self.sessions.get(document_name)
    }

    pub fn contains(&self, document_name: &str) -> bool {
        self.sessions.contains_key(document_name)
    }

    /// Drop the session of a document once its reports have been consumed
    pub fn remove(&self, document_name: &str) -> Option<SharedEngine> {
        self.sessions.remove(document_name)
    }

    /// Approximate number of registered sessions
    pub fn len(&self) -> u64 {
        self.sessions.run_pending_tasks();
        self.sessions.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Report;

    #[test]
    fn test_get_engine_returns_same_instance() {
        let registry = SessionRegistry::default();
        let created = registry.create_engine("index.html");

        let first = registry.get_engine("index.html").unwrap();
        let second = registry.get_engine("index.html").unwrap();
        assert!(Arc::ptr_eq(&created, &first));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_create_engine_replaces_previous_session() {
        let registry = SessionRegistry::default();
        let old = registry.create_engine("feed.xhtml");
        let new = registry.create_engine("feed.xhtml");

        assert!(!Arc::ptr_eq(&old, &new));
        let current = registry.get_engine("feed.xhtml").unwrap();
        assert!(Arc::ptr_eq(&new, &current));
    }

    #[test]
    fn test_unknown_document() {
        let registry = SessionRegistry::default();
        assert!(registry.get_engine("missing.html").is_none());
        assert!(!registry.contains("missing.html"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_session() {
        let registry = SessionRegistry::default();
        registry.create_engine("a.html");
        registry.create_engine("b.html");
        assert_eq!(registry.len(), 2);

        assert!(registry.remove("a.html").is_some());
        assert!(registry.get_engine("a.html").is_none());
        assert!(registry.contains("b.html"));
    }

    #[test]
    fn test_registry_is_bounded() {
        let registry = SessionRegistry::new(&SessionConfig {
            max_sessions: 2,
            idle_ttl_seconds: 600,
        });
        for i in 0..10 {
            registry.create_engine(&format!("doc-{i}.html"));
        }
        assert!(registry.len() <= 2);

        let last = registry.get_engine("doc-9.html").unwrap();
        assert!(registry.get_engine("doc-0.html").is_none());
        assert!(Arc::ptr_eq(&last, &registry.get_engine("doc-9.html").unwrap()));
    }

    #[test]
    fn test_full_registry_keeps_newest_engine() {
        let registry = SessionRegistry::new(&SessionConfig {
            max_sessions: 2,
            idle_ttl_seconds: 600,
        });
        registry.create_engine("a.html");
        registry.create_engine("b.html");
        for _ in 0..5 {
            registry.get_engine("a.html");
            registry.get_engine("b.html");
        }
        registry.len();

        let created = registry.create_engine("c.html");
        assert!(registry.len() <= 2);

        let found = registry.get_engine("c.html").unwrap();
        assert!(Arc::ptr_eq(&created, &found));
        Report::add_error_report(&registry, "c.html", "hfeed does not contain any hentry").unwrap();
        assert_eq!(found.lock().unwrap().reports().len(), 1);
    }
}
