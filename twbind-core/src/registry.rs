//! Named handler registration.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use twbind_sdk::routes::HEALTH_SEGMENT;

use crate::handler::BindingHandler;

/// Errors raised while registering a binding handler.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("binding name is required")]
    EmptyName,

    #[error("invalid binding name {0:?}")]
    InvalidName(String),

    #[error("binding {0:?} is already registered")]
    Duplicate(String),

    #[error("binding name {0:?} is reserved")]
    Reserved(String),
}

/// The set of input bindings this app subscribes to.
///
/// Filled once at startup and shared read-only afterwards.
#[derive(Clone, Default)]
pub struct BindingRegistry {
    handlers: BTreeMap<String, Arc<dyn BindingHandler>>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`.
    ///
    /// A single leading `/` is accepted and dropped, so `tweets` and
    /// `/tweets` name the same binding.
    pub fn register<H>(&mut self, name: &str, handler: H) -> Result<(), RegistrationError>
    where
        H: BindingHandler + 'static,
    {
        self.register_shared(name, Arc::new(handler))
    }

    /// Register an already shared handler under `name`.
    pub fn register_shared(
        &mut self,
        name: &str,
        handler: Arc<dyn BindingHandler>,
    ) -> Result<(), RegistrationError> {
        let name = normalize_name(name)?;
        if self.handlers.contains_key(name) {
            return Err(RegistrationError::Duplicate(name.to_owned()));
        }
        self.handlers.insert(name.to_owned(), handler);
        tracing::debug!(binding = name, "binding handler registered");
        Ok(())
    }

    /// Look up the handler for `name`.
    pub fn get(&self, name: &str) -> Option<Arc<dyn BindingHandler>> {
        self.handlers
            .get(name.strip_prefix('/').unwrap_or(name))
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered binding names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for BindingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

fn normalize_name(name: &str) -> Result<&str, RegistrationError> {
    let name = name.strip_prefix('/').unwrap_or(name);
    if name.is_empty() {
        return Err(RegistrationError::EmptyName);
    }
    let valid = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !valid {
        return Err(RegistrationError::InvalidName(name.to_owned()));
    }
    if name == HEALTH_SEGMENT {
        return Err(RegistrationError::Reserved(name.to_owned()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tweets::TweetHandler;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = BindingRegistry::new();
        registry.register("tweets", TweetHandler).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("tweets"));
        assert!(registry.contains("/tweets"));
        assert!(!registry.contains("toots"));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["tweets"]);
    }

    #[test]
    fn test_leading_slash_is_normalized() {
        let mut registry = BindingRegistry::new();
        registry.register("/tweets", TweetHandler).unwrap();
        assert!(registry.contains("tweets"));

        let err = registry.register("tweets", TweetHandler).unwrap_err();
        assert_eq!(err, RegistrationError::Duplicate("tweets".to_string()));
    }

    #[test]
    fn test_rejects_bad_names() {
        let mut registry = BindingRegistry::new();
        assert_eq!(
            registry.register("", TweetHandler),
            Err(RegistrationError::EmptyName)
        );
        assert_eq!(
            registry.register("/", TweetHandler),
            Err(RegistrationError::EmptyName)
        );
        assert_eq!(
            registry.register("a/b", TweetHandler),
            Err(RegistrationError::InvalidName("a/b".to_string()))
        );
        assert_eq!(
            registry.register("new tweets", TweetHandler),
            Err(RegistrationError::InvalidName("new tweets".to_string()))
        );
        assert_eq!(
            registry.register("healthz", TweetHandler),
            Err(RegistrationError::Reserved("healthz".to_string()))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_debug_lists_names() {
        let mut registry = BindingRegistry::new();
        registry.register("tweets", TweetHandler).unwrap();
        registry.register("mentions", TweetHandler).unwrap();
        assert_eq!(format!("{registry:?}"), r#"{"mentions", "tweets"}"#);
    }
}
