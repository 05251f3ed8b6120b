//! Cipher port - pluggable decryption of stored secret keys.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::{CredentialError, CredentialResult};

/// A decryption capability addressed by name.
///
/// The cryptography itself lives in the plugin; the core only needs
/// ciphertext in, plaintext out.
#[async_trait]
pub trait Cipher: Send + Sync {
    /// Decrypt `ciphertext` into its plaintext form.
    async fn decrypt(&self, ciphertext: &str) -> anyhow::Result<String>;
}

/// Constructor registered under a cipher name.
///
/// Returning `None` means the plugin could not produce a usable instance.
pub type CipherFactory = Arc<dyn Fn() -> Option<Arc<dyn Cipher>> + Send + Sync>;

/// Name to constructor mapping injected into the credential resolver.
#[derive(Clone, Default)]
pub struct CipherRegistry {
    factories: BTreeMap<String, CipherFactory>,
}

impl CipherRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor, replacing any previous one with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Option<Arc<dyn Cipher>> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Option<Arc<dyn Cipher>> + Send + Sync + 'static,
    {
        self.register(name, factory);
        self
    }

    /// Look up a constructor by name.
    pub fn lookup(&self, name: &str) -> CredentialResult<CipherFactory> {
        self.factories
            .get(name)
            .cloned()
            .ok_or_else(|| CredentialError::CipherNotFound(name.to_string()))
    }

    /// Look up and construct a cipher instance.
    ///
    /// Lookup failure and an invalid (absent) instance are reported as
    /// distinct errors.
    pub fn instantiate(&self, name: &str) -> CredentialResult<Arc<dyn Cipher>> {
        let factory = self.lookup(name)?;
        factory().ok_or_else(|| CredentialError::CipherInvalid(name.to_string()))
    }

    /// Registered cipher names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}

impl fmt::Debug for CipherRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Reverse;

    #[async_trait]
    impl Cipher for Reverse {
        async fn decrypt(&self, ciphertext: &str) -> anyhow::Result<String> {
            Ok(ciphertext.chars().rev().collect())
        }
    }

    #[test]
    fn test_lookup_unknown_name() {
        let registry = CipherRegistry::new();
        assert!(matches!(
            registry.lookup("missing"),
            Err(CredentialError::CipherNotFound(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_instantiate_invalid_plugin() {
        let registry = CipherRegistry::new().with("broken", || None);
        assert!(matches!(
            registry.instantiate("broken"),
            Err(CredentialError::CipherInvalid(name)) if name == "broken"
        ));
    }

    #[tokio::test]
    async fn test_instantiate_and_decrypt() {
        let registry =
            CipherRegistry::new().with("reverse", || Some(Arc::new(Reverse) as Arc<dyn Cipher>));
        let cipher = registry.instantiate("reverse").unwrap();
        assert_eq!(cipher.decrypt("cba").await.unwrap(), "abc");
        assert_eq!(registry.names(), vec!["reverse"]);
    }
}
