//! Logical service name to base URL mapping.
//!
//! Fixed at startup; read-only afterwards.

use crate::errors::GatewayError;
use std::collections::BTreeMap;

/// Registry of the backend services the gateway can forward to.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: BTreeMap<String, String>,
}

impl ServiceRegistry {
    /// Build a registry from `name -> base URL` pairs.
    ///
    /// Trailing slashes on base URLs are stripped so that joining with a
    /// downstream path never yields `//`.
    pub fn new(services: BTreeMap<String, String>) -> Self {
        let services = services
            .into_iter()
            .map(|(name, url)| (name, url.trim_end_matches('/').to_string()))
            .collect();
        Self { services }
    }

    /// Base URL of `service`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::ServiceNotFound` listing every known service.
    pub fn resolve(&self, service: &str) -> Result<&str, GatewayError> {
        self.services
            .get(service)
            .map(String::as_str)
            .ok_or_else(|| GatewayError::ServiceNotFound {
                service: service.to_string(),
                available: self.names(),
            })
    }

    /// All registered service names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.services.keys().cloned().collect()
    }
}
