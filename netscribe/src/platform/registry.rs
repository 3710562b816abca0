//! Registry for looking up vendor profiles.

use std::collections::HashMap;

use super::definition::VendorProfile;
use super::vendors;
use crate::error::{Result, SessionError};

/// Registry of vendor profiles, keyed by profile name.
///
/// A plain value: create one per application (or per test) and pass it
/// where lookups are needed.
#[derive(Debug, Clone, Default)]
pub struct VendorRegistry {
    profiles: HashMap<String, VendorProfile>,
}

impl VendorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in vendors.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(vendors::cisco::profile());
        registry.register(vendors::brocade::profile());
        registry
    }

    /// Register a profile, replacing any profile with the same name.
    pub fn register(&mut self, profile: VendorProfile) -> Option<VendorProfile> {
        self.profiles.insert(profile.name.clone(), profile)
    }

    /// Get a profile by name.
    pub fn get(&self, name: &str) -> Option<&VendorProfile> {
        self.profiles.get(name)
    }

    /// Get a profile by name, failing for unknown vendors.
    pub fn require(&self, name: &str) -> Result<&VendorProfile> {
        self.get(name).ok_or_else(|| {
            SessionError::UnknownVendor {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Check if a profile is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// List all registered profile names.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.profiles.keys()
    }
}
