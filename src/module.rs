//! Probe module identity and registration.
//!
//! A [`ModuleEntry`] wraps one probe definition with its registry identity:
//! a name (caller-supplied or content-derived), a free-text description of
//! applied adjustments, and a flag recording whether the entry was
//! customized beyond its builder defaults.
//!
//! - [`builder`]: pure constructors for each probe kind
//! - [`ModuleRegistry`]: content-addressed naming, deduplication, and
//!   collision handling

pub mod builder;
mod registry;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::BuildError;
use crate::probe::ProbeModule;

pub use registry::ModuleRegistry;

/// Width of the content-derived name digest, in hex characters.
const HASH_WIDTH: usize = 8;

/// Prefix tag for content-derived module names.
const DERIVED_NAME_TAG: &str = "mod_";

/// One probe module plus its registry identity.
///
/// Created by a [`builder`] function, mutated by option application, and
/// finalized on registration — entries inside the registry are immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleEntry {
    /// Registry-unique identifier. Empty until registration for unnamed
    /// entries; the registry derives a name from the content hash.
    pub name: String,

    /// Accumulated description of applied adjustments. Diagnostic only,
    /// never part of naming decisions.
    pub description: String,

    /// True once any adjustment beyond the builder default was applied.
    pub customized: bool,

    /// The probe definition itself.
    pub probe: ProbeModule,
}

impl ModuleEntry {
    /// Create an entry around a probe definition.
    pub fn new(name: impl Into<String>, probe: ProbeModule) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            customized: false,
            probe,
        }
    }

    /// Short hex digest of the entry's canonical serialized form.
    ///
    /// The digest is a pure function of logical content: container-typed
    /// probe fields are ordered collections, so identical entries hash
    /// identically across runs.
    ///
    /// # Errors
    /// Returns [`BuildError::Serialize`] if the entry cannot be serialized;
    /// an unserializable module cannot be registered.
    pub fn content_hash(&self) -> Result<String, BuildError> {
        let canonical = serde_yaml::to_string(self)?;
        let digest = Sha256::digest(canonical.as_bytes());
        Ok(format!("{digest:x}")[..HASH_WIDTH].to_string())
    }

    /// Name derived from the content hash, used for unnamed entries.
    pub(crate) fn derived_name(&self) -> Result<String, BuildError> {
        Ok(format!("{DERIVED_NAME_TAG}{}", self.content_hash()?))
    }
}
