//! Module registry: content-addressed naming, deduplication, collision
//! handling.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::BuildError;
use crate::module::ModuleEntry;
use crate::probe::ProbeModule;

/// Registry owning probe module identity.
///
/// Unnamed entries get a content-derived `mod_<hex>` name, which collapses
/// structurally identical definitions into one entry. Named entries whose
/// name collides with a differently-configured existing entry are
/// disambiguated with a `-N` suffix. The suffix counter is a field of the
/// registry, so independent builds in one process never interfere.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: BTreeMap<String, ModuleEntry>,
    collision_seq: u32,
}

/// Shape of the rendered module file: a `modules:` mapping from name to
/// probe definition.
#[derive(Serialize)]
struct ModulesFile<'a> {
    modules: BTreeMap<&'a str, &'a ProbeModule>,
}

impl ModuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry and return its final, registry-unique name.
    ///
    /// Registration is idempotent: re-registering an entry whose name and
    /// content match an existing one reuses the existing entry. A name
    /// collision with different content (reachable only for customized
    /// entries) is resolved by suffixing a monotonically increasing counter.
    ///
    /// # Errors
    /// Returns [`BuildError::Serialize`] if the entry cannot be hashed.
    pub fn register(&mut self, mut entry: ModuleEntry) -> Result<String, BuildError> {
        if entry.name.is_empty() {
            entry.name = entry.derived_name()?;
        }

        if let Some(existing) = self.modules.get(&entry.name) {
            if existing.content_hash()? == entry.content_hash()? {
                tracing::debug!(module = %entry.name, "module already registered, reusing");
                return Ok(entry.name);
            }
            if entry.customized {
                self.collision_seq += 1;
                let renamed = format!("{}-{}", entry.name, self.collision_seq);
                tracing::debug!(
                    module = %entry.name,
                    renamed = %renamed,
                    "module name collision, disambiguating"
                );
                entry.name = renamed;
            }
        }

        let name = entry.name.clone();
        self.modules.insert(name.clone(), entry);
        Ok(name)
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&ModuleEntry> {
        self.modules.get(name)
    }

    /// Whether an entry with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Iterate entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ModuleEntry> {
        self.modules.values()
    }

    /// Render the module file: a YAML mapping from module name to probe
    /// definition, keys in lexicographic order.
    ///
    /// # Errors
    /// Returns [`BuildError::Serialize`] on serialization failure.
    pub fn render(&self) -> Result<String, BuildError> {
        let file = ModulesFile {
            modules: self
                .modules
                .iter()
                .map(|(name, entry)| (name.as_str(), &entry.probe))
                .collect(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::builder;
    use crate::probe::ProbeModule;

    #[test]
    fn test_unnamed_identical_entries_deduplicate() {
        let mut registry = ModuleRegistry::new();
        let first = registry
            .register(ModuleEntry::new("", ProbeModule::http()))
            .unwrap();
        let second = registry
            .register(ModuleEntry::new("", ProbeModule::http()))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unnamed_different_entries_get_different_names() {
        let mut registry = ModuleRegistry::new();
        let http = registry
            .register(ModuleEntry::new("", ProbeModule::http()))
            .unwrap();
        let tcp = registry
            .register(ModuleEntry::new("", ProbeModule::tcp()))
            .unwrap();

        assert_ne!(http, tcp);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_customized_collision_gets_suffix() {
        let mut registry = ModuleRegistry::new();

        let mut first = builder::http_status(200);
        first.name = "web".to_string();
        first.customized = true;
        assert_eq!(registry.register(first).unwrap(), "web");

        let mut second = builder::http_status(404);
        second.name = "web".to_string();
        second.customized = true;
        assert_eq!(registry.register(second).unwrap(), "web-1");

        let mut third = builder::http_status(500);
        third.name = "web".to_string();
        third.customized = true;
        assert_eq!(registry.register(third).unwrap(), "web-2");

        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_reregistration_is_idempotent() {
        let mut registry = ModuleRegistry::new();

        let mut entry = builder::http_status(200);
        entry.name = "web".to_string();
        entry.customized = true;
        assert_eq!(registry.register(entry.clone()).unwrap(), "web");
        assert_eq!(registry.register(entry).unwrap(), "web");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_render_sorts_names_lexicographically() {
        let mut registry = ModuleRegistry::new();
        for name in ["zulu", "alpha", "mike"] {
            let mut entry = builder::http_status(200);
            entry.name = name.to_string();
            entry.customized = true;
            registry.register(entry).unwrap();
        }

        let yaml = registry.render().unwrap();
        assert!(yaml.starts_with("modules:"));
        let alpha = yaml.find("alpha").unwrap();
        let mike = yaml.find("mike").unwrap();
        let zulu = yaml.find("zulu").unwrap();
        assert!(alpha < mike);
        assert!(mike < zulu);
    }

    #[test]
    fn test_render_is_deterministic() {
        let build = || {
            let mut registry = ModuleRegistry::new();
            registry.register(builder::http_status(200)).unwrap();
            registry
                .register(ModuleEntry::new("", ProbeModule::dns()))
                .unwrap();
            registry.render().unwrap()
        };
        assert_eq!(build(), build());
    }
}
