use std::collections::HashMap;
use std::sync::Mutex;

use super::domain::TestDefinition;

/// Content-store failure while looking up a definition. The session
/// controller collapses this with "no match" into one not-found outcome; the
/// respondent is never shown the distinction.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("content store unavailable: {0}")]
    Unavailable(String),
}

/// Read access to authored test definitions.
///
/// Injected into the session controller so tests can substitute fakes; there
/// is deliberately no module-level client singleton.
pub trait DefinitionCatalog: Send + Sync {
    /// Fetch the active definition for a slug. `Ok(None)` means no active
    /// definition exists under that slug.
    fn active_by_slug(&self, slug: &str) -> Result<Option<TestDefinition>, CatalogError>;
}

/// In-memory catalog backing the embedded API and the compiled-in
/// assessments. Definitions flagged inactive are withheld from lookup.
#[derive(Default)]
pub struct MemoryCatalog {
    entries: Mutex<HashMap<String, CatalogEntry>>,
}

struct CatalogEntry {
    definition: TestDefinition,
    active: bool,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_definitions(definitions: impl IntoIterator<Item = TestDefinition>) -> Self {
        let catalog = Self::new();
        for definition in definitions {
            catalog.publish(definition);
        }
        catalog
    }

    /// Insert or replace a definition in the active state.
    pub fn publish(&self, definition: TestDefinition) {
        let mut entries = self.entries.lock().expect("catalog lock");
        entries.insert(
            definition.slug.clone(),
            CatalogEntry {
                definition,
                active: true,
            },
        );
    }

    /// Mark a definition inactive without removing it.
    pub fn retire(&self, slug: &str) {
        let mut entries = self.entries.lock().expect("catalog lock");
        if let Some(entry) = entries.get_mut(slug) {
            entry.active = false;
        }
    }
}

impl DefinitionCatalog for MemoryCatalog {
    fn active_by_slug(&self, slug: &str) -> Result<Option<TestDefinition>, CatalogError> {
        let entries = self.entries.lock().expect("catalog lock");
        Ok(entries
            .get(slug)
            .filter(|entry| entry.active)
            .map(|entry| entry.definition.clone()))
    }
}
