// tether-core/src/infrastructure/adapters/memory.rs
//
// Test-only in-process catalog. Keeps entities keyed by (qualified name, type name) and
// records every call so tests can assert on the gateway contract.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use crate::domain::lineage::{CatalogIdentity, CatalogTypeDefinition, LineageProcessRecord};
use crate::error::TetherError;
use crate::infrastructure::error::CatalogError;
use crate::ports::catalog::{CatalogGateway, CatalogPurge, CatalogSearchHit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCall {
    Exists { qualified_name: String, type_name: String },
    Upload { count: usize },
    RegisterType { name: String },
    Search { keyword: String },
    Delete { guid: String },
}

#[derive(Default)]
struct State {
    /// guid -> (qualified name, type name)
    entities: BTreeMap<String, (String, String)>,
    types: BTreeMap<String, CatalogTypeDefinition>,
    calls: Vec<CatalogCall>,
    next_guid: u64,
    fail_lookups_for: HashSet<String>,
    fail_uploads: bool,
    fail_type_registration: bool,
}

#[derive(Default)]
pub struct InMemoryCatalog {
    state: Mutex<State>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entity as if a scan had discovered it.
    pub fn with_entity(self, identity: &dyn CatalogIdentity) -> Self {
        self.insert(identity.qualified_name(), identity.type_name());
        self
    }

    /// Make lookups of this qualified name fail as a transient error.
    pub fn failing_lookup(self, qualified_name: impl Into<String>) -> Self {
        self.lock().fail_lookups_for.insert(qualified_name.into());
        self
    }

    pub fn failing_uploads(self) -> Self {
        self.lock().fail_uploads = true;
        self
    }

    pub fn failing_type_registration(self) -> Self {
        self.lock().fail_type_registration = true;
        self
    }

    pub fn calls(&self) -> Vec<CatalogCall> {
        self.lock().calls.clone()
    }

    pub fn lookup_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, CatalogCall::Exists { .. }))
            .count()
    }

    pub fn upload_sizes(&self) -> Vec<usize> {
        self.calls()
            .iter()
            .filter_map(|c| match c {
                CatalogCall::Upload { count } => Some(*count),
                _ => None,
            })
            .collect()
    }

    pub fn contains(&self, qualified_name: &str, type_name: &str) -> bool {
        self.lock()
            .entities
            .values()
            .any(|(qn, tn)| qn == qualified_name && tn == type_name)
    }

    pub fn entity_count(&self) -> usize {
        self.lock().entities.len()
    }

    pub fn registered_type(&self, name: &str) -> Option<CatalogTypeDefinition> {
        self.lock().types.get(name).cloned()
    }

    fn insert(&self, qualified_name: String, type_name: String) {
        let mut state = self.lock();
        state.next_guid += 1;
        let guid = format!("guid-{}", state.next_guid);
        state.entities.insert(guid, (qualified_name, type_name));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A poisoned lock only means another test thread panicked.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CatalogGateway for InMemoryCatalog {
    async fn exists(&self, qualified_name: &str, type_name: &str) -> Result<bool, TetherError> {
        let mut state = self.lock();
        state.calls.push(CatalogCall::Exists {
            qualified_name: qualified_name.to_string(),
            type_name: type_name.to_string(),
        });

        if state.fail_lookups_for.contains(qualified_name) {
            return Err(CatalogError::TransientLookup {
                qualified_name: qualified_name.to_string(),
                type_name: type_name.to_string(),
                reason: "simulated network failure".to_string(),
            }
            .into());
        }

        Ok(state
            .entities
            .values()
            .any(|(qn, tn)| qn == qualified_name && tn == type_name))
    }

    async fn upload_batch(&self, records: &[LineageProcessRecord]) -> Result<(), TetherError> {
        if records.is_empty() {
            return Ok(());
        }

        {
            let mut state = self.lock();
            state.calls.push(CatalogCall::Upload {
                count: records.len(),
            });
            if state.fail_uploads {
                return Err(CatalogError::Upload {
                    attempted: records.len(),
                    reason: "simulated upload failure".to_string(),
                }
                .into());
            }
        }

        for record in records {
            self.insert(record.qualified_name.clone(), record.type_name().to_string());
        }
        Ok(())
    }

    async fn register_type(&self, definition: &CatalogTypeDefinition) -> Result<(), TetherError> {
        let mut state = self.lock();
        state.calls.push(CatalogCall::RegisterType {
            name: definition.name.clone(),
        });
        if state.fail_type_registration {
            return Err(CatalogError::TypeRegistration {
                type_name: definition.name.clone(),
                reason: "simulated registration failure".to_string(),
            }
            .into());
        }
        state
            .types
            .insert(definition.name.clone(), definition.clone());
        Ok(())
    }
}

#[async_trait]
impl CatalogPurge for InMemoryCatalog {
    async fn search_entities(&self, keyword: &str) -> Result<Vec<CatalogSearchHit>, TetherError> {
        let mut state = self.lock();
        state.calls.push(CatalogCall::Search {
            keyword: keyword.to_string(),
        });
        Ok(state
            .entities
            .iter()
            .filter(|(_, (qn, _))| qn.contains(keyword))
            .map(|(guid, (qn, tn))| CatalogSearchHit {
                id: guid.clone(),
                qualified_name: qn.clone(),
                entity_type: tn.clone(),
            })
            .collect())
    }

    async fn delete_entity(&self, guid: &str) -> Result<(), TetherError> {
        let mut state = self.lock();
        state.calls.push(CatalogCall::Delete {
            guid: guid.to_string(),
        });
        match state.entities.remove(guid) {
            Some(_) => Ok(()),
            None => Err(CatalogError::Delete {
                guid: guid.to_string(),
                reason: "no such entity".to_string(),
            }
            .into()),
        }
    }
}
