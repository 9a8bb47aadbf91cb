//! Test modules for the executor crate.


use std::collections::HashSet;
use std::sync::Arc;

use docvault_core::{
    AttributeDescriptor, AttributeType, DocumentValue, EntityKey, EntityTypeRegistry, Error,
    Result, Storage,
};
use parking_lot::Mutex;

use crate::DocumentController;

struct Record {
    username: String,
    entity_type: String,
    key: EntityKey,
    value: DocumentValue,
}

/// In-memory `Storage` double with a fixed user set.
#[derive(Default)]
pub struct FakeStorage {
    users: HashSet<String>,
    records: Mutex<Vec<Record>>,
    failure: Mutex<Option<Error>>,
}

impl FakeStorage {
    pub fn with_users(users: &[&str]) -> Self {
        Self {
            users: users.iter().map(|u| u.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Append a record without replacing an existing one for the same key.
    pub fn push(&self, username: &str, entity_type: &str, key: EntityKey, value: DocumentValue) {
        self.records.lock().push(Record {
            username: username.to_string(),
            entity_type: entity_type.to_string(),
            key,
            value,
        });
    }

    /// Make every following call fail with `error`.
    pub fn fail_with(&self, error: Error) {
        *self.failure.lock() = Some(error);
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    fn check_failure(&self) -> Result<()> {
        match self.failure.lock().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Storage for FakeStorage {
    fn get(&self, username: &str, entity_type: &str, filter: &EntityKey) -> Result<Vec<DocumentValue>> {
        self.check_failure()?;
        let records = self.records.lock();
        Ok(records
            .iter()
            .filter(|r| r.username == username && r.entity_type == entity_type)
            .filter(|r| filter.iter().all(|(name, value)| r.key.get(name) == Some(value)))
            .map(|r| r.value.clone())
            .collect())
    }

    fn put(&self, username: &str, entity_type: &str, key: &EntityKey, value: &DocumentValue) -> Result<()> {
        self.check_failure()?;
        if !self.users.contains(username) {
            return Err(Error::UserNotFound {
                username: username.to_string(),
            });
        }
        let mut records = self.records.lock();
        match records
            .iter_mut()
            .find(|r| r.username == username && r.entity_type == entity_type && &r.key == key)
        {
            Some(existing) => existing.value = value.clone(),
            None => records.push(Record {
                username: username.to_string(),
                entity_type: entity_type.to_string(),
                key: key.clone(),
                value: value.clone(),
            }),
        }
        Ok(())
    }
}

/// Registry with `order` keyed by integer `id` and `reading` keyed by
/// string `sensor` then integer `seq`.
pub fn registry() -> Arc<EntityTypeRegistry> {
    let mut registry = EntityTypeRegistry::new();
    registry
        .register("order", vec![AttributeDescriptor::new("id", AttributeType::Integer)])
        .unwrap();
    registry
        .register(
            "reading",
            vec![
                AttributeDescriptor::new("sensor", AttributeType::String),
                AttributeDescriptor::new("seq", AttributeType::Integer),
            ],
        )
        .unwrap();
    Arc::new(registry)
}

pub fn controller(users: &[&str]) -> (Arc<FakeStorage>, DocumentController) {
    let storage = Arc::new(FakeStorage::with_users(users));
    let controller = DocumentController::new(storage.clone(), registry());
    (storage, controller)
}
