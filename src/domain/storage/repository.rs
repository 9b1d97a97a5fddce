//! Storage trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

use super::entity::StorageEntity;

/// In-place change applied by [`Storage::modify`]
///
/// Returning an error leaves the stored document untouched.
pub type Mutation<E> = Box<dyn FnOnce(&mut E) -> Result<(), DomainError> + Send>;

/// Generic document storage for any entity type
///
/// Backends report duplicate keys as `DomainError::Conflict`, missing documents
/// on modify as `DomainError::NotFound` and everything else as
/// `DomainError::Storage`.
#[async_trait]
pub trait Storage<E>: Send + Sync + Debug
where
    E: StorageEntity + 'static,
{
    /// Retrieves a document by its key
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError>;

    /// Retrieves all documents
    async fn list(&self) -> Result<Vec<E>, DomainError>;

    /// Inserts a new document, fails with a conflict if the key is taken
    async fn create(&self, entity: E) -> Result<E, DomainError>;

    /// Applies `mutation` to a stored document and persists the result
    ///
    /// Modifications of the same key are serialized: each one sees the result
    /// of the previous one.
    async fn modify(&self, key: &E::Key, mutation: Mutation<E>) -> Result<E, DomainError>;

    /// Deletes a document by its key, returns true if something was removed
    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError>;

    /// Checks if a document exists
    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.is_some())
    }

    /// Returns the number of stored documents
    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.list().await?.len())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::storage::StorageKey;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Operations a `MockStorage` can be told to fail
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FailOn {
        All,
        Create,
        Update,
        Delete,
    }

    /// Mock storage for testing failure paths
    #[derive(Debug)]
    pub struct MockStorage<E>
    where
        E: StorageEntity,
    {
        entities: Mutex<HashMap<String, E>>,
        failure: Mutex<Option<(FailOn, String)>>,
    }

    impl<E> Default for MockStorage<E>
    where
        E: StorageEntity,
    {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<E> MockStorage<E>
    where
        E: StorageEntity,
    {
        pub fn new() -> Self {
            Self {
                entities: Mutex::new(HashMap::new()),
                failure: Mutex::new(None),
            }
        }

        pub fn with_entity(self, entity: E) -> Self {
            self.entities
                .lock()
                .unwrap()
                .insert(entity.key().as_str().to_string(), entity);
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            self.fail_on(FailOn::All, error)
        }

        pub fn fail_on(self, op: FailOn, error: impl Into<String>) -> Self {
            *self.failure.lock().unwrap() = Some((op, error.into()));
            self
        }

        fn check_error(&self, op: FailOn) -> Result<(), DomainError> {
            if let Some((fail_on, error)) = self.failure.lock().unwrap().clone() {
                if fail_on == FailOn::All || fail_on == op {
                    return Err(DomainError::storage(error));
                }
            }
            Ok(())
        }
    }

    #[async_trait]
    impl<E> Storage<E> for MockStorage<E>
    where
        E: StorageEntity + 'static,
    {
        async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
            self.check_error(FailOn::All)?;
            Ok(self.entities.lock().unwrap().get(key.as_str()).cloned())
        }

        async fn list(&self) -> Result<Vec<E>, DomainError> {
            self.check_error(FailOn::All)?;
            Ok(self.entities.lock().unwrap().values().cloned().collect())
        }

        async fn create(&self, entity: E) -> Result<E, DomainError> {
            self.check_error(FailOn::Create)?;
            let key = entity.key().as_str().to_string();
            let mut entities = self.entities.lock().unwrap();

            if entities.contains_key(&key) {
                return Err(DomainError::conflict(format!(
                    "Entity with key '{}' already exists",
                    key
                )));
            }

            entities.insert(key, entity.clone());
            Ok(entity)
        }

        async fn modify(&self, key: &E::Key, mutation: Mutation<E>) -> Result<E, DomainError> {
            self.check_error(FailOn::Update)?;
            let mut entities = self.entities.lock().unwrap();

            let entity = entities.get_mut(key.as_str()).ok_or_else(|| {
                DomainError::not_found(format!("Entity with key '{}' not found", key.as_str()))
            })?;

            let mut updated = entity.clone();
            mutation(&mut updated)?;
            *entity = updated.clone();
            Ok(updated)
        }

        async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
            self.check_error(FailOn::Delete)?;
            Ok(self
                .entities
                .lock()
                .unwrap()
                .remove(key.as_str())
                .is_some())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use serde::{Deserialize, Serialize};

        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        struct TagKey(String);

        impl StorageKey for TagKey {
            fn as_str(&self) -> &str {
                &self.0
            }
        }

        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        struct Tag {
            id: TagKey,
            label: String,
        }

        impl StorageEntity for Tag {
            type Key = TagKey;

            fn key(&self) -> &Self::Key {
                &self.id
            }
        }

        fn tag(id: &str, label: &str) -> Tag {
            Tag {
                id: TagKey(id.to_string()),
                label: label.to_string(),
            }
        }

        #[tokio::test]
        async fn test_mock_storage_create_conflict() {
            let storage = MockStorage::new().with_entity(tag("1", "urgent"));

            let result = storage.create(tag("1", "later")).await;
            assert!(matches!(result, Err(DomainError::Conflict { .. })));
        }

        #[tokio::test]
        async fn test_mock_storage_modify_not_found() {
            let storage: MockStorage<Tag> = MockStorage::new();

            let result = storage
                .modify(&TagKey("1".to_string()), Box::new(|_| Ok(())))
                .await;
            assert!(matches!(result, Err(DomainError::NotFound { .. })));
        }

        #[tokio::test]
        async fn test_mock_storage_fail_on_modify_only() {
            let storage = MockStorage::new()
                .with_entity(tag("1", "urgent"))
                .fail_on(FailOn::Update, "disk full");

            assert!(storage.get(&TagKey("1".to_string())).await.is_ok());
            assert!(storage.create(tag("2", "later")).await.is_ok());

            let result = storage
                .modify(
                    &TagKey("1".to_string()),
                    Box::new(|tag| {
                        tag.label = "changed".to_string();
                        Ok(())
                    }),
                )
                .await;
            assert!(matches!(result, Err(DomainError::Storage { .. })));
        }

        #[tokio::test]
        async fn test_mock_storage_failed_mutation_keeps_document() {
            let storage = MockStorage::new().with_entity(tag("1", "urgent"));
            let key = TagKey("1".to_string());

            let result = storage
                .modify(
                    &key,
                    Box::new(|tag| {
                        tag.label = "half-done".to_string();
                        Err(DomainError::validation("rejected"))
                    }),
                )
                .await;

            assert!(matches!(result, Err(DomainError::Validation { .. })));
            assert_eq!(storage.get(&key).await.unwrap().unwrap().label, "urgent");
        }

        #[tokio::test]
        async fn test_mock_storage_with_error() {
            let storage: MockStorage<Tag> = MockStorage::new().with_error("Simulated storage error");

            assert!(storage.list().await.is_err());
            assert!(storage.delete(&TagKey("1".to_string())).await.is_err());
        }

        #[tokio::test]
        async fn test_mock_storage_default_count_and_exists() {
            let storage = MockStorage::new()
                .with_entity(tag("1", "urgent"))
                .with_entity(tag("2", "later"));

            assert_eq!(storage.count().await.unwrap(), 2);
            assert!(storage.exists(&TagKey("2".to_string())).await.unwrap());
            assert!(!storage.exists(&TagKey("3".to_string())).await.unwrap());
        }
    }
}
