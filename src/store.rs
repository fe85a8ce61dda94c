use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};

/// A schema-less record as returned by the document store
pub type Document = Map<String, JsonValue>;

/// Read access to a collection-oriented document store
///
/// Handlers only see this trait, so the production Spanner client and the
/// in-memory fakes used in tests are interchangeable.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document currently in `collection`, ordered by document id
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>>;

    async fn health_check(&self) -> Result<()>;
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Collections held in memory, keyed by collection then document id
    #[derive(Default)]
    pub struct InMemoryStore {
        collections: Mutex<BTreeMap<String, BTreeMap<String, Document>>>,
    }

    impl InMemoryStore {
        pub fn insert(&self, collection: &str, id: &str, doc: JsonValue) {
            let JsonValue::Object(doc) = doc else {
                panic!("test documents must be JSON objects");
            };
            self.collections
                .lock()
                .unwrap()
                .entry(collection.to_string())
                .or_default()
                .insert(id.to_string(), doc);
        }
    }

    #[async_trait]
    impl DocumentStore for InMemoryStore {
        async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
            Ok(self
                .collections
                .lock()
                .unwrap()
                .get(collection)
                .map(|docs| docs.values().cloned().collect())
                .unwrap_or_default())
        }

        async fn health_check(&self) -> Result<()> {
            Ok(())
        }
    }

    /// A store whose every call fails with the given message
    pub struct FailingStore(pub &'static str);

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn list_documents(&self, _collection: &str) -> Result<Vec<Document>> {
            Err(anyhow::anyhow!(self.0))
        }

        async fn health_check(&self) -> Result<()> {
            Err(anyhow::anyhow!(self.0))
        }
    }
}
