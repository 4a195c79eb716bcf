//! Test doubles

use async_trait::async_trait;
use bson::Document;

use crate::db::DocumentStore;
use crate::types::{Result, TileboardError};

const UNREACHABLE: &str = "Server selection timeout: No available servers. \
     Topology: { Type: Unknown, Servers: [ { Address: localhost:27017, Type: Unknown } ] }";

/// Store whose server is unreachable: every call fails
pub struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn create_document(&self, _collection: &str, _document: Document) -> Result<String> {
        Err(TileboardError::Database(format!("Insert failed: {}", UNREACHABLE)))
    }

    async fn get_documents(
        &self,
        _collection: &str,
        _filter: Document,
        _limit: i64,
    ) -> Result<Vec<Document>> {
        Err(TileboardError::Database(format!("Find failed: {}", UNREACHABLE)))
    }

    async fn list_collection_names(&self) -> Result<Vec<String>> {
        Err(TileboardError::Database(UNREACHABLE.to_string()))
    }
}
