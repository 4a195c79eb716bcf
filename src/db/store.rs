use async_trait::async_trait;
use bson::Document;

use crate::types::Result;

/// Document storage addressed by collection name and filter.
///
/// Allows swapping implementations (MongoDB in production, in-memory for
/// tests). Implementations perform single-document writes only and hold no
/// cross-call state beyond the connection itself.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert `document` into `collection`, returning the new identifier as text
    async fn create_document(&self, collection: &str, document: Document) -> Result<String>;

    /// Fetch up to `limit` documents matching `filter`, in storage order.
    /// An empty filter matches everything; a non-positive limit means no limit.
    async fn get_documents(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> Result<Vec<Document>>;

    /// List collection names; doubles as a cheap connectivity probe
    async fn list_collection_names(&self) -> Result<Vec<String>>;

    /// Release the underlying connection
    async fn shutdown(&self) {}
}
