//! MongoDB client wrapper

use async_trait::async_trait;
use bson::{doc, Bson, Document};
use futures_util::TryStreamExt;
use mongodb::Client;
use tracing::{debug, info};

use crate::db::DocumentStore;
use crate::types::{Result, TileboardError};

/// Bounded server selection so an unreachable MongoDB fails requests quickly
const TIMEOUT_OPTIONS: &str = "serverSelectionTimeoutMS=3000&connectTimeoutMS=3000";

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Create a client handle.
    ///
    /// Only parses the URI and sets up the driver; it does not wait for the
    /// server. Call [`MongoClient::ping`] to check reachability.
    pub async fn new(uri: &str, db_name: &str) -> Result<Self> {
        info!("Connecting to MongoDB database '{}'", db_name);

        let has_path = uri
            .split_once("://")
            .is_some_and(|(_, rest)| rest.contains('/'));
        let timeout_uri = if uri.contains('?') {
            format!("{}&{}", uri, TIMEOUT_OPTIONS)
        } else if has_path {
            format!("{}?{}", uri, TIMEOUT_OPTIONS)
        } else {
            format!("{}/?{}", uri, TIMEOUT_OPTIONS)
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| TileboardError::Database(format!("Invalid MongoDB URI: {}", e)))?;

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    /// Round-trip a ping command to the server
    pub async fn ping(&self) -> Result<()> {
        self.client
            .database(&self.db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| TileboardError::Database(format!("MongoDB ping failed: {}", e)))?;
        Ok(())
    }

    /// Get the database name
    pub fn db_name(&self) -> &str {
        &self.db_name
    }
}

#[async_trait]
impl DocumentStore for MongoClient {
    async fn create_document(&self, collection: &str, document: Document) -> Result<String> {
        let result = self
            .client
            .database(&self.db_name)
            .collection::<Document>(collection)
            .insert_one(document)
            .await
            .map_err(|e| TileboardError::Database(format!("Insert failed: {}", e)))?;

        debug!(collection, id = %result.inserted_id, "Document inserted");

        Ok(match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::String(s) => s,
            other => other.to_string(),
        })
    }

    async fn get_documents(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> Result<Vec<Document>> {
        let collection = self
            .client
            .database(&self.db_name)
            .collection::<Document>(collection);
        let mut find = collection.find(filter);
        if limit > 0 {
            find = find.limit(limit);
        }

        let cursor = find
            .await
            .map_err(|e| TileboardError::Database(format!("Find failed: {}", e)))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| TileboardError::Database(format!("Reading documents failed: {}", e)))
    }

    async fn list_collection_names(&self) -> Result<Vec<String>> {
        // Raw driver message: diagnostics shows its opening characters
        self.client
            .database(&self.db_name)
            .list_collection_names()
            .await
            .map_err(|e| TileboardError::Database(e.to_string()))
    }

    async fn shutdown(&self) {
        info!("Closing MongoDB connection");
        self.client.clone().shutdown().await;
    }
}
