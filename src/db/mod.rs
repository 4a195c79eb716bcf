//! Database layer for Tileboard
//!
//! Document storage behind the [`DocumentStore`] trait, with a MongoDB
//! backend for deployments and an in-process backend for local runs and tests.

pub mod memory;
pub mod mongo;
pub mod schemas;
mod store;

pub use memory::MemoryStore;
pub use mongo::MongoClient;
pub use store::DocumentStore;
