use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;

use crate::config::{Config, StoreKind};
use crate::error::Result;
use crate::models::todo::{NewTodo, Todo, TodoId};

pub mod memory;
pub mod mongo;

/// Persistence collaborator behind the todo endpoints.
///
/// `complete` and `delete` report how many todos they touched; deciding what a
/// zero means for the client is left to the caller.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Parses a path segment into this store's identifier format.
    fn parse_id(&self, raw: &str) -> Result<TodoId>;

    async fn find_all(&self) -> Result<Vec<Todo>>;

    /// Persists `todo` with `completed = false` and returns it with its new id.
    async fn insert(&self, todo: NewTodo) -> Result<Todo>;

    async fn complete(&self, id: TodoId) -> Result<u64>;

    async fn delete(&self, id: TodoId) -> Result<u64>;
}

pub async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn TodoStore>> {
    match config.store {
        StoreKind::Memory => Ok(Arc::new(memory::MemoryStore::new())),
        StoreKind::Mongo => {
            let mongo_config = config
                .mongodb
                .as_ref()
                .context("MongoDB store selected without MongoDB settings")?;
            let client = mongo::MongoDbClient::connect(mongo_config)
                .await
                .context("failed to connect to MongoDB")?;
            Ok(Arc::new(client))
        }
    }
}
