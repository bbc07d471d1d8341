use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{options::ClientOptions, Client, Collection};
use serde::{Deserialize, Serialize};

use crate::config::MongoConfig;
use crate::error::{Result, TodoError};
use crate::models::todo::{NewTodo, Todo, TodoId};
use crate::repository::TodoStore;

/// Shape of a todo as stored in the collection.
#[derive(Debug, Serialize, Deserialize)]
pub struct TodoDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub completed: bool,
    pub body: String,
}

impl From<TodoDocument> for Todo {
    fn from(value: TodoDocument) -> Self {
        Self {
            id: value.id.map(TodoId::Object),
            completed: value.completed,
            body: value.body,
        }
    }
}

impl From<NewTodo> for TodoDocument {
    fn from(value: NewTodo) -> Self {
        Self {
            id: None,
            completed: false,
            body: value.body,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MongoDbClient {
    client: Client,
    database: String,
    collection: String,
}

impl MongoDbClient {
    /// Builds the client and pings the deployment so that a bad URI or an
    /// unreachable server fails at startup rather than on the first request.
    pub async fn connect(config: &MongoConfig) -> Result<Self> {
        let client_options = ClientOptions::parse(&config.uri).await?;
        let client = Client::with_options(client_options)?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            "connected to MongoDB"
        );
        Ok(Self {
            client,
            database: config.database.clone(),
            collection: config.collection.clone(),
        })
    }

    fn todos_collection(&self) -> Collection<TodoDocument> {
        let db = self.client.database(&self.database);
        db.collection(&self.collection)
    }

    fn object_id(id: TodoId) -> Result<ObjectId> {
        match id {
            TodoId::Object(oid) => Ok(oid),
            other => Err(TodoError::InvalidId(other.to_string())),
        }
    }
}

fn parse_object_id(raw: &str) -> Result<TodoId> {
    ObjectId::parse_str(raw)
        .map(TodoId::Object)
        .map_err(|_| TodoError::InvalidId(raw.to_string()))
}

#[async_trait]
impl TodoStore for MongoDbClient {
    fn parse_id(&self, raw: &str) -> Result<TodoId> {
        parse_object_id(raw)
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Todo>> {
        let mut cursor = self.todos_collection().find(None, None).await?;
        let mut result = Vec::new();
        while cursor.advance().await? {
            let document = cursor.deserialize_current()?;
            result.push(Todo::from(document));
        }
        Ok(result)
    }

    #[tracing::instrument(skip(self, todo))]
    async fn insert(&self, todo: NewTodo) -> Result<Todo> {
        let mut document = TodoDocument::from(todo);
        let result = self.todos_collection().insert_one(&document, None).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| TodoError::internal("inserted todo did not receive an ObjectId"))?;
        document.id = Some(id);
        Ok(Todo::from(document))
    }

    #[tracing::instrument(skip(self))]
    async fn complete(&self, id: TodoId) -> Result<u64> {
        let filter = doc! { "_id": Self::object_id(id)? };
        let update = doc! { "$set": { "completed": true } };
        let result = self
            .todos_collection()
            .update_one(filter, update, None)
            .await?;
        Ok(result.matched_count)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: TodoId) -> Result<u64> {
        let filter = doc! { "_id": Self::object_id(id)? };
        let result = self.todos_collection().delete_one(filter, None).await?;
        Ok(result.deleted_count)
    }
}
