use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{Result, TodoError};
use crate::models::todo::{NewTodo, Todo, TodoId};
use crate::repository::TodoStore;

#[derive(Debug, Default)]
struct State {
    last_id: u64,
    todos: BTreeMap<u64, Todo>,
}

/// Process-local store, lost on restart.
///
/// Ids come from a counter that never goes backwards, so iterating the map in
/// key order is also insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| TodoError::internal("in-memory todo store lock poisoned"))
    }

    fn sequence(id: TodoId) -> Result<u64> {
        match id {
            TodoId::Sequence(n) => Ok(n),
            other => Err(TodoError::InvalidId(other.to_string())),
        }
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    fn parse_id(&self, raw: &str) -> Result<TodoId> {
        raw.parse::<u64>()
            .ok()
            .filter(|n| *n > 0)
            .map(TodoId::Sequence)
            .ok_or_else(|| TodoError::InvalidId(raw.to_string()))
    }

    async fn find_all(&self) -> Result<Vec<Todo>> {
        let state = self.lock()?;
        Ok(state.todos.values().cloned().collect())
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo> {
        let mut state = self.lock()?;
        state.last_id += 1;
        let id = state.last_id;
        let todo = Todo {
            id: Some(TodoId::Sequence(id)),
            completed: false,
            body: todo.body,
        };
        state.todos.insert(id, todo.clone());
        Ok(todo)
    }

    async fn complete(&self, id: TodoId) -> Result<u64> {
        let id = Self::sequence(id)?;
        let mut state = self.lock()?;
        match state.todos.get_mut(&id) {
            Some(todo) => {
                todo.completed = true;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: TodoId) -> Result<u64> {
        let id = Self::sequence(id)?;
        let mut state = self.lock()?;
        Ok(state.todos.remove(&id).map_or(0, |_| 1))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    use actix_web::rt::System;

    use super::*;

    #[actix_web::test]
    async fn insert_assigns_increasing_ids() {
        let store = MemoryStore::new();
        let first = store.insert(NewTodo::new("a")).await.unwrap();
        let second = store.insert(NewTodo::new("b")).await.unwrap();
        assert_eq!(first.id, Some(TodoId::Sequence(1)));
        assert_eq!(second.id, Some(TodoId::Sequence(2)));
    }

    #[actix_web::test]
    async fn insert_forces_completed_false() {
        let store = MemoryStore::new();
        let todo = store
            .insert(NewTodo {
                body: "already done".to_string(),
                completed: true,
            })
            .await
            .unwrap();
        assert!(!todo.completed);
    }

    #[actix_web::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryStore::new();
        store.insert(NewTodo::new("a")).await.unwrap();
        let b = store.insert(NewTodo::new("b")).await.unwrap();
        assert_eq!(store.delete(b.id.unwrap()).await.unwrap(), 1);
        let c = store.insert(NewTodo::new("c")).await.unwrap();
        assert_eq!(c.id, Some(TodoId::Sequence(3)));
    }

    #[actix_web::test]
    async fn delete_preserves_order_of_remaining() {
        let store = MemoryStore::new();
        for body in ["a", "b", "c"] {
            store.insert(NewTodo::new(body)).await.unwrap();
        }
        store.delete(TodoId::Sequence(2)).await.unwrap();
        let bodies: Vec<_> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.body)
            .collect();
        assert_eq!(bodies, vec!["a", "c"]);
    }

    #[actix_web::test]
    async fn complete_reports_matches() {
        let store = MemoryStore::new();
        let todo = store.insert(NewTodo::new("a")).await.unwrap();
        let id = todo.id.unwrap();
        assert_eq!(store.complete(id).await.unwrap(), 1);
        assert_eq!(store.complete(id).await.unwrap(), 1);
        assert_eq!(store.complete(TodoId::Sequence(99)).await.unwrap(), 0);
        assert!(store.find_all().await.unwrap()[0].completed);
    }

    #[test]
    fn parse_id_accepts_positive_integers_only() {
        let store = MemoryStore::new();
        assert_eq!(store.parse_id("7").unwrap(), TodoId::Sequence(7));
        assert!(matches!(store.parse_id("0"), Err(TodoError::InvalidId(_))));
        assert!(matches!(store.parse_id("-1"), Err(TodoError::InvalidId(_))));
        assert!(matches!(
            store.parse_id("65f1c0a2b3d4e5f601234567"),
            Err(TodoError::InvalidId(_))
        ));
    }

    #[test]
    fn concurrent_inserts_get_distinct_ids() {
        const WORKERS: usize = 16;
        const PER_WORKER: usize = 25;

        let store = Arc::new(MemoryStore::new());
        let ids: Vec<TodoId> = thread::scope(|scope| {
            let handles: Vec<_> = (0..WORKERS)
                .map(|worker| {
                    let store = Arc::clone(&store);
                    scope.spawn(move || {
                        System::new().block_on(async move {
                            let mut ids = Vec::with_capacity(PER_WORKER);
                            for n in 0..PER_WORKER {
                                let body = format!("todo {}-{}", worker, n);
                                let todo = store.insert(NewTodo::new(body)).await.unwrap();
                                ids.push(todo.id.unwrap());
                            }
                            ids
                        })
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap())
                .collect()
        });

        let total = WORKERS * PER_WORKER;
        let distinct: HashSet<_> = ids.iter().copied().collect();
        assert_eq!(distinct.len(), total);

        let listed: Vec<u64> = System::new()
            .block_on(store.find_all())
            .unwrap()
            .into_iter()
            .filter_map(|todo| match todo.id {
                Some(TodoId::Sequence(n)) => Some(n),
                _ => None,
            })
            .collect();
        assert_eq!(listed.len(), total);
        assert!(listed.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(listed.first(), Some(&1));
        assert_eq!(listed.last(), Some(&(total as u64)));
    }
}
