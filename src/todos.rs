//! Todo Storage
//!
//! Whole-list read-modify-write operations over the `todos` key. Records are
//! migrated when read; a record is only rewritten in the current shape when
//! it is updated.

use std::rc::Rc;

use chrono::Utc;
use uuid::Uuid;

use crate::models::{migrate, StoredTodo, TodoItem, TodoPatch};
use crate::storage::{KeyValueStore, StorageKeys, StorageResult, TypedStorage};

pub const TODOS_KEY: &str = "todos";

#[derive(Clone)]
pub struct TodoStore {
    list: TypedStorage<Vec<StoredTodo>>,
}

impl TodoStore {
    pub fn new(store: Rc<dyn KeyValueStore>, keys: &mut StorageKeys) -> StorageResult<Self> {
        let key = keys.key::<Vec<StoredTodo>>(TODOS_KEY)?;
        Ok(Self {
            list: TypedStorage::new(store, key),
        })
    }

    pub fn get_list(&self) -> StorageResult<Vec<TodoItem>> {
        let stored = self.list.get()?.unwrap_or_default();
        Ok(stored.into_iter().map(migrate).collect())
    }

    pub fn add_todo(&self, description: &str) -> StorageResult<TodoItem> {
        let todo = TodoItem {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now().timestamp_millis(),
            done: false,
            description: description.to_string(),
        };
        let stored = StoredTodo::from(todo.clone());
        self.list.update(move |list| {
            let mut list = list.unwrap_or_default();
            list.push(stored);
            Some(list)
        })?;
        log::debug!("added todo {}", todo.id);
        Ok(todo)
    }

    /// Replace `done` and `description` of one item; id and created_at stay
    ///
    /// Returns the updated item, `None` when no item has this id.
    pub fn update_todo<F>(&self, id: &str, f: F) -> StorageResult<Option<TodoItem>>
    where
        F: FnOnce(&TodoItem) -> TodoPatch,
    {
        let mut f = Some(f);
        let mut updated = None;
        self.list.update(|list| {
            list.map(|list| {
                list.into_iter()
                    .map(|todo| {
                        if todo.id() != id {
                            return todo;
                        }
                        let Some(f) = f.take() else {
                            return todo;
                        };
                        let prev = migrate(todo);
                        let TodoPatch { done, description } = f(&prev);
                        let next = TodoItem { done, description, ..prev };
                        updated = Some(next.clone());
                        StoredTodo::from(next)
                    })
                    .collect()
            })
        })?;
        Ok(updated)
    }

    pub fn remove_todo(&self, id: &str) -> StorageResult<()> {
        self.list
            .update(|list| list.map(|list| list.into_iter().filter(|todo| todo.id() != id).collect()))
    }
}
