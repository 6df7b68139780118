//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;

use crate::config::BuildInfo;
use crate::models::{TodoItem, TodoPatch};
use crate::routes::AppRoutes;
use crate::storage::StorageResult;
use crate::store::{store_add_item, store_remove_item, store_update_item, TodosStateStoreFields, TodosStore};
use crate::todos::TodoStore;

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Declared page routes
    pub routes: AppRoutes,
    /// Persistent todo list
    todos: StoredValue<TodoStore, LocalStorage>,
    /// Rendered todo list
    pub store: TodosStore,
    build: StoredValue<BuildInfo>,
}

impl AppContext {
    pub fn new(routes: AppRoutes, todos: TodoStore, store: TodosStore, build: BuildInfo) -> Self {
        Self {
            routes,
            todos: StoredValue::new_local(todos),
            store,
            build: StoredValue::new(build),
        }
    }

    pub fn build_info(&self) -> BuildInfo {
        self.build.get_value()
    }

    /// Reload the rendered list from storage
    pub fn reload(&self) {
        let loaded = self.todos.with_value(|todos| todos.get_list());
        match loaded {
            Ok(items) => {
                log::debug!("loaded {} todos", items.len());
                self.store.items().set(items);
                self.store.error().set(None);
            }
            Err(e) => {
                self.store.items().set(Vec::new());
                self.report::<()>(Err(e));
            }
        }
    }

    pub fn add_todo(&self, description: &str) {
        let added = self.todos.with_value(|todos| todos.add_todo(description));
        if let Some(item) = self.report(added) {
            store_add_item(&self.store, item);
        }
    }

    pub fn set_done(&self, id: &str, done: bool) {
        self.update_todo(id, move |prev| TodoPatch {
            done,
            description: prev.description.clone(),
        });
    }

    pub fn set_description(&self, id: &str, description: String) {
        self.update_todo(id, move |prev| TodoPatch {
            done: prev.done,
            description,
        });
    }

    fn update_todo(&self, id: &str, f: impl FnOnce(&TodoItem) -> TodoPatch) {
        let updated = self.todos.with_value(|todos| todos.update_todo(id, f));
        match self.report(updated) {
            Some(Some(item)) => store_update_item(&self.store, item),
            // Removed in another tab
            Some(None) => self.reload(),
            None => {}
        }
    }

    pub fn remove_todo(&self, id: &str) {
        let removed = self.todos.with_value(|todos| todos.remove_todo(id));
        if self.report(removed).is_some() {
            store_remove_item(&self.store, id);
        }
    }

    fn report<T>(&self, result: StorageResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                log::error!("todo storage failed: {}", e);
                self.store.error().set(Some(e.to_string()));
                None
            }
        }
    }
}
