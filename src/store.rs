//! Todo List State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The persistent
//! copy lives in `TodoStore`; this is the rendered mirror.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::{TodoFilter, TodoItem};

/// Rendered todo state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct TodosState {
    /// Items in storage order
    pub items: Vec<TodoItem>,
    /// Last storage failure shown above the list
    pub error: Option<String>,
}

/// Type alias for the store
pub type TodosStore = Store<TodosState>;

/// Get the todos store from context
pub fn use_todos_store() -> TodosStore {
    expect_context::<TodosStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Append an item
pub fn store_add_item(store: &TodosStore, item: TodoItem) {
    store.items().write().push(item);
}

/// Update an item in the store by ID
pub fn store_update_item(store: &TodosStore, updated_item: TodoItem) {
    if let Some(item) = store.items().write().iter_mut().find(|item| item.id == updated_item.id) {
        *item = updated_item;
    }
}

/// Remove an item from the store by ID
pub fn store_remove_item(store: &TodosStore, item_id: &str) {
    store.items().write().retain(|item| item.id != item_id);
}

/// Items passing `filter`, in storage order
pub fn filtered_items(items: &[TodoItem], filter: TodoFilter) -> Vec<TodoItem> {
    items.iter().filter(|item| filter.matches(item)).cloned().collect()
}
