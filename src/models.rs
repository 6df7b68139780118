//! Todo Models
//!
//! Stored records are tagged with a schema `version`; reads migrate any
//! known version to the current `TodoItem` shape.

use serde::{Deserialize, Serialize};

/// Current schema version tag
pub const TODO_VERSION: &str = "1.0";

/// Todo record, schema 1.0 (current)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: String,
    /// Unix epoch milliseconds
    pub created_at: i64,
    pub done: bool,
    pub description: String,
}

/// Any record version that may be found in storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "version")]
pub enum StoredTodo {
    #[serde(rename = "1.0")]
    V1_0(TodoItem),
}

impl From<TodoItem> for StoredTodo {
    fn from(item: TodoItem) -> Self {
        StoredTodo::V1_0(item)
    }
}

impl StoredTodo {
    pub fn id(&self) -> &str {
        match self {
            StoredTodo::V1_0(item) => &item.id,
        }
    }
}

/// Upgrade a stored record to the current shape
pub fn migrate(todo: StoredTodo) -> TodoItem {
    match todo {
        StoredTodo::V1_0(item) => item,
    }
}

/// Fields an update may change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoPatch {
    pub done: bool,
    pub description: String,
}

/// List filter behind the todo tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoFilter {
    #[default]
    Active,
    Completed,
    All,
}

impl TodoFilter {
    pub const ALL: [TodoFilter; 3] = [TodoFilter::Active, TodoFilter::Completed, TodoFilter::All];

    pub fn matches(&self, item: &TodoItem) -> bool {
        match self {
            TodoFilter::Active => !item.done,
            TodoFilter::Completed => item.done,
            TodoFilter::All => true,
        }
    }

    pub fn count(&self, items: &[TodoItem]) -> usize {
        items.iter().filter(|item| self.matches(item)).count()
    }

    pub fn label(&self) -> &'static str {
        match self {
            TodoFilter::Active => "Active",
            TodoFilter::Completed => "Completed",
            TodoFilter::All => "All",
        }
    }
}
