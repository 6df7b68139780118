//! UI Components
//!
//! Pages and reusable Leptos components.

mod delete_confirm_button;
mod demo_counter;
mod page_main;
mod page_main_extras;
mod page_main_todos;

pub use delete_confirm_button::DeleteConfirmButton;
pub use demo_counter::DemoCounter;
pub use page_main::{PageMain, Subpage};
pub use page_main_extras::PageMainExtras;
pub use page_main_todos::PageMainTodos;
