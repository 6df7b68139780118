//! Todos Page Component
//!
//! Add form, filter tabs and the todo list. The selected tab lives in the
//! route's `params` entry and is mirrored into the route context so other
//! pages link back to it.

use leptos::html;
use leptos::prelude::*;
use leptos_query_router::use_route_search_param;

use crate::components::DeleteConfirmButton;
use crate::context::AppContext;
use crate::models::{TodoFilter, TodoItem};
use crate::routes::{use_app_route_context, AppContextField};
use crate::store::{filtered_items, TodosStateStoreFields};

/// A single todo row
#[component]
fn TodoItemRow(item: TodoItem) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let id = StoredValue::new(item.id.clone());
    let done = item.done;
    let description = item.description.clone();
    let (editing, set_editing) = signal(false);
    let (draft, set_draft) = signal(item.description);
    let input_ref = NodeRef::<html::Input>::new();

    Effect::new(move |_| {
        if let Some(input) = input_ref.get() {
            if let Err(e) = input.focus() {
                log::debug!("edit input not focused: {:?}", e);
            }
        }
    });

    let commit = move || {
        if !editing.get_untracked() {
            return;
        }
        set_editing.set(false);
        let text = draft.get_untracked();
        id.with_value(|id| ctx.set_description(id, text));
    };

    view! {
        <div class={if done { "todo-item completed" } else { "todo-item" }}>
            <input
                type="checkbox"
                checked=done
                on:change=move |_| id.with_value(|id| ctx.set_done(id, !done))
            />
            <div class="todo-item__content">
                {move || if editing.get() {
                    view! {
                        <form on:submit=move |ev: web_sys::SubmitEvent| {
                            ev.prevent_default();
                            commit();
                        }>
                            <input
                                node_ref=input_ref
                                type="text"
                                placeholder="What needs to be done?"
                                prop:value=move || draft.get()
                                on:input=move |ev| set_draft.set(event_target_value(&ev))
                                on:blur=move |_| commit()
                            />
                        </form>
                    }.into_any()
                } else {
                    view! { <span class="todo-item__text">{description.clone()}</span> }.into_any()
                }}
            </div>
            <div class="todo-item__controls">
                <button class="edit-btn" on:click=move |_| set_editing.set(true)>"✎"</button>
                <DeleteConfirmButton
                    button_class="delete-btn"
                    disabled=Signal::derive(move || !done || editing.get())
                    on_confirm=move |_| id.with_value(|id| ctx.remove_todo(id))
                />
            </div>
        </div>
    }
}

/// Filter tabs with per-filter counts
#[component]
fn TodoTabSelector(
    #[prop(into)] value: Signal<TodoFilter>,
    #[prop(into)] on_change: Callback<TodoFilter>,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    view! {
        <div class="todo-tab-selector">
            {TodoFilter::ALL.iter().map(|filter| {
                let filter = *filter;
                let is_active = move || value.get() == filter;
                view! {
                    <button
                        type="button"
                        class=move || if is_active() { "tab-btn active" } else { "tab-btn" }
                        on:click=move |_| on_change.run(filter)
                    >
                        {move || format!("{} ({})", filter.label(), filter.count(&ctx.store.items().get()))}
                    </button>
                }
            }).collect_view()}
        </div>
    }
}

/// Input for creating new todos
#[component]
fn AddTodoForm() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let (new_text, set_new_text) = signal(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = new_text.get_untracked();
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        ctx.add_todo(text);
        set_new_text.set(String::new());
    };

    view! {
        <form class="add-todo-form" on:submit=on_submit>
            <input
                type="text"
                placeholder="What needs to be done?"
                prop:value=move || new_text.get()
                on:input=move |ev| set_new_text.set(event_target_value(&ev))
            />
            <button type="submit">"Add"</button>
        </form>
    }
}

#[component]
pub fn PageMainTodos() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let (tab_param, set_tab_param) = use_route_search_param(ctx.routes.todos, "tab", None::<TodoFilter>);
    let (last_tab, set_last_tab) = use_app_route_context(AppContextField::LastTodoTab, None::<TodoFilter>);
    let tab = Signal::derive(move || tab_param.get().or_else(|| last_tab.get()).unwrap_or_default());

    let on_tab = move |filter: TodoFilter| {
        set_tab_param.set(Some(filter));
        set_last_tab.set(Some(filter));
    };

    let visible = Memo::new(move |_| filtered_items(&ctx.store.items().get(), tab.get()));

    view! {
        <div class="page-main-todos">
            <AddTodoForm />
            {move || ctx.store.error().get().map(|e| view! { <div class="storage-error">{e}</div> })}
            <TodoTabSelector value=tab on_change=on_tab />
            <div class="page-main-todos__list">
                <For
                    each=move || visible.get()
                    key=|item| (item.id.clone(), item.done, item.description.clone())
                    children=move |item| view! { <TodoItemRow item=item /> }
                />
                <Show when=move || visible.with(|items| items.is_empty())>
                    <div class="page-main-todos__empty">"Nothing here yet"</div>
                </Show>
            </div>
        </div>
    }
}
