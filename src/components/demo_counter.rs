//! Counter Demo Component
//!
//! The count is kept in the route's search params, so it survives reloads
//! and back/forward navigation.

use leptos::prelude::*;
use leptos_query_router::{use_route_search_param, EmptyParams, RouteLink};

use crate::context::AppContext;
use crate::routes::{app_href, TodosSearch};

#[component]
pub fn DemoCounter() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let (count, set_count) = use_route_search_param(ctx.routes.demo_counter, "count", 0i64);
    let back = app_href(ctx.routes.todos, &EmptyParams {}, &TodosSearch::default());

    view! {
        <div class="demo-counter">
            <h1>"Leptos + Rust"</h1>
            <div class="card">
                <button on:click=move |_| set_count.update(|n| n + 1)>
                    {move || format!("count is {}", count.get())}
                </button>
                <button on:click=move |_| set_count.set(0)>"reset"</button>
            </div>
            <RouteLink href=back>
                "Back to the app"
            </RouteLink>
        </div>
    }
}
