//! Main Page Component
//!
//! Header, the current subpage, and the subpage selector footer.

use leptos::prelude::*;
use leptos_query_router::{EmptyParams, RouteHref, RouteLink};

use crate::components::{PageMainExtras, PageMainTodos};
use crate::context::AppContext;
use crate::routes::{app_href, AppRoutes, TodosSearch};

/// Sections of the main page, one route each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subpage {
    Todos,
    Reminders,
    Calendar,
    Extras,
}

impl Subpage {
    pub const ALL: [Subpage; 4] = [Subpage::Todos, Subpage::Reminders, Subpage::Calendar, Subpage::Extras];

    pub fn label(&self) -> &'static str {
        match self {
            Subpage::Todos => "To-do list",
            Subpage::Reminders => "Reminders",
            Subpage::Calendar => "Calendar",
            Subpage::Extras => "More",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Subpage::Todos => "✓",
            Subpage::Reminders => "🔔",
            Subpage::Calendar => "📅",
            Subpage::Extras => "☰",
        }
    }

    fn href(&self, routes: &AppRoutes) -> Option<RouteHref> {
        match self {
            Subpage::Todos => app_href(routes.todos, &EmptyParams {}, &TodosSearch::default()),
            Subpage::Reminders => app_href(routes.reminders, &EmptyParams {}, &EmptyParams {}),
            Subpage::Calendar => app_href(routes.calendar, &EmptyParams {}, &EmptyParams {}),
            Subpage::Extras => app_href(routes.extras, &EmptyParams {}, &EmptyParams {}),
        }
    }
}

/// Tab strip linking to every subpage
#[component]
fn SubpageSelector(value: Subpage) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    view! {
        <nav class="subpage-selector">
            {Subpage::ALL.iter().map(|sub| {
                let class = if *sub == value { "subpage-selector__item active" } else { "subpage-selector__item" };
                view! {
                    <RouteLink class=class href=sub.href(&ctx.routes)>
                        <span class="subpage-selector__icon">{sub.icon()}</span>
                        <span class="subpage-selector__label">{sub.label()}</span>
                    </RouteLink>
                }
            }).collect_view()}
        </nav>
    }
}

#[component]
pub fn PageMain(subpage: Subpage) -> impl IntoView {
    let body = match subpage {
        Subpage::Todos => view! { <PageMainTodos /> }.into_any(),
        Subpage::Reminders | Subpage::Calendar => {
            view! { <div class="not-implemented">"not implemented yet"</div> }.into_any()
        }
        Subpage::Extras => view! { <PageMainExtras /> }.into_any(),
    };

    view! {
        <div class="page-main">
            <div class="page-main__header">{subpage.label()}</div>
            <div class="page-main__body-wrapper">
                <div class="page-main__body">{body}</div>
            </div>
            <div class="page-main__footer">
                <SubpageSelector value=subpage />
            </div>
        </div>
    }
}
