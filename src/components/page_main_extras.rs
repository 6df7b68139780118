//! Extras Page Component

use leptos::prelude::*;

use crate::context::AppContext;

/// Build metadata of the running bundle
#[component]
fn PageMainExtrasAbout() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let build = ctx.build_info();
    let rows = [
        ("Commit SHA:", build.commit_sha),
        ("Commit SHA (short):", build.commit_sha_short),
        ("Build time:", build.build_time),
    ];

    view! {
        <div class="page-main-extras-about">
            {rows.into_iter().map(|(label, value)| view! {
                <div class="page-main-extras-about__row">
                    <div>{label}</div>
                    <div>{value}</div>
                </div>
            }).collect_view()}
        </div>
    }
}

#[component]
pub fn PageMainExtras() -> impl IntoView {
    view! {
        <div class="page-main-extras">
            <PageMainExtrasAbout />
        </div>
    }
}
