//! Navigation Components

use leptos::prelude::*;

use crate::base::RouteHref;
use crate::provider::{use_router, RouterContext, RouterRuntime};

/// `href` with the current `context` entry carried over (tracked)
fn link_href(ctx: &RouterContext, href: &RouteHref) -> Option<RouteHref> {
    let location = ctx.location.get();
    match ctx.runtime().base.with_context(href, &location.search) {
        Ok(with_context) => Some(with_context),
        Err(e) => {
            log::warn!("bad link {}: {}", href, e);
            None
        }
    }
}

/// Post a context-preserving replace to `to`
fn post_redirect(rt: &RouterRuntime, to: RouteHref) {
    let history = rt.router_history.clone();
    rt.queue.post(Box::new(move || {
        if let Err(e) = history.replace(&to, None) {
            log::error!("redirect to {} failed: {}", to, e);
        }
    }));
}

/// Anchor that keeps the `context` query entry across navigation
///
/// Plain clicks are intercepted and pushed through the history;
/// `target="_blank"` links are left to the browser.
#[component]
pub fn RouteLink(
    href: Option<RouteHref>,
    #[prop(optional, into)] target: Option<String>,
    #[prop(optional, into)] class: Option<String>,
    #[prop(optional, into)] on_click: Option<Callback<web_sys::MouseEvent>>,
    #[prop(optional)] children: Option<Children>,
) -> impl IntoView {
    let ctx = use_router();

    let resolved = Memo::new(move |_| href.as_ref().and_then(|href| link_href(&ctx, href)));

    let intercept = target.as_deref() != Some("_blank");
    let handle_click = move |ev: web_sys::MouseEvent| {
        if intercept {
            ev.prevent_default();
            if let Some(href) = resolved.get_untracked() {
                ctx.runtime().history.push(href.as_str(), None);
            }
        }
        if let Some(on_click) = on_click {
            on_click.run(ev);
        }
    };

    view! {
        <a
            href=move || resolved.get().map(|h| h.to_string())
            target=target
            class=class
            rel="noopener noreferrer"
            on:click=handle_click
        >
            {children.map(|c| c())}
        </a>
    }
}

/// Replaces the current entry with `to` on the next tick
#[component]
pub fn Redirect(to: RouteHref) -> impl IntoView {
    post_redirect(&use_router().runtime(), to);
}
