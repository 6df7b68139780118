//! Todo PWA Frontend Entry Point

mod app;
mod components;
mod config;
mod context;
mod logger;
mod models;
mod routes;
mod storage;
mod store;
mod todos;

use app::App;
use config::AppConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let config = AppConfig::from_build_env();
    logger::init(config.log_level);
    log::debug!("starting with {:?}", config);

    mount_to_body(move || view! { <App config=config /> });
}
