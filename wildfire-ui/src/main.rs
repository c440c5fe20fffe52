mod app;
mod bridge;
mod dto;
mod leaflet;
mod page;

use leptos::*;

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("wildfire map starting");
    mount_to_body(|| view! { <app::App/> });
}
