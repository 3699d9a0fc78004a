use std::panic;

use formview_web::app::App;
use leptos::{mount_to_body, view};

fn log_level() -> log::Level {
    if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    }
}

pub fn main() {
    _ = console_log::init_with_level(log_level());
    if cfg!(debug_assertions) {
        console_error_panic_hook::set_once();
    } else {
        // message only, no stack trace
        panic::set_hook(Box::new(|info| log::error!("Sign up form crashed: {}", info)));
    }
    log::info!("Mounting sign up form");
    mount_to_body(|| view! { <App /> })
}
