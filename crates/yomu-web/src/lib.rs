#[macro_use]
extern crate log;

mod admin;
mod admin_comments;
mod admin_manga;
mod admin_users;
mod app;
mod browse;
mod common;
mod contexts;
mod histories;
mod home;
mod library;
mod login;
mod manga;
mod notifications;
mod profile;
mod query;
mod reader;
mod register;
mod search;
mod upload;
mod upload_chapter;
mod utils;

use utils::{THEME_KEY, local_storage, window};
use wasm_bindgen::{JsCast, prelude::*};

use app::App;
use web_sys::MediaQueryListEvent;

#[wasm_bindgen(start)]
pub async fn main_js() -> Result<(), JsValue> {
    #[cfg(debug_assertions)]
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    utils::initialize_urls();
    utils::apply_theme();

    let closure = Closure::wrap(Box::new(|e: MediaQueryListEvent| {
        let follows_system = local_storage()
            .get(THEME_KEY)
            .unwrap_throw()
            .is_none_or(|theme| theme == "system");
        if follows_system {
            if let Err(err) = utils::set_dark(e.matches()) {
                error!("{}", err);
            }
        }
    }) as Box<dyn FnMut(_)>);

    if let Ok(Some(media_query_list)) = window().match_media("(prefers-color-scheme: dark)") {
        media_query_list.set_onchange(Some(closure.as_ref().unchecked_ref()))
    }

    closure.forget();

    dominator::append_dom(&dominator::body(), App::render(App::new()));

    Ok(())
}
