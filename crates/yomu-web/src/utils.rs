use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::anyhow;
use chrono::NaiveDateTime;
use futures::{
    Future,
    future::{AbortHandle, abortable},
};
use futures_signals::signal::{Mutable, Signal};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Document, File, History, HtmlElement, Storage, Url, Window};
use yomu_api::Upload;

thread_local! {
    static WINDOW: Window = web_sys::window().unwrap_throw();
    static DOCUMENT: Document = WINDOW.with(|w| w.document().unwrap_throw());
    static BODY: HtmlElement = DOCUMENT.with(|d| d.body().unwrap_throw());
    static LOCAL_STORAGE: Storage = WINDOW.with(|w| w.local_storage().unwrap_throw().unwrap_throw());
    static HISTORY: History = WINDOW.with(|w| w.history().unwrap_throw());
    static API_HOST: std::cell::RefCell<String> = std::cell::RefCell::new("/api".to_string());
    static WS_HOST: std::cell::RefCell<String> = std::cell::RefCell::new("/ws".to_string());
}

pub const TOKEN_KEY: &str = "token";
pub const THEME_KEY: &str = "settings:theme";
pub const PLACEHOLDER: &str = "/icons/cover-placeholder.png";

pub struct AsyncState {
    id: usize,
    handle: AbortHandle,
}

impl AsyncState {
    fn new(handle: AbortHandle) -> Self {
        static ID: AtomicUsize = AtomicUsize::new(0);
        let id = ID.fetch_add(1, Ordering::SeqCst);

        Self { id, handle }
    }
}

/// Runs one future at a time, a new `load` aborts the one still in flight.
pub struct AsyncLoader {
    loading: Mutable<Option<AsyncState>>,
}

impl Default for AsyncLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AsyncLoader {
    pub fn new() -> Self {
        Self {
            loading: Mutable::new(None),
        }
    }

    pub fn cancel(&self) {
        self.replace(None)
    }

    pub fn replace(&self, value: Option<AsyncState>) {
        let mut loading = self.loading.lock_mut();
        if let Some(state) = loading.as_mut() {
            state.handle.abort();
        }
        *loading = value;
    }

    pub fn load<F>(&self, fut: F)
    where
        F: Future<Output = ()> + 'static,
    {
        let (fut, handle) = abortable(fut);

        let state = AsyncState::new(handle);
        let id = state.id;

        self.replace(Some(state));

        let loading = self.loading.clone();

        spawn_local(async move {
            match fut.await {
                Ok(()) => {
                    let mut loading = loading.lock_mut();

                    if let Some(current_id) = loading.as_ref().map(|x| x.id) {
                        if current_id == id {
                            *loading = None;
                        }
                    }
                }
                Err(_) => {
                    debug!("task {} aborted", id);
                }
            }
        });
    }

    pub fn is_loading(&self) -> impl Signal<Item = bool> + use<> {
        self.loading.signal_ref(|x| x.is_some())
    }
}

/// Reads `window.__YOMU_API__` and `window.__YOMU_WS__` when the page defines
/// them, otherwise the API lives under `/api` and the broker under `/ws` of
/// the same origin.
pub fn initialize_urls() {
    let origin = window().location().origin().unwrap_throw();

    let api_host = match js_sys::eval("window.__YOMU_API__") {
        Ok(val) if val.is_string() => val.as_string().unwrap_or_default(),
        _ => format!("{}/api", origin),
    };

    let ws_host = match js_sys::eval("window.__YOMU_WS__") {
        Ok(val) if val.is_string() => val.as_string().unwrap_or_default(),
        _ => format!("{}/ws", origin.replacen("http", "ws", 1)),
    };

    info!("api host {}, ws host {}", api_host, ws_host);

    API_HOST.with(|s| *s.borrow_mut() = api_host);
    WS_HOST.with(|s| *s.borrow_mut() = ws_host);
}

pub fn api_host() -> String {
    API_HOST.with(|v| v.borrow().clone())
}

pub fn ws_host() -> String {
    WS_HOST.with(|v| v.borrow().clone())
}

/// Covers and pages may come back as paths relative to the API server.
pub fn resource_url(path: &str) -> String {
    if path.is_empty() {
        return PLACEHOLDER.to_string();
    }

    match Url::new_with_base(path, &api_host()) {
        Ok(url) => url.href(),
        Err(_) => path.to_string(),
    }
}

pub fn token() -> Option<String> {
    local_storage()
        .get(TOKEN_KEY)
        .unwrap_throw()
        .filter(|token| !token.is_empty())
}

pub fn encode_uri_component(value: &str) -> String {
    String::from(js_sys::encode_uri_component(value))
}

/// Backend timestamps are local date-times, so compare against local time.
pub fn now() -> NaiveDateTime {
    let date = js_sys::Date::new_0();
    let offset_minutes = date.get_timezone_offset() as i64;
    let millis = date.get_time() as i64 - offset_minutes * 60_000;

    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.naive_utc())
        .unwrap_or_default()
}

pub fn format_date(at: &NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

pub async fn read_file(file: File) -> Result<Upload, anyhow::Error> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| anyhow!("error reading {}: {:?}", file.name(), e))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    let mut upload = Upload::new(file.name(), bytes);
    let mime = file.type_();
    if !mime.is_empty() {
        upload.mime = Some(mime);
    }

    Ok(upload)
}

pub async fn read_files(files: Vec<File>) -> Result<Vec<Upload>, anyhow::Error> {
    let mut uploads = Vec::with_capacity(files.len());
    for file in files {
        uploads.push(read_file(file).await?);
    }

    Ok(uploads)
}

pub fn input_files(input: &web_sys::HtmlInputElement) -> Vec<File> {
    let mut files = vec![];
    if let Some(list) = input.files() {
        for i in 0..list.length() {
            if let Some(file) = list.get(i) {
                files.push(file);
            }
        }
    }
    files
}

/// Stored theme wins, "system" or nothing follows `prefers-color-scheme`.
pub fn apply_theme() {
    let stored = local_storage().get(THEME_KEY).unwrap_throw();
    let dark = match stored.as_deref() {
        Some("dark") => true,
        Some("light") => false,
        _ => window()
            .match_media("(prefers-color-scheme: dark)")
            .ok()
            .flatten()
            .map(|m| m.matches())
            .unwrap_or(false),
    };

    if let Err(e) = set_dark(dark) {
        error!("{}", e);
    }
}

pub fn set_dark(dark: bool) -> Result<(), anyhow::Error> {
    let class_list = body().class_list();
    if dark {
        class_list
            .add_1("dark")
            .map_err(|e| anyhow!("error add class: {:?}", e))?;
    } else {
        class_list
            .remove_1("dark")
            .map_err(|e| anyhow!("error remove class: {:?}", e))?;
    }

    let status_bar_color = if dark { "#090909" } else { "#5b749b" };
    if let Some(meta) = document()
        .query_selector("meta[name=\"theme-color\"]")
        .map_err(|e| anyhow!("error query meta: {:?}", e))?
    {
        meta.set_attribute("content", status_bar_color)
            .map_err(|e| anyhow!("error set content: {:?}", e))?;
    }

    Ok(())
}

pub fn replace_url(url: &str) {
    if let Err(e) = history().replace_state_with_url(&JsValue::null(), "", Some(url)) {
        let message = e.as_string().unwrap_or_else(|| "unknown reason".to_string());
        error!("error replace_state_with_url: {}", message);
    }
}

pub fn window() -> Window {
    WINDOW.with(|s| s.clone())
}

pub fn local_storage() -> Storage {
    LOCAL_STORAGE.with(|s| s.clone())
}

pub fn history() -> History {
    HISTORY.with(|h| h.clone())
}

pub fn document() -> Document {
    DOCUMENT.with(|d| d.clone())
}

pub fn body() -> HtmlElement {
    BODY.with(|d| d.clone())
}
