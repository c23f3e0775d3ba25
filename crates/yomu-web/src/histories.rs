use std::rc::Rc;

use dominator::{Dom, clone, html, link};
use futures_signals::map_ref;
use futures_signals::signal::{Mutable, SignalExt};
use futures_signals::signal_vec::SignalVecExt;
use wasm_bindgen_futures::spawn_local;
use yomu_lib::history::{group_by_day, latest_per_manga};
use yomu_lib::models::ReadingHistory;

use crate::common::{Route, Spinner, Topbar, confirm, events};
use crate::query;
use crate::utils::{AsyncLoader, now, resource_url};

/// Reading history, one entry per manga.
pub struct Histories {
    entries: Mutable<Vec<ReadingHistory>>,
    is_loading: Mutable<bool>,
    loader: AsyncLoader,
}

impl Histories {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            entries: Mutable::new(vec![]),
            is_loading: Mutable::new(false),
            loader: AsyncLoader::new(),
        })
    }

    fn fetch(histories: Rc<Self>) {
        histories.is_loading.set_neq(true);
        histories.loader.load(clone!(histories => async move {
            match query::client().histories().await {
                Ok(entries) => {
                    histories.entries.set(latest_per_manga(entries));
                }
                Err(e) => {
                    query::report("Failed to load history", &e);
                    histories.entries.set(vec![]);
                }
            }
            histories.is_loading.set_neq(false);
        }));
    }

    fn delete(histories: Rc<Self>, id: i64) {
        spawn_local(clone!(histories => async move {
            match query::client().delete_history(id).await {
                Ok(_) => {
                    histories.entries.lock_mut().retain(|entry| entry.id != id);
                }
                Err(e) => {
                    query::report("Failed to delete history", &e);
                }
            }
        }));
    }

    fn clear(histories: Rc<Self>) {
        if !confirm("Clear all reading history?") {
            return;
        }

        spawn_local(clone!(histories => async move {
            match query::client().clear_history().await {
                Ok(_) => histories.entries.set(vec![]),
                Err(e) => {
                    query::report("Failed to clear history", &e);
                }
            }
        }));
    }

    fn render_entry(histories: Rc<Self>, entry: &ReadingHistory) -> Dom {
        let id = entry.id;
        html!("div", {
            .class("history-item")
            .children(&mut [
                link!(Route::Reader {
                    manga_id: entry.manga_id,
                    chapter_id: entry.chapter_id,
                    page: entry.last_page.max(0) as usize,
                }.url(), {
                    .class("history-link")
                    .children(&mut [
                        html!("img", {
                            .attribute("src", &resource_url(&entry.cover_url))
                            .attribute("loading", "lazy")
                        }),
                        html!("div", {
                            .class("history-info")
                            .children(&mut [
                                html!("span", {
                                    .class("title")
                                    .text(&entry.manga_title)
                                }),
                                html!("span", {
                                    .class("subtitle")
                                    .text(&yomu_lib::models::format_number_title(entry.chapter_number, &entry.chapter_title))
                                }),
                                html!("span", {
                                    .class("subtitle")
                                    .text(&format!("Page {}", entry.last_page + 1))
                                }),
                            ])
                        }),
                    ])
                }),
                html!("button", {
                    .text("Remove")
                    .event(clone!(histories => move |_: events::Click| {
                        Self::delete(histories.clone(), id);
                    }))
                }),
            ])
        })
    }

    pub fn render(histories: Rc<Self>) -> Dom {
        Self::fetch(histories.clone());
        let today = now();

        html!("div", {
            .class("main")
            .children(&mut [
                Topbar::render_with("History", false, vec![
                    html!("button", {
                        .text("Clear")
                        .event(clone!(histories => move |_: events::Click| {
                            Self::clear(histories.clone());
                        }))
                    })
                ]),
                html!("div", {
                    .class("topbar-spacing")
                }),
                html!("div", {
                    .class("history-list")
                    .children_signal_vec(histories.entries.signal_ref(move |entries| group_by_day(entries, today))
                        .to_signal_vec()
                        .map(clone!(histories => move |(day, entries)| html!("div", {
                            .class("history-group")
                            .child(html!("h3", {
                                .class("history-day")
                                .text(&day)
                            }))
                            .children(entries.iter().map(|entry| Self::render_entry(histories.clone(), entry)))
                        }))))
                }),
            ])
            .child_signal(Spinner::render_while(histories.is_loading.signal()))
            .child_signal(map_ref! {
                let empty = histories.entries.signal_ref(|entries| entries.is_empty()),
                let loading = histories.is_loading.signal() =>
                *empty && !*loading
            }.map(|empty| empty.then(|| html!("p", {
                .class("empty")
                .text("Nothing read yet")
            }))))
        })
    }
}
