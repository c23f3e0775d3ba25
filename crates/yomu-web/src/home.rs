use std::rc::Rc;

use dominator::{Dom, clone, html, link};
use futures_signals::signal::{Mutable, SignalExt};
use futures_signals::signal_vec::{MutableVec, SignalVecExt};
use yomu_lib::history::latest_per_manga;
use yomu_lib::models::{Manga, ReadingHistory};

use crate::common::{Cover, Route, Spinner, Topbar};
use crate::contexts;
use crate::query;
use crate::utils::AsyncLoader;

const CAROUSEL_SIZE: i64 = 12;
const CONTINUE_SIZE: usize = 6;

pub struct Home {
    latest: MutableVec<Manga>,
    popular: MutableVec<Manga>,
    continue_reading: MutableVec<ReadingHistory>,
    is_loading: Mutable<bool>,
    loader: AsyncLoader,
    history_loader: AsyncLoader,
}

impl Home {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            latest: MutableVec::new(),
            popular: MutableVec::new(),
            continue_reading: MutableVec::new(),
            is_loading: Mutable::new(false),
            loader: AsyncLoader::new(),
            history_loader: AsyncLoader::new(),
        })
    }

    fn fetch(home: Rc<Self>) {
        home.is_loading.set_neq(true);
        home.loader.load(clone!(home => async move {
            let client = query::client();
            match client.latest_manga(CAROUSEL_SIZE).await {
                Ok(mangas) => home.latest.lock_mut().replace_cloned(mangas),
                Err(e) => {
                    query::report("Failed to load latest manga", &e);
                    home.latest.lock_mut().clear();
                }
            }
            match client.popular_manga(CAROUSEL_SIZE).await {
                Ok(mangas) => home.popular.lock_mut().replace_cloned(mangas),
                Err(e) => {
                    query::report("Failed to load popular manga", &e);
                    home.popular.lock_mut().clear();
                }
            }
            home.is_loading.set_neq(false);
        }));

        if !contexts::auth().is_logged_in() {
            return;
        }

        home.history_loader.load(clone!(home => async move {
            match query::client().histories().await {
                Ok(histories) => {
                    let mut histories = latest_per_manga(histories);
                    histories.truncate(CONTINUE_SIZE);
                    home.continue_reading.lock_mut().replace_cloned(histories);
                }
                Err(e) => {
                    query::report("Failed to load reading history", &e);
                }
            }
        }));
    }

    fn render_carousel(title: &str, more: Route, mangas: &MutableVec<Manga>) -> Dom {
        html!("section", {
            .class("carousel")
            .visible_signal(mangas.signal_vec_cloned().is_empty().map(|empty| !empty))
            .children(&mut [
                html!("div", {
                    .class("carousel-header")
                    .children(&mut [
                        html!("h2", {
                            .text(title)
                        }),
                        link!(more.url(), {
                            .text("More")
                        })
                    ])
                }),
                html!("div", {
                    .class("carousel-items")
                    .children_signal_vec(mangas.signal_vec_cloned().map(|manga| {
                        Cover::from(&manga).render()
                    }))
                })
            ])
        })
    }

    fn render_continue(home: Rc<Self>) -> Dom {
        html!("section", {
            .class("carousel")
            .visible_signal(home.continue_reading.signal_vec_cloned().is_empty().map(|empty| !empty))
            .children(&mut [
                html!("div", {
                    .class("carousel-header")
                    .children(&mut [
                        html!("h2", {
                            .text("Continue Reading")
                        }),
                        link!(Route::Histories.url(), {
                            .text("History")
                        })
                    ])
                }),
                html!("div", {
                    .class("carousel-items")
                    .children_signal_vec(home.continue_reading.signal_vec_cloned().map(|entry| {
                        link!(Route::Reader {
                            manga_id: entry.manga_id,
                            chapter_id: entry.chapter_id,
                            page: entry.last_page.max(0) as usize,
                        }.url(), {
                            .class("manga-cover")
                            .children(&mut [
                                html!("img", {
                                    .attribute("src", &crate::utils::resource_url(&entry.cover_url))
                                    .attribute("loading", "lazy")
                                }),
                                html!("div", {
                                    .class("title")
                                    .children(&mut [
                                        html!("span", {
                                            .text(&entry.manga_title)
                                        }),
                                        html!("span", {
                                            .class("subtitle")
                                            .text(&format!("Ch {}", entry.chapter_number))
                                        })
                                    ])
                                })
                            ])
                        })
                    }))
                })
            ])
        })
    }

    pub fn render(home: Rc<Self>) -> Dom {
        Self::fetch(home.clone());

        html!("div", {
            .class("main")
            .children(&mut [
                Topbar::render("Home", false),
                html!("div", {
                    .class("topbar-spacing")
                }),
                Self::render_continue(home.clone()),
                Self::render_carousel("Latest Updates", Route::Browse { page: 0 }, &home.latest),
                Self::render_carousel("Popular", Route::Browse { page: 0 }, &home.popular),
            ])
            .child_signal(Spinner::render_while(home.is_loading.signal()))
        })
    }
}
