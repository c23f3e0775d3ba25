use std::rc::Rc;

use dominator::{Dom, clone, html, link};
use futures_signals::signal::{Mutable, SignalExt};
use futures_signals::signal_vec::{MutableVec, SignalVecExt};
use wasm_bindgen_futures::spawn_local;
use yomu_lib::models::Manga;
use yomu_lib::search::SortBy;

use crate::admin::render_nav;
use crate::common::{AdminSection, Route, Spinner, Topbar, confirm, events, snackbar};
use crate::query;
use crate::utils::{AsyncLoader, format_date};

const PAGE_SIZE: i64 = 20;

pub struct AdminManga {
    page: Mutable<i64>,
    mangas: MutableVec<Manga>,
    has_next: Mutable<bool>,
    is_loading: Mutable<bool>,
    loader: AsyncLoader,
}

impl AdminManga {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            page: Mutable::new(0),
            mangas: MutableVec::new(),
            has_next: Mutable::new(false),
            is_loading: Mutable::new(false),
            loader: AsyncLoader::new(),
        })
    }

    fn fetch(admin: Rc<Self>, page: i64) {
        admin.is_loading.set_neq(true);
        admin.loader.load(clone!(admin => async move {
            match query::client().list_manga(page, PAGE_SIZE, SortBy::Latest).await {
                Ok(result) => {
                    admin.has_next.set_neq(result.has_next());
                    admin.mangas.lock_mut().replace_cloned(result.content);
                }
                Err(e) => {
                    query::report("Failed to load manga", &e);
                    admin.has_next.set_neq(false);
                    admin.mangas.lock_mut().clear();
                }
            }
            admin.is_loading.set_neq(false);
        }));
    }

    fn delete(admin: Rc<Self>, manga: &Manga) {
        if !confirm(&format!("Delete \"{}\" and all of its chapters?", manga.title)) {
            return;
        }

        let id = manga.id;
        spawn_local(clone!(admin => async move {
            match query::client().delete_manga(id).await {
                Ok(_) => {
                    snackbar::show("Manga deleted".to_string());
                    Self::fetch(admin.clone(), admin.page.get());
                }
                Err(e) => query::report("Failed to delete manga", &e),
            }
        }));
    }

    fn render_row(admin: Rc<Self>, manga: Manga) -> Dom {
        html!("tr", {
            .children(&mut [
                html!("td", {
                    .child(link!(Route::Manga(manga.id).url(), {
                        .text(&manga.title)
                    }))
                }),
                html!("td", {
                    .text(manga.uploader.as_ref().map(|u| u.username.as_str()).unwrap_or("-"))
                }),
                html!("td", {
                    .text(&manga.chapter_count.to_string())
                }),
                html!("td", {
                    .text(&format_date(&manga.last_activity()))
                }),
                html!("td", {
                    .children(&mut [
                        link!(Route::UploadChapter(manga.id).url(), {
                            .class("button")
                            .text("Manage")
                        }),
                        html!("button", {
                            .class("danger")
                            .text("Delete")
                            .event(clone!(admin, manga => move |_: events::Click| {
                                Self::delete(admin.clone(), &manga);
                            }))
                        }),
                    ])
                }),
            ])
        })
    }

    fn render_pagination(admin: Rc<Self>) -> Dom {
        html!("div", {
            .class("pagination")
            .children(&mut [
                html!("button", {
                    .text("Previous")
                    .attribute_signal("disabled", admin.page.signal().map(|page| (page == 0).then_some("true")))
                    .event(clone!(admin => move |_: events::Click| {
                        let page = admin.page.get();
                        if page > 0 {
                            admin.page.set(page - 1);
                        }
                    }))
                }),
                html!("span", {
                    .text_signal(admin.page.signal().map(|page| format!("Page {}", page + 1)))
                }),
                html!("button", {
                    .text("Next")
                    .attribute_signal("disabled", admin.has_next.signal().map(|next| (!next).then_some("true")))
                    .event(clone!(admin => move |_: events::Click| {
                        if admin.has_next.get() {
                            admin.page.replace_with(|page| *page + 1);
                        }
                    }))
                }),
            ])
        })
    }

    pub fn render(admin: Rc<Self>) -> Dom {
        html!("div", {
            .class("main")
            .future(admin.page.signal().for_each(clone!(admin => move |page| {
                Self::fetch(admin.clone(), page);
                async {}
            })))
            .children(&mut [
                Topbar::render("Admin", false),
                html!("div", {
                    .class("topbar-spacing")
                }),
                render_nav(AdminSection::Manga),
                html!("table", {
                    .class("admin-table")
                    .children(&mut [
                        html!("thead", {
                            .child(html!("tr", {
                                .children(["Title", "Uploader", "Chapters", "Updated", ""].iter().map(|label| html!("th", {
                                    .text(label)
                                })))
                            }))
                        }),
                        html!("tbody", {
                            .children_signal_vec(admin.mangas.signal_vec_cloned().map(clone!(admin => move |manga| {
                                Self::render_row(admin.clone(), manga)
                            })))
                        }),
                    ])
                }),
            ])
            .child_signal(Spinner::render_while(admin.is_loading.signal()))
            .child(Self::render_pagination(admin.clone()))
        })
    }
}
