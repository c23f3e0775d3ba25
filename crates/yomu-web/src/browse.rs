use std::rc::Rc;

use dominator::{Dom, clone, html, link, routing};
use futures_signals::map_ref;
use futures_signals::signal::{Mutable, SignalExt};
use futures_signals::signal_vec::{MutableVec, SignalVecExt};
use wasm_bindgen::UnwrapThrowExt;
use yomu_lib::models::{Manga, MangaStatus};
use yomu_lib::search::{SearchFilter, SortBy};

use crate::common::{Cover, Modal, Route, Spinner, Topbar, events, field, select};
use crate::query;
use crate::utils::{AsyncLoader, local_storage};

const PAGE_SIZE: i64 = 24;
pub const STORAGE_KEY: &str = "browse:filter";

/// Paged catalogue with a genre/status/sort filter.
pub struct Browse {
    page: i64,
    filter: Mutable<SearchFilter>,
    status: Mutable<String>,
    sort: Mutable<String>,
    genres: MutableVec<String>,
    mangas: MutableVec<Manga>,
    has_next: Mutable<bool>,
    is_loading: Mutable<bool>,
    modal: Rc<Modal>,
    loader: AsyncLoader,
    genre_loader: AsyncLoader,
}

impl Browse {
    pub fn new(page: i64) -> Rc<Self> {
        let filter = local_storage()
            .get(STORAGE_KEY)
            .unwrap_throw()
            .and_then(|value| serde_json::from_str::<SearchFilter>(&value).ok())
            .unwrap_or_default();

        Rc::new(Self {
            page,
            status: Mutable::new(
                filter
                    .status
                    .map(|status| status.as_str().to_string())
                    .unwrap_or_default(),
            ),
            sort: Mutable::new(filter.sort.as_str().to_string()),
            filter: Mutable::new(filter),
            genres: MutableVec::new(),
            mangas: MutableVec::new(),
            has_next: Mutable::new(false),
            is_loading: Mutable::new(false),
            modal: Modal::new(),
            loader: AsyncLoader::new(),
            genre_loader: AsyncLoader::new(),
        })
    }

    fn fetch_genres(browse: Rc<Self>) {
        browse.genre_loader.load(clone!(browse => async move {
            match query::client().genres().await {
                Ok(genres) => browse.genres.lock_mut().replace_cloned(genres),
                Err(e) => {
                    query::report("Failed to load genres", &e);
                }
            }
        }));
    }

    fn fetch(browse: Rc<Self>) {
        let filter = browse.filter.get_cloned();
        let page = browse.page;

        browse.is_loading.set_neq(true);
        browse.loader.load(clone!(browse => async move {
            let client = query::client();
            let result = if filter.is_empty() {
                client.list_manga(page, PAGE_SIZE, filter.sort).await
            } else {
                client.search_manga(&filter, page).await
            };

            match result {
                Ok(result) => {
                    browse.has_next.set_neq(result.has_next());
                    browse.mangas.lock_mut().replace_cloned(result.content);
                }
                Err(e) => {
                    query::report("Failed to load manga", &e);
                    browse.has_next.set_neq(false);
                    browse.mangas.lock_mut().clear();
                }
            }
            browse.is_loading.set_neq(false);
        }));
    }

    fn apply_filter(browse: Rc<Self>) {
        {
            let mut filter = browse.filter.lock_mut();
            filter.status = browse.status.get_cloned().parse::<MangaStatus>().ok();
            filter.sort = browse.sort.get_cloned().parse().unwrap_or_default();

            match serde_json::to_string(&*filter) {
                Ok(value) => local_storage().set(STORAGE_KEY, &value).unwrap_throw(),
                Err(e) => error!("error saving filter: {}", e),
            }
        }
        browse.modal.hide();

        match restart_route(browse.page) {
            Some(route) => routing::go_to_url(&route.url()),
            None => Self::fetch(browse),
        }
    }

    fn render_filter(browse: Rc<Self>) -> Dom {
        let mut statuses = vec![("", "Any")];
        statuses.extend(MangaStatus::ALL.iter().map(|status| (status.as_str(), status.label())));
        let sorts: Vec<(&str, &str)> = SortBy::ALL.iter().map(|sort| (sort.as_str(), sort.label())).collect();

        html!("div", {
            .class("filter")
            .children(&mut [
                field("Status", select(browse.status.clone(), &statuses)),
                field("Sort", select(browse.sort.clone(), &sorts)),
                html!("div", {
                    .class("genre-chips")
                    .children_signal_vec(browse.genres.signal_vec_cloned().map(clone!(browse => move |genre| {
                        html!("button", {
                            .class("chip")
                            .class_signal("active", browse.filter.signal_ref(clone!(genre => move |filter| {
                                filter.genres.iter().any(|g| g.eq_ignore_ascii_case(&genre))
                            })))
                            .text(&genre)
                            .event(clone!(browse, genre => move |_: events::Click| {
                                browse.filter.lock_mut().toggle_genre(&genre);
                            }))
                        })
                    })))
                }),
                html!("div", {
                    .class("filter-actions")
                    .children(&mut [
                        html!("button", {
                            .text("Reset")
                            .event(clone!(browse => move |_: events::Click| {
                                browse.filter.set(SearchFilter::default());
                                browse.status.set(String::new());
                                browse.sort.set(SortBy::default().as_str().to_string());
                                Self::apply_filter(browse.clone());
                            }))
                        }),
                        html!("button", {
                            .class("primary")
                            .text("Apply")
                            .event(clone!(browse => move |_: events::Click| {
                                Self::apply_filter(browse.clone());
                            }))
                        }),
                    ])
                })
            ])
        })
    }

    fn render_pagination(browse: Rc<Self>) -> Dom {
        let page = browse.page;
        html!("div", {
            .class("pagination")
            .apply_if(page > 0, |dom| dom.child(link!(Route::Browse { page: page - 1 }.url(), {
                .text("Previous")
            })))
            .child(html!("span", {
                .text(&format!("Page {}", page + 1))
            }))
            .child_signal(map_ref! {
                let has_next = browse.has_next.signal(),
                let loading = browse.is_loading.signal() =>
                *has_next && !*loading
            }.map(move |show| show.then(|| link!(Route::Browse { page: page + 1 }.url(), {
                .text("Next")
            }))))
        })
    }

    pub fn render(browse: Rc<Self>) -> Dom {
        Self::fetch_genres(browse.clone());
        Self::fetch(browse.clone());

        html!("div", {
            .class("main")
            .children(&mut [
                Topbar::render_with("Browse", false, vec![
                    html!("button", {
                        .text("Filter")
                        .event(clone!(browse => move |_: events::Click| {
                            browse.modal.toggle_show();
                        }))
                    })
                ]),
                html!("div", {
                    .class("topbar-spacing")
                }),
                html!("div", {
                    .class("manga-grid")
                    .children_signal_vec(browse.mangas.signal_vec_cloned().map(|manga| {
                        Cover::from(&manga).render()
                    }))
                }),
            ])
            .child_signal(Spinner::render_while(browse.is_loading.signal()))
            .child_signal(map_ref! {
                let empty = browse.mangas.signal_vec_cloned().is_empty(),
                let loading = browse.is_loading.signal() =>
                *empty && !*loading
            }.map(|empty| empty.then(|| html!("p", {
                .class("empty")
                .text("No manga found")
            }))))
            .children(&mut [
                Self::render_pagination(browse.clone()),
                Modal::render(browse.modal.clone(), "Filter", Self::render_filter(browse.clone())),
            ])
        })
    }
}

/// A changed filter starts over from the first page; `None` when already there.
fn restart_route(page: i64) -> Option<Route> {
    (page > 0).then_some(Route::Browse { page: 0 })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_filter_restarts_from_first_page() {
        assert_eq!(restart_route(0), None);
        assert_eq!(restart_route(2), Some(Route::Browse { page: 0 }));
        assert_eq!(restart_route(2).map(|route| route.url()).as_deref(), Some("/browse"));
    }
}
