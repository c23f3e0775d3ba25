use std::rc::Rc;

use dominator::{Dom, clone, html};
use futures_signals::map_ref;
use futures_signals::signal::{Mutable, SignalExt};
use futures_signals::signal_vec::{MutableVec, SignalVecExt};
use gloo_timers::future::TimeoutFuture;
use yomu_lib::models::Manga;
use yomu_lib::search::{SEARCH_DEBOUNCE_MS, SearchFilter, collect_genres, normalize_query};

use crate::common::{Cover, Route, SearchBox, Spinner, Topbar, events};
use crate::query;
use crate::utils::{AsyncLoader, replace_url};

pub struct Search {
    search_box: Rc<SearchBox>,
    results: Mutable<Vec<Manga>>,
    genres: MutableVec<String>,
    refine: Mutable<SearchFilter>,
    searched: Mutable<bool>,
    is_loading: Mutable<bool>,
    loader: AsyncLoader,
}

impl Search {
    pub fn new(query: String) -> Rc<Self> {
        Rc::new(Self {
            search_box: SearchBox::new(query, "Search title or author"),
            results: Mutable::new(vec![]),
            genres: MutableVec::new(),
            refine: Mutable::new(SearchFilter::default()),
            searched: Mutable::new(false),
            is_loading: Mutable::new(false),
            loader: AsyncLoader::new(),
        })
    }

    /// Waits out the debounce window first, so a newer keystroke cancels
    /// both the wait and the request.
    fn search(search: Rc<Self>, input: String, debounce: bool) {
        let Some(keyword) = normalize_query(&input) else {
            search.loader.cancel();
            search.is_loading.set_neq(false);
            search.searched.set_neq(false);
            search.results.set(vec![]);
            search.genres.lock_mut().clear();
            replace_url(&Route::Search { query: String::new() }.url());
            return;
        };

        search.loader.load(clone!(search => async move {
            if debounce {
                TimeoutFuture::new(SEARCH_DEBOUNCE_MS).await;
            }

            search.is_loading.set_neq(true);
            replace_url(&Route::Search { query: keyword.clone() }.url());

            let filter = SearchFilter::keyword(&keyword);
            match query::client().search_manga(&filter, 0).await {
                Ok(page) => {
                    search.genres.lock_mut().replace_cloned(collect_genres(&page.content));
                    search.refine.set(SearchFilter::default());
                    search.results.set(page.content);
                }
                Err(e) => {
                    query::report("Search failed", &e);
                    search.genres.lock_mut().clear();
                    search.results.set(vec![]);
                }
            }
            search.searched.set_neq(true);
            search.is_loading.set_neq(false);
        }));
    }

    fn render_genres(search: Rc<Self>) -> Dom {
        html!("div", {
            .class("genre-chips")
            .children_signal_vec(search.genres.signal_vec_cloned().map(clone!(search => move |genre| {
                html!("button", {
                    .class("chip")
                    .class_signal("active", search.refine.signal_ref(clone!(genre => move |refine| {
                        refine.genres.iter().any(|g| g.eq_ignore_ascii_case(&genre))
                    })))
                    .text(&genre)
                    .event(clone!(search, genre => move |_: events::Click| {
                        search.refine.lock_mut().toggle_genre(&genre);
                    }))
                })
            })))
        })
    }

    pub fn render(search: Rc<Self>) -> Dom {
        let initial = search.search_box.query.get_cloned();
        if !initial.is_empty() {
            Self::search(search.clone(), initial, false);
        }

        html!("div", {
            .class("main")
            .children(&mut [
                Topbar::render("Search", true),
                html!("div", {
                    .class("topbar-spacing")
                }),
                SearchBox::render(search.search_box.clone(), clone!(search => move |input| {
                    Self::search(search.clone(), input, true);
                })),
                Self::render_genres(search.clone()),
            ])
            .child_signal(Spinner::render_while(search.is_loading.signal()))
            .child(html!("div", {
                .class("manga-grid")
                .children_signal_vec(map_ref! {
                    let results = search.results.signal_cloned(),
                    let refine = search.refine.signal_cloned() =>
                    refine.apply(results.clone())
                }.to_signal_vec().map(|manga| Cover::from(&manga).render()))
            }))
            .child_signal(map_ref! {
                let searched = search.searched.signal(),
                let empty = search.results.signal_ref(|results| results.is_empty()) =>
                *searched && *empty
            }.map(|empty| empty.then(|| html!("p", {
                .class("empty")
                .text("No results")
            }))))
        })
    }
}
