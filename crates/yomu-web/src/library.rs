use std::rc::Rc;

use dominator::{Dom, clone, html};
use futures_signals::map_ref;
use futures_signals::signal::{Mutable, SignalExt};
use futures_signals::signal_vec::{MutableVec, SignalVecExt};
use yomu_lib::models::Follow;

use crate::common::{Cover, Spinner, Topbar};
use crate::query;
use crate::utils::AsyncLoader;

/// Manga the user follows.
pub struct Library {
    follows: MutableVec<Follow>,
    is_loading: Mutable<bool>,
    loader: AsyncLoader,
}

impl Library {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            follows: MutableVec::new(),
            is_loading: Mutable::new(false),
            loader: AsyncLoader::new(),
        })
    }

    fn fetch(library: Rc<Self>) {
        library.is_loading.set_neq(true);
        library.loader.load(clone!(library => async move {
            match query::client().follows().await {
                Ok(mut follows) => {
                    follows.sort_by(|a, b| b.manga.last_activity().cmp(&a.manga.last_activity()));
                    library.follows.lock_mut().replace_cloned(follows);
                }
                Err(e) => {
                    query::report("Failed to load library", &e);
                    library.follows.lock_mut().clear();
                }
            }
            library.is_loading.set_neq(false);
        }));
    }

    pub fn render(library: Rc<Self>) -> Dom {
        Self::fetch(library.clone());

        html!("div", {
            .class("main")
            .children(&mut [
                Topbar::render("Library", false),
                html!("div", {
                    .class("topbar-spacing")
                }),
                html!("div", {
                    .class("manga-grid")
                    .children_signal_vec(library.follows.signal_vec_cloned().map(|follow| {
                        let manga = &follow.manga;
                        Cover::from(manga)
                            .with_badge(format!("{}", manga.chapter_count))
                            .render()
                    }))
                }),
            ])
            .child_signal(Spinner::render_while(library.is_loading.signal()))
            .child_signal(map_ref! {
                let empty = library.follows.signal_vec_cloned().is_empty(),
                let loading = library.is_loading.signal() =>
                *empty && !*loading
            }.map(|empty| empty.then(|| html!("p", {
                .class("empty")
                .text("Follow a manga to see it here")
            }))))
        })
    }
}
