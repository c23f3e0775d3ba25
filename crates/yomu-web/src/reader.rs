use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dominator::{Dom, clone, html, link, routing};
use futures_signals::map_ref;
use futures_signals::signal::{Mutable, SignalExt};
use futures_signals::signal_vec::SignalVecExt;
use gloo_timers::callback::Timeout;
use wasm_bindgen::{JsCast, UnwrapThrowExt};
use wasm_bindgen_futures::spawn_local;
use yomu_lib::history::{next_chapter, prev_chapter};
use yomu_lib::models::Chapter;

use crate::common::{
    CommentSection, Direction, Fit, Modal, ReaderMode, ReaderSettings, Route, Spinner, events,
};
use crate::contexts;
use crate::query;
use crate::utils::{AsyncLoader, document, replace_url, resource_url, window};

const HISTORY_DELAY_MS: u32 = 500;

#[derive(Debug, Clone, Copy)]
enum Nav {
    Prev,
    Next,
}

pub struct Reader {
    manga_id: i64,
    chapter_id: i64,
    manga_title: Mutable<String>,
    chapter: Mutable<Option<Chapter>>,
    chapters: Mutable<Vec<Chapter>>,
    current_page: Mutable<usize>,
    pages_len: Mutable<usize>,
    settings: Rc<ReaderSettings>,
    modal: Rc<Modal>,
    is_bar_visible: Mutable<bool>,
    is_loading: Mutable<bool>,
    comments: Rc<CommentSection>,
    loader: AsyncLoader,
    timeout: RefCell<Option<Timeout>>,
}

impl Reader {
    pub fn new(manga_id: i64, chapter_id: i64, page: usize) -> Rc<Self> {
        Rc::new(Self {
            manga_id,
            chapter_id,
            manga_title: Mutable::new(String::new()),
            chapter: Mutable::new(None),
            chapters: Mutable::new(vec![]),
            current_page: Mutable::new(page),
            pages_len: Mutable::new(0),
            settings: ReaderSettings::load(),
            modal: Modal::new(),
            is_bar_visible: Mutable::new(true),
            is_loading: Mutable::new(false),
            comments: CommentSection::new(manga_id, Some(chapter_id)),
            loader: AsyncLoader::new(),
            timeout: RefCell::new(None),
        })
    }

    fn fetch(reader: Rc<Self>) {
        reader.is_loading.set_neq(true);
        reader.loader.load(clone!(reader => async move {
            let client = query::client();
            match client.chapter(reader.manga_id, reader.chapter_id).await {
                Ok(chapter) => {
                    let len = chapter.pages.len();
                    reader.pages_len.set_neq(len);
                    if reader.current_page.get() >= len {
                        reader.current_page.set(len.saturating_sub(1));
                    }
                    reader.chapter.set(Some(chapter));
                }
                Err(e) => {
                    query::report("Failed to load chapter", &e);
                    reader.is_loading.set_neq(false);
                    return;
                }
            }

            match client.manga(reader.manga_id).await {
                Ok(manga) => reader.manga_title.set(manga.title),
                Err(e) => query::report("Failed to load manga", &e),
            }

            match client.chapters(reader.manga_id).await {
                Ok(chapters) => reader.chapters.set(chapters),
                Err(e) => {
                    query::report("Failed to load chapters", &e);
                    reader.chapters.set(vec![]);
                }
            }
            reader.is_loading.set_neq(false);
        }));
    }

    /// Keep the URL on the current page and record progress once the reader
    /// settles on it.
    fn on_page(reader: Rc<Self>, page: usize) {
        replace_url(&Route::Reader {
            manga_id: reader.manga_id,
            chapter_id: reader.chapter_id,
            page,
        }.url());

        if !contexts::auth().is_logged_in() {
            return;
        }

        let manga_id = reader.manga_id;
        let chapter_id = reader.chapter_id;
        let timeout = Timeout::new(HISTORY_DELAY_MS, move || {
            spawn_local(async move {
                if let Err(e) = query::client().record_history(manga_id, chapter_id, page as i64).await {
                    query::report("Failed to save progress", &e);
                }
            });
        });

        // dropping the previous timeout cancels it
        reader.timeout.replace(Some(timeout));
    }

    fn neighbour(&self, nav: Nav) -> Option<i64> {
        let chapters = self.chapters.lock_ref();
        let chapter = match nav {
            Nav::Prev => prev_chapter(&chapters, self.chapter_id),
            Nav::Next => next_chapter(&chapters, self.chapter_id),
        };
        chapter.map(|chapter| chapter.id)
    }

    fn go_to_chapter(&self, nav: Nav) {
        match self.neighbour(nav) {
            Some(chapter_id) => {
                window().scroll_to_with_x_and_y(0.0, 0.0);
                routing::go_to_url(&Route::Reader {
                    manga_id: self.manga_id,
                    chapter_id,
                    page: 0,
                }.url());
            }
            None => {
                info!("no {:?} chapter", nav);
            }
        }
    }

    fn go_to_next_page(&self) {
        let page = self.current_page.get();
        if page + 1 < self.pages_len.get() {
            self.current_page.set(page + 1);
        } else {
            self.go_to_chapter(Nav::Next);
        }
    }

    fn go_to_prev_page(&self) {
        match self.current_page.get().checked_sub(1) {
            Some(page) => self.current_page.set(page),
            None => self.go_to_chapter(Nav::Prev),
        }
    }

    fn render_topbar(reader: Rc<Self>) -> Dom {
        html!("div", {
            .class("reader-topbar")
            .visible_signal(reader.is_bar_visible.signal())
            .children(&mut [
                link!(Route::Manga(reader.manga_id).url(), {
                    .text("Back")
                }),
                html!("div", {
                    .class("title")
                    .children(&mut [
                        html!("span", {
                            .text_signal(reader.manga_title.signal_cloned())
                        }),
                        html!("span", {
                            .class("subtitle")
                            .text_signal(reader.chapter.signal_ref(|chapter| {
                                chapter.as_ref().map(|chapter| chapter.display_title()).unwrap_or_default()
                            }))
                        }),
                    ])
                }),
                html!("button", {
                    .text("Settings")
                    .event(clone!(reader => move |_: events::Click| {
                        reader.modal.toggle_show();
                    }))
                }),
            ])
        })
    }

    fn render_bottombar(reader: Rc<Self>) -> Dom {
        let chapter_id = reader.chapter_id;
        html!("div", {
            .class("reader-bottombar")
            .visible_signal(reader.is_bar_visible.signal())
            .children(&mut [
                html!("button", {
                    .attribute_signal("disabled", reader.chapters.signal_ref(move |chapters| {
                        prev_chapter(chapters, chapter_id).is_none().then_some("true")
                    }))
                    .text("Prev Chapter")
                    .event(clone!(reader => move |_: events::Click| {
                        reader.go_to_chapter(Nav::Prev);
                    }))
                }),
                html!("span", {
                    .class("page-indicator")
                    .text_signal(map_ref! {
                        let page = reader.current_page.signal(),
                        let len = reader.pages_len.signal() =>
                        format!("{} / {}", (*page + 1).min(*len), len)
                    })
                }),
                html!("button", {
                    .attribute_signal("disabled", reader.chapters.signal_ref(move |chapters| {
                        next_chapter(chapters, chapter_id).is_none().then_some("true")
                    }))
                    .text("Next Chapter")
                    .event(clone!(reader => move |_: events::Click| {
                        reader.go_to_chapter(Nav::Next);
                    }))
                }),
            ])
        })
    }

    /// `restore` holds a page to scroll to once its image has loaded.
    fn render_image(
        reader: &Rc<Self>,
        index: usize,
        page: &str,
        restore: Option<Rc<Cell<Option<usize>>>>,
    ) -> Dom {
        html!("img", {
            .class("reader-page")
            .attribute("id", &format!("page-{}", index))
            .attribute("src", &resource_url(page))
            .class_signal("fit-width", reader.settings.fit.signal().map(|fit| fit == Fit::Width))
            .class_signal("fit-height", reader.settings.fit.signal().map(|fit| fit == Fit::Height))
            .class_signal("fit-all", reader.settings.fit.signal().map(|fit| fit == Fit::All))
            .event(move |_: events::Error| {
                error!("error loading page {}", index + 1);
            })
            .apply_if(restore.is_some(), move |dom| dom.event(move |_: events::Load| {
                if let Some(restore) = restore.as_ref().filter(|restore| restore.get() == Some(index)) {
                    restore.set(None);
                    scroll_to_page(index);
                }
            }))
        })
    }

    fn render_paged(reader: Rc<Self>) -> Dom {
        html!("div", {
            .class("reader-paged")
            .global_event(clone!(reader => move |e: events::KeyDown| {
                let direction = reader.settings.direction.get();
                match (e.key().as_str(), direction) {
                    ("ArrowLeft", Direction::LeftToRight) | ("ArrowRight", Direction::RightToLeft) => reader.go_to_prev_page(),
                    ("ArrowRight", Direction::LeftToRight) | ("ArrowLeft", Direction::RightToLeft) => reader.go_to_next_page(),
                    (" ", _) => reader.is_bar_visible.set_neq(!reader.is_bar_visible.get()),
                    _ => {}
                }
            }))
            .child(html!("div", {
                .class("reader-navigation")
                .class_signal("reverse", reader.settings.direction.signal().map(|d| d == Direction::RightToLeft))
                .children(&mut [
                    html!("div", {
                        .class("prev")
                        .event(clone!(reader => move |_: events::Click| reader.go_to_prev_page()))
                    }),
                    html!("div", {
                        .class("toggle-bar")
                        .event(clone!(reader => move |_: events::Click| {
                            reader.is_bar_visible.set_neq(!reader.is_bar_visible.get());
                        }))
                    }),
                    html!("div", {
                        .class("next")
                        .event(clone!(reader => move |_: events::Click| reader.go_to_next_page()))
                    }),
                ])
            }))
            .children_signal_vec(reader.chapter.signal_ref(|chapter| {
                chapter.as_ref().map(|chapter| chapter.pages.clone()).unwrap_or_default()
            }).to_signal_vec().enumerate().map(clone!(reader => move |(index, page)| {
                let index = index.get().unwrap_or_default();
                html!("div", {
                    .visible_signal(reader.current_page.signal().map(move |current| current == index))
                    .child(Self::render_image(&reader, index, &page, None))
                })
            })))
        })
    }

    fn render_continuous(reader: Rc<Self>) -> Dom {
        // page to scroll to once its image has loaded
        let restore = Rc::new(Cell::new(Some(reader.current_page.get()).filter(|page| *page > 0)));

        html!("div", {
            .class("reader-continuous")
            .children_signal_vec(reader.chapter.signal_ref(|chapter| {
                chapter.as_ref().map(|chapter| chapter.pages.clone()).unwrap_or_default()
            }).to_signal_vec().enumerate().map(clone!(reader, restore => move |(index, page)| {
                let index = index.get().unwrap_or_default();
                html!("div", {
                    .event(clone!(reader => move |_: events::Click| {
                        reader.is_bar_visible.set_neq(!reader.is_bar_visible.get());
                    }))
                    .child(Self::render_image(&reader, index, &page, Some(restore.clone())))
                })
            })))
            .child(html!("button", {
                .class("next-chapter")
                .text("Next Chapter")
                .event(clone!(reader => move |_: events::Click| reader.go_to_chapter(Nav::Next)))
            }))
            .global_event(clone!(reader => move |_: events::Scroll| {
                let top = window().scroll_y().unwrap_throw();
                let len = reader.pages_len.get();
                let page = (0..len)
                    .take_while(|i| page_top(*i).map(|page_top| page_top <= top + 1.0).unwrap_or(false))
                    .last()
                    .unwrap_or(0);
                reader.current_page.set_neq(page);
            }))
        })
    }

    pub fn render(reader: Rc<Self>) -> Dom {
        Self::fetch(reader.clone());

        html!("div", {
            .class("reader")
            .future(reader.current_page.signal().for_each(clone!(reader => move |page| {
                Self::on_page(reader.clone(), page);
                async {}
            })))
            .children(&mut [
                Self::render_topbar(reader.clone()),
            ])
            .child_signal(Spinner::render_while(reader.is_loading.signal()))
            .child_signal(reader.settings.reader_mode.signal().map(clone!(reader => move |mode| match mode {
                ReaderMode::Paged => Some(Self::render_paged(reader.clone())),
                ReaderMode::Continuous => Some(Self::render_continuous(reader.clone())),
            })))
            .children(&mut [
                Self::render_bottombar(reader.clone()),
                html!("div", {
                    .class("reader-comments")
                    .child(CommentSection::render(reader.comments.clone()))
                }),
                Modal::render(reader.modal.clone(), "Reader Settings", ReaderSettings::render(reader.settings.clone())),
            ])
        })
    }
}

fn page_top(index: usize) -> Option<f64> {
    document()
        .get_element_by_id(&format!("page-{}", index))
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        .map(|el| el.offset_top() as f64)
}

fn scroll_to_page(index: usize) {
    if let Some(top) = page_top(index) {
        window().scroll_to_with_x_and_y(0.0, top);
    }
}
