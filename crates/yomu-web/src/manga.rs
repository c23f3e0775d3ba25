use std::rc::Rc;

use dominator::{Dom, clone, html, link, routing};
use futures_signals::signal::{Mutable, SignalExt};
use futures_signals::signal_vec::{MutableVec, SignalVecExt};
use wasm_bindgen_futures::spawn_local;
use yomu_lib::history::resume_point;
use yomu_lib::models::{Chapter, Manga, ReadingHistory};

use crate::common::{CommentSection, Route, Spinner, Topbar, events};
use crate::contexts;
use crate::query;
use crate::utils::{AsyncLoader, format_date, resource_url};

pub struct MangaDetail {
    manga_id: i64,
    manga: Mutable<Option<Manga>>,
    chapters: MutableVec<Chapter>,
    following: Mutable<bool>,
    resume: Mutable<Option<(Chapter, i64)>>,
    not_found: Mutable<bool>,
    is_loading: Mutable<bool>,
    comments: Rc<CommentSection>,
    loader: AsyncLoader,
}

impl MangaDetail {
    pub fn new(manga_id: i64) -> Rc<Self> {
        Rc::new(Self {
            manga_id,
            manga: Mutable::new(None),
            chapters: MutableVec::new(),
            following: Mutable::new(false),
            resume: Mutable::new(None),
            not_found: Mutable::new(false),
            is_loading: Mutable::new(false),
            comments: CommentSection::new(manga_id, None),
            loader: AsyncLoader::new(),
        })
    }

    fn fetch(detail: Rc<Self>) {
        detail.is_loading.set_neq(true);
        detail.loader.load(clone!(detail => async move {
            let client = query::client();
            match client.manga(detail.manga_id).await {
                Ok(manga) => detail.manga.set(Some(manga)),
                Err(yomu_api::Error::NotFound) => {
                    detail.not_found.set_neq(true);
                    detail.is_loading.set_neq(false);
                    return;
                }
                Err(e) => {
                    query::report("Failed to load manga", &e);
                    detail.is_loading.set_neq(false);
                    return;
                }
            }

            let mut chapters = match client.chapters(detail.manga_id).await {
                Ok(chapters) => chapters,
                Err(e) => {
                    query::report("Failed to load chapters", &e);
                    vec![]
                }
            };

            let mut history = None;
            if contexts::auth().is_logged_in() {
                match client.is_following(detail.manga_id).await {
                    Ok(following) => detail.following.set_neq(following),
                    Err(e) => query::report("Failed to load follow status", &e),
                }

                match client.histories().await {
                    Ok(histories) => history = latest_for(histories, detail.manga_id),
                    Err(e) => query::report("Failed to load reading history", &e),
                }
            }
            detail.resume.set(
                resume_point(&chapters, history.as_ref())
                    .map(|(chapter, page)| (chapter.clone(), page)),
            );

            chapters.sort_by(|a, b| b.number.total_cmp(&a.number));
            detail.chapters.lock_mut().replace_cloned(chapters);
            detail.is_loading.set_neq(false);
        }));
    }

    fn toggle_follow(detail: Rc<Self>) {
        if !contexts::auth().is_logged_in() {
            routing::go_to_url(&Route::Login.url());
            return;
        }

        let following = detail.following.get();
        spawn_local(clone!(detail => async move {
            let client = query::client();
            let result = if following {
                client.unfollow(detail.manga_id).await
            } else {
                client.follow(detail.manga_id).await
            };
            match result {
                Ok(_) => {
                    detail.following.set_neq(!following);
                    if let Some(manga) = detail.manga.lock_mut().as_mut() {
                        manga.follower_count += if following { -1 } else { 1 };
                    }
                }
                Err(e) => query::report("Failed to update follow", &e),
            }
        }));
    }

    fn render_info(detail: Rc<Self>, manga: &Manga) -> Dom {
        let can_edit = manga
            .uploader
            .as_ref()
            .map(|uploader| contexts::auth().can_modify(uploader.id))
            .unwrap_or(false);

        html!("div", {
            .class("manga-detail")
            .children(&mut [
                html!("img", {
                    .class("manga-detail-cover")
                    .attribute("src", &resource_url(&manga.cover_url))
                }),
                html!("div", {
                    .class("manga-detail-info")
                    .children(&mut [
                        html!("h1", {
                            .text(&manga.title)
                        }),
                        html!("span", {
                            .class("author")
                            .text(&manga.author)
                        }),
                        html!("span", {
                            .class("status")
                            .text(manga.status.label())
                        }),
                        html!("span", {
                            .class("stats")
                            .text_signal(detail.manga.signal_ref(|manga| {
                                manga.as_ref().map(|manga| format!(
                                    "{} chapters · {} followers · {} views",
                                    manga.chapter_count, manga.follower_count, manga.view_count
                                )).unwrap_or_default()
                            }))
                        }),
                    ])
                    .apply_if(manga.uploader.is_some(), |dom| dom.child(html!("span", {
                        .class("uploader")
                        .text(&format!("Uploaded by {}", manga.uploader.as_ref().map(|u| u.username.as_str()).unwrap_or_default()))
                    })))
                })
            ])
            .child(html!("div", {
                .class("genre-chips")
                .children(manga.genres.iter().map(|genre| html!("span", {
                    .class("chip")
                    .text(genre)
                })))
            }))
            .child(html!("p", {
                .class("description")
                .text(manga.description.as_deref().unwrap_or("No description"))
            }))
            .child(html!("div", {
                .class("manga-actions")
                .children(&mut [
                    html!("button", {
                        .class_signal("active", detail.following.signal())
                        .text_signal(detail.following.signal().map(|following| if following { "Following" } else { "Follow" }))
                        .event(clone!(detail => move |_: events::Click| {
                            Self::toggle_follow(detail.clone());
                        }))
                    }),
                ])
                .child_signal(detail.resume.signal_cloned().map(clone!(detail => move |resume| {
                    resume.map(|(chapter, page)| link!(Route::Reader {
                        manga_id: detail.manga_id,
                        chapter_id: chapter.id,
                        page: page.max(0) as usize,
                    }.url(), {
                        .class("button")
                        .class("primary")
                        .text(&format!("Read {}", chapter.display_title()))
                    }))
                })))
                .apply_if(can_edit, |dom| dom.child(link!(Route::UploadChapter(manga.id).url(), {
                    .class("button")
                    .text("Edit")
                })))
            }))
        })
    }

    fn render_chapters(detail: Rc<Self>) -> Dom {
        let manga_id = detail.manga_id;
        html!("div", {
            .class("chapter-list")
            .children_signal_vec(detail.chapters.signal_vec_cloned().map(move |chapter| {
                link!(Route::Reader { manga_id, chapter_id: chapter.id, page: 0 }.url(), {
                    .class("chapter-item")
                    .children(&mut [
                        html!("span", {
                            .class("title")
                            .text(&chapter.display_title())
                        }),
                        html!("span", {
                            .class("subtitle")
                            .text(&format_date(&chapter.created_at))
                        }),
                    ])
                })
            }))
            .child_signal(detail.chapters.signal_vec_cloned().is_empty().map(|empty| empty.then(|| html!("p", {
                .class("empty")
                .text("No chapters yet")
            }))))
        })
    }

    pub fn render(detail: Rc<Self>) -> Dom {
        Self::fetch(detail.clone());

        html!("div", {
            .class("main")
            .children(&mut [
                Topbar::render("Manga", true),
                html!("div", {
                    .class("topbar-spacing")
                }),
            ])
            .child_signal(Spinner::render_while(detail.is_loading.signal()))
            .child_signal(detail.not_found.signal().map(|not_found| not_found.then(|| html!("p", {
                .class("empty")
                .text("Manga not found")
            }))))
            .child_signal(detail.manga.signal_ref(|manga| manga.as_ref().map(|manga| manga.id)).dedupe().map(clone!(detail => move |id| {
                id.and_then(|_| detail.manga.get_cloned()).map(|manga| html!("div", {
                    .children(&mut [
                        Self::render_info(detail.clone(), &manga),
                        html!("h3", {
                            .text("Chapters")
                        }),
                        Self::render_chapters(detail.clone()),
                        CommentSection::render(detail.comments.clone()),
                    ])
                }))
            })))
        })
    }
}

fn latest_for(histories: Vec<ReadingHistory>, manga_id: i64) -> Option<ReadingHistory> {
    histories
        .into_iter()
        .filter(|history| history.manga_id == manga_id)
        .max_by(|a, b| a.read_at.cmp(&b.read_at))
}
