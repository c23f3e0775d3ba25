use std::rc::Rc;

use dominator::{Dom, clone, html, link};
use futures_signals::signal::{Mutable, SignalExt};
use futures_signals::signal_vec::{MutableVec, SignalVecExt};
use wasm_bindgen_futures::spawn_local;
use yomu_lib::models::Comment;

use crate::admin::render_nav;
use crate::common::{AdminSection, Route, Spinner, Topbar, confirm, events};
use crate::query;
use crate::utils::{AsyncLoader, format_date};

/// Moderation view over every comment, newest first.
pub struct AdminComments {
    page: Mutable<i64>,
    comments: MutableVec<Comment>,
    has_next: Mutable<bool>,
    is_loading: Mutable<bool>,
    loader: AsyncLoader,
}

impl AdminComments {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            page: Mutable::new(0),
            comments: MutableVec::new(),
            has_next: Mutable::new(false),
            is_loading: Mutable::new(false),
            loader: AsyncLoader::new(),
        })
    }

    fn fetch(admin: Rc<Self>, page: i64) {
        admin.is_loading.set_neq(true);
        admin.loader.load(clone!(admin => async move {
            match query::client().all_comments(page).await {
                Ok(result) => {
                    admin.has_next.set_neq(result.has_next());
                    admin.comments.lock_mut().replace_cloned(result.content);
                }
                Err(e) => {
                    query::report("Failed to load comments", &e);
                    admin.has_next.set_neq(false);
                    admin.comments.lock_mut().clear();
                }
            }
            admin.is_loading.set_neq(false);
        }));
    }

    fn delete(admin: Rc<Self>, id: i64) {
        if !confirm("Delete this comment and its replies?") {
            return;
        }

        spawn_local(clone!(admin => async move {
            match query::client().delete_comment(id).await {
                Ok(_) => Self::fetch(admin.clone(), admin.page.get()),
                Err(e) => query::report("Failed to delete comment", &e),
            }
        }));
    }

    fn render_item(admin: Rc<Self>, comment: Comment) -> Dom {
        let id = comment.id;
        let target = match comment.chapter_id {
            Some(chapter_id) => Route::Reader { manga_id: comment.manga_id, chapter_id, page: 0 },
            None => Route::Manga(comment.manga_id),
        };

        html!("div", {
            .class("comment")
            .children(&mut [
                html!("div", {
                    .class("comment-header")
                    .children(&mut [
                        html!("span", {
                            .class("comment-author")
                            .text(&comment.user.username)
                        }),
                        html!("span", {
                            .class("comment-date")
                            .text(&format_date(&comment.created_at))
                        }),
                        link!(target.url(), {
                            .text("View")
                        }),
                    ])
                }),
                html!("p", {
                    .class("comment-content")
                    .text(&comment.content)
                }),
                html!("button", {
                    .class("danger")
                    .text("Delete")
                    .event(clone!(admin => move |_: events::Click| {
                        Self::delete(admin.clone(), id);
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
                render_nav(AdminSection::Comments),
                html!("div", {
                    .class("comment-list")
                    .children_signal_vec(admin.comments.signal_vec_cloned().map(clone!(admin => move |comment| {
                        Self::render_item(admin.clone(), comment)
                    })))
                }),
            ])
            .child_signal(Spinner::render_while(admin.is_loading.signal()))
            .child(html!("div", {
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
            }))
        })
    }
}
