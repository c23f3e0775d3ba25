use std::rc::Rc;

use dominator::{Dom, EventOptions, clone, html, link};
use futures_signals::signal::{Mutable, SignalExt};
use futures_signals::signal_vec::SignalVecExt;
use wasm_bindgen_futures::spawn_local;
use yomu_lib::comment::{CommentNode, MAX_INDENT_DEPTH, build_tree, count_all};
use yomu_lib::models::CommentInput;

use super::{Route, Spinner, confirm, events, snackbar, textarea};
use crate::contexts;
use crate::query;
use crate::utils::{AsyncLoader, format_date};

/// Threaded comments under a manga or one of its chapters.
pub struct CommentSection {
    manga_id: i64,
    chapter_id: Option<i64>,
    tree: Mutable<Vec<CommentNode>>,
    total: Mutable<usize>,
    draft: Mutable<String>,
    reply_to: Mutable<Option<i64>>,
    reply_draft: Mutable<String>,
    editing: Mutable<Option<i64>>,
    edit_draft: Mutable<String>,
    is_loading: Mutable<bool>,
    loader: AsyncLoader,
}

impl CommentSection {
    pub fn new(manga_id: i64, chapter_id: Option<i64>) -> Rc<Self> {
        Rc::new(Self {
            manga_id,
            chapter_id,
            tree: Mutable::new(vec![]),
            total: Mutable::new(0),
            draft: Mutable::new(String::new()),
            reply_to: Mutable::new(None),
            reply_draft: Mutable::new(String::new()),
            editing: Mutable::new(None),
            edit_draft: Mutable::new(String::new()),
            is_loading: Mutable::new(false),
            loader: AsyncLoader::new(),
        })
    }

    pub fn fetch(section: Rc<Self>) {
        section.is_loading.set_neq(true);
        section.loader.load(clone!(section => async move {
            match query::client().comments(section.manga_id, section.chapter_id).await {
                Ok(comments) => {
                    let tree = build_tree(comments);
                    section.total.set_neq(count_all(&tree));
                    section.tree.set(tree);
                }
                Err(e) => {
                    query::report("Failed to load comments", &e);
                    section.total.set_neq(0);
                    section.tree.set(vec![]);
                }
            }
            section.is_loading.set_neq(false);
        }));
    }

    fn post(section: Rc<Self>, parent_id: Option<i64>, content: String) {
        let content = content.trim().to_string();
        if content.is_empty() {
            snackbar::show("Comment cannot be empty".to_string());
            return;
        }

        let input = CommentInput {
            manga_id: section.manga_id,
            chapter_id: section.chapter_id,
            parent_id,
            content,
        };
        spawn_local(clone!(section => async move {
            match query::client().post_comment(&input).await {
                Ok(_) => {
                    if parent_id.is_some() {
                        section.reply_draft.set(String::new());
                        section.reply_to.set(None);
                    } else {
                        section.draft.set(String::new());
                    }
                    Self::fetch(section);
                }
                Err(e) => {
                    query::report("Failed to post comment", &e);
                }
            }
        }));
    }

    fn save_edit(section: Rc<Self>, id: i64) {
        let content = section.edit_draft.get_cloned().trim().to_string();
        if content.is_empty() {
            snackbar::show("Comment cannot be empty".to_string());
            return;
        }

        spawn_local(clone!(section => async move {
            match query::client().edit_comment(id, &content).await {
                Ok(_) => {
                    section.editing.set(None);
                    Self::fetch(section);
                }
                Err(e) => {
                    query::report("Failed to edit comment", &e);
                }
            }
        }));
    }

    fn delete(section: Rc<Self>, id: i64) {
        if !confirm("Delete this comment?") {
            return;
        }

        spawn_local(clone!(section => async move {
            match query::client().delete_comment(id).await {
                Ok(_) => Self::fetch(section),
                Err(e) => {
                    query::report("Failed to delete comment", &e);
                }
            }
        }));
    }

    fn render_form(section: Rc<Self>) -> Dom {
        html!("form", {
            .class("comment-form")
            .children(&mut [
                textarea(section.draft.clone(), "Write a comment"),
                html!("button", {
                    .text("Post")
                    .event_with_options(&EventOptions::preventable(), clone!(section => move |e: events::Click| {
                        e.prevent_default();
                        Self::post(section.clone(), None, section.draft.get_cloned());
                    }))
                })
            ])
        })
    }

    fn render_reply_form(section: Rc<Self>, parent_id: i64) -> Dom {
        html!("div", {
            .class("comment-form")
            .children(&mut [
                textarea(section.reply_draft.clone(), "Write a reply"),
                html!("div", {
                    .class("comment-actions")
                    .children(&mut [
                        html!("button", {
                            .text("Reply")
                            .event(clone!(section => move |_: events::Click| {
                                Self::post(section.clone(), Some(parent_id), section.reply_draft.get_cloned());
                            }))
                        }),
                        html!("button", {
                            .text("Cancel")
                            .event(clone!(section => move |_: events::Click| {
                                section.reply_to.set(None);
                            }))
                        }),
                    ])
                })
            ])
        })
    }

    fn render_content(section: Rc<Self>, id: i64, content: String) -> Dom {
        html!("div", {
            .class("comment-content")
            .child_signal(section.editing.signal().map(clone!(section => move |editing| {
                if editing == Some(id) {
                    Some(html!("div", {
                        .children(&mut [
                            textarea(section.edit_draft.clone(), ""),
                            html!("button", {
                                .text("Save")
                                .event(clone!(section => move |_: events::Click| {
                                    Self::save_edit(section.clone(), id);
                                }))
                            }),
                            html!("button", {
                                .text("Cancel")
                                .event(clone!(section => move |_: events::Click| {
                                    section.editing.set(None);
                                }))
                            }),
                        ])
                    }))
                } else {
                    Some(html!("p", {
                        .text(&content)
                    }))
                }
            })))
        })
    }

    fn render_node(section: Rc<Self>, node: CommentNode, depth: usize) -> Dom {
        let auth = contexts::auth();
        let comment = node.comment;
        let id = comment.id;
        let is_author = auth.user_id() == Some(comment.user.id);
        let can_delete = auth.can_modify(comment.user.id);
        let logged_in = auth.is_logged_in();

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
                    ])
                    .apply_if(comment.is_edited(), |dom| dom.child(html!("span", {
                        .class("comment-edited")
                        .text("(edited)")
                    })))
                }),
                Self::render_content(section.clone(), id, comment.content.clone()),
                html!("div", {
                    .class("comment-actions")
                    .apply_if(logged_in, |dom| dom.child(html!("button", {
                        .text("Reply")
                        .event(clone!(section => move |_: events::Click| {
                            section.reply_draft.set(String::new());
                            section.reply_to.set(Some(id));
                        }))
                    })))
                    .apply_if(is_author, |dom| dom.child(html!("button", {
                        .text("Edit")
                        .event(clone!(section, comment => move |_: events::Click| {
                            section.edit_draft.set(comment.content.clone());
                            section.editing.set(Some(id));
                        }))
                    })))
                    .apply_if(can_delete, |dom| dom.child(html!("button", {
                        .text("Delete")
                        .event(clone!(section => move |_: events::Click| {
                            Self::delete(section.clone(), id);
                        }))
                    })))
                }),
            ])
            .child_signal(section.reply_to.signal().map(clone!(section => move |reply_to| {
                (reply_to == Some(id)).then(|| Self::render_reply_form(section.clone(), id))
            })))
            .child(html!("div", {
                .class("comment-replies")
                // past this depth replies stay aligned with their parent
                .apply_if(depth < MAX_INDENT_DEPTH, |dom| dom.class("indent"))
                .children(node.replies.into_iter().map(|reply| {
                    Self::render_node(section.clone(), reply, depth + 1)
                }))
            }))
        })
    }

    pub fn render(section: Rc<Self>) -> Dom {
        Self::fetch(section.clone());

        html!("div", {
            .class("comment-section")
            .children(&mut [
                html!("h3", {
                    .text_signal(section.total.signal().map(|total| format!("Comments ({})", total)))
                }),
                if contexts::auth().is_logged_in() {
                    Self::render_form(section.clone())
                } else {
                    link!(Route::Login.url(), {
                        .text("Login to comment")
                    })
                },
            ])
            .child_signal(Spinner::render_while(section.is_loading.signal()))
            .child(html!("div", {
                .class("comment-list")
                .children_signal_vec(section.tree.signal_cloned().to_signal_vec().map(clone!(section => move |node| {
                    Self::render_node(section.clone(), node, 0)
                })))
            }))
            .child_signal(section.total.signal().map(|total| (total == 0).then(|| html!("p", {
                .class("empty")
                .text("No comments yet")
            }))))
        })
    }
}
