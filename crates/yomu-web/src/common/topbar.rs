use dominator::{Dom, html, link};
use futures_signals::signal::SignalExt;
use futures_signals::map_ref;

use super::{AdminSection, Route, events};
use crate::contexts;
use crate::utils::history;

pub struct Topbar {}

impl Topbar {
    pub fn render(title: &str, back: bool) -> Dom {
        Self::render_with(title, back, vec![])
    }

    /// `actions` go to the right, before the account links.
    pub fn render_with(title: &str, back: bool, mut actions: Vec<Dom>) -> Dom {
        let auth = contexts::auth();

        html!("div", {
            .class("topbar")
            .children(&mut [
                if back {
                    html!("button", {
                        .text("Back")
                        .event(|_: events::Click| {
                            if let Err(e) = history().back() {
                                error!("error going back: {:?}", e);
                            }
                        })
                    })
                } else {
                    link!(Route::Home.url(), {
                        .class("brand")
                        .text("Yomu")
                    })
                },
                html!("span", {
                    .class("title")
                    .text(title)
                }),
                html!("div", {
                    .class("topbar-actions")
                    .children(&mut actions)
                    .children(&mut [
                        link!(Route::Search { query: String::new() }.url(), {
                            .text("Search")
                        })
                    ])
                    .child_signal(map_ref! {
                        let logged_in = auth.is_logged_in_signal(),
                        let admin = auth.is_admin_signal() =>
                        (*logged_in, *admin)
                    }.map(|(logged_in, admin)| {
                        let dom = if !logged_in {
                            link!(Route::Login.url(), {
                                .text("Login")
                            })
                        } else {
                            html!("div", {
                                .apply_if(admin, |dom| dom.child(link!(Route::Admin(AdminSection::Dashboard).url(), {
                                    .text("Admin")
                                })))
                                .children(&mut [
                                    link!(Route::Upload.url(), {
                                        .text("Upload")
                                    }),
                                    link!(Route::Profile.url(), {
                                        .text("Profile")
                                    }),
                                ])
                            })
                        };
                        Some(dom)
                    }))
                })
            ])
        })
    }
}
