use dominator::{Dom, html, link, svg};
use futures_signals::signal::SignalExt;

use super::Route;
use crate::contexts;

pub struct Bottombar {}

impl Bottombar {
    fn render_item(route: Route, label: &str, icon: &str) -> Dom {
        let target = route.clone();
        link!(route.url(), {
            .class_signal("active", Route::signal().map(move |x| std::mem::discriminant(&x) == std::mem::discriminant(&target)))
            .children(&mut [
                svg!("svg", {
                    .attribute("xmlns", "http://www.w3.org/2000/svg")
                    .attribute("viewBox", "0 0 24 24")
                    .attribute("stroke", "currentColor")
                    .attribute("fill", "none")
                    .children(&mut [
                        svg!("path", {
                            .attribute("stroke-linecap", "round")
                            .attribute("stroke-linejoin", "round")
                            .attribute("stroke-width", "1")
                            .class("heroicon-ui")
                            .attribute("d", icon)
                        })
                    ])
                }),
                html!("span", {
                    .text(label)
                })
            ])
        })
    }

    pub fn render() -> Dom {
        let notifications = contexts::notifications();

        html!("div", {
            .class("bottombar")
            .children(&mut [
                Self::render_item(Route::Home, "Home", "M3 12l2-2m0 0l7-7 7 7M5 10v10a1 1 0 001 1h3m10-11l2 2m-2-2v10a1 1 0 01-1 1h-3m-6 0a1 1 0 001-1v-4a1 1 0 011-1h2a1 1 0 011 1v4a1 1 0 001 1m-6 0h6"),
                Self::render_item(Route::Browse { page: 0 }, "Browse", "M19 11H5m14 0a2 2 0 012 2v6a2 2 0 01-2 2H5a2 2 0 01-2-2v-6a2 2 0 012-2m14 0V9a2 2 0 00-2-2M5 11V9a2 2 0 012-2m0 0V5a2 2 0 012-2h6a2 2 0 012 2v2M7 7h10"),
                Self::render_item(Route::Library, "Library", "M8 14v3m4-3v3m4-3v3M3 21h18M3 10h18M3 7l9-4 9 4M4 10h16v11H4V10z"),
                Self::render_item(Route::Histories, "History", "M12 8v4l3 3m6-3a9 9 0 11-18 0 9 9 0 0118 0z"),
                link!(Route::Notifications.url(), {
                    .class("with-badge")
                    .class_signal("active", Route::signal().map(|x| matches!(x, Route::Notifications)))
                    .children(&mut [
                        svg!("svg", {
                            .attribute("xmlns", "http://www.w3.org/2000/svg")
                            .attribute("viewBox", "0 0 24 24")
                            .attribute("stroke", "currentColor")
                            .attribute("fill", "none")
                            .children(&mut [
                                svg!("path", {
                                    .attribute("stroke-linecap", "round")
                                    .attribute("stroke-linejoin", "round")
                                    .attribute("stroke-width", "1")
                                    .class("heroicon-ui")
                                    .attribute("d", "M15 17h5l-1.405-1.405A2.032 2.032 0 0118 14.158V11a6.002 6.002 0 00-4-5.659V5a2 2 0 10-4 0v.341C7.67 6.165 6 8.388 6 11v3.159c0 .538-.214 1.055-.595 1.436L4 17h5m6 0v1a3 3 0 11-6 0v-1m6 0H9")
                                })
                            ])
                        }),
                        html!("span", {
                            .text("Updates")
                        }),
                        html!("span", {
                            .class("badge")
                            .visible_signal(notifications.unread_count_signal().map(|count| count > 0))
                            .text_signal(notifications.unread_count_signal().map(|count| {
                                if count > 99 {
                                    "99+".to_string()
                                } else {
                                    count.to_string()
                                }
                            }))
                        })
                    ])
                }),
            ])
        })
    }
}
