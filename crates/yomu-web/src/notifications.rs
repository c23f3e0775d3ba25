use std::rc::Rc;

use dominator::{Dom, clone, html, routing};
use futures_signals::signal::SignalExt;
use futures_signals::signal_vec::SignalVecExt;
use yomu_lib::models::{Notification, NotificationKind};

use crate::common::{Route, Topbar, events};
use crate::contexts::{self, NotificationContext};
use crate::utils::format_date;

pub struct Notifications {}

impl Notifications {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {})
    }

    fn target(notification: &Notification) -> Option<Route> {
        match (notification.manga_id, notification.chapter_id) {
            (Some(manga_id), Some(chapter_id))
                if notification.kind == NotificationKind::NewChapter =>
            {
                Some(Route::Reader { manga_id, chapter_id, page: 0 })
            }
            (Some(manga_id), _) => Some(Route::Manga(manga_id)),
            _ => None,
        }
    }

    fn open(ctx: Rc<NotificationContext>, notification: &Notification) {
        if !notification.is_read {
            NotificationContext::mark_read(ctx, notification.id);
        }
        if let Some(route) = Self::target(notification) {
            routing::go_to_url(&route.url());
        }
    }

    fn render_item(ctx: Rc<NotificationContext>, notification: Notification) -> Dom {
        let id = notification.id;
        html!("div", {
            .class("notification-item")
            .apply_if(!notification.is_read, |dom| dom.class("unread"))
            .children(&mut [
                html!("div", {
                    .class("notification-content")
                    .event(clone!(ctx, notification => move |_: events::Click| {
                        Self::open(ctx.clone(), &notification);
                    }))
                    .children(&mut [
                        html!("span", {
                            .class("title")
                            .text(&notification.title)
                        }),
                        html!("p", {
                            .text(&notification.message)
                        }),
                        html!("span", {
                            .class("subtitle")
                            .text(&format_date(&notification.created_at))
                        }),
                    ])
                }),
                html!("button", {
                    .text("Delete")
                    .event(clone!(ctx => move |_: events::Click| {
                        NotificationContext::remove(ctx.clone(), id);
                    }))
                }),
            ])
        })
    }

    pub fn render(_notifications: Rc<Self>) -> Dom {
        let ctx = contexts::notifications();

        html!("div", {
            .class("main")
            .children(&mut [
                Topbar::render_with("Notifications", false, vec![
                    html!("button", {
                        .text("Mark all read")
                        .attribute_signal("disabled", ctx.unread_count_signal().map(|count| (count == 0).then_some("true")))
                        .event(clone!(ctx => move |_: events::Click| {
                            NotificationContext::mark_all_read(ctx.clone());
                        }))
                    })
                ]),
                html!("div", {
                    .class("topbar-spacing")
                }),
                html!("span", {
                    .class("connection-status")
                    .class_signal("live", ctx.connected_signal())
                    .text_signal(ctx.connected_signal().map(|connected| if connected { "Live" } else { "Offline" }))
                }),
                html!("div", {
                    .class("notification-list")
                    .children_signal_vec(ctx.inbox.signal_ref(|inbox| inbox.items().to_vec())
                        .to_signal_vec()
                        .map(clone!(ctx => move |notification| Self::render_item(ctx.clone(), notification))))
                }),
            ])
            .child_signal(ctx.inbox.signal_ref(|inbox| inbox.is_empty()).map(|empty| empty.then(|| html!("p", {
                .class("empty")
                .text("No notifications")
            }))))
        })
    }
}
