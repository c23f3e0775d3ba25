use std::rc::Rc;

use dominator::{Dom, clone, html, link};
use futures_signals::signal::{Mutable, SignalExt};
use yomu_lib::search::SortBy;

use crate::common::{AdminSection, Route, Spinner, Topbar};
use crate::query;
use crate::utils::AsyncLoader;

/// Tabs across every admin page.
pub fn render_nav(current: AdminSection) -> Dom {
    let tabs = [
        (AdminSection::Dashboard, "Dashboard"),
        (AdminSection::Manga, "Manga"),
        (AdminSection::Users, "Users"),
        (AdminSection::Comments, "Comments"),
    ];

    html!("div", {
        .class("admin-nav")
        .children(tabs.iter().map(|(section, label)| {
            link!(Route::Admin(*section).url(), {
                .apply_if(*section == current, |dom| dom.class("active"))
                .text(label)
            })
        }))
    })
}

#[derive(Debug, Clone, Copy, Default)]
struct Stats {
    manga: i64,
    users: i64,
    comments: i64,
}

pub struct AdminDashboard {
    stats: Mutable<Stats>,
    is_loading: Mutable<bool>,
    loader: AsyncLoader,
}

impl AdminDashboard {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            stats: Mutable::new(Stats::default()),
            is_loading: Mutable::new(false),
            loader: AsyncLoader::new(),
        })
    }

    fn fetch(dashboard: Rc<Self>) {
        dashboard.is_loading.set_neq(true);
        dashboard.loader.load(clone!(dashboard => async move {
            let client = query::client();
            let mut stats = Stats::default();

            match client.list_manga(0, 1, SortBy::Latest).await {
                Ok(page) => stats.manga = page.total_elements,
                Err(e) => query::report("Failed to count manga", &e),
            }
            match client.users().await {
                Ok(users) => stats.users = users.len() as i64,
                Err(e) => query::report("Failed to count users", &e),
            }
            match client.all_comments(0).await {
                Ok(page) => stats.comments = page.total_elements,
                Err(e) => query::report("Failed to count comments", &e),
            }

            dashboard.stats.set(stats);
            dashboard.is_loading.set_neq(false);
        }));
    }

    fn render_stat(label: &str, section: AdminSection, value: impl futures_signals::signal::Signal<Item = i64> + 'static) -> Dom {
        link!(Route::Admin(section).url(), {
            .class("stat-card")
            .children(&mut [
                html!("span", {
                    .class("stat-value")
                    .text_signal(value.map(|value| value.to_string()))
                }),
                html!("span", {
                    .class("stat-label")
                    .text(label)
                }),
            ])
        })
    }

    pub fn render(dashboard: Rc<Self>) -> Dom {
        Self::fetch(dashboard.clone());

        html!("div", {
            .class("main")
            .children(&mut [
                Topbar::render("Admin", false),
                html!("div", {
                    .class("topbar-spacing")
                }),
                render_nav(AdminSection::Dashboard),
                html!("div", {
                    .class("stats")
                    .children(&mut [
                        Self::render_stat("Manga", AdminSection::Manga, dashboard.stats.signal_ref(|stats| stats.manga)),
                        Self::render_stat("Users", AdminSection::Users, dashboard.stats.signal_ref(|stats| stats.users)),
                        Self::render_stat("Comments", AdminSection::Comments, dashboard.stats.signal_ref(|stats| stats.comments)),
                    ])
                }),
            ])
            .child_signal(Spinner::render_while(dashboard.is_loading.signal()))
        })
    }
}
