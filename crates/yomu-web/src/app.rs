use std::rc::Rc;

use dominator::{Dom, clone, html, routing};
use futures_signals::map_ref;
use futures_signals::signal::SignalExt;

use crate::admin::AdminDashboard;
use crate::admin_comments::AdminComments;
use crate::admin_manga::AdminManga;
use crate::admin_users::AdminUsers;
use crate::browse::Browse;
use crate::common::{AdminSection, Bottombar, Route, Spinner, Topbar, snackbar};
use crate::contexts::{self, AuthContext, NotificationContext};
use crate::histories::Histories;
use crate::home::Home;
use crate::library::Library;
use crate::login::Login;
use crate::manga::MangaDetail;
use crate::notifications::Notifications;
use crate::profile::Profile;
use crate::reader::Reader;
use crate::register::Register;
use crate::search::Search;
use crate::upload::Upload;
use crate::upload_chapter::UploadChapter;

pub struct App {}

impl App {
    pub fn new() -> Rc<Self> {
        Rc::new(App {})
    }

    fn render_route(route: Route) -> Dom {
        match route {
            Route::Home => Home::render(Home::new()),
            Route::Browse { page } => Browse::render(Browse::new(page)),
            Route::Search { query } => Search::render(Search::new(query)),
            Route::Manga(manga_id) => MangaDetail::render(MangaDetail::new(manga_id)),
            Route::Reader { manga_id, chapter_id, page } => {
                Reader::render(Reader::new(manga_id, chapter_id, page))
            }
            Route::Library => Library::render(Library::new()),
            Route::Histories => Histories::render(Histories::new()),
            Route::Notifications => Notifications::render(Notifications::new()),
            Route::Upload => Upload::render(Upload::new()),
            Route::UploadChapter(manga_id) => UploadChapter::render(UploadChapter::new(manga_id)),
            Route::Login => Login::render(Login::new()),
            Route::Register => Register::render(Register::new()),
            Route::Profile => Profile::render(Profile::new()),
            Route::Admin(AdminSection::Dashboard) => AdminDashboard::render(AdminDashboard::new()),
            Route::Admin(AdminSection::Manga) => AdminManga::render(AdminManga::new()),
            Route::Admin(AdminSection::Users) => AdminUsers::render(AdminUsers::new()),
            Route::Admin(AdminSection::Comments) => AdminComments::render(AdminComments::new()),
            Route::NotFound => Self::render_not_found(),
        }
    }

    fn render_not_found() -> Dom {
        html!("div", {
            .class("main")
            .children(&mut [
                Topbar::render("Not Found", true),
                html!("div", {
                    .class("topbar-spacing")
                }),
                html!("p", {
                    .class("empty")
                    .text("Page not found")
                }),
            ])
        })
    }

    pub fn render(_app: Rc<Self>) -> Dom {
        let auth = contexts::auth();
        let notifications = contexts::notifications();
        AuthContext::load(auth.clone());

        html!("div", {
            .future(auth.user.signal_ref(|user| user.as_ref().map(|user| user.id)).dedupe().for_each(clone!(notifications => move |user_id| {
                match user_id {
                    Some(user_id) => NotificationContext::connect(notifications.clone(), user_id),
                    None => notifications.disconnect(),
                }
                async {}
            })))
            .child_signal(map_ref! {
                let route = Route::signal(),
                let loaded = auth.loaded_signal().dedupe(),
                let is_admin = auth.is_admin_signal().dedupe() =>
                (route.clone(), *loaded, *is_admin)
            }.map(clone!(auth => move |(route, loaded, is_admin)| {
                if route.requires_auth() && !auth.is_logged_in() {
                    info!("login required for {}", route.url());
                    routing::go_to_url(&Route::Login.url());
                    return None;
                }

                if !loaded {
                    return Some(Spinner::render_spinner(true));
                }

                if route.requires_admin() && !is_admin {
                    return Some(Self::render_not_found());
                }

                Some(Self::render_route(route))
            })))
            .child_signal(Route::signal().map(|route| {
                route.has_bottombar().then(|| html!("div", {
                    .children(&mut [
                        html!("div", {
                            .class("bottombar-spacing")
                        }),
                        Bottombar::render(),
                    ])
                }))
            }))
            .children(&mut [
                snackbar::render(),
            ])
        })
    }
}
