use dominator::routing;
use futures_signals::signal::{Signal, SignalExt};
use wasm_bindgen::prelude::*;
use web_sys::Url;

use crate::utils::encode_uri_component;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminSection {
    Dashboard,
    Manga,
    Users,
    Comments,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Home,
    Browse { page: i64 },
    Search { query: String },
    Manga(i64),
    Reader { manga_id: i64, chapter_id: i64, page: usize },
    Library,
    Histories,
    Notifications,
    Upload,
    UploadChapter(i64),
    Login,
    Register,
    Profile,
    Admin(AdminSection),
    NotFound,
}

impl Route {
    pub fn signal() -> impl Signal<Item = Self> {
        routing::url()
            .signal_ref(|url| Url::new(url).unwrap_throw())
            .map(|url| Self::from_url(&url))
    }

    pub fn from_url(url: &Url) -> Self {
        let params = url.search_params();
        Self::from_path(&url.pathname(), |key| params.get(key), &url.hash())
    }

    /// `param` looks up a query parameter, `hash` keeps its leading `#`.
    pub fn from_path<F>(pathname: &str, param: F, hash: &str) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut paths = pathname.split('/').collect::<Vec<_>>();
        paths.retain(|path| !path.is_empty());

        match paths.as_slice() {
            [] => Route::Home,
            ["browse"] => Route::Browse {
                page: param("page")
                    .and_then(|page| page.parse::<i64>().ok())
                    .map(|page| (page - 1).max(0))
                    .unwrap_or(0),
            },
            ["search"] => Route::Search {
                query: param("q").unwrap_or_default(),
            },
            ["manga", id] => match id.parse() {
                Ok(id) => Route::Manga(id),
                Err(_) => Route::NotFound,
            },
            ["manga", manga_id, "chapter", chapter_id] => {
                match (manga_id.parse(), chapter_id.parse()) {
                    (Ok(manga_id), Ok(chapter_id)) => {
                        let page = hash
                            .strip_prefix('#')
                            .and_then(|h| h.parse::<usize>().ok())
                            .unwrap_or(1);
                        Route::Reader {
                            manga_id,
                            chapter_id,
                            page: page.saturating_sub(1),
                        }
                    }
                    _ => Route::NotFound,
                }
            }
            ["library"] => Route::Library,
            ["history"] => Route::Histories,
            ["notifications"] => Route::Notifications,
            ["upload"] => Route::Upload,
            ["upload", id] => match id.parse() {
                Ok(id) => Route::UploadChapter(id),
                Err(_) => Route::NotFound,
            },
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["profile"] => Route::Profile,
            ["admin"] => Route::Admin(AdminSection::Dashboard),
            ["admin", "manga"] => Route::Admin(AdminSection::Manga),
            ["admin", "users"] => Route::Admin(AdminSection::Users),
            ["admin", "comments"] => Route::Admin(AdminSection::Comments),
            _ => Route::NotFound,
        }
    }

    pub fn url(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Browse { page } => {
                if *page > 0 {
                    format!("/browse?page={}", page + 1)
                } else {
                    "/browse".to_string()
                }
            }
            Route::Search { query } => {
                if query.is_empty() {
                    "/search".to_string()
                } else {
                    format!("/search?q={}", encode_uri_component(query))
                }
            }
            Route::Manga(id) => format!("/manga/{}", id),
            Route::Reader {
                manga_id,
                chapter_id,
                page,
            } => format!("/manga/{}/chapter/{}#{}", manga_id, chapter_id, page + 1),
            Route::Library => "/library".to_string(),
            Route::Histories => "/history".to_string(),
            Route::Notifications => "/notifications".to_string(),
            Route::Upload => "/upload".to_string(),
            Route::UploadChapter(id) => format!("/upload/{}", id),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::Admin(AdminSection::Dashboard) => "/admin".to_string(),
            Route::Admin(AdminSection::Manga) => "/admin/manga".to_string(),
            Route::Admin(AdminSection::Users) => "/admin/users".to_string(),
            Route::Admin(AdminSection::Comments) => "/admin/comments".to_string(),
            Route::NotFound => "/notfound".to_string(),
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Route::Library
                | Route::Histories
                | Route::Notifications
                | Route::Upload
                | Route::UploadChapter(_)
                | Route::Profile
                | Route::Admin(_)
        )
    }

    pub fn requires_admin(&self) -> bool {
        matches!(self, Route::Admin(_))
    }

    /// Routes that show the end-user bottom navigation.
    pub fn has_bottombar(&self) -> bool {
        matches!(
            self,
            Route::Home
                | Route::Browse { .. }
                | Route::Search { .. }
                | Route::Library
                | Route::Histories
                | Route::Notifications
                | Route::Profile
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(path: &str) -> Route {
        Route::from_path(path, |_| None, "")
    }

    #[test]
    fn test_from_path() {
        let table = vec![
            ("/", Route::Home),
            ("/browse", Route::Browse { page: 0 }),
            ("/search", Route::Search { query: String::new() }),
            ("/manga/12", Route::Manga(12)),
            ("/library", Route::Library),
            ("/history", Route::Histories),
            ("/notifications", Route::Notifications),
            ("/upload", Route::Upload),
            ("/upload/7", Route::UploadChapter(7)),
            ("/login", Route::Login),
            ("/register", Route::Register),
            ("/profile", Route::Profile),
            ("/admin", Route::Admin(AdminSection::Dashboard)),
            ("/admin/manga", Route::Admin(AdminSection::Manga)),
            ("/admin/users", Route::Admin(AdminSection::Users)),
            ("/admin/comments", Route::Admin(AdminSection::Comments)),
            ("/manga/abc", Route::NotFound),
            ("/upload/x", Route::NotFound),
            ("/manga/1/chapter/x", Route::NotFound),
            ("/nowhere", Route::NotFound),
        ];

        for (path, route) in table {
            assert_eq!(parse(path), route, "{}", path);
        }
    }

    #[test]
    fn test_trailing_slashes_are_ignored() {
        assert_eq!(parse("/manga/3/"), Route::Manga(3));
        assert_eq!(parse("//library"), Route::Library);
    }

    #[test]
    fn test_query_params() {
        let route = Route::from_path(
            "/search",
            |key| (key == "q").then(|| "one piece".to_string()),
            "",
        );
        assert_eq!(route, Route::Search { query: "one piece".to_string() });

        let browse = |page: &str| {
            let page = page.to_string();
            Route::from_path("/browse", move |key| (key == "page").then(|| page.clone()), "")
        };
        assert_eq!(browse("3"), Route::Browse { page: 2 });
        assert_eq!(browse("0"), Route::Browse { page: 0 });
        assert_eq!(browse("nope"), Route::Browse { page: 0 });
    }

    #[test]
    fn test_reader_hash_is_one_based() {
        let reader = |hash: &str| Route::from_path("/manga/1/chapter/2", |_| None, hash);
        let at = |page| Route::Reader { manga_id: 1, chapter_id: 2, page };

        assert_eq!(reader(""), at(0));
        assert_eq!(reader("#1"), at(0));
        assert_eq!(reader("#5"), at(4));
        assert_eq!(reader("#0"), at(0));
        assert_eq!(reader("#x"), at(0));
        assert_eq!(at(4).url(), "/manga/1/chapter/2#5");
    }

    #[test]
    fn test_url_round_trip() {
        let routes = vec![
            Route::Home,
            Route::Browse { page: 0 },
            Route::Search { query: String::new() },
            Route::Manga(12),
            Route::Reader { manga_id: 1, chapter_id: 2, page: 0 },
            Route::Library,
            Route::Histories,
            Route::Notifications,
            Route::Upload,
            Route::UploadChapter(7),
            Route::Login,
            Route::Register,
            Route::Profile,
            Route::Admin(AdminSection::Dashboard),
            Route::Admin(AdminSection::Manga),
            Route::Admin(AdminSection::Users),
            Route::Admin(AdminSection::Comments),
            Route::NotFound,
        ];

        for route in routes {
            let url = route.url();
            let (path, hash) = match url.split_once('#') {
                Some((path, hash)) => (path.to_string(), format!("#{}", hash)),
                None => (url.clone(), String::new()),
            };
            assert_eq!(Route::from_path(&path, |_| None, &hash), route, "{}", url);
        }

        assert_eq!(Route::Browse { page: 2 }.url(), "/browse?page=3");
    }

    #[test]
    fn test_guards() {
        let public = [
            Route::Home,
            Route::Browse { page: 0 },
            Route::Search { query: String::new() },
            Route::Manga(1),
            Route::Reader { manga_id: 1, chapter_id: 1, page: 0 },
            Route::Login,
            Route::Register,
            Route::NotFound,
        ];
        for route in public.iter() {
            assert!(!route.requires_auth(), "{:?}", route);
            assert!(!route.requires_admin(), "{:?}", route);
        }

        let private = [
            Route::Library,
            Route::Histories,
            Route::Notifications,
            Route::Upload,
            Route::UploadChapter(1),
            Route::Profile,
        ];
        for route in private.iter() {
            assert!(route.requires_auth(), "{:?}", route);
            assert!(!route.requires_admin(), "{:?}", route);
        }

        for section in [
            AdminSection::Dashboard,
            AdminSection::Manga,
            AdminSection::Users,
            AdminSection::Comments,
        ] {
            let route = Route::Admin(section);
            assert!(route.requires_auth());
            assert!(route.requires_admin());
            assert!(!route.has_bottombar());
        }
    }
}
