use dominator::{Dom, html, link, with_node};
use web_sys::HtmlImageElement;
use yomu_lib::models::Manga;

use crate::common::{events, route::Route};
use crate::utils::{PLACEHOLDER, resource_url};

/// Card for one manga in a grid or carousel.
#[derive(Debug, Clone)]
pub struct Cover {
    pub id: i64,
    pub title: String,
    pub cover_url: String,
    pub badge: Option<String>,
}

impl Cover {
    pub fn new(id: i64, title: String, cover_url: &str) -> Self {
        Self {
            id,
            title,
            cover_url: resource_url(cover_url),
            badge: None,
        }
    }

    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    pub fn link(&self) -> String {
        Route::Manga(self.id).url()
    }

    pub fn render(&self) -> Dom {
        link!(self.link(), {
            .class("manga-cover")
            .class("animate__animated")
            .class("animate__faster")
            .class("animate__fadeIn")
            .children(&mut [
                html!("img" => HtmlImageElement, {
                    .attribute("src", &self.cover_url)
                    .attribute("loading", "lazy")
                    .with_node!(img => {
                        .event(move |_: events::Error| {
                            if !img.src().ends_with(PLACEHOLDER) {
                                debug!("cover {} failed to load", img.src());
                                img.set_src(PLACEHOLDER);
                            }
                        })
                    })
                }),
                html!("div", {
                    .class("title")
                    .children(&mut [
                        html!("span", {
                            .text(&self.title)
                        })
                    ])
                })
            ])
            .apply_if(self.badge.is_some(), |dom| {
                dom.child(html!("div", {
                    .class("unread-badge")
                    .children(&mut [
                        html!("span", {
                            .text(self.badge.as_deref().unwrap_or_default())
                        })
                    ])
                }))
            })
        })
    }
}

impl From<&Manga> for Cover {
    fn from(manga: &Manga) -> Self {
        Cover::new(manga.id, manga.title.clone(), &manga.cover_url)
    }
}
