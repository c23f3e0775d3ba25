use std::cell::RefCell;
use std::rc::Rc;

use dominator::{Dom, EventOptions, clone, html, link, routing};
use futures_signals::map_ref;
use futures_signals::signal::{Mutable, SignalExt};
use futures_signals::signal_vec::{MutableVec, SignalVecExt};
use wasm_bindgen_futures::spawn_local;
use web_sys::File;
use yomu_lib::models::{Chapter, ChapterInput, Manga};
use yomu_lib::upload::{is_page_image, sort_pages};

use crate::common::{
    MangaForm, Route, Spinner, Topbar, confirm, events, field, file_input, input, snackbar,
};
use crate::contexts;
use crate::query;
use crate::utils::{AsyncLoader, format_date, read_file, read_files};

/// Manage one manga: edit its details, add and remove chapters.
pub struct UploadChapter {
    manga_id: i64,
    manga: Mutable<Option<Manga>>,
    chapters: MutableVec<Chapter>,
    form: Rc<MangaForm>,
    number: Mutable<String>,
    title: Mutable<String>,
    pages: RefCell<Vec<File>>,
    page_count: Mutable<usize>,
    is_saving: Mutable<bool>,
    is_loading: Mutable<bool>,
    loader: AsyncLoader,
}

impl UploadChapter {
    pub fn new(manga_id: i64) -> Rc<Self> {
        Rc::new(Self {
            manga_id,
            manga: Mutable::new(None),
            chapters: MutableVec::new(),
            form: MangaForm::new(),
            number: Mutable::new(String::new()),
            title: Mutable::new(String::new()),
            pages: RefCell::new(vec![]),
            page_count: Mutable::new(0),
            is_saving: Mutable::new(false),
            is_loading: Mutable::new(false),
            loader: AsyncLoader::new(),
        })
    }

    fn fetch(manage: Rc<Self>) {
        manage.is_loading.set_neq(true);
        manage.loader.load(clone!(manage => async move {
            let client = query::client();
            match client.manga(manage.manga_id).await {
                Ok(manga) => {
                    manage.form.fill(&manga);
                    manage.manga.set(Some(manga));
                }
                Err(e) => {
                    query::report("Failed to load manga", &e);
                    manage.is_loading.set_neq(false);
                    return;
                }
            }

            match client.chapters(manage.manga_id).await {
                Ok(mut chapters) => {
                    chapters.sort_by(|a, b| b.number.total_cmp(&a.number));
                    let next = chapters.first().map(|c| c.number.floor() + 1.0).unwrap_or(1.0);
                    manage.number.set(next.to_string());
                    manage.chapters.lock_mut().replace_cloned(chapters);
                }
                Err(e) => {
                    query::report("Failed to load chapters", &e);
                    manage.chapters.lock_mut().clear();
                }
            }
            manage.is_loading.set_neq(false);
        }));
    }

    fn update_manga(manage: Rc<Self>) {
        let input = match manage.form.to_input() {
            Ok(input) => input,
            Err(message) => {
                snackbar::show(message.to_string());
                return;
            }
        };
        let cover = manage.form.take_cover();

        manage.is_saving.set_neq(true);
        spawn_local(clone!(manage => async move {
            let cover = match cover {
                Some(file) => match read_file(file).await {
                    Ok(cover) => Some(cover),
                    Err(e) => {
                        error!("{}", e);
                        snackbar::show(format!("Failed to read cover: {}", e));
                        manage.is_saving.set_neq(false);
                        return;
                    }
                },
                None => None,
            };

            match query::client().update_manga(manage.manga_id, &input, cover).await {
                Ok(manga) => {
                    manage.form.fill(&manga);
                    manage.manga.set(Some(manga));
                    snackbar::show("Manga updated".to_string());
                }
                Err(e) => query::report("Failed to update manga", &e),
            }
            manage.is_saving.set_neq(false);
        }));
    }

    fn delete_manga(manage: Rc<Self>) {
        if !confirm("Delete this manga and all of its chapters?") {
            return;
        }

        spawn_local(clone!(manage => async move {
            match query::client().delete_manga(manage.manga_id).await {
                Ok(_) => {
                    snackbar::show("Manga deleted".to_string());
                    routing::go_to_url(&Route::Upload.url());
                }
                Err(e) => query::report("Failed to delete manga", &e),
            }
        }));
    }

    /// Keep image files only, in natural file name order.
    fn select_pages(&self, files: Vec<File>) {
        let mut pages: Vec<(String, File)> = files
            .into_iter()
            .map(|file| (file.name(), file))
            .filter(|(name, _)| is_page_image(name))
            .collect();
        sort_pages(&mut pages, |page| page.0.as_str());

        self.page_count.set_neq(pages.len());
        self.pages.replace(pages.into_iter().map(|(_, file)| file).collect());
    }

    fn upload(manage: Rc<Self>) {
        if manage.is_saving.get() {
            return;
        }
        let number = match parse_number(&manage.number.get_cloned(), &manage.chapters.lock_ref()) {
            Ok(number) => number,
            Err(message) => {
                snackbar::show(message);
                return;
            }
        };
        let files = manage.pages.borrow().clone();
        if files.is_empty() {
            snackbar::show("Select at least one page".to_string());
            return;
        }

        let input = ChapterInput {
            number,
            title: manage.title.get_cloned().trim().to_string(),
        };
        manage.is_saving.set_neq(true);
        spawn_local(clone!(manage => async move {
            let pages = match read_files(files).await {
                Ok(pages) => pages,
                Err(e) => {
                    error!("{}", e);
                    snackbar::show(format!("Failed to read pages: {}", e));
                    manage.is_saving.set_neq(false);
                    return;
                }
            };

            info!("uploading chapter {} with {} pages", input.number, pages.len());
            match query::client().upload_chapter(manage.manga_id, &input, pages).await {
                Ok(chapter) => {
                    snackbar::show(format!("{} uploaded", chapter.display_title()));
                    manage.title.set(String::new());
                    manage.pages.replace(vec![]);
                    manage.page_count.set_neq(0);
                    Self::fetch(manage.clone());
                }
                Err(e) => query::report("Failed to upload chapter", &e),
            }
            manage.is_saving.set_neq(false);
        }));
    }

    fn delete_chapter(manage: Rc<Self>, chapter_id: i64) {
        if !confirm("Delete this chapter?") {
            return;
        }

        spawn_local(clone!(manage => async move {
            match query::client().delete_chapter(manage.manga_id, chapter_id).await {
                Ok(_) => {
                    manage.chapters.lock_mut().retain(|chapter| chapter.id != chapter_id);
                }
                Err(e) => query::report("Failed to delete chapter", &e),
            }
        }));
    }

    fn render_upload_form(manage: Rc<Self>) -> Dom {
        html!("form", {
            .class("chapter-form")
            .children(&mut [
                html!("h3", {
                    .text("Upload Chapter")
                }),
                field("Number", input(manage.number.clone(), "number", "1")),
                field("Title", input(manage.title.clone(), "text", "Title")),
                field("Pages", file_input("image/*", true, clone!(manage => move |files| {
                    manage.select_pages(files);
                }))),
                html!("span", {
                    .class("subtitle")
                    .text_signal(manage.page_count.signal().map(|count| format!("{} pages selected", count)))
                }),
                html!("button", {
                    .class("primary")
                    .attribute("type", "submit")
                    .attribute_signal("disabled", manage.is_saving.signal().map(|saving| saving.then_some("true")))
                    .text("Upload")
                }),
            ])
            .event_with_options(&EventOptions::preventable(), clone!(manage => move |e: events::Submit| {
                e.prevent_default();
                Self::upload(manage.clone());
            }))
        })
    }

    fn render_chapters(manage: Rc<Self>) -> Dom {
        let manga_id = manage.manga_id;
        html!("div", {
            .class("chapter-list")
            .children_signal_vec(manage.chapters.signal_vec_cloned().map(clone!(manage => move |chapter| {
                let chapter_id = chapter.id;
                html!("div", {
                    .class("chapter-item")
                    .children(&mut [
                        link!(Route::Reader { manga_id, chapter_id, page: 0 }.url(), {
                            .class("title")
                            .text(&chapter.display_title())
                        }),
                        html!("span", {
                            .class("subtitle")
                            .text(&format!("{} pages · {}", chapter.pages.len(), format_date(&chapter.created_at)))
                        }),
                        html!("button", {
                            .text("Delete")
                            .event(clone!(manage => move |_: events::Click| {
                                Self::delete_chapter(manage.clone(), chapter_id);
                            }))
                        }),
                    ])
                })
            })))
        })
    }

    fn render_manage(manage: Rc<Self>) -> Dom {
        html!("div", {
            .children(&mut [
                html!("h3", {
                    .text("Details")
                }),
                MangaForm::render(manage.form.clone(), "Save", clone!(manage => move || {
                    Self::update_manga(manage.clone());
                })),
                Self::render_upload_form(manage.clone()),
                html!("h3", {
                    .text("Chapters")
                }),
                Self::render_chapters(manage.clone()),
                html!("button", {
                    .class("danger")
                    .text("Delete Manga")
                    .event(clone!(manage => move |_: events::Click| {
                        Self::delete_manga(manage.clone());
                    }))
                }),
            ])
        })
    }

    pub fn render(manage: Rc<Self>) -> Dom {
        Self::fetch(manage.clone());

        html!("div", {
            .class("main")
            .children(&mut [
                Topbar::render_with("Manage Manga", true, vec![
                    link!(Route::Manga(manage.manga_id).url(), {
                        .text("View")
                    })
                ]),
                html!("div", {
                    .class("topbar-spacing")
                }),
            ])
            .child_signal(Spinner::render_while(map_ref! {
                let loading = manage.is_loading.signal(),
                let saving = manage.is_saving.signal() =>
                *loading || *saving
            }))
            .child_signal(manage.manga.signal_ref(|manga| {
                manga.as_ref().and_then(|manga| manga.uploader.as_ref()).map(|uploader| uploader.id)
            }).map(clone!(manage => move |owner| {
                let loaded = manage.manga.lock_ref().is_some();
                if !loaded {
                    None
                } else if owner.map(|id| contexts::auth().can_modify(id)).unwrap_or_else(|| contexts::auth().is_admin()) {
                    Some(Self::render_manage(manage.clone()))
                } else {
                    Some(html!("p", {
                        .class("empty")
                        .text("Only the uploader can manage this manga")
                    }))
                }
            })))
        })
    }
}

/// A chapter number must be finite, non-negative and not taken yet.
fn parse_number(value: &str, existing: &[Chapter]) -> Result<f64, String> {
    let number = match value.trim().parse::<f64>() {
        Ok(number) if number.is_finite() && number >= 0.0 => number,
        _ => return Err("Chapter number is not valid".to_string()),
    };
    if existing.iter().any(|chapter| chapter.number == number) {
        return Err(format!("Chapter {} already exists", number));
    }
    Ok(number)
}

#[cfg(test)]
mod test {
    use super::*;

    fn chapter(number: f64) -> Chapter {
        Chapter {
            id: number as i64,
            manga_id: 1,
            number,
            title: String::new(),
            pages: vec![],
            view_count: 0,
            created_at: chrono::NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_parse_number() {
        let existing = vec![chapter(1.0), chapter(2.5)];

        assert_eq!(parse_number(" 3 ", &existing), Ok(3.0));
        assert_eq!(parse_number("0", &existing), Ok(0.0));
        assert_eq!(parse_number("2.6", &existing), Ok(2.6));
        for invalid in ["", "abc", "-1", "inf", "-inf", "NaN", "infinity"] {
            assert_eq!(
                parse_number(invalid, &existing),
                Err("Chapter number is not valid".to_string()),
                "{invalid}"
            );
        }
        assert_eq!(
            parse_number("2.5", &existing),
            Err("Chapter 2.5 already exists".to_string())
        );
    }
}
