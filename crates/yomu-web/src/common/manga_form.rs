use std::cell::RefCell;
use std::rc::Rc;

use dominator::{Dom, EventOptions, clone, html};
use futures_signals::signal::Mutable;
use web_sys::File;
use yomu_lib::models::{Manga, MangaInput, MangaStatus};

use super::{events, field, file_input, input, select, textarea};

/// Fields shared by the create and edit manga forms.
pub struct MangaForm {
    pub title: Mutable<String>,
    pub author: Mutable<String>,
    pub description: Mutable<String>,
    /// comma separated
    pub genres: Mutable<String>,
    pub status: Mutable<String>,
    pub cover: RefCell<Option<File>>,
}

impl MangaForm {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            title: Mutable::new(String::new()),
            author: Mutable::new(String::new()),
            description: Mutable::new(String::new()),
            genres: Mutable::new(String::new()),
            status: Mutable::new(MangaStatus::default().as_str().to_string()),
            cover: RefCell::new(None),
        })
    }

    pub fn fill(&self, manga: &Manga) {
        self.title.set(manga.title.clone());
        self.author.set(manga.author.clone());
        self.description.set(manga.description.clone().unwrap_or_default());
        self.genres.set(manga.genres.join(", "));
        self.status.set(manga.status.as_str().to_string());
        self.cover.replace(None);
    }

    pub fn clear(&self) {
        self.title.set(String::new());
        self.author.set(String::new());
        self.description.set(String::new());
        self.genres.set(String::new());
        self.status.set(MangaStatus::default().as_str().to_string());
        self.cover.replace(None);
    }

    pub fn to_input(&self) -> Result<MangaInput, &'static str> {
        let title = self.title.get_cloned().trim().to_string();
        if title.is_empty() {
            return Err("Title is required");
        }

        let description = self.description.get_cloned().trim().to_string();
        Ok(MangaInput {
            title,
            author: self.author.get_cloned().trim().to_string(),
            description: (!description.is_empty()).then_some(description),
            genres: split_genres(&self.genres.lock_ref()),
            status: self.status.get_cloned().parse().unwrap_or_default(),
        })
    }

    pub fn take_cover(&self) -> Option<File> {
        self.cover.borrow_mut().take()
    }

    pub fn render<F>(form: Rc<Self>, submit_label: &str, on_submit: F) -> Dom
    where
        F: Fn() + 'static,
    {
        let statuses: Vec<(&str, &str)> = MangaStatus::ALL
            .iter()
            .map(|status| (status.as_str(), status.label()))
            .collect();

        html!("form", {
            .class("manga-form")
            .children(&mut [
                field("Title", input(form.title.clone(), "text", "Title")),
                field("Author", input(form.author.clone(), "text", "Author")),
                field("Description", textarea(form.description.clone(), "Description")),
                field("Genres", input(form.genres.clone(), "text", "Action, Comedy")),
                field("Status", select(form.status.clone(), &statuses)),
                field("Cover", file_input("image/*", false, clone!(form => move |files| {
                    form.cover.replace(files.into_iter().next());
                }))),
                html!("button", {
                    .class("primary")
                    .attribute("type", "submit")
                    .text(submit_label)
                }),
            ])
            .event_with_options(&EventOptions::preventable(), move |e: events::Submit| {
                e.prevent_default();
                on_submit();
            })
        })
    }
}

/// Comma separated genres, trimmed, first spelling wins on duplicates.
fn split_genres(value: &str) -> Vec<String> {
    let mut genres: Vec<String> = vec![];
    for genre in value.split(',').map(str::trim).filter(|g| !g.is_empty()) {
        if !genres.iter().any(|g| g.eq_ignore_ascii_case(genre)) {
            genres.push(genre.to_string());
        }
    }
    genres
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_split_genres() {
        assert_eq!(
            split_genres(" Action, comedy,,ACTION , Drama,Comedy "),
            vec!["Action", "comedy", "Drama"]
        );
        assert!(split_genres(" , ").is_empty());
    }

    #[test]
    fn test_to_input() {
        let form = MangaForm::new();
        assert_eq!(form.to_input().unwrap_err(), "Title is required");

        form.title.set("   ".to_string());
        assert!(form.to_input().is_err());

        form.title.set("  Blue Period ".to_string());
        form.author.set(" Tsubasa Yamaguchi".to_string());
        form.genres.set("Drama, drama, Slice of Life".to_string());
        form.status.set("COMPLETED".to_string());

        let input = form.to_input().unwrap();
        assert_eq!(input.title, "Blue Period");
        assert_eq!(input.author, "Tsubasa Yamaguchi");
        assert_eq!(input.description, None);
        assert_eq!(input.genres, vec!["Drama", "Slice of Life"]);
        assert_eq!(input.status, MangaStatus::Completed);
    }
}
