use reqwest::multipart::Form;
use yomu_lib::models::{Manga, MangaInput, Page};
use yomu_lib::search::{SearchFilter, SortBy};

use crate::{Client, Result, Upload};

fn manga_form(input: &MangaInput, cover: Option<Upload>) -> Result<Form> {
    let mut form = Form::new()
        .text("title", input.title.clone())
        .text("author", input.author.clone())
        .text("status", input.status.as_str().to_string());
    if let Some(description) = input.description.as_ref() {
        form = form.text("description", description.clone());
    }
    for genre in input.genres.iter() {
        form = form.text("genres", genre.clone());
    }
    if let Some(cover) = cover {
        form = form.part("cover", cover.into_part()?);
    }
    Ok(form)
}

impl Client {
    pub async fn list_manga(&self, page: i64, size: i64, sort: SortBy) -> Result<Page<Manga>> {
        let req = self.get("/manga").query(&[
            ("page", page.to_string()),
            ("size", size.to_string()),
            ("sort", sort.as_str().to_string()),
        ]);
        self.send(req).await
    }

    pub async fn latest_manga(&self, limit: i64) -> Result<Vec<Manga>> {
        self.send(self.get("/manga/latest").query(&[("limit", limit)]))
            .await
    }

    pub async fn popular_manga(&self, limit: i64) -> Result<Vec<Manga>> {
        self.send(self.get("/manga/popular").query(&[("limit", limit)]))
            .await
    }

    pub async fn search_manga(&self, filter: &SearchFilter, page: i64) -> Result<Page<Manga>> {
        let mut query = filter.to_query();
        query.push(("page".to_string(), page.to_string()));
        self.send(self.get("/manga/search").query(&query)).await
    }

    pub async fn genres(&self) -> Result<Vec<String>> {
        self.send(self.get("/manga/genres")).await
    }

    pub async fn manga(&self, id: i64) -> Result<Manga> {
        self.send(self.get(&format!("/manga/{}", id))).await
    }

    pub async fn my_uploads(&self) -> Result<Vec<Manga>> {
        self.send(self.get("/manga/mine")).await
    }

    pub async fn create_manga(&self, input: &MangaInput, cover: Option<Upload>) -> Result<Manga> {
        let form = manga_form(input, cover)?;
        self.send(self.post("/manga").multipart(form)).await
    }

    pub async fn update_manga(
        &self,
        id: i64,
        input: &MangaInput,
        cover: Option<Upload>,
    ) -> Result<Manga> {
        let form = manga_form(input, cover)?;
        self.send(self.put(&format!("/manga/{}", id)).multipart(form))
            .await
    }

    pub async fn delete_manga(&self, id: i64) -> Result<()> {
        self.send_empty(self.delete(&format!("/manga/{}", id))).await
    }
}
