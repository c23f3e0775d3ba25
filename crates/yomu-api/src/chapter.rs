use reqwest::multipart::Form;
use yomu_lib::models::{Chapter, ChapterInput};

use crate::{Client, Result, Upload};

impl Client {
    pub async fn chapters(&self, manga_id: i64) -> Result<Vec<Chapter>> {
        self.send(self.get(&format!("/chapter/{}", manga_id))).await
    }

    pub async fn chapter(&self, manga_id: i64, chapter_id: i64) -> Result<Chapter> {
        self.send(self.get(&format!("/chapter/{}/{}", manga_id, chapter_id)))
            .await
    }

    /// Pages are sent in the order given, the backend numbers them as received.
    pub async fn upload_chapter(
        &self,
        manga_id: i64,
        input: &ChapterInput,
        pages: Vec<Upload>,
    ) -> Result<Chapter> {
        let mut form = Form::new()
            .text("number", input.number.to_string())
            .text("title", input.title.clone());
        for page in pages {
            form = form.part("pages", page.into_part()?);
        }

        self.send(self.post(&format!("/chapter/{}", manga_id)).multipart(form))
            .await
    }

    pub async fn delete_chapter(&self, manga_id: i64, chapter_id: i64) -> Result<()> {
        self.send_empty(self.delete(&format!("/chapter/{}/{}", manga_id, chapter_id)))
            .await
    }
}
