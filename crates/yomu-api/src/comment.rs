use yomu_lib::models::{Comment, CommentEdit, CommentInput};

use crate::{Client, Result};

impl Client {
    pub async fn comments(&self, manga_id: i64, chapter_id: Option<i64>) -> Result<Vec<Comment>> {
        let mut query = vec![("mangaId", manga_id.to_string())];
        if let Some(chapter_id) = chapter_id {
            query.push(("chapterId", chapter_id.to_string()));
        }
        self.send(self.get("/comments").query(&query)).await
    }

    pub async fn post_comment(&self, input: &CommentInput) -> Result<Comment> {
        self.send(self.post("/comments").json(input)).await
    }

    pub async fn edit_comment(&self, id: i64, content: &str) -> Result<Comment> {
        let body = CommentEdit {
            content: content.to_string(),
        };
        self.send(self.put(&format!("/comments/{}", id)).json(&body))
            .await
    }

    pub async fn delete_comment(&self, id: i64) -> Result<()> {
        self.send_empty(self.delete(&format!("/comments/{}", id)))
            .await
    }
}
