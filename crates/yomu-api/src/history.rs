use yomu_lib::models::{HistoryInput, ReadingHistory};

use crate::{Client, Result};

impl Client {
    pub async fn histories(&self) -> Result<Vec<ReadingHistory>> {
        self.send(self.get("/history")).await
    }

    pub async fn record_history(
        &self,
        manga_id: i64,
        chapter_id: i64,
        last_page: i64,
    ) -> Result<ReadingHistory> {
        let input = HistoryInput {
            manga_id,
            chapter_id,
            last_page,
        };
        self.send(self.post("/history").json(&input)).await
    }

    pub async fn delete_history(&self, id: i64) -> Result<()> {
        self.send_empty(self.delete(&format!("/history/{}", id)))
            .await
    }

    pub async fn clear_history(&self) -> Result<()> {
        self.send_empty(self.delete("/history")).await
    }
}
