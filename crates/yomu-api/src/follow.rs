use yomu_lib::models::{Follow, FollowStatus};

use crate::{Client, Result};

impl Client {
    pub async fn follows(&self) -> Result<Vec<Follow>> {
        self.send(self.get("/follow")).await
    }

    pub async fn is_following(&self, manga_id: i64) -> Result<bool> {
        let status: FollowStatus = self.send(self.get(&format!("/follow/{}", manga_id))).await?;
        Ok(status.following)
    }

    pub async fn follow(&self, manga_id: i64) -> Result<()> {
        self.send_empty(self.post(&format!("/follow/{}", manga_id)))
            .await
    }

    pub async fn unfollow(&self, manga_id: i64) -> Result<()> {
        self.send_empty(self.delete(&format!("/follow/{}", manga_id)))
            .await
    }
}
