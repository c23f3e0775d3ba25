use yomu_lib::models::Notification;

use crate::{Client, Result};

impl Client {
    pub async fn notifications(&self) -> Result<Vec<Notification>> {
        self.send(self.get("/notifications")).await
    }

    pub async fn mark_notification_read(&self, id: i64) -> Result<()> {
        self.send_empty(self.put(&format!("/notifications/{}/read", id)))
            .await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<()> {
        self.send_empty(self.put("/notifications/read-all")).await
    }

    pub async fn delete_notification(&self, id: i64) -> Result<()> {
        self.send_empty(self.delete(&format!("/notifications/{}", id)))
            .await
    }
}
