use yomu_lib::models::{Comment, Page, Role, RoleInput, User};

use crate::{Client, Result};

impl Client {
    pub async fn users(&self) -> Result<Vec<User>> {
        self.send(self.get("/admin/users")).await
    }

    pub async fn set_user_role(&self, id: i64, role: Role) -> Result<User> {
        self.send(
            self.put(&format!("/admin/users/{}/role", id))
                .json(&RoleInput { role }),
        )
        .await
    }

    pub async fn delete_user(&self, id: i64) -> Result<()> {
        self.send_empty(self.delete(&format!("/admin/users/{}", id)))
            .await
    }

    pub async fn all_comments(&self, page: i64) -> Result<Page<Comment>> {
        self.send(self.get("/admin/comments").query(&[("page", page)]))
            .await
    }
}
