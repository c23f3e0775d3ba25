use yomu_lib::models::{
    AuthResponse, ChangePasswordInput, LoginInput, ProfileInput, RegisterInput, User,
};

use crate::{Client, Result};

impl Client {
    pub async fn login(&self, input: &LoginInput) -> Result<AuthResponse> {
        self.send(self.post("/auth/login").json(input)).await
    }

    pub async fn register(&self, input: &RegisterInput) -> Result<AuthResponse> {
        self.send(self.post("/auth/register").json(input)).await
    }

    pub async fn me(&self) -> Result<User> {
        self.send(self.get("/auth/me")).await
    }

    pub async fn change_password(&self, input: &ChangePasswordInput) -> Result<()> {
        self.send_empty(self.put("/auth/password").json(input)).await
    }

    pub async fn update_profile(&self, input: &ProfileInput) -> Result<User> {
        self.send(self.put("/auth/profile").json(input)).await
    }
}
