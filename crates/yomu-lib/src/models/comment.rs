use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::UserSummary;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub manga_id: i64,
    #[serde(default)]
    pub chapter_id: Option<i64>,
    #[serde(default)]
    pub parent_id: Option<i64>,
    pub user: UserSummary,
    pub content: String,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Comment {
    pub fn is_edited(&self) -> bool {
        self.updated_at.is_some_and(|at| at > self.created_at)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentInput {
    pub manga_id: i64,
    pub chapter_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CommentEdit {
    pub content: String,
}
