use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Manga;

/// A user's subscription to a manga, drives new chapter notifications
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
    pub id: i64,
    pub manga: Manga,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct FollowStatus {
    pub following: bool,
}
