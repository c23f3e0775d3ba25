use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A per-user, per-chapter record of having viewed a chapter
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingHistory {
    pub id: i64,
    pub manga_id: i64,
    #[serde(default)]
    pub manga_title: String,
    #[serde(default)]
    pub cover_url: String,
    pub chapter_id: i64,
    #[serde(default)]
    pub chapter_number: f64,
    #[serde(default)]
    pub chapter_title: String,
    #[serde(default)]
    pub last_page: i64,
    pub read_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryInput {
    pub manga_id: i64,
    pub chapter_id: i64,
    pub last_page: i64,
}
