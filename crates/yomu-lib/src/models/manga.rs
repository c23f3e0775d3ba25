use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::UserSummary;

/// Publication state of a manga.
///
/// The backend sends these as SCREAMING_SNAKE strings; anything this client
/// doesn't know about is read as `Ongoing` so a new backend state never breaks
/// listing pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum MangaStatus {
    #[default]
    Ongoing,
    Completed,
    Hiatus,
    Cancelled,
}

impl MangaStatus {
    pub const ALL: [MangaStatus; 4] = [
        MangaStatus::Ongoing,
        MangaStatus::Completed,
        MangaStatus::Hiatus,
        MangaStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MangaStatus::Ongoing => "ONGOING",
            MangaStatus::Completed => "COMPLETED",
            MangaStatus::Hiatus => "HIATUS",
            MangaStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MangaStatus::Ongoing => "Ongoing",
            MangaStatus::Completed => "Completed",
            MangaStatus::Hiatus => "Hiatus",
            MangaStatus::Cancelled => "Cancelled",
        }
    }
}

impl From<String> for MangaStatus {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl From<MangaStatus> for String {
    fn from(status: MangaStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::str::FromStr for MangaStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ONGOING" => Ok(MangaStatus::Ongoing),
            "COMPLETED" => Ok(MangaStatus::Completed),
            "HIATUS" => Ok(MangaStatus::Hiatus),
            "CANCELLED" => Ok(MangaStatus::Cancelled),
            other => Err(format!("unknown manga status {other}")),
        }
    }
}

impl std::fmt::Display for MangaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A type represent manga details as returned by the backend
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manga {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub status: MangaStatus,
    #[serde(default)]
    pub cover_url: String,
    #[serde(default)]
    pub uploader: Option<UserSummary>,
    #[serde(default)]
    pub chapter_count: i64,
    #[serde(default)]
    pub follower_count: i64,
    #[serde(default)]
    pub view_count: i64,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Manga {
    /// Last time anything about this manga changed, used for "latest" ordering.
    pub fn last_activity(&self) -> NaiveDateTime {
        self.updated_at.unwrap_or(self.created_at)
    }
}

/// Payload for creating or editing a manga; the cover travels as its own
/// multipart part.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MangaInput {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub genres: Vec<String>,
    pub status: MangaStatus,
}

impl From<&Manga> for MangaInput {
    fn from(manga: &Manga) -> Self {
        Self {
            title: manga.title.clone(),
            author: manga.author.clone(),
            description: manga.description.clone(),
            genres: manga.genres.clone(),
            status: manga.status,
        }
    }
}
