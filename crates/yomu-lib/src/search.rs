use serde::{Deserialize, Serialize};

use crate::models::{Manga, MangaStatus};

/// Queries shorter than this are not sent to the backend.
pub const MIN_QUERY_LEN: usize = 2;

/// Delay between the last keystroke and the backend search call.
pub const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Trim and collapse whitespace, `None` if the result is too short to search.
pub fn normalize_query(query: &str) -> Option<String> {
    let normalized = query.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.chars().count() < MIN_QUERY_LEN {
        None
    } else {
        Some(normalized)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    Latest,
    Popular,
    Title,
    MostFollowed,
}

impl SortBy {
    pub const ALL: [SortBy; 4] = [
        SortBy::Latest,
        SortBy::Popular,
        SortBy::Title,
        SortBy::MostFollowed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Latest => "latest",
            SortBy::Popular => "popular",
            SortBy::Title => "title",
            SortBy::MostFollowed => "followers",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortBy::Latest => "Latest",
            SortBy::Popular => "Popular",
            SortBy::Title => "Title",
            SortBy::MostFollowed => "Most Followed",
        }
    }
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortBy::ALL
            .into_iter()
            .find(|sort| sort.as_str() == s)
            .ok_or_else(|| format!("unknown sort {s}"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchFilter {
    pub keyword: Option<String>,
    pub genres: Vec<String>,
    pub status: Option<MangaStatus>,
    pub sort: SortBy,
}

impl SearchFilter {
    pub fn keyword(keyword: &str) -> Self {
        Self {
            keyword: normalize_query(keyword),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keyword.is_none() && self.genres.is_empty() && self.status.is_none()
    }

    pub fn toggle_genre(&mut self, genre: &str) {
        if let Some(pos) = self
            .genres
            .iter()
            .position(|g| g.eq_ignore_ascii_case(genre))
        {
            self.genres.remove(pos);
        } else {
            self.genres.push(genre.to_string());
        }
    }

    pub fn matches(&self, manga: &Manga) -> bool {
        if let Some(keyword) = self.keyword.as_ref() {
            let keyword = keyword.to_lowercase();
            if !manga.title.to_lowercase().contains(&keyword)
                && !manga.author.to_lowercase().contains(&keyword)
            {
                return false;
            }
        }

        if !self
            .genres
            .iter()
            .all(|wanted| manga.genres.iter().any(|g| g.eq_ignore_ascii_case(wanted)))
        {
            return false;
        }

        match self.status {
            Some(status) => manga.status == status,
            None => true,
        }
    }

    /// Filter and sort a list already in memory.
    pub fn apply(&self, mangas: Vec<Manga>) -> Vec<Manga> {
        let mut mangas: Vec<Manga> = mangas.into_iter().filter(|m| self.matches(m)).collect();
        match self.sort {
            SortBy::Latest => mangas.sort_by(|a, b| b.last_activity().cmp(&a.last_activity())),
            SortBy::Popular => mangas.sort_by(|a, b| b.view_count.cmp(&a.view_count)),
            SortBy::Title => mangas.sort_by_key(|m| m.title.to_lowercase()),
            SortBy::MostFollowed => {
                mangas.sort_by(|a, b| b.follower_count.cmp(&a.follower_count))
            }
        }
        mangas
    }

    /// Query parameters for the backend search endpoint.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![];
        if let Some(keyword) = self.keyword.as_ref() {
            query.push(("keyword".to_string(), keyword.clone()));
        }
        if !self.genres.is_empty() {
            query.push(("genres".to_string(), self.genres.join(",")));
        }
        if let Some(status) = self.status {
            query.push(("status".to_string(), status.as_str().to_string()));
        }
        query.push(("sort".to_string(), self.sort.as_str().to_string()));
        query
    }
}

/// Sorted, deduplicated genres across a result set, for the filter chips.
pub fn collect_genres(mangas: &[Manga]) -> Vec<String> {
    let mut genres: Vec<String> = vec![];
    for genre in mangas.iter().flat_map(|m| m.genres.iter()) {
        if !genres.iter().any(|g| g.eq_ignore_ascii_case(genre)) {
            genres.push(genre.clone());
        }
    }
    genres.sort_by_key(|g| g.to_lowercase());
    genres
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    fn manga(id: i64, title: &str, author: &str, genres: &[&str], views: i64) -> Manga {
        Manga {
            id,
            title: title.to_string(),
            author: author.to_string(),
            description: None,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            status: MangaStatus::Ongoing,
            cover_url: String::new(),
            uploader: None,
            chapter_count: 0,
            follower_count: id * 10,
            view_count: views,
            created_at: NaiveDate::from_ymd_opt(2024, 1, id as u32)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            updated_at: None,
        }
    }

    fn library() -> Vec<Manga> {
        vec![
            manga(1, "One Piece", "Eiichiro Oda", &["Action", "Adventure"], 500),
            manga(2, "Yotsuba&!", "Kiyohiko Azuma", &["Comedy", "Slice of Life"], 900),
            manga(3, "Berserk", "Kentaro Miura", &["Action", "Dark Fantasy"], 100),
        ]
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  one   piece "), Some("one piece".to_string()));
        assert_eq!(normalize_query(" a "), None);
        assert_eq!(normalize_query(""), None);
    }

    #[test]
    fn test_keyword_matches_title_or_author() {
        let filter = SearchFilter::keyword("MIURA");
        let result = filter.apply(library());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Berserk");

        let filter = SearchFilter::keyword("piece");
        assert_eq!(filter.apply(library()).len(), 1);
    }

    #[test]
    fn test_genres_must_all_match() {
        let mut filter = SearchFilter::default();
        filter.toggle_genre("action");
        assert_eq!(filter.apply(library()).len(), 2);

        filter.toggle_genre("Adventure");
        let result = filter.apply(library());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 1);

        filter.toggle_genre("ACTION");
        assert_eq!(filter.genres, vec!["Adventure".to_string()]);
    }

    #[test]
    fn test_status_filter() {
        let filter = SearchFilter {
            status: Some(MangaStatus::Completed),
            ..Default::default()
        };
        assert!(filter.apply(library()).is_empty());
    }

    #[test]
    fn test_sort() {
        let ids = |sort: SortBy| {
            SearchFilter {
                sort,
                ..Default::default()
            }
            .apply(library())
            .iter()
            .map(|m| m.id)
            .collect::<Vec<_>>()
        };

        assert_eq!(ids(SortBy::Latest), vec![3, 2, 1]);
        assert_eq!(ids(SortBy::Popular), vec![2, 1, 3]);
        assert_eq!(ids(SortBy::Title), vec![3, 1, 2]);
        assert_eq!(ids(SortBy::MostFollowed), vec![3, 2, 1]);
    }

    #[test]
    fn test_to_query() {
        let filter = SearchFilter {
            keyword: Some("oda".to_string()),
            genres: vec!["Action".to_string(), "Comedy".to_string()],
            status: Some(MangaStatus::Hiatus),
            sort: SortBy::Popular,
        };
        assert_eq!(
            filter.to_query(),
            vec![
                ("keyword".to_string(), "oda".to_string()),
                ("genres".to_string(), "Action,Comedy".to_string()),
                ("status".to_string(), "HIATUS".to_string()),
                ("sort".to_string(), "popular".to_string()),
            ]
        );
    }

    #[test]
    fn test_collect_genres() {
        assert_eq!(
            collect_genres(&library()),
            vec!["Action", "Adventure", "Comedy", "Dark Fantasy", "Slice of Life"]
        );
    }
}
