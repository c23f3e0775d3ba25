use anyhow::{Result, anyhow};
use url::Url;
use yomu_lib::models::MangaStatus;
use yomu_lib::search::{SearchFilter, SortBy, normalize_query};

use crate::config::Config;
use crate::output;

/// `page` is 1-based on the command line, 0-based on the wire.
fn wire_page(page: i64) -> i64 {
    (page - 1).max(0)
}

pub async fn browse(config: &Config, page: i64, sort: SortBy) -> Result<()> {
    let result = config
        .client()
        .list_manga(wire_page(page), config.page_size, sort)
        .await?;
    output::print_page(&result);
    Ok(())
}

pub async fn search(
    config: &Config,
    query: Option<String>,
    genres: Vec<String>,
    status: Option<MangaStatus>,
    page: i64,
) -> Result<()> {
    let keyword = query.as_deref().and_then(normalize_query);
    if query.is_some() && keyword.is_none() && genres.is_empty() && status.is_none() {
        return Err(anyhow!("search query is too short"));
    }

    let mut filter = SearchFilter {
        keyword,
        status,
        ..Default::default()
    };
    for genre in genres.iter() {
        filter.toggle_genre(genre);
    }

    let result = config.client().search_manga(&filter, wire_page(page)).await?;
    output::print_page(&result);
    Ok(())
}

pub async fn show(config: &Config, manga_id: i64) -> Result<()> {
    let client = config.client();
    let manga = client.manga(manga_id).await?;
    let mut chapters = client.chapters(manga_id).await?;
    chapters.sort_by(|a, b| a.number.total_cmp(&b.number));

    println!("{}", manga.title);
    println!("Author:    {}", manga.author);
    println!("Status:    {}", manga.status);
    if !manga.genres.is_empty() {
        println!("Genres:    {}", manga.genres.join(", "));
    }
    if let Some(uploader) = manga.uploader.as_ref() {
        println!("Uploader:  {}", uploader.username);
    }
    println!(
        "Stats:     {} followers, {} views",
        manga.follower_count, manga.view_count
    );
    if let Some(description) = manga.description.as_ref() {
        println!();
        println!("{}", description);
    }
    println!();
    output::print_chapters(&chapters);

    if config.token.is_some() {
        let following = client.is_following(manga_id).await?;
        println!();
        println!("{}", if following { "Following" } else { "Not following" });
    }
    Ok(())
}

pub async fn read(
    config: &Config,
    manga_id: i64,
    chapter_id: i64,
    page: Option<i64>,
) -> Result<()> {
    let client = config.client();
    let chapter = client.chapter(manga_id, chapter_id).await?;

    println!("{}", chapter.display_title());
    for (index, page) in chapter.pages.iter().enumerate() {
        println!("{:>4}  {}", index + 1, page_url(client.base_url(), page));
    }

    if config.token.is_some() {
        let last_page = page
            .map(|page| (page - 1).clamp(0, chapter.pages.len().saturating_sub(1) as i64))
            .unwrap_or(0);
        client.record_history(manga_id, chapter_id, last_page).await?;
        info!("recorded page {} of chapter {}", last_page + 1, chapter_id);
    }
    Ok(())
}

/// Pages resolve against the API url the way a browser resolves them, so
/// absolute and protocol-relative pages keep their own host.
fn page_url(base_url: &str, page: &str) -> String {
    match Url::parse(base_url).and_then(|base| base.join(page)) {
        Ok(url) => url.to_string(),
        Err(e) => {
            debug!("cannot resolve {} against {}: {}", page, base_url, e);
            page.to_string()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_page_url() {
        assert_eq!(
            page_url("http://localhost:8080/api", "/uploads/1/001.png"),
            "http://localhost:8080/uploads/1/001.png"
        );
        assert_eq!(
            page_url("http://localhost:8080", "uploads/1/001.png"),
            "http://localhost:8080/uploads/1/001.png"
        );
        assert_eq!(
            page_url("http://localhost:8080/api", "https://cdn.example/p.png"),
            "https://cdn.example/p.png"
        );
        assert_eq!(
            page_url("http://localhost:8080/api", "//cdn.example/x.png"),
            "http://cdn.example/x.png"
        );
        assert_eq!(page_url("not a url", "/p.png"), "/p.png");
    }

    #[test]
    fn test_wire_page() {
        assert_eq!(wire_page(1), 0);
        assert_eq!(wire_page(3), 2);
        assert_eq!(wire_page(0), 0);
    }
}
