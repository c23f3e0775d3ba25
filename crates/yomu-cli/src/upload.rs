use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use yomu_api::Upload;
use yomu_lib::models::{ChapterInput, MangaInput};
use yomu_lib::upload::{is_page_image, sort_pages};

use crate::config::Config;

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn read_upload(path: &Path) -> Result<Upload> {
    let bytes = std::fs::read(path).with_context(|| format!("cannot read {:?}", path))?;
    Ok(Upload::new(file_name(path), bytes))
}

/// Page images directly inside `dir`, in natural file name order.
pub fn collect_pages(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages = vec![];
    for entry in std::fs::read_dir(dir).with_context(|| format!("cannot open {:?}", dir))? {
        let path = entry?.path();
        if path.is_file() && is_page_image(&file_name(&path)) {
            pages.push((file_name(&path), path));
        }
    }
    sort_pages(&mut pages, |page| page.0.as_str());

    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

pub async fn upload_manga(
    config: &Config,
    input: MangaInput,
    cover: Option<PathBuf>,
) -> Result<()> {
    config.require_session()?;
    if input.title.trim().is_empty() {
        return Err(anyhow!("title is required"));
    }

    let cover = cover.as_deref().map(read_upload).transpose()?;
    let manga = config.client().create_manga(&input, cover).await?;
    println!("Created {} (id {})", manga.title, manga.id);
    Ok(())
}

pub async fn upload_chapter(
    config: &Config,
    manga_id: i64,
    dir: &Path,
    number: f64,
    title: String,
) -> Result<()> {
    config.require_session()?;
    if !number.is_finite() || number < 0.0 {
        return Err(anyhow!("chapter number must be zero or positive"));
    }

    let client = config.client();
    let existing = client.chapters(manga_id).await?;
    if existing.iter().any(|chapter| chapter.number == number) {
        return Err(anyhow!("chapter {} already exists", number));
    }

    let paths = collect_pages(dir)?;
    if paths.is_empty() {
        return Err(anyhow!("no page images found in {:?}", dir));
    }
    info!("uploading {} pages from {:?}", paths.len(), dir);
    let pages = paths
        .iter()
        .map(|path| read_upload(path))
        .collect::<Result<Vec<_>>>()?;

    let input = ChapterInput {
        number,
        title: title.trim().to_string(),
    };
    let chapter = client.upload_chapter(manga_id, &input, pages).await?;
    println!(
        "Uploaded {} with {} pages",
        chapter.display_title(),
        chapter.pages.len()
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_collect_pages() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["10.png", "2.png", "1.jpg", "notes.txt", "cover.WEBP"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("3.png")).unwrap();

        let pages = collect_pages(dir.path()).unwrap();
        let names: Vec<String> = pages.iter().map(|path| file_name(path)).collect();
        assert_eq!(names, vec!["1.jpg", "2.png", "10.png", "cover.WEBP"]);
    }

    #[test]
    fn test_collect_pages_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_pages(&dir.path().join("missing")).is_err());
    }
}
