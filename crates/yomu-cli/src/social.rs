use anyhow::{Result, anyhow};
use yomu_lib::comment::{build_tree, count_all};
use yomu_lib::history::latest_per_manga;
use yomu_lib::models::CommentInput;

use crate::config::Config;
use crate::output;

pub async fn comments(config: &Config, manga_id: i64, chapter_id: Option<i64>) -> Result<()> {
    let comments = config.client().comments(manga_id, chapter_id).await?;
    let tree = build_tree(comments);

    println!("{} comments", count_all(&tree));
    let mut lines = vec![];
    output::comment_lines(&tree, 0, &mut lines);
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

pub async fn comment(
    config: &Config,
    manga_id: i64,
    chapter_id: Option<i64>,
    parent_id: Option<i64>,
    content: String,
) -> Result<()> {
    config.require_session()?;
    let content = content.trim().to_string();
    if content.is_empty() {
        return Err(anyhow!("comment cannot be empty"));
    }

    let input = CommentInput {
        manga_id,
        chapter_id,
        parent_id,
        content,
    };
    let comment = config.client().post_comment(&input).await?;
    println!("Posted comment #{}", comment.id);
    Ok(())
}

pub async fn follow(config: &Config, manga_id: i64, follow: bool) -> Result<()> {
    config.require_session()?;
    let client = config.client();
    if follow {
        client.follow(manga_id).await?;
        println!("Following manga {}", manga_id);
    } else {
        client.unfollow(manga_id).await?;
        println!("Unfollowed manga {}", manga_id);
    }
    Ok(())
}

pub async fn library(config: &Config) -> Result<()> {
    config.require_session()?;
    let follows = config.client().follows().await?;
    let mangas: Vec<_> = follows.into_iter().map(|follow| follow.manga).collect();
    output::print_mangas(&mangas);
    Ok(())
}

pub async fn history(config: &Config, delete: Option<i64>, clear: bool) -> Result<()> {
    config.require_session()?;
    let client = config.client();

    if clear {
        client.clear_history().await?;
        println!("History cleared");
        return Ok(());
    }
    if let Some(id) = delete {
        client.delete_history(id).await?;
        println!("Deleted history entry {}", id);
        return Ok(());
    }

    let entries = latest_per_manga(client.histories().await?);
    if entries.is_empty() {
        println!("Nothing read yet");
    }
    let now = chrono::Local::now().naive_local();
    for entry in entries.iter() {
        println!("{}", output::history_line(entry, now));
    }
    Ok(())
}
