use anyhow::Result;
use yomu_lib::models::Role;

use crate::config::Config;
use crate::output;

pub async fn users(config: &Config) -> Result<()> {
    config.require_session()?;
    let users = config.client().users().await?;
    for user in users {
        println!(
            "{:>6}  {:<20} {:<30} {}",
            user.id, user.username, user.email, user.role
        );
    }
    Ok(())
}

pub async fn set_role(config: &Config, user_id: i64, role: Role) -> Result<()> {
    config.require_session()?;
    let user = config.client().set_user_role(user_id, role).await?;
    println!("{} is now {}", user.username, user.role);
    Ok(())
}

pub async fn delete_user(config: &Config, user_id: i64) -> Result<()> {
    config.require_session()?;
    config.client().delete_user(user_id).await?;
    println!("Deleted user {}", user_id);
    Ok(())
}

pub async fn comments(config: &Config, page: i64) -> Result<()> {
    config.require_session()?;
    let result = config.client().all_comments((page - 1).max(0)).await?;
    for comment in result.content.iter() {
        println!(
            "{:>6}  manga {} {}: {}",
            comment.id,
            comment.manga_id,
            comment.user.username,
            comment.content
        );
    }
    if result.total_pages > 0 {
        println!("-- page {} of {} --", result.number + 1, result.total_pages);
    }
    Ok(())
}

pub async fn delete_comment(config: &Config, comment_id: i64) -> Result<()> {
    config.require_session()?;
    config.client().delete_comment(comment_id).await?;
    println!("Deleted comment {}", comment_id);
    Ok(())
}

pub async fn delete_manga(config: &Config, manga_id: i64) -> Result<()> {
    config.require_session()?;
    let client = config.client();
    let manga = client.manga(manga_id).await?;
    client.delete_manga(manga_id).await?;
    println!("Deleted {}", output::manga_line(&manga).trim_start());
    Ok(())
}
