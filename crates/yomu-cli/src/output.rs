use chrono::NaiveDateTime;
use yomu_lib::comment::CommentNode;
use yomu_lib::models::{Chapter, Manga, Notification, Page, ReadingHistory};

pub fn date(at: &NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

pub fn manga_line(manga: &Manga) -> String {
    format!(
        "{:>6}  {} [{}] by {} ({} chapters)",
        manga.id,
        manga.title,
        manga.status,
        if manga.author.is_empty() { "unknown" } else { &manga.author },
        manga.chapter_count
    )
}

pub fn print_mangas(mangas: &[Manga]) {
    if mangas.is_empty() {
        println!("No manga found");
        return;
    }
    for manga in mangas {
        println!("{}", manga_line(manga));
    }
}

pub fn print_page(page: &Page<Manga>) {
    print_mangas(&page.content);
    if page.total_pages > 0 {
        println!("-- page {} of {} --", page.number + 1, page.total_pages);
    }
}

pub fn print_chapters(chapters: &[Chapter]) {
    for chapter in chapters {
        println!(
            "{:>6}  {}  ({} pages, {})",
            chapter.id,
            chapter.display_title(),
            chapter.pages.len(),
            date(&chapter.created_at)
        );
    }
}

/// Replies indented two spaces per level.
pub fn comment_lines(nodes: &[CommentNode], depth: usize, out: &mut Vec<String>) {
    for node in nodes {
        let comment = &node.comment;
        let indent = "  ".repeat(depth);
        let edited = if comment.is_edited() { " (edited)" } else { "" };
        out.push(format!(
            "{}#{} {} at {}{}: {}",
            indent,
            comment.id,
            comment.user.username,
            date(&comment.created_at),
            edited,
            comment.content
        ));
        comment_lines(&node.replies, depth + 1, out);
    }
}

pub fn history_line(history: &ReadingHistory, now: NaiveDateTime) -> String {
    format!(
        "{:>6}  {} - {} page {} ({})",
        history.id,
        history.manga_title,
        yomu_lib::models::format_number_title(history.chapter_number, &history.chapter_title),
        history.last_page + 1,
        yomu_lib::history::relative_day(history.read_at, now)
    )
}

pub fn notification_line(notification: &Notification) -> String {
    format!(
        "{} {:>6}  {}: {} ({})",
        if notification.is_read { " " } else { "*" },
        notification.id,
        notification.title,
        notification.message,
        date(&notification.created_at)
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;
    use yomu_lib::comment::build_tree;
    use yomu_lib::models::{Comment, UserSummary};

    fn comment(id: i64, parent_id: Option<i64>, content: &str) -> Comment {
        Comment {
            id,
            manga_id: 1,
            chapter_id: None,
            parent_id,
            user: UserSummary {
                id: 1,
                username: "reader".to_string(),
                avatar_url: None,
            },
            content: content.to_string(),
            created_at: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn test_comment_lines_indent_replies() {
        let tree = build_tree(vec![
            comment(1, None, "first"),
            comment(2, Some(1), "reply"),
            comment(3, Some(2), "nested"),
        ]);

        let mut lines = vec![];
        comment_lines(&tree, 0, &mut lines);

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("#1 reader"));
        assert!(lines[1].starts_with("  #2 reader"));
        assert!(lines[2].starts_with("    #3 reader"));
        assert!(lines[2].ends_with(": nested"));
    }
}
