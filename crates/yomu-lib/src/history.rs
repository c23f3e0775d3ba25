use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::models::{Chapter, ReadingHistory};

/// Most recent entry for each manga, newest first.
pub fn latest_per_manga(histories: Vec<ReadingHistory>) -> Vec<ReadingHistory> {
    let mut latest: HashMap<i64, ReadingHistory> = HashMap::new();
    for history in histories {
        match latest.get(&history.manga_id) {
            Some(current) if current.read_at >= history.read_at => {}
            _ => {
                latest.insert(history.manga_id, history);
            }
        }
    }

    let mut entries: Vec<ReadingHistory> = latest.into_values().collect();
    entries.sort_by(|a, b| b.read_at.cmp(&a.read_at).then(b.id.cmp(&a.id)));
    entries
}

/// Consecutive entries bucketed under their `relative_day` heading. Entries
/// are expected newest first, as `latest_per_manga` returns them.
pub fn group_by_day(
    entries: &[ReadingHistory],
    now: NaiveDateTime,
) -> Vec<(String, Vec<ReadingHistory>)> {
    let mut groups: Vec<(String, Vec<ReadingHistory>)> = vec![];
    for entry in entries {
        let day = relative_day(entry.read_at, now);
        match groups.last_mut() {
            Some((heading, group)) if *heading == day => group.push(entry.clone()),
            _ => groups.push((day, vec![entry.clone()])),
        }
    }
    groups
}

fn sorted(chapters: &[Chapter]) -> Vec<&Chapter> {
    let mut sorted: Vec<&Chapter> = chapters.iter().collect();
    sorted.sort_by(|a, b| a.number.total_cmp(&b.number));
    sorted
}

/// Chapter to resume from: the one last read if it still exists, otherwise
/// the first chapter.
pub fn continue_chapter<'a>(
    chapters: &'a [Chapter],
    history: Option<&ReadingHistory>,
) -> Option<&'a Chapter> {
    history
        .and_then(|h| chapters.iter().find(|c| c.id == h.chapter_id))
        .or_else(|| sorted(chapters).into_iter().next())
}

/// Chapter and page to resume at. The saved page only applies to the chapter
/// it was saved for, a fallback chapter starts at page 0.
pub fn resume_point<'a>(
    chapters: &'a [Chapter],
    history: Option<&ReadingHistory>,
) -> Option<(&'a Chapter, i64)> {
    let chapter = continue_chapter(chapters, history)?;
    let page = history
        .filter(|h| h.chapter_id == chapter.id)
        .map(|h| h.last_page.max(0))
        .unwrap_or(0);
    Some((chapter, page))
}

pub fn next_chapter(chapters: &[Chapter], current_id: i64) -> Option<&Chapter> {
    let sorted = sorted(chapters);
    let pos = sorted.iter().position(|c| c.id == current_id)?;
    sorted.get(pos + 1).copied()
}

pub fn prev_chapter(chapters: &[Chapter], current_id: i64) -> Option<&Chapter> {
    let sorted = sorted(chapters);
    let pos = sorted.iter().position(|c| c.id == current_id)?;
    pos.checked_sub(1).and_then(|pos| sorted.get(pos).copied())
}

pub fn relative_day(at: NaiveDateTime, now: NaiveDateTime) -> String {
    let days = now.date().signed_duration_since(at.date()).num_days();

    if days <= 0 {
        "Today".to_string()
    } else if days == 1 {
        "Yesterday".to_string()
    } else if days <= 7 {
        format!("{} Days Ago", days)
    } else if days < 31 {
        plural(days / 7, "Week")
    } else {
        plural(days / 30, "Month")
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} Ago", unit)
    } else {
        format!("{} {}s Ago", n, unit)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn history(id: i64, manga_id: i64, chapter_id: i64, day: u32) -> ReadingHistory {
        ReadingHistory {
            id,
            manga_id,
            manga_title: format!("manga {manga_id}"),
            cover_url: String::new(),
            chapter_id,
            chapter_number: chapter_id as f64,
            chapter_title: String::new(),
            last_page: 0,
            read_at: at(day),
        }
    }

    fn chapter(id: i64, number: f64) -> Chapter {
        Chapter {
            id,
            manga_id: 1,
            number,
            title: String::new(),
            pages: vec![],
            view_count: 0,
            created_at: at(1),
        }
    }

    #[test]
    fn test_latest_per_manga() {
        let entries = latest_per_manga(vec![
            history(1, 10, 100, 1),
            history(2, 10, 101, 3),
            history(3, 20, 200, 2),
            history(4, 10, 102, 2),
        ]);

        let pairs: Vec<(i64, i64)> = entries.iter().map(|e| (e.manga_id, e.chapter_id)).collect();
        assert_eq!(pairs, vec![(10, 101), (20, 200)]);
    }

    #[test]
    fn test_chapter_navigation() {
        let chapters = vec![chapter(3, 2.0), chapter(1, 1.0), chapter(2, 1.5)];

        assert_eq!(next_chapter(&chapters, 1).map(|c| c.id), Some(2));
        assert_eq!(next_chapter(&chapters, 3).map(|c| c.id), None);
        assert_eq!(prev_chapter(&chapters, 3).map(|c| c.id), Some(2));
        assert_eq!(prev_chapter(&chapters, 1).map(|c| c.id), None);
        assert_eq!(next_chapter(&chapters, 42).map(|c| c.id), None);
    }

    #[test]
    fn test_continue_chapter() {
        let chapters = vec![chapter(3, 2.0), chapter(1, 1.0)];

        assert_eq!(continue_chapter(&chapters, None).map(|c| c.id), Some(1));
        let read = history(1, 1, 3, 1);
        assert_eq!(continue_chapter(&chapters, Some(&read)).map(|c| c.id), Some(3));
        let deleted = history(1, 1, 99, 1);
        assert_eq!(continue_chapter(&chapters, Some(&deleted)).map(|c| c.id), Some(1));
        assert!(continue_chapter(&[], None).is_none());
    }

    #[test]
    fn test_relative_day() {
        let now = at(30);
        assert_eq!(relative_day(at(30), now), "Today");
        assert_eq!(relative_day(at(29), now), "Yesterday");
        assert_eq!(relative_day(at(25), now), "5 Days Ago");
        assert_eq!(relative_day(at(10), now), "2 Weeks Ago");
        assert_eq!(relative_day(at(20), now), "1 Week Ago");
        assert_eq!(relative_day(at(1), now), "4 Weeks Ago");

        let new_year = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(relative_day(new_year, now), "5 Months Ago");

        let april = NaiveDate::from_ymd_opt(2024, 4, 20)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(relative_day(april, now), "1 Month Ago");
    }

    #[test]
    fn test_group_by_day() {
        let entries = latest_per_manga(vec![
            history(1, 10, 100, 30),
            history(2, 11, 110, 30),
            history(3, 12, 120, 29),
            history(4, 13, 130, 10),
        ]);

        let groups = group_by_day(&entries, at(30));
        let headings: Vec<&str> = groups.iter().map(|(day, _)| day.as_str()).collect();
        assert_eq!(headings, vec!["Today", "Yesterday", "2 Weeks Ago"]);

        let ids: Vec<Vec<i64>> = groups
            .iter()
            .map(|(_, group)| group.iter().map(|h| h.manga_id).collect())
            .collect();
        assert_eq!(ids, vec![vec![11, 10], vec![12], vec![13]]);

        assert!(group_by_day(&[], at(30)).is_empty());
    }

    #[test]
    fn test_resume_point() {
        let chapters = vec![chapter(3, 2.0), chapter(1, 1.0)];

        let (first, page) = resume_point(&chapters, None).unwrap();
        assert_eq!((first.id, page), (1, 0));

        let read = ReadingHistory {
            last_page: 7,
            ..history(1, 1, 3, 1)
        };
        let (chapter, page) = resume_point(&chapters, Some(&read)).unwrap();
        assert_eq!((chapter.id, page), (3, 7));

        // the saved page belongs to a chapter that no longer exists
        let deleted = ReadingHistory {
            last_page: 12,
            ..history(1, 1, 99, 1)
        };
        let (chapter, page) = resume_point(&chapters, Some(&deleted)).unwrap();
        assert_eq!((chapter.id, page), (1, 0));

        assert!(resume_point(&[], Some(&read)).is_none());
    }
}
