use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A numbered, ordered sequence of page images belonging to a manga
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: i64,
    pub manga_id: i64,
    pub number: f64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub pages: Vec<String>,
    #[serde(default)]
    pub view_count: i64,
    pub created_at: NaiveDateTime,
}

impl Chapter {
    pub fn display_title(&self) -> String {
        format_number_title(self.number, &self.title)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterInput {
    pub number: f64,
    pub title: String,
}

/// Render "Ch {number}: {title}", dropping the "Chapter N" prefix uploaders
/// tend to repeat in the title itself.
pub fn format_number_title(number: f64, title: &str) -> String {
    let mut cleaned_title = title.trim().to_string();

    if let Some(rest) = cleaned_title.strip_prefix("Chapter ") {
        cleaned_title = rest.trim().to_string();
        let number_str = format!("{}", number);
        if let Some(rest) = cleaned_title.strip_prefix(&number_str) {
            cleaned_title = rest.trim().to_string();
        }
    }

    for separator in [":", "-"] {
        if let Some(rest) = cleaned_title.strip_prefix(separator) {
            cleaned_title = rest.trim().to_string();
            break;
        }
    }

    if cleaned_title.is_empty() {
        format!("Ch {}", number)
    } else {
        format!("Ch {}: {}", number, cleaned_title)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_format_number_title() {
        assert_eq!(format_number_title(1.0, "Chapter 1: Romance Dawn"), "Ch 1: Romance Dawn");
        assert_eq!(format_number_title(2.5, "Chapter 2.5 - Extra"), "Ch 2.5: Extra");
        assert_eq!(format_number_title(3.0, ""), "Ch 3");
        assert_eq!(format_number_title(4.0, "Chapter 4"), "Ch 4");
        assert_eq!(format_number_title(5.0, "The Return"), "Ch 5: The Return");
    }
}
