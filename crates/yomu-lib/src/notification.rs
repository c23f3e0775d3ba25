use crate::error::Result;
use crate::models::Notification;

/// Oldest notifications are dropped beyond this many.
pub const INBOX_CAPACITY: usize = 100;

/// In-memory notification list, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inbox {
    items: Vec<Notification>,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, mut notifications: Vec<Notification>) {
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        notifications.dedup_by_key(|n| n.id);
        notifications.truncate(INBOX_CAPACITY);
        self.items = notifications;
    }

    /// Add a pushed notification at the top, `false` if it was already there.
    pub fn push(&mut self, notification: Notification) -> bool {
        if self.items.iter().any(|n| n.id == notification.id) {
            return false;
        }
        self.items.insert(0, notification);
        self.items.truncate(INBOX_CAPACITY);
        true
    }

    pub fn mark_read(&mut self, id: i64) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(notification) if !notification.is_read => {
                notification.is_read = true;
                true
            }
            _ => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for notification in self.items.iter_mut() {
            notification.is_read = true;
        }
    }

    pub fn remove(&mut self, id: i64) -> Option<Notification> {
        let pos = self.items.iter().position(|n| n.id == id)?;
        Some(self.items.remove(pos))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.is_read).count()
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Decode the JSON body of a pushed notification.
pub fn parse_push(body: &str) -> Result<Notification> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::models::NotificationKind;
    use chrono::NaiveDate;

    fn notification(id: i64, minute: u32) -> Notification {
        Notification {
            id,
            kind: NotificationKind::NewChapter,
            title: "One Piece".to_string(),
            message: format!("Chapter {id} is out"),
            manga_id: Some(1),
            chapter_id: Some(id),
            is_read: false,
            created_at: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(9, minute, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_push_dedupes_and_prepends() {
        let mut inbox = Inbox::new();
        inbox.replace(vec![notification(1, 0), notification(2, 5)]);
        assert_eq!(inbox.items()[0].id, 2);

        assert!(inbox.push(notification(3, 10)));
        assert!(!inbox.push(notification(2, 5)));
        assert_eq!(inbox.len(), 3);
        assert_eq!(inbox.items()[0].id, 3);
        assert_eq!(inbox.unread_count(), 3);
    }

    #[test]
    fn test_mark_read() {
        let mut inbox = Inbox::new();
        inbox.replace(vec![notification(1, 0), notification(2, 1)]);

        assert!(inbox.mark_read(1));
        assert!(!inbox.mark_read(1));
        assert!(!inbox.mark_read(42));
        assert_eq!(inbox.unread_count(), 1);

        inbox.mark_all_read();
        assert_eq!(inbox.unread_count(), 0);
    }

    #[test]
    fn test_remove_and_capacity() {
        let mut inbox = Inbox::new();
        for id in 0..(INBOX_CAPACITY as i64 + 5) {
            inbox.push(notification(id, 0));
        }
        assert_eq!(inbox.len(), INBOX_CAPACITY);
        assert_eq!(inbox.items()[0].id, INBOX_CAPACITY as i64 + 4);

        let removed = inbox.remove(INBOX_CAPACITY as i64 + 4);
        assert!(removed.is_some());
        assert!(inbox.remove(0).is_none());
    }

    #[test]
    fn test_parse_push() {
        let body = r#"{
            "id": 12,
            "type": "COMMENT_REPLY",
            "title": "New reply",
            "message": "someone replied to your comment",
            "mangaId": 4,
            "isRead": false,
            "createdAt": "2024-06-01T10:15:30.123"
        }"#;
        let notification = parse_push(body).unwrap();
        assert_eq!(notification.id, 12);
        assert_eq!(notification.kind, NotificationKind::CommentReply);
        assert_eq!(notification.manga_id, Some(4));
        assert_eq!(notification.chapter_id, None);

        assert!(parse_push("{\"id\":").is_err());
    }
}
