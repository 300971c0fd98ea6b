//! Board, topic and post entities as delivered by the API.

pub mod date;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

pub use date::Clock;
pub use date::FixedClock;
pub use date::RelativeTime;
pub use date::SystemClock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_id: Option<u64>,
    pub title: String,
    pub posted_at: DateTime<Utc>,
    #[serde(default)]
    pub post_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub topic_id: u64,
    pub number: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ident: Option<String>,
    #[serde(default)]
    pub bumped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Server-rendered, already sanitized body markup.
    pub body_formatted: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Post {
    /// Identity badge text, if the post carries a non-empty ident.
    pub fn ident(&self) -> Option<&str> {
        self.ident.as_deref().filter(|ident| !ident.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::Board;
    use super::Post;
    use super::Topic;
    use chrono::TimeZone;
    use chrono::Utc;

    #[test]
    fn decodes_post_wire_shape() {
        let post: Post = serde_json::from_str(
            r#"{
                "type": "post",
                "id": 9,
                "topic_id": 42,
                "number": 3,
                "name": "Nameless",
                "created_at": "2016-03-01T10:00:00Z",
                "ident": "abc123",
                "bumped": true,
                "body": ">>2 hi",
                "body_formatted": "<p><a href=\"/2\">&gt;&gt;2</a> hi</p>",
                "path": "/topics/42/3/"
            }"#,
        )
        .unwrap_or_else(|error| panic!("{error}"));

        assert_eq!(post.number, 3);
        assert_eq!(post.topic_id, 42);
        assert!(post.bumped);
        assert_eq!(post.ident(), Some("abc123"));
        assert_eq!(
            post.created_at,
            Utc.with_ymd_and_hms(2016, 3, 1, 10, 0, 0)
                .single()
                .unwrap_or_else(|| unreachable!())
        );
    }

    #[test]
    fn optional_post_fields_default() {
        let post: Post = serde_json::from_str(
            r#"{"topic_id": 1, "number": 1, "name": "A", "created_at": "2016-03-01T10:00:00+07:00", "ident": "", "body_formatted": ""}"#,
        )
        .unwrap_or_else(|error| panic!("{error}"));
        assert!(!post.bumped);
        assert_eq!(post.ident(), None);
        assert_eq!(post.id, None);
    }

    #[test]
    fn decodes_board_and_topic() {
        let board: Board =
            serde_json::from_str(r#"{"slug": "general", "title": "General", "description": "Talk about anything"}"#)
                .unwrap_or_else(|error| panic!("{error}"));
        assert_eq!(board.title, "General");

        let topic: Topic = serde_json::from_str(
            r#"{"id": 42, "board_id": 1, "title": "Hello", "posted_at": "2016-03-01T10:00:00Z", "post_count": 7}"#,
        )
        .unwrap_or_else(|error| panic!("{error}"));
        assert_eq!(topic.post_count, 7);
        assert_eq!(topic.board_id, Some(1));
    }

    #[test]
    fn rejects_missing_required_fields() {
        let topic = serde_json::from_str::<Topic>(r#"{"id": 42, "title": "Hello"}"#);
        assert!(topic.is_err());
    }
}
