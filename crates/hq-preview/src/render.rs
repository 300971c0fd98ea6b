//! Pure render-tree builders for each previewable entity.

use chrono::DateTime;
use chrono::Utc;
use hq_model::Board;
use hq_model::Post;
use hq_model::RelativeTime;
use hq_model::Topic;
use hq_vdom::TrustedHtml;
use hq_vdom::VNode;

/// An entity fetched for a preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Board(Board),
    Topic(Topic),
    /// Never empty.
    Posts(Vec<Post>),
}

impl Resolved {
    pub fn render(&self, now: DateTime<Utc>) -> VNode {
        match self {
            Self::Board(board) => render_board(board),
            Self::Topic(topic) => render_topic(topic, now),
            Self::Posts(posts) => render_posts(posts, now),
        }
    }
}

pub fn render_board(board: &Board) -> VNode {
    VNode::with_class("div", "js-inline-preview board").child(
        VNode::with_class("div", "cascade").child(
            VNode::with_class("div", "container")
                .child(VNode::with_class("div", "cascade-header").text(board.title.as_str()))
                .child(VNode::with_class("div", "cascade-body").text(board.description.as_str())),
        ),
    )
}

pub fn render_topic(topic: &Topic, now: DateTime<Utc>) -> VNode {
    let posted = RelativeTime::between(topic.posted_at, now);
    VNode::with_class("div", "js-inline-preview topic").child(
        VNode::with_class("div", "topic-header").child(
            VNode::with_class("div", "container")
                .child(VNode::with_class("h3", "topic-header-title").text(topic.title.as_str()))
                .child(
                    VNode::with_class("p", "topic-header-item")
                        .text("Last posted ")
                        .child(VNode::new("strong").text(posted.to_string())),
                )
                .child(
                    VNode::with_class("p", "topic-header-item")
                        .text("Total of ")
                        .child(VNode::new("strong").text(format!("{} posts", topic.post_count))),
                ),
        ),
    )
}

pub fn render_posts(posts: &[Post], now: DateTime<Utc>) -> VNode {
    VNode::with_class("div", "js-inline-preview post")
        .children(posts.iter().map(|post| render_post(post, now)))
}

fn render_post(post: &Post, now: DateTime<Utc>) -> VNode {
    VNode::with_class("div", "container")
        .child(render_post_header(post, now))
        .child(
            VNode::with_class("div", "post-body")
                .inner_html(TrustedHtml::from_sanitized(post.body_formatted.as_str())),
        )
}

fn render_post_header(post: &Post, now: DateTime<Utc>) -> VNode {
    let number_class = if post.bumped {
        "post-header-item number bumped"
    } else {
        "post-header-item number"
    };
    let created = RelativeTime::between(post.created_at, now);

    let header = VNode::with_class("div", "post-header")
        .child(VNode::with_class("span", number_class).text(post.number.to_string()))
        .child(VNode::with_class("span", "post-header-item name").text(post.name.as_str()))
        .child(VNode::with_class("span", "post-header-item date").text(format!("Posted {created}")));

    match post.ident() {
        Some(ident) => header
            .child(VNode::with_class("span", "post-header-item ident").text(format!("ID:{ident}"))),
        None => header,
    }
}
