//! Classification of reference elements into board, topic or post-range previews.

use crate::config::ReferenceAttributes;
use hq_dom::Document;
use hq_dom::NodeId;

/// Raw reference fields read from an element's attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceDescriptor {
    pub board_slug: Option<String>,
    pub topic_id: Option<u64>,
    pub post_query: Option<String>,
}

impl ReferenceDescriptor {
    /// Reads the descriptor off `element`. Empty attributes count as absent.
    pub fn from_element(
        document: &Document,
        element: NodeId,
        attributes: &ReferenceAttributes,
    ) -> Self {
        let read = |name: &str| {
            document
                .get_attribute(element, name)
                .filter(|value| !value.is_empty())
        };

        Self {
            board_slug: read(&attributes.board).map(str::to_owned),
            topic_id: read(&attributes.topic).and_then(parse_topic_id),
            post_query: read(&attributes.number).map(str::to_owned),
        }
    }
}

/// What a reference points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Board { slug: String },
    Topic { id: u64 },
    Posts { topic_id: u64, query: String },
}

impl Reference {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Board { .. } => "board",
            Self::Topic { .. } => "topic",
            Self::Posts { .. } => "post",
        }
    }
}

/// Maps a descriptor to the one preview it denotes, if any.
///
/// Slug alone is a board; an id without a number is a topic; an id with a
/// number is a post range. Every other combination yields no preview.
pub fn classify(descriptor: &ReferenceDescriptor) -> Option<Reference> {
    match (
        descriptor.board_slug.as_deref(),
        descriptor.topic_id,
        descriptor.post_query.as_deref(),
    ) {
        (Some(slug), None, None) => Some(Reference::Board {
            slug: slug.to_owned(),
        }),
        (_, Some(id), None) => Some(Reference::Topic { id }),
        (_, Some(topic_id), Some(query)) => Some(Reference::Posts {
            topic_id,
            query: query.to_owned(),
        }),
        _ => None,
    }
}

/// Leading decimal digits of `raw`, after optional whitespace.
///
/// Zero is not an id, and neither is a digit run too large for `u64`.
pub fn parse_topic_id(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let digits = trimmed
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map_or(trimmed, |(end, _)| &trimmed[..end]);

    digits.parse::<u64>().ok().filter(|id| *id > 0)
}
