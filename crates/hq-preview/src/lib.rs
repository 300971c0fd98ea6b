//! Hover previews for board, topic and post references.
//!
//! A [`HoverDispatcher`] watches mouse-over events, and every matched reference
//! element gets its own [`PreviewHandler`]. The handler classifies the element's
//! attributes, resolves the entity through an [`EntityResolver`], renders it to
//! a [`hq_vdom::VNode`] and attaches the materialized node at the end of the
//! document body.

pub mod config;
pub mod dispatcher;
pub mod handler;
pub mod reference;
pub mod render;
pub mod resolve;

pub use config::PreviewConfig;
pub use config::ReferenceAttributes;
pub use dispatcher::HoverDispatcher;
pub use handler::HandlerState;
pub use handler::PreviewEnv;
pub use handler::PreviewHandler;
pub use reference::Reference;
pub use reference::ReferenceDescriptor;
pub use reference::classify;
pub use reference::parse_topic_id;
pub use render::Resolved;
pub use render::render_board;
pub use render::render_posts;
pub use render::render_topic;
pub use resolve::ApiResolver;
pub use resolve::EntityResolver;
