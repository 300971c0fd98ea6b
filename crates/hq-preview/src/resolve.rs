//! Entity resolvers: one network read per board, topic or post range.

use async_trait::async_trait;
use hq_model::Board;
use hq_model::Post;
use hq_model::Topic;
use hq_net::ApiRoutes;
use hq_net::FetchResult;
use hq_net::HttpMethod;
use hq_net::Transport;
use serde::de::DeserializeOwned;

/// Fetches the entity a reference points at.
///
/// A missing entity is `Ok(None)` (or an empty list), never an error.
#[async_trait(?Send)]
pub trait EntityResolver {
    async fn resolve_board(&self, slug: &str) -> FetchResult<Option<Board>>;

    async fn resolve_topic(&self, topic_id: u64) -> FetchResult<Option<Topic>>;

    /// Posts of a topic, restricted to `query` when given.
    async fn resolve_posts(&self, topic_id: u64, query: Option<&str>) -> FetchResult<Vec<Post>>;
}

/// Resolver reading the JSON API through a [`Transport`].
#[derive(Debug, Clone)]
pub struct ApiResolver<T> {
    transport: T,
    routes: ApiRoutes,
}

impl<T> ApiResolver<T>
where
    T: Transport,
{
    pub fn new(transport: T, routes: ApiRoutes) -> Self {
        Self { transport, routes }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn get<V>(&self, path: &str) -> FetchResult<Option<V>>
    where
        V: DeserializeOwned,
    {
        tracing::debug!(path, "resolving entity");
        let response = self.transport.request(HttpMethod::Get, path, None).await?;
        response.json_optional()
    }
}

#[async_trait(?Send)]
impl<T> EntityResolver for ApiResolver<T>
where
    T: Transport,
{
    async fn resolve_board(&self, slug: &str) -> FetchResult<Option<Board>> {
        self.get(&self.routes.board(slug)).await
    }

    async fn resolve_topic(&self, topic_id: u64) -> FetchResult<Option<Topic>> {
        self.get(&self.routes.topic(topic_id)).await
    }

    async fn resolve_posts(&self, topic_id: u64, query: Option<&str>) -> FetchResult<Vec<Post>> {
        let posts = self.get(&self.routes.posts(topic_id, query)).await?;
        Ok(posts.unwrap_or_default())
    }
}
