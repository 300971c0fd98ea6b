//! API entry points for boards, topics and post ranges.

use hq_core::PreviewError;
use hq_core::PreviewResult;
use url::Url;

/// Builds percent-encoded API paths under a validated base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRoutes {
    base: Url,
}

impl ApiRoutes {
    pub fn new(base: &str) -> PreviewResult<Self> {
        let mut parsed = Url::parse(base).map_err(|error| {
            PreviewError::new(
                "net.url.invalid",
                format!("failed to parse API base `{base}`: {error}"),
            )
        })?;

        if parsed.cannot_be_a_base() {
            return Err(PreviewError::new(
                "net.url.invalid_base",
                "API base cannot carry path segments",
            ));
        }

        if !parsed.username().is_empty() || parsed.password().is_some() {
            return Err(PreviewError::new(
                "net.url.credentials_disallowed",
                "API base userinfo (`username:password@`) is not allowed",
            ));
        }

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PreviewError::new(
                "net.url.scheme_unsupported",
                format!("unsupported scheme `{}`", parsed.scheme()),
            ));
        }

        parsed.set_query(None);
        parsed.set_fragment(None);

        Ok(Self { base: parsed })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `{base}/boards/{slug}/`
    pub fn board(&self, slug: &str) -> String {
        self.path(&["boards", slug])
    }

    /// `{base}/topics/{id}/`
    pub fn topic(&self, topic_id: u64) -> String {
        self.path(&["topics", &topic_id.to_string()])
    }

    /// `{base}/topics/{id}/posts/` or `{base}/topics/{id}/posts/{query}/`
    pub fn posts(&self, topic_id: u64, query: Option<&str>) -> String {
        let topic_id = topic_id.to_string();
        match query {
            Some(query) => self.path(&["topics", &topic_id, "posts", query]),
            None => self.path(&["topics", &topic_id, "posts"]),
        }
    }

    fn path(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
            path.push("");
        }
        url.path().to_owned()
    }
}
