//! In-memory transport serving canned API responses.
//!
//! Used by the demo binary and by tests. Responses can be immediate, failing,
//! or deferred until a [`FixtureGate`] releases them, which lets callers hold a
//! request in flight while they interleave other work.

use crate::CancelToken;
use crate::FetchError;
use crate::FetchResult;
use crate::HttpMethod;
use crate::HttpStatusCode;
use crate::Transport;
use crate::TransportResponse;
use async_trait::async_trait;
use futures::channel::oneshot;
use hq_core::PreviewError;
use hq_core::PreviewResult;
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

type Reply = Result<(HttpStatusCode, String), String>;

#[derive(Debug)]
enum Fixture {
    Ready(Reply),
    Deferred(Option<oneshot::Receiver<Reply>>),
}

/// Releases one deferred fixture response.
#[derive(Debug)]
pub struct FixtureGate {
    path: String,
    sender: oneshot::Sender<Reply>,
}

impl FixtureGate {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn respond_json(self, body: &serde_json::Value) {
        self.respond(HttpStatusCode::OK, body.to_string());
    }

    pub fn respond(self, status: HttpStatusCode, body: impl Into<String>) {
        if self.sender.send(Ok((status, body.into()))).is_err() {
            tracing::debug!(path = %self.path, "deferred fixture response had no waiting request");
        }
    }

    pub fn fail(self, message: impl Into<String>) {
        if self.sender.send(Err(message.into())).is_err() {
            tracing::debug!(path = %self.path, "deferred fixture failure had no waiting request");
        }
    }
}

#[derive(Debug, Deserialize)]
struct FixtureEntry {
    #[serde(default = "default_status")]
    status: u16,
    #[serde(default)]
    body: serde_json::Value,
}

fn default_status() -> u16 {
    200
}

/// Path-keyed transport double. Unknown paths answer 404.
#[derive(Debug, Default)]
pub struct FixtureTransport {
    fixtures: RefCell<HashMap<String, Fixture>>,
    requests: RefCell<Vec<(HttpMethod, String)>>,
}

impl FixtureTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `{ "<path>": { "status": 200, "body": <json> } }`.
    pub fn from_json_str(input: &str) -> PreviewResult<Self> {
        let entries: HashMap<String, FixtureEntry> = serde_json::from_str(input).map_err(|error| {
            PreviewError::new(
                "net.fixture.invalid",
                format!("failed to parse fixture document: {error}"),
            )
        })?;

        let transport = Self::new();
        for (path, entry) in entries {
            let status = HttpStatusCode::new(entry.status).ok_or_else(|| {
                PreviewError::new(
                    "net.fixture.invalid",
                    format!("fixture `{path}` has invalid status {}", entry.status),
                )
            })?;
            transport.insert(path, Fixture::Ready(Ok((status, entry.body.to_string()))));
        }
        Ok(transport)
    }

    pub fn from_path(path: &Path) -> PreviewResult<Self> {
        let input = std::fs::read_to_string(path).map_err(|error| {
            PreviewError::new(
                "net.fixture.unreadable",
                format!("failed to read fixtures from `{}`: {error}", path.display()),
            )
        })?;
        Self::from_json_str(&input)
    }

    pub fn respond_json(&self, path: &str, body: &serde_json::Value) {
        self.respond(path, HttpStatusCode::OK, body.to_string());
    }

    pub fn respond(&self, path: &str, status: HttpStatusCode, body: impl Into<String>) {
        self.insert(path.to_owned(), Fixture::Ready(Ok((status, body.into()))));
    }

    /// Makes requests to `path` fail at the transport level.
    pub fn fail(&self, path: &str, message: impl Into<String>) {
        self.insert(path.to_owned(), Fixture::Ready(Err(message.into())));
    }

    /// Holds the next request to `path` until the returned gate is released.
    pub fn defer(&self, path: &str) -> FixtureGate {
        let (sender, receiver) = oneshot::channel();
        self.insert(path.to_owned(), Fixture::Deferred(Some(receiver)));
        FixtureGate {
            path: path.to_owned(),
            sender,
        }
    }

    /// Every request seen so far, in arrival order.
    pub fn requests(&self) -> Vec<(HttpMethod, String)> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    fn insert(&self, path: String, fixture: Fixture) {
        self.fixtures.borrow_mut().insert(path, fixture);
    }

    fn take_reply(&self, path: &str) -> Pending {
        let mut fixtures = self.fixtures.borrow_mut();
        match fixtures.get_mut(path) {
            None => Pending::Ready(Ok((HttpStatusCode::NOT_FOUND, String::new()))),
            Some(Fixture::Ready(reply)) => Pending::Ready(reply.clone()),
            Some(Fixture::Deferred(receiver)) => match receiver.take() {
                Some(receiver) => Pending::Waiting(receiver),
                None => Pending::Ready(Err("deferred fixture was already consumed".to_owned())),
            },
        }
    }
}

enum Pending {
    Ready(Reply),
    Waiting(oneshot::Receiver<Reply>),
}

#[async_trait(?Send)]
impl Transport for FixtureTransport {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        cancel: Option<&CancelToken>,
    ) -> FetchResult<TransportResponse> {
        if let Some(token) = cancel {
            token.check(path)?;
        }
        self.requests
            .borrow_mut()
            .push((method, path.to_owned()));
        tracing::trace!(method = method.as_str(), path, "fixture request");

        let reply = match self.take_reply(path) {
            Pending::Ready(reply) => reply,
            Pending::Waiting(receiver) => receiver
                .await
                .unwrap_or_else(|_| Err("deferred fixture was dropped".to_owned())),
        };

        if let Some(token) = cancel {
            token.check(path)?;
        }

        let (status, body) = reply.map_err(|message| FetchError::Transport {
            path: path.to_owned(),
            message,
        })?;
        Ok(TransportResponse {
            path: path.to_owned(),
            status,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::FixtureTransport;
    use crate::CancelToken;
    use crate::FetchError;
    use crate::HttpMethod;
    use crate::Transport;
    use futures::FutureExt;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn serves_ready_fixtures_and_records_requests() {
        let transport = FixtureTransport::new();
        transport.respond_json("/api/1.0/boards/general/", &json!({"title": "General"}));

        let response = block_on(transport.request(HttpMethod::Get, "/api/1.0/boards/general/", None))
            .unwrap_or_else(|error| panic!("{error}"));
        assert!(response.status.is_success());
        assert_eq!(response.body, r#"{"title":"General"}"#);

        let missing = block_on(transport.request(HttpMethod::Get, "/api/1.0/boards/ghost/", None))
            .unwrap_or_else(|error| panic!("{error}"));
        assert!(missing.status.is_not_found());

        assert_eq!(
            transport.requests(),
            vec![
                (HttpMethod::Get, "/api/1.0/boards/general/".to_owned()),
                (HttpMethod::Get, "/api/1.0/boards/ghost/".to_owned()),
            ]
        );
    }

    #[test]
    fn failures_surface_as_transport_errors() {
        let transport = FixtureTransport::new();
        transport.fail("/api/1.0/topics/1/", "connection reset");
        let result = block_on(transport.request(HttpMethod::Get, "/api/1.0/topics/1/", None));
        assert!(matches!(
            result,
            Err(FetchError::Transport { message, .. }) if message == "connection reset"
        ));
    }

    #[test]
    fn deferred_fixture_stays_pending_until_released() {
        let transport = FixtureTransport::new();
        let gate = transport.defer("/api/1.0/topics/42/");

        let mut pending = transport.request(HttpMethod::Get, "/api/1.0/topics/42/", None);
        assert!((&mut pending).now_or_never().is_none());

        gate.respond_json(&json!({"id": 42}));
        let response = block_on(pending).unwrap_or_else(|error| panic!("{error}"));
        assert_eq!(response.body, r#"{"id":42}"#);
    }

    #[test]
    fn cancelled_token_fails_after_release() {
        let transport = FixtureTransport::new();
        let gate = transport.defer("/api/1.0/topics/42/");
        let token = CancelToken::new();

        let mut pending = transport.request(HttpMethod::Get, "/api/1.0/topics/42/", Some(&token));
        assert!((&mut pending).now_or_never().is_none());
        token.cancel();
        gate.respond_json(&json!({"id": 42}));

        assert!(matches!(block_on(pending), Err(FetchError::Cancelled { .. })));
    }

    #[test]
    fn loads_fixture_documents() {
        let transport = FixtureTransport::from_json_str(
            r#"{
                "/api/1.0/boards/general/": {"body": {"slug": "general"}},
                "/api/1.0/boards/gone/": {"status": 404}
            }"#,
        )
        .unwrap_or_else(|error| panic!("{error}"));

        let gone = block_on(transport.request(HttpMethod::Get, "/api/1.0/boards/gone/", None))
            .unwrap_or_else(|error| panic!("{error}"));
        assert!(gone.status.is_not_found());

        let invalid = FixtureTransport::from_json_str(r#"{"/x/": {"status": 42}}"#);
        assert!(invalid.is_err_and(|error| error.code == "net.fixture.invalid"));
    }
}
