//! Networking contracts: request transport, API routes, and fetch errors.

pub mod error;
pub mod fixture;
pub mod http;
pub mod routes;

use async_trait::async_trait;
use std::cell::Cell;
use std::rc::Rc;

pub use error::FetchError;
pub use fixture::FixtureTransport;
pub use http::HttpMethod;
pub use http::HttpStatusCode;
pub use http::TransportResponse;
pub use routes::ApiRoutes;

/// Result alias for transport and decode operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Cooperative cancellation flag shared between a caller and a transport.
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Fails with [`FetchError::Cancelled`] once the token has been tripped.
    pub fn check(&self, path: &str) -> FetchResult<()> {
        if self.is_cancelled() {
            return Err(FetchError::Cancelled {
                path: path.to_owned(),
            });
        }
        Ok(())
    }
}

/// Issues one request against an API path and yields the raw response.
///
/// Futures are not `Send`: transports run on the page's single-threaded executor.
#[async_trait(?Send)]
pub trait Transport {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        cancel: Option<&CancelToken>,
    ) -> FetchResult<TransportResponse>;
}

#[async_trait(?Send)]
impl<T> Transport for Rc<T>
where
    T: Transport + ?Sized,
{
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        cancel: Option<&CancelToken>,
    ) -> FetchResult<TransportResponse> {
        (**self).request(method, path, cancel).await
    }
}
