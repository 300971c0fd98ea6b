//! Request method, status and response contracts.

use crate::FetchError;
use crate::FetchResult;
use serde::de::DeserializeOwned;

/// Request method. The preview API is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
        }
    }
}

/// HTTP status code wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HttpStatusCode(u16);

impl HttpStatusCode {
    pub const OK: Self = Self(200);
    pub const NOT_FOUND: Self = Self(404);

    pub fn new(code: u16) -> Option<Self> {
        (100..=599).contains(&code).then_some(Self(code))
    }

    pub fn as_u16(self) -> u16 {
        self.0
    }

    pub fn is_success(self) -> bool {
        (200..=299).contains(&self.0)
    }

    pub fn is_not_found(self) -> bool {
        self == Self::NOT_FOUND
    }
}

/// Response handed back by a transport: status plus the undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub path: String,
    pub status: HttpStatusCode,
    pub body: String,
}

impl TransportResponse {
    pub fn ok(path: &str, body: impl Into<String>) -> Self {
        Self {
            path: path.to_owned(),
            status: HttpStatusCode::OK,
            body: body.into(),
        }
    }

    pub fn not_found(path: &str) -> Self {
        Self {
            path: path.to_owned(),
            status: HttpStatusCode::NOT_FOUND,
            body: String::new(),
        }
    }

    /// Decodes a JSON body where absence (404 or `null`) is a normal outcome.
    pub fn json_optional<T>(&self) -> FetchResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        if self.status.is_not_found() {
            return Ok(None);
        }
        if !self.status.is_success() {
            return Err(FetchError::Status {
                path: self.path.clone(),
                status: self.status.as_u16(),
            });
        }

        serde_json::from_str::<Option<T>>(&self.body)
            .map_err(|error| FetchError::decode(&self.path, &error))
    }
}

#[cfg(test)]
mod tests {
    use super::HttpMethod;
    use super::HttpStatusCode;
    use super::TransportResponse;
    use crate::FetchError;

    #[test]
    fn get_is_the_only_method() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
    }

    #[test]
    fn status_code_range_is_enforced() {
        assert!(HttpStatusCode::new(99).is_none());
        assert!(HttpStatusCode::new(600).is_none());
        assert!(HttpStatusCode::new(204).is_some_and(HttpStatusCode::is_success));
    }

    #[test]
    fn not_found_and_null_bodies_decode_as_absent() {
        let missing = TransportResponse::not_found("/api/1.0/boards/ghost/");
        assert_eq!(missing.json_optional::<Vec<u32>>(), Ok(None));

        let null = TransportResponse::ok("/api/1.0/boards/ghost/", "null");
        assert_eq!(null.json_optional::<Vec<u32>>(), Ok(None));

        let present = TransportResponse::ok("/api/1.0/x/", "[1,2]");
        assert_eq!(present.json_optional::<Vec<u32>>(), Ok(Some(vec![1, 2])));
    }

    #[test]
    fn server_errors_and_garbage_are_fetch_errors() {
        let failed = TransportResponse {
            path: "/api/1.0/topics/1/".to_owned(),
            status: HttpStatusCode::new(500).unwrap_or(HttpStatusCode::OK),
            body: String::new(),
        };
        assert!(matches!(
            failed.json_optional::<u32>(),
            Err(FetchError::Status { status: 500, .. })
        ));

        let garbage = TransportResponse::ok("/api/1.0/topics/1/", "<html>");
        assert!(matches!(
            garbage.json_optional::<u32>(),
            Err(FetchError::Decode { .. })
        ));
    }
}
