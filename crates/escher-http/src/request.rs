//! Adapter over the `http` crate's native request type.
//!
//! [`SignableRequest`] wraps an `http::Request<Vec<u8>>`, pre-parsing its
//! URI into path and query pairs with exactly the same rules as the plain
//! [`RequestParts`](crate::RequestParts) adapter, so both representations
//! canonicalize identically.

use escher_auth::{SigningError, SigningRequest};
use http::header::{HeaderName, HeaderValue};

use crate::parts::parse_query_string;

/// An `http::Request` wrapped for signing.
#[derive(Debug)]
pub struct SignableRequest {
    inner: http::Request<Vec<u8>>,
    path: String,
    query: Vec<(String, String)>,
}

impl SignableRequest {
    /// Wrap a request, parsing its URI into path and query pairs.
    #[must_use]
    pub fn new(request: http::Request<Vec<u8>>) -> Self {
        let path = request.uri().path().to_owned();
        let query = parse_query_string(request.uri().query().unwrap_or(""));
        Self {
            inner: request,
            path,
            query,
        }
    }

    /// A reference to the wrapped request.
    #[must_use]
    pub fn inner(&self) -> &http::Request<Vec<u8>> {
        &self.inner
    }

    /// Unwrap into the underlying request (with the signature header attached
    /// after a successful `sign`).
    #[must_use]
    pub fn into_inner(self) -> http::Request<Vec<u8>> {
        self.inner
    }
}

impl SigningRequest for SignableRequest {
    fn method(&self) -> &str {
        self.inner.method().as_str()
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn query(&self) -> &[(String, String)] {
        &self.query
    }

    fn headers(&self) -> Result<Vec<(String, String)>, SigningError> {
        self.inner
            .headers()
            .iter()
            .map(|(name, value)| {
                let value = value
                    .to_str()
                    .map_err(|_| SigningError::NonUtf8Header(name.as_str().to_owned()))?;
                Ok((name.as_str().to_owned(), value.to_owned()))
            })
            .collect()
    }

    fn body(&self) -> &[u8] {
        self.inner.body()
    }

    fn set_header(&mut self, name: &str, value: &str) -> Result<(), SigningError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| SigningError::InvalidHeader(e.to_string()))?;
        let value =
            HeaderValue::from_str(value).map_err(|e| SigningError::InvalidHeader(e.to_string()))?;
        self.inner.headers_mut().insert(name, value);
        Ok(())
    }
}
