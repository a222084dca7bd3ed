//! The signing-request abstraction and the signature result types.
//!
//! The signer is polymorphic over request representations through the
//! [`SigningRequest`] trait. Concrete adapters (a plain structured request
//! and one over `http::Request`) live in the `escher-http` crate; both must
//! behave identically under this contract.

use std::fmt;

use crate::error::SigningError;

/// Read access to the parts of an HTTP request that participate in signing,
/// plus the single header write that attaches the result.
///
/// The request is read-only during signing except for that one write.
/// Adapters parse the URI into path and query pairs up front, so `path` and
/// `query` are infallible; `headers` is fallible because some
/// representations allow non-UTF-8 header values.
pub trait SigningRequest {
    /// The HTTP method, already upper-cased by convention.
    fn method(&self) -> &str;

    /// The request path, before canonical normalization.
    fn path(&self) -> &str;

    /// The query parameters as an ordered sequence of decoded pairs.
    fn query(&self) -> &[(String, String)];

    /// All header name/value pairs, duplicates allowed.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::NonUtf8Header`] if a header value cannot be
    /// represented as text.
    fn headers(&self) -> Result<Vec<(String, String)>, SigningError>;

    /// The raw body bytes.
    fn body(&self) -> &[u8];

    /// Write a header onto the request (used once, for the signature header).
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::InvalidHeader`] if the name or value is not
    /// representable in the underlying request type.
    fn set_header(&mut self, name: &str, value: &str) -> Result<(), SigningError>;
}

/// A signing credential: key id plus secret.
///
/// Opaque to the signer; never transformed, only consumed. The secret is
/// redacted from debug output.
#[derive(Clone)]
pub struct Credential {
    /// The key id, embedded in the authorization header.
    pub api_key: String,
    /// The secret, consumed by the key-derivation chain.
    pub api_secret: String,
}

impl Credential {
    /// Create a credential from a key id and secret.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// The outcome of a successful signing (or verification) call.
///
/// Immutable once produced; serialized into a single header value by
/// [`SignatureResult::authorization_header`].
#[derive(Debug, Clone)]
pub struct SignatureResult {
    /// The textual algorithm identifier, e.g. `ESR-HMAC-SHA256`.
    pub algorithm_id: String,
    /// The date-stamped credential scope, e.g. `20110909/us-east-1/host/aws4_request`.
    pub credential_scope: String,
    /// The signed header names: ordered, deduplicated, lower-cased.
    pub signed_headers: Vec<String>,
    /// The hex-encoded signature.
    pub signature: String,
}

impl SignatureResult {
    /// Format the authorization header value for the given key id.
    ///
    /// # Examples
    ///
    /// ```
    /// use escher_auth::SignatureResult;
    ///
    /// let result = SignatureResult {
    ///     algorithm_id: "ESR-HMAC-SHA256".to_owned(),
    ///     credential_scope: "20110909/eu/suite/ems_request".to_owned(),
    ///     signed_headers: vec!["host".to_owned(), "x-escher-date".to_owned()],
    ///     signature: "f36c21c6e16a71a6e8dc56673ad6354aeef49c577a22fd58a190b5fcf8891dbd".to_owned(),
    /// };
    /// assert_eq!(
    ///     result.authorization_header("AKID"),
    ///     "ESR-HMAC-SHA256 Credential=AKID/20110909/eu/suite/ems_request, \
    ///      SignedHeaders=host;x-escher-date, \
    ///      Signature=f36c21c6e16a71a6e8dc56673ad6354aeef49c577a22fd58a190b5fcf8891dbd"
    /// );
    /// ```
    #[must_use]
    pub fn authorization_header(&self, api_key: &str) -> String {
        format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            self.algorithm_id,
            api_key,
            self.credential_scope,
            self.signed_headers.join(";"),
            self.signature
        )
    }
}
