//! Error types for request signing and verification.
//!
//! All failures are represented by [`SigningError`], with one variant per
//! failure mode. Configuration problems surface at signer construction,
//! never mid-signature; request problems surface before any partial
//! signature is produced.

/// Errors that can occur while configuring a signer, signing a request,
/// or verifying a signed request.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    /// The configured hash algorithm name is not supported
    /// (only `SHA256` and `SHA512` are).
    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedHashAlgorithm(String),

    /// The credential scope is empty or contains empty components.
    #[error("Invalid credential scope: {0:?}")]
    InvalidCredentialScope(String),

    /// The request URI, query string, or date header could not be parsed.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// A header carries a value that is not valid UTF-8 where text is required.
    #[error("Header {0} is not valid UTF-8")]
    NonUtf8Header(String),

    /// A header name or value to be written back is not representable
    /// in the target request type.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The authentication header is missing from the request under verification.
    #[error("Missing authentication header")]
    MissingAuthHeader,

    /// The authentication header could not be parsed.
    #[error("Invalid authentication header format")]
    InvalidAuthHeader,

    /// The signing algorithm id in the authentication header does not match
    /// the signer's configuration.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A required header (date header, or one named in `SignedHeaders`)
    /// is missing from the request under verification.
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    /// The key id, credential scope, or date stamp in the authentication
    /// header does not match the signer's credential and scope.
    #[error("Credential does not match the configured scope")]
    CredentialMismatch,

    /// The recomputed signature does not match the provided signature.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,
}
