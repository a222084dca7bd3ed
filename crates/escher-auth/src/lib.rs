//! HMAC-based HTTP request signing in the AWS SigV4 family (Escher protocol).
//!
//! Given an HTTP request and a credential (key id + secret), this crate
//! derives a canonical textual representation of the request, combines it
//! with a date-scoped key-derivation chain, and produces a signature that a
//! verifying party can independently recompute to authenticate the request
//! and detect tampering.
//!
//! # Overview
//!
//! The whole pipeline is a pure, synchronous computation: no I/O, no shared
//! mutable state, no caching. A [`Signer`] holds an immutable configuration
//! (algorithm, credential scope, captured signing time); each `sign` call
//! recomputes everything from scratch and mutates the request exactly once,
//! writing the authorization header.
//!
//! # Usage
//!
//! ```rust
//! use escher_auth::{Credential, Signer, SignerConfig};
//!
//! let config = SignerConfig::default();
//! let signer = Signer::new("eu/suite/ems_request", config).unwrap();
//! let credential = Credential::new("key-id", "secret");
//!
//! // Sign any type implementing `SigningRequest` (adapters in `escher-http`):
//! // let result = signer.sign(&mut request, &credential, &mut names_to_sign)?;
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical request construction (path, query, headers)
//! - [`config`] - Hash algorithm and signer configuration
//! - [`error`] - Signing and verification error types
//! - [`request`] - The `SigningRequest` trait and result types
//! - [`signer`] - Key derivation, signing, and verification

pub mod canonical;
pub mod config;
pub mod error;
pub mod request;
pub mod signer;

pub use config::{HashAlgorithm, SignerConfig};
pub use error::SigningError;
pub use request::{Credential, SignatureResult, SigningRequest};
pub use signer::{ParsedAuthorization, Signer, parse_authorization_header};
