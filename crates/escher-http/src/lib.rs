//! Request adapters for `escher-auth`.
//!
//! The signing core is polymorphic over request representations through the
//! `SigningRequest` trait; this crate provides the two concrete adapters:
//!
//! - [`RequestParts`] - a plain structured request (method/URI/headers/body
//!   fields), for callers without an HTTP library in play
//! - [`SignableRequest`] - a wrapper over `http::Request<Vec<u8>>`
//!
//! Both parse URIs and query strings identically (standard form-encoding,
//! `;` treated as a literal character, blank values kept), so a request
//! signed through either adapter produces the same signature.
//!
//! # Usage
//!
//! ```rust
//! use escher_auth::{Credential, Signer, SignerConfig, SigningRequest};
//! use escher_http::RequestParts;
//!
//! let signer = Signer::new("eu/suite/ems_request", SignerConfig::default()).unwrap();
//! let credential = Credential::new("key-id", "secret");
//!
//! let mut request = RequestParts::new(
//!     "GET",
//!     "/?foo=bar",
//!     vec![
//!         ("Host".to_owned(), "example.com".to_owned()),
//!         ("X-Escher-Date".to_owned(), signer.config().long_date()),
//!     ],
//!     Vec::new(),
//! );
//! let mut names_to_sign = Vec::new();
//! let result = signer.sign(&mut request, &credential, &mut names_to_sign).unwrap();
//! assert_eq!(result.signed_headers, vec!["host".to_owned(), "x-escher-date".to_owned()]);
//! ```

pub mod parts;
pub mod request;

pub use parts::RequestParts;
pub use request::SignableRequest;
