//! Signer configuration: hash algorithm selection, header names, and the
//! captured signing time.
//!
//! Everything here is resolved once, at configuration construction. The
//! signing hot path never reads the clock and never re-validates the
//! algorithm, which keeps `sign` deterministic for a fixed configuration.

use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use sha2::{Digest, Sha256, Sha512};

use crate::error::SigningError;

/// Timestamp format for the string to sign (`YYYYMMDDTHHMMSSZ`, UTC).
pub const LONG_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";
/// Date stamp format for key derivation and the credential line (`YYYYMMDD`, UTC).
pub const SHORT_DATE_FORMAT: &str = "%Y%m%d";

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// The hash function used uniformly for HMAC steps and content digests.
///
/// The algorithm is fixed per signer configuration; an unsupported name is
/// rejected when the configuration is built, never during signing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// SHA-256 (the default).
    #[default]
    Sha256,
    /// SHA-512.
    Sha512,
}

impl HashAlgorithm {
    /// Resolve an algorithm from its textual name (`SHA256` or `SHA512`).
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::UnsupportedHashAlgorithm`] for any other name.
    ///
    /// # Examples
    ///
    /// ```
    /// use escher_auth::HashAlgorithm;
    ///
    /// assert_eq!(HashAlgorithm::from_name("SHA256").unwrap(), HashAlgorithm::Sha256);
    /// assert!(HashAlgorithm::from_name("MD5").is_err());
    /// ```
    pub fn from_name(name: &str) -> Result<Self, SigningError> {
        match name {
            "SHA256" => Ok(Self::Sha256),
            "SHA512" => Ok(Self::Sha512),
            other => Err(SigningError::UnsupportedHashAlgorithm(other.to_owned())),
        }
    }

    /// The textual name used in the algorithm id (`{prefix}-HMAC-{name}`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
        }
    }

    /// Compute the lower-case hex digest of `data`.
    #[must_use]
    pub fn hash_hex(self, data: &[u8]) -> String {
        match self {
            Self::Sha256 => hex::encode(Sha256::digest(data)),
            Self::Sha512 => hex::encode(Sha512::digest(data)),
        }
    }

    /// Compute the raw HMAC of `message` under `key`.
    #[must_use]
    pub fn hmac(self, key: &[u8], message: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => {
                let mut mac = HmacSha256::new_from_slice(key)
                    .expect("HMAC can accept keys of any length");
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
            Self::Sha512 => {
                let mut mac = HmacSha512::new_from_slice(key)
                    .expect("HMAC can accept keys of any length");
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
        }
    }
}

/// Configuration for a [`Signer`](crate::Signer).
///
/// Defaults match the Escher protocol (`ESR` prefix, `X-Escher-*` headers);
/// AWS SigV4 compatibility is the same knobs set via [`SignerConfig::aws4`].
///
/// `current_time` is captured once when the configuration is built and used
/// for every call made with it. Reconstructing the configuration is the only
/// way to pick up a new timestamp.
#[derive(Debug, Clone)]
pub struct SignerConfig {
    /// Algorithm prefix, e.g. `ESR` or `AWS4`. Also concatenated onto the
    /// raw secret as the first key-derivation step.
    pub algo_prefix: String,
    /// Hash function for HMAC steps and content digests.
    pub hash_algo: HashAlgorithm,
    /// Name of the header the signature is written to.
    pub auth_header_name: String,
    /// Name of the header carrying the request timestamp.
    pub date_header_name: String,
    /// Clock-skew tolerance in seconds. Not consumed by signing or signature
    /// verification; exposed for the caller's freshness check.
    pub clock_skew: u64,
    /// The signing time, captured at construction.
    pub current_time: DateTime<Utc>,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            algo_prefix: "ESR".to_owned(),
            hash_algo: HashAlgorithm::Sha256,
            auth_header_name: "X-Escher-Auth".to_owned(),
            date_header_name: "X-Escher-Date".to_owned(),
            clock_skew: 300,
            current_time: Utc::now(),
        }
    }
}

impl SignerConfig {
    /// Configuration for AWS SigV4 compatibility mode: `AWS4` prefix,
    /// `Authorization` and `Date` headers.
    #[must_use]
    pub fn aws4() -> Self {
        Self {
            algo_prefix: "AWS4".to_owned(),
            auth_header_name: "Authorization".to_owned(),
            date_header_name: "Date".to_owned(),
            ..Self::default()
        }
    }

    /// Set the algorithm prefix.
    #[must_use]
    pub fn with_algo_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.algo_prefix = prefix.into();
        self
    }

    /// Set the hash algorithm.
    #[must_use]
    pub fn with_hash_algo(mut self, hash_algo: HashAlgorithm) -> Self {
        self.hash_algo = hash_algo;
        self
    }

    /// Set the authentication header name.
    #[must_use]
    pub fn with_auth_header_name(mut self, name: impl Into<String>) -> Self {
        self.auth_header_name = name.into();
        self
    }

    /// Set the date header name.
    #[must_use]
    pub fn with_date_header_name(mut self, name: impl Into<String>) -> Self {
        self.date_header_name = name.into();
        self
    }

    /// Set the clock-skew tolerance in seconds.
    #[must_use]
    pub fn with_clock_skew(mut self, seconds: u64) -> Self {
        self.clock_skew = seconds;
        self
    }

    /// Set the signing time.
    #[must_use]
    pub fn with_current_time(mut self, time: DateTime<Utc>) -> Self {
        self.current_time = time;
        self
    }

    /// The textual algorithm identifier, e.g. `ESR-HMAC-SHA256`.
    #[must_use]
    pub fn algorithm_id(&self) -> String {
        format!("{}-HMAC-{}", self.algo_prefix, self.hash_algo.name())
    }

    /// The signing time as `YYYYMMDDTHHMMSSZ`.
    #[must_use]
    pub fn long_date(&self) -> String {
        self.current_time.format(LONG_DATE_FORMAT).to_string()
    }

    /// The signing time as `YYYYMMDD`.
    #[must_use]
    pub fn short_date(&self) -> String {
        self.current_time.format(SHORT_DATE_FORMAT).to_string()
    }
}
