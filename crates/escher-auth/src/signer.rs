//! The signature engine: key derivation, string to sign, and the
//! authorization header round trip.
//!
//! Signing is a pure, synchronous pipeline:
//!
//! 1. Inject the date header name and `host` into the caller's list of
//!    headers to sign.
//! 2. Build the canonical request ([`crate::canonical`]).
//! 3. Build the string to sign from the algorithm id, the timestamps, the
//!    credential scope, and the canonical request hash.
//! 4. Derive the scoped signing key via the HMAC chain.
//! 5. HMAC the string to sign and hex-encode.
//! 6. Write the authorization header back onto the request.
//!
//! Verification reverses the trip: parse the authorization header, recompute
//! the signature over the received request, and compare in constant time.

use chrono::{DateTime, NaiveDateTime, Utc};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::{build_canonical_request, signed_header_names};
use crate::config::{LONG_DATE_FORMAT, SHORT_DATE_FORMAT, SignerConfig};
use crate::error::SigningError;
use crate::request::{Credential, SignatureResult, SigningRequest};

/// A configured signer for one credential scope.
///
/// Immutable after construction; safe to share across threads and to use for
/// concurrent `sign` calls against distinct request objects. Each call
/// recomputes everything from scratch: derived keys and canonical strings
/// are never cached.
#[derive(Debug, Clone)]
pub struct Signer {
    credential_scope: String,
    algorithm_id: String,
    config: SignerConfig,
}

/// Parsed components of an authorization header value.
///
/// Format:
/// ```text
/// ESR-HMAC-SHA256 Credential=key/20110909/eu/suite/ems_request,
///   SignedHeaders=host;x-escher-date,
///   Signature=<hex-signature>
/// ```
#[derive(Debug, Clone)]
pub struct ParsedAuthorization {
    /// The textual algorithm identifier.
    pub algorithm_id: String,
    /// The credential field: `key_id/date_stamp/scope...`.
    pub credential: String,
    /// The signed header names, as listed.
    pub signed_headers: Vec<String>,
    /// The hex-encoded signature.
    pub signature: String,
}

impl Signer {
    /// Create a signer for the given `/`-delimited credential scope.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::InvalidCredentialScope`] if the scope is empty
    /// or contains empty components. This is the construction-time half of
    /// the configuration validation; the hash algorithm was already resolved
    /// when the [`SignerConfig`] was built.
    pub fn new(
        credential_scope: impl Into<String>,
        config: SignerConfig,
    ) -> Result<Self, SigningError> {
        let credential_scope = credential_scope.into();
        if credential_scope.is_empty() || credential_scope.split('/').any(str::is_empty) {
            return Err(SigningError::InvalidCredentialScope(credential_scope));
        }

        let algorithm_id = config.algorithm_id();
        Ok(Self {
            credential_scope,
            algorithm_id,
            config,
        })
    }

    /// The textual algorithm identifier, e.g. `ESR-HMAC-SHA256`.
    #[must_use]
    pub fn algorithm_id(&self) -> &str {
        &self.algorithm_id
    }

    /// The configured credential scope.
    #[must_use]
    pub fn credential_scope(&self) -> &str {
        &self.credential_scope
    }

    /// The signer configuration.
    #[must_use]
    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    /// Sign a request and attach the authorization header.
    ///
    /// `names_to_sign` is caller-owned; the lower-cased date header name and
    /// `host` are appended in place (order-preserving) when absent, so the
    /// final set is visible to the caller. The request is mutated exactly
    /// once: the authorization header write.
    ///
    /// # Errors
    ///
    /// Propagates header-access and header-write failures from the request
    /// adapter. No partial signature is ever attached.
    pub fn sign<R: SigningRequest>(
        &self,
        request: &mut R,
        credential: &Credential,
        names_to_sign: &mut Vec<String>,
    ) -> Result<SignatureResult, SigningError> {
        for required in [self.config.date_header_name.to_ascii_lowercase(), "host".to_owned()] {
            if !names_to_sign.iter().any(|n| n.eq_ignore_ascii_case(&required)) {
                names_to_sign.push(required);
            }
        }

        let short_date = self.config.short_date();
        let result = self.compute_signature(
            request,
            credential,
            names_to_sign,
            &self.config.long_date(),
            &short_date,
        )?;

        request.set_header(
            &self.config.auth_header_name,
            &result.authorization_header(&credential.api_key),
        )?;

        Ok(result)
    }

    /// Verify a previously signed request.
    ///
    /// Parses the authorization header, checks the algorithm id, key id, and
    /// credential scope against this signer, recomputes the signature over
    /// the received request using the timestamp carried in the date header,
    /// and compares in constant time. Freshness (clock skew) is deliberately
    /// not checked here; compare the request time against the verifier's
    /// clock with the configured `clock_skew` tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::MissingAuthHeader`], [`SigningError::InvalidAuthHeader`],
    /// [`SigningError::UnsupportedAlgorithm`], [`SigningError::CredentialMismatch`],
    /// [`SigningError::MissingHeader`], or [`SigningError::SignatureDoesNotMatch`]
    /// depending on what fails first.
    pub fn verify<R: SigningRequest>(
        &self,
        request: &R,
        credential: &Credential,
    ) -> Result<SignatureResult, SigningError> {
        let headers = request.headers()?;
        let auth_value = header_value(&headers, &self.config.auth_header_name)
            .ok_or(SigningError::MissingAuthHeader)?
            .to_owned();
        let parsed = parse_authorization_header(&auth_value)?;

        if parsed.algorithm_id != self.algorithm_id {
            return Err(SigningError::UnsupportedAlgorithm(parsed.algorithm_id));
        }

        // Credential field: key_id/date_stamp/scope components.
        let (api_key, rest) = parsed
            .credential
            .split_once('/')
            .ok_or(SigningError::InvalidAuthHeader)?;
        let (short_date, scope) = rest
            .split_once('/')
            .ok_or(SigningError::InvalidAuthHeader)?;
        if api_key != credential.api_key || scope != self.credential_scope {
            return Err(SigningError::CredentialMismatch);
        }

        let date_value = header_value(&headers, &self.config.date_header_name)
            .ok_or_else(|| SigningError::MissingHeader(self.config.date_header_name.clone()))?;
        let request_time = parse_date_header(date_value)?;
        if request_time.format(SHORT_DATE_FORMAT).to_string() != short_date {
            return Err(SigningError::CredentialMismatch);
        }

        let expected = self.compute_signature(
            request,
            credential,
            &parsed.signed_headers,
            &request_time.format(LONG_DATE_FORMAT).to_string(),
            short_date,
        )?;

        debug!(
            expected = %expected.signature,
            provided = %parsed.signature,
            "comparing signatures"
        );

        if expected
            .signature
            .as_bytes()
            .ct_eq(parsed.signature.as_bytes())
            .into()
        {
            Ok(expected)
        } else {
            Err(SigningError::SignatureDoesNotMatch)
        }
    }

    /// Derive the scoped signing key for a date stamp.
    ///
    /// `key0 = HMAC(algo_prefix ++ secret, date_stamp)`, then a strict
    /// left-fold of HMAC over the scope components in order. The prefix is
    /// concatenated onto the raw secret, not applied as a separate
    /// derivation step.
    #[must_use]
    pub fn derive_signing_key(&self, api_secret: &str, date_stamp: &str) -> Vec<u8> {
        let prefixed_secret = format!("{}{}", self.config.algo_prefix, api_secret);
        let mut key = self
            .config
            .hash_algo
            .hmac(prefixed_secret.as_bytes(), date_stamp.as_bytes());
        for component in self.credential_scope.split('/') {
            key = self.config.hash_algo.hmac(&key, component.as_bytes());
        }
        key
    }

    /// Shared signing core: canonical request, string to sign, key chain,
    /// final HMAC. Used by both directions with their respective timestamps.
    fn compute_signature<R: SigningRequest>(
        &self,
        request: &R,
        credential: &Credential,
        names_to_sign: &[String],
        long_date: &str,
        short_date: &str,
    ) -> Result<SignatureResult, SigningError> {
        let headers = request.headers()?;
        let payload_hash = self.config.hash_algo.hash_hex(request.body());

        let canonical = build_canonical_request(
            request.method(),
            request.path(),
            request.query(),
            &headers,
            names_to_sign,
            &payload_hash,
        );
        debug!(canonical_request = %canonical, "built canonical request");

        let string_to_sign = format!(
            "{}\n{}\n{}/{}\n{}",
            self.algorithm_id,
            long_date,
            short_date,
            self.credential_scope,
            self.config.hash_algo.hash_hex(canonical.as_bytes())
        );
        debug!(string_to_sign = %string_to_sign, "built string to sign");

        let signing_key = self.derive_signing_key(&credential.api_secret, short_date);
        let signature = hex::encode(
            self.config
                .hash_algo
                .hmac(&signing_key, string_to_sign.as_bytes()),
        );

        Ok(SignatureResult {
            algorithm_id: self.algorithm_id.clone(),
            credential_scope: format!("{short_date}/{}", self.credential_scope),
            signed_headers: signed_header_names(names_to_sign),
            signature,
        })
    }
}

/// Parse an authorization header value into its components.
///
/// # Errors
///
/// Returns [`SigningError::InvalidAuthHeader`] if the header does not carry
/// all of `Credential=`, `SignedHeaders=`, and `Signature=`.
pub fn parse_authorization_header(header: &str) -> Result<ParsedAuthorization, SigningError> {
    let (algorithm_id, rest) = header
        .split_once(' ')
        .ok_or(SigningError::InvalidAuthHeader)?;

    let mut credential = None;
    let mut signed_headers = None;
    let mut signature = None;

    for part in rest.split(',') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix("Credential=") {
            credential = Some(value);
        } else if let Some(value) = part.strip_prefix("SignedHeaders=") {
            signed_headers = Some(value);
        } else if let Some(value) = part.strip_prefix("Signature=") {
            signature = Some(value);
        }
    }

    let credential = credential.ok_or(SigningError::InvalidAuthHeader)?;
    let signed_headers = signed_headers.ok_or(SigningError::InvalidAuthHeader)?;
    let signature = signature.ok_or(SigningError::InvalidAuthHeader)?;

    Ok(ParsedAuthorization {
        algorithm_id: algorithm_id.to_owned(),
        credential: credential.to_owned(),
        signed_headers: signed_headers.split(';').map(ToOwned::to_owned).collect(),
        signature: signature.to_owned(),
    })
}

/// Find a header value by case-insensitive name.
fn header_value<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Parse a date header value: the long-date format first, RFC 2822
/// (`Date`-style headers) as the fallback.
///
/// The RFC 2822 fallback drops the optional weekday token instead of
/// validating it against the date. The AWS4 reference vectors carry a
/// weekday that does not match their calendar date.
fn parse_date_header(value: &str) -> Result<DateTime<Utc>, SigningError> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, LONG_DATE_FORMAT) {
        return Ok(naive.and_utc());
    }
    let without_weekday = value
        .split_once(',')
        .map_or(value, |(_, rest)| rest)
        .trim();
    NaiveDateTime::parse_from_str(without_weekday, "%d %b %Y %H:%M:%S GMT")
        .map(|naive| naive.and_utc())
        .map_err(|_| SigningError::MalformedRequest(format!("unparsable date header: {value}")))
}
