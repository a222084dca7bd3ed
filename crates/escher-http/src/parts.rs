//! The plain structured-request adapter.
//!
//! [`RequestParts`] carries the request as plain fields (method, URI,
//! headers, body) with no HTTP library involved. The URI is split into path
//! and query at construction; the query string is parsed as standard
//! form-encoding, with `;` treated as a literal character rather than a pair
//! separator (escaped before parsing) and blank values kept.

use escher_auth::{SigningError, SigningRequest};

/// An HTTP request held as plain fields, ready for signing.
#[derive(Debug, Clone)]
pub struct RequestParts {
    method: String,
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl RequestParts {
    /// Build from a method, a request URI (path, optional query, optional
    /// fragment), header pairs, and body bytes.
    pub fn new(
        method: impl Into<String>,
        uri: &str,
        headers: Vec<(String, String)>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        let (path, query) = split_request_uri(uri);
        Self {
            method: method.into(),
            path,
            query,
            headers,
            body: body.into(),
        }
    }
}

impl SigningRequest for RequestParts {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn query(&self) -> &[(String, String)] {
        &self.query
    }

    fn headers(&self) -> Result<Vec<(String, String)>, SigningError> {
        Ok(self.headers.clone())
    }

    fn body(&self) -> &[u8] {
        &self.body
    }

    fn set_header(&mut self, name: &str, value: &str) -> Result<(), SigningError> {
        self.headers.push((name.to_owned(), value.to_owned()));
        Ok(())
    }
}

/// Split a request URI into its path and parsed query pairs.
///
/// Anything after `#` is dropped; the first `?` separates path from query.
fn split_request_uri(uri: &str) -> (String, Vec<(String, String)>) {
    let without_fragment = uri.split_once('#').map_or(uri, |(before, _)| before);
    let (path, query) = without_fragment
        .split_once('?')
        .map_or((without_fragment, ""), |(path, query)| (path, query));
    (path.to_owned(), parse_query_string(query))
}

/// Parse a raw query string into ordered, decoded pairs.
///
/// `;` is escaped to `%3b` first so it parses as a literal character, not a
/// pair separator. Keys without `=` become pairs with an empty value.
pub(crate) fn parse_query_string(query: &str) -> Vec<(String, String)> {
    let escaped = query.replace(';', "%3b");
    form_urlencoded::parse(escaped.as_bytes())
        .into_owned()
        .collect()
}
