//! Canonical request construction.
//!
//! The canonical request is the deterministic textual encoding of an HTTP
//! request that both signer and verifier must derive bit-for-bit identically:
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalPath\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! Each component is normalized by the rules in this module.

use std::borrow::Cow;
use std::sync::LazyLock;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;

/// The set of characters percent-encoded in query keys and values.
///
/// Alphanumerics, the URL-quoting always-safe characters (`-`, `_`, `.`),
/// and the protocol's extra safe set (`~+!'()*`) pass through unencoded.
/// Everything else is encoded; space becomes `%20`, never `+`.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'+')
    .remove(b'!')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*');

/// The single path-rewrite rule: any of `segment/../`, `/./`, `//`,
/// trailing `/.`, or trailing `/..` collapses to `/`.
static PATH_REWRITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([^/]+/\.\./?|/\./|//|/\.$|/\.\.$)").expect("path rewrite pattern is valid")
});

/// Normalize an HTTP path by resolving `.`/`..` segments and duplicate slashes.
///
/// The rewrite rule is applied one match at a time on the whole remaining
/// string until it no longer matches. This is not one-pass resolution:
/// iterating single substitutions is what makes nested cases like
/// `/a/b/../../c` come out right. Percent-encoded characters inside
/// segments pass through undecoded.
///
/// # Examples
///
/// ```
/// use escher_auth::canonical::normalize_path;
///
/// assert_eq!(normalize_path("/example/./path/../path/"), "/example/path/");
/// assert_eq!(normalize_path("/"), "/");
/// ```
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let mut current = path.to_owned();
    loop {
        let rewritten = match PATH_REWRITE.replacen(&current, 1, "/") {
            Cow::Owned(next) => next,
            Cow::Borrowed(_) => break,
        };
        current = rewritten;
    }
    current
}

/// Build the canonical query string from an ordered sequence of pairs.
///
/// Each key and value is percent-encoded, the encoded `key=value` tokens are
/// sorted lexicographically (by encoded text, not original key), and joined
/// with `&`. Duplicate keys stay as separate pairs. Empty input yields the
/// empty string.
///
/// # Examples
///
/// ```
/// use escher_auth::canonical::encode_query;
///
/// let pairs = [
///     ("foo".to_owned(), "bar".to_owned()),
///     ("abc".to_owned(), "cba".to_owned()),
/// ];
/// assert_eq!(encode_query(&pairs), "abc=cba&foo=bar");
/// ```
#[must_use]
pub fn encode_query(pairs: &[(String, String)]) -> String {
    let mut tokens: Vec<String> = pairs
        .iter()
        .map(|(key, value)| format!("{}={}", query_encode(key), query_encode(value)))
        .collect();
    tokens.sort_unstable();
    tokens.join("&")
}

/// Build the canonical headers block.
///
/// Headers whose lower-cased name appears in `names_to_sign` are kept, their
/// values are normalized with [`normalize_header_value`], each is formatted
/// as `lowercased-name:value`, and the complete lines are sorted (the sort
/// key is the whole line, which breaks ties between repeated names by
/// value). Lines are joined with `\n`, no trailing newline.
#[must_use]
pub fn select_headers(headers: &[(String, String)], names_to_sign: &[String]) -> String {
    let mut lines: Vec<String> = headers
        .iter()
        .filter_map(|(name, value)| {
            let lower = name.to_ascii_lowercase();
            names_to_sign
                .iter()
                .any(|n| n.eq_ignore_ascii_case(&lower))
                .then(|| format!("{lower}:{}", normalize_header_value(value)))
        })
        .collect();
    lines.sort_unstable();
    lines.join("\n")
}

/// Normalize a header value: collapse whitespace runs to a single space
/// outside double-quoted substrings, preserve whitespace inside them, and
/// trim the whole result.
///
/// The value is split on `"`; even-indexed segments are the unquoted ones.
#[must_use]
pub fn normalize_header_value(value: &str) -> String {
    let parts: Vec<String> = value
        .split('"')
        .enumerate()
        .map(|(index, part)| {
            if index % 2 == 0 {
                collapse_whitespace(part)
            } else {
                part.to_owned()
            }
        })
        .collect();
    parts.join("\"").trim().to_owned()
}

/// The signed header names: lower-cased, sorted, deduplicated.
#[must_use]
pub fn signed_header_names(names_to_sign: &[String]) -> Vec<String> {
    let mut names: Vec<String> = names_to_sign
        .iter()
        .map(|name| name.to_ascii_lowercase())
        .collect();
    names.sort_unstable();
    names.dedup();
    names
}

/// Build the full canonical request string.
///
/// `method` is passed through unmodified; callers supply it upper-cased.
/// `payload_hash` is the lower-case hex digest of the body under the
/// configured hash algorithm.
#[must_use]
pub fn build_canonical_request(
    method: &str,
    path: &str,
    query_pairs: &[(String, String)],
    headers: &[(String, String)],
    names_to_sign: &[String],
    payload_hash: &str,
) -> String {
    let canonical_path = normalize_path(path);
    let canonical_query = encode_query(query_pairs);
    let canonical_headers = select_headers(headers, names_to_sign);
    let signed_headers = signed_header_names(names_to_sign).join(";");

    format!(
        "{method}\n{canonical_path}\n{canonical_query}\n{canonical_headers}\n\n{signed_headers}\n{payload_hash}"
    )
}

fn query_encode(input: &str) -> String {
    utf8_percent_encode(input, QUERY_ENCODE_SET).to_string()
}

/// Collapse consecutive whitespace characters to a single space.
fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }
    result
}
