//! Paginated response envelope.

use folio_core::constants::CURSOR_QUERY_PARAM;
use folio_core::{Cursor, CursorCodec};
use serde::Serialize;

/// One page of results plus the tokens for its neighbours.
///
/// `previous` and `next` hold encoded cursor tokens until
/// [`Page::into_links`] turns them into absolute URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub previous: Option<String>,
    pub next: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Build a page from decoded neighbour cursors.
    pub fn new(previous: Option<Cursor>, next: Option<Cursor>, results: Vec<T>) -> Self {
        Self {
            previous: previous.as_ref().map(CursorCodec::encode),
            next: next.as_ref().map(CursorCodec::encode),
            results,
        }
    }

    /// A page with no results and no neighbours.
    pub fn empty() -> Self {
        Self {
            previous: None,
            next: None,
            results: Vec::new(),
        }
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Transform the results, keeping the cursors.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            previous: self.previous,
            next: self.next,
            results: self.results.into_iter().map(f).collect(),
        }
    }

    /// Replace cursor tokens with links built from the request URL.
    ///
    /// The `cursor` parameter of `base_url` is replaced (or appended); all
    /// other query parameters are kept as they are.
    pub fn into_links(self, base_url: &str) -> Self {
        let link = |token: String| replace_query_param(base_url, CURSOR_QUERY_PARAM, &token);
        Self {
            previous: self.previous.map(link),
            next: self.next.map(link),
            results: self.results,
        }
    }
}

/// Set `name=value` in the query string of `url`.
///
/// Every existing occurrence of `name` is dropped and the new pair takes
/// the position of the first one, or is appended. A `#fragment` is kept at
/// the end.
pub fn replace_query_param(url: &str, name: &str, value: &str) -> String {
    let (without_fragment, fragment) = match url.split_once('#') {
        Some((head, frag)) => (head, Some(frag)),
        None => (url, None),
    };
    let (path, query) = without_fragment
        .split_once('?')
        .unwrap_or((without_fragment, ""));

    let replacement = format!("{}={}", name, urlencoding::encode(value));
    let mut pairs: Vec<String> = Vec::new();
    let mut replaced = false;

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let key = pair.split_once('=').map_or(pair, |(k, _)| k);
        let matches = urlencoding::decode(key).map_or(false, |k| k == name);
        if !matches {
            pairs.push(pair.to_string());
        } else if !replaced {
            pairs.push(replacement.clone());
            replaced = true;
        }
    }
    if !replaced {
        pairs.push(replacement);
    }

    let mut out = format!("{}?{}", path, pairs.join("&"));
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}
