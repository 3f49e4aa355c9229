//! Incoming page request.

use folio_core::constants::{CURSOR_QUERY_PARAM, PAGE_SIZE_QUERY_PARAM};

/// The two query parameters a paginated endpoint understands.
///
/// `page_size` is only consulted on a first-page request; once a cursor
/// exists the walk's page size is pinned inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub cursor: Option<String>,
    pub page_size: Option<i64>,
}

impl PageRequest {
    /// A first-page request with the configured default size.
    pub fn first() -> Self {
        Self::default()
    }

    /// Parse a raw query string such as `cursor=abc&page_size=20`.
    ///
    /// Parsing never fails. Unknown parameters are ignored, an empty
    /// `cursor` counts as absent, and a `page_size` that is not an integer
    /// is dropped so the default applies. When a parameter repeats, the last
    /// occurrence wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut request = Self::default();

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            let Some(name) = decode_component(name) else {
                continue;
            };
            let value = decode_component(value);

            match name.as_str() {
                CURSOR_QUERY_PARAM => {
                    request.cursor = value.filter(|v| !v.is_empty());
                }
                PAGE_SIZE_QUERY_PARAM => {
                    request.page_size = value.and_then(|v| v.trim().parse().ok());
                }
                _ => {}
            }
        }

        request
    }

    /// Set the cursor token.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Set the requested page size.
    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Whether this request starts a new walk.
    pub fn is_first_page(&self) -> bool {
        self.cursor.is_none()
    }
}

fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(|s| s.into_owned())
}
