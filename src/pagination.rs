//! Cursor-based list pagination
//!
//! Every list endpoint of the gateway shares the same contract: an optional
//! `page_size`/`page_token` query pair on the way in, and a
//! `{"result": [...], "next_page_token": "..."}` envelope on the way out.
//! The token is opaque to this layer. Semantically it is the creation
//! timestamp of the last record of the previous page, but the gateway never
//! parses it; it only forwards it to the backend lister and re-derives the
//! next one from the page it gets back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default and maximum page size shared by every list endpoint.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Timestamp rendering used for typed creation-time cursors.
pub const PAGE_TOKEN_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Pagination query parameters accepted by every list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page_size: Option<u64>,
    pub page_token: Option<String>,
}

impl PageParams {
    /// Effective page size: requested values outside `(0, 100]` silently
    /// reset to the default of 100.
    pub fn effective_size(&self) -> u64 {
        match self.page_size {
            Some(size) if size > 0 && size <= DEFAULT_PAGE_SIZE => size,
            Some(size) => {
                tracing::debug!(
                    page_size = size,
                    "Invalid requested page size. Set to default."
                );
                DEFAULT_PAGE_SIZE
            }
            None => DEFAULT_PAGE_SIZE,
        }
    }

    /// Effective page token; empty string means "from the beginning".
    pub fn effective_token(&self) -> String {
        self.page_token.clone().unwrap_or_default()
    }
}

/// Records that can yield the cursor the next page resumes from.
///
/// Entities either carry a pre-formatted creation timestamp string or a
/// typed `Option<DateTime<Utc>>`; both render through this trait. The
/// cursor is only loss-less when the backend delivers records in strictly
/// ascending creation-time order with no duplicate timestamps, which this
/// layer assumes and does not verify.
pub trait PageCursor {
    /// Creation-time cursor of this record, empty when absent.
    fn page_cursor(&self) -> String;
}

/// Render a typed creation timestamp as a page cursor.
///
/// An absent timestamp renders as the empty string.
pub fn format_cursor(tm: &Option<DateTime<Utc>>) -> String {
    match tm {
        Some(tm) => tm.with_timezone(&Utc).format(PAGE_TOKEN_FORMAT).to_string(),
        None => String::new(),
    }
}

/// The uniform list envelope: `{"result": [...], "next_page_token": "..."}`.
///
/// `next_page_token` is empty iff `result` is empty. Empty result sets
/// always serialize as `"result": []`, never `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub result: Vec<T>,
    pub next_page_token: String,
}

impl<T> ListResponse<T> {
    /// Wrap a page together with a next token supplied by the backend.
    ///
    /// The token is discarded when the page is empty so the envelope
    /// invariant holds regardless of what the backend returned.
    pub fn new(result: Vec<T>, next_page_token: impl Into<String>) -> Self {
        let next_page_token = if result.is_empty() {
            String::new()
        } else {
            next_page_token.into()
        };
        Self {
            result,
            next_page_token,
        }
    }
}

/// Build the list envelope for a page, deriving the next token from the
/// creation timestamp of the last record. An empty page yields an empty
/// token, which is the terminal state of the pagination loop.
pub fn generate_list_response<T: PageCursor>(records: Vec<T>) -> ListResponse<T> {
    let next_page_token = records
        .last()
        .map(PageCursor::page_cursor)
        .unwrap_or_default();
    ListResponse {
        result: records,
        next_page_token,
    }
}
