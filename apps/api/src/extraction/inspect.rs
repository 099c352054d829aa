//! File Inspector: size and page count for an uploaded PDF. Never fails.

use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use tracing::debug;

use crate::models::resume::FileStats;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

pub fn inspect(file_name: &str, bytes: &[u8]) -> FileStats {
    let page_count = page_count_from_tree(bytes).or_else(|| page_count_from_scan(bytes));
    if page_count.is_none() {
        debug!("Page count unavailable for '{file_name}'");
    }

    FileStats {
        file_name: file_name.to_string(),
        size_mb: bytes.len() as f64 / BYTES_PER_MB,
        page_count,
    }
}

/// Primary reader: the parsed page tree.
fn page_count_from_tree(bytes: &[u8]) -> Option<u32> {
    let pages = panic::catch_unwind(AssertUnwindSafe(|| {
        Document::load_mem(bytes).map(|doc| doc.get_pages().len())
    }))
    .ok()?
    .ok()?;
    u32::try_from(pages).ok().filter(|&n| n > 0)
}

/// Fallback reader: counts `/Type /Page` dictionaries in the raw bytes. Works
/// on files with a broken xref table, misses pages inside object streams.
fn page_count_from_scan(bytes: &[u8]) -> Option<u32> {
    const TYPE_KEY: &[u8] = b"/Type";
    const PAGE_NAME: &[u8] = b"/Page";

    let mut count = 0u32;
    let mut pos = 0;
    while let Some(found) = find(&bytes[pos..], TYPE_KEY) {
        let mut cursor = pos + found + TYPE_KEY.len();
        while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
            cursor += 1;
        }
        if bytes[cursor..].starts_with(PAGE_NAME) {
            let next = bytes.get(cursor + PAGE_NAME.len());
            if !next.is_some_and(|b| b.is_ascii_alphanumeric()) {
                count += 1;
            }
        }
        pos = cursor;
    }
    (count > 0).then_some(count)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
