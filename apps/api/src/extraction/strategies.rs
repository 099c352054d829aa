//! The three extraction strategies, in cascade order.

use lopdf::content::Content;
use lopdf::{Document, Object};
use tracing::debug;

use super::PdfSource;

/// One stage of the cascade. Returns the text it produced or the reason it
/// could not produce any.
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, source: &PdfSource<'_>) -> Result<String, String>;
}

pub fn default_strategies() -> Vec<Box<dyn ExtractionStrategy>> {
    vec![
        Box::new(LayoutStrategy),
        Box::new(GeneralStrategy),
        Box::new(RawStreamStrategy),
    ]
}

// ────────────────────────────────────────────────────────────────────────────
// Stage 1: page-by-page layout text with table detection (lopdf)
// ────────────────────────────────────────────────────────────────────────────

/// Walks the page tree, emitting each page's text followed by a blank line.
/// Appends `[Detected <k> tables in resume]` when tabular regions are found.
pub struct LayoutStrategy;

impl ExtractionStrategy for LayoutStrategy {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn extract(&self, source: &PdfSource<'_>) -> Result<String, String> {
        let doc = Document::load_mem(source.bytes).map_err(|e| format!("lopdf load: {e}"))?;

        let mut text = String::new();
        let mut tables = 0;
        for (page_num, _page_id) in doc.get_pages() {
            match doc.extract_text(&[page_num]) {
                Ok(page_text) if !page_text.trim().is_empty() => {
                    tables += count_tables(&page_text);
                    text.push_str(&page_text);
                    text.push_str("\n\n");
                }
                Ok(_) => {}
                Err(e) => debug!("lopdf could not read page {page_num}: {e}"),
            }
        }

        if tables > 0 {
            text.push_str(&format!("\n\n[Detected {tables} tables in resume]\n"));
        }
        Ok(text)
    }
}

/// Minimum consecutive rows for a region to count as a table.
const TABLE_MIN_ROWS: usize = 3;
/// Minimum cells per row.
const TABLE_MIN_COLUMNS: usize = 3;

/// Counts tabular regions: runs of at least `TABLE_MIN_ROWS` lines that split
/// into the same number (≥ `TABLE_MIN_COLUMNS`) of cells.
pub fn count_tables(text: &str) -> usize {
    let mut tables = 0;
    let mut run_len = 0;
    let mut run_columns = 0;

    for line in text.lines() {
        let columns = split_cells(line).len();
        if columns >= TABLE_MIN_COLUMNS && (run_len == 0 || columns == run_columns) {
            run_len += 1;
            run_columns = columns;
            continue;
        }
        if run_len >= TABLE_MIN_ROWS {
            tables += 1;
        }
        if columns >= TABLE_MIN_COLUMNS {
            run_len = 1;
            run_columns = columns;
        } else {
            run_len = 0;
        }
    }
    if run_len >= TABLE_MIN_ROWS {
        tables += 1;
    }
    tables
}

/// Splits a line into cells on tabs, pipes, or gaps of two or more spaces.
fn split_cells(line: &str) -> Vec<&str> {
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }
    if line.contains('|') {
        return line
            .split('|')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();
    }

    let mut cells = Vec::new();
    let mut start = 0;
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let gap_start = i;
        if bytes[i] == b'\t' {
            i += 1;
        } else if bytes[i] == b' ' && bytes.get(i + 1) == Some(&b' ') {
            while i < bytes.len() && bytes[i] == b' ' {
                i += 1;
            }
        } else {
            i += 1;
            continue;
        }
        let cell = line[start..gap_start].trim();
        if !cell.is_empty() {
            cells.push(cell);
        }
        start = i;
    }
    let tail = line[start..].trim();
    if !tail.is_empty() {
        cells.push(tail);
    }
    cells
}

// ────────────────────────────────────────────────────────────────────────────
// Stage 2: general-purpose extraction from the staged file (pdf-extract)
// ────────────────────────────────────────────────────────────────────────────

pub struct GeneralStrategy;

impl ExtractionStrategy for GeneralStrategy {
    fn name(&self) -> &'static str {
        "general"
    }

    fn extract(&self, source: &PdfSource<'_>) -> Result<String, String> {
        let path = source
            .path
            .ok_or_else(|| "no staged file available".to_string())?;
        pdf_extract::extract_text(path).map_err(|e| format!("pdf-extract: {e}"))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stage 3: last resort, raw text-showing operators (lopdf content streams)
// ────────────────────────────────────────────────────────────────────────────

/// Reads string operands of `Tj`, `TJ`, `'` and `"` straight out of each
/// page's content stream, ignoring font encodings.
pub struct RawStreamStrategy;

/// TJ kerning adjustments more negative than this are rendered as a space.
const TJ_SPACE_THRESHOLD: f32 = -200.0;

impl ExtractionStrategy for RawStreamStrategy {
    fn name(&self) -> &'static str {
        "raw_stream"
    }

    fn extract(&self, source: &PdfSource<'_>) -> Result<String, String> {
        let doc = Document::load_mem(source.bytes).map_err(|e| format!("lopdf load: {e}"))?;

        let mut text = String::new();
        for (page_num, page_id) in doc.get_pages() {
            let content = match doc
                .get_page_content(page_id)
                .and_then(|data| Content::decode(&data))
            {
                Ok(content) => content,
                Err(e) => {
                    debug!("Skipping unreadable content stream on page {page_num}: {e}");
                    continue;
                }
            };
            text.push_str(&show_operations_text(&content));
            text.push_str("\n\n");
        }
        Ok(text)
    }
}

fn show_operations_text(content: &Content) -> String {
    let mut out = String::new();
    for op in &content.operations {
        match op.operator.as_str() {
            "Tj" | "'" | "\"" => {
                if let Some(Object::String(bytes, _)) = op.operands.last() {
                    out.push_str(&decode_pdf_string(bytes));
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => out.push_str(&decode_pdf_string(bytes)),
                            Object::Integer(n) if (*n as f32) < TJ_SPACE_THRESHOLD => out.push(' '),
                            Object::Real(n) if (*n as f32) < TJ_SPACE_THRESHOLD => out.push(' '),
                            _ => {}
                        }
                    }
                }
            }
            "ET" | "T*" | "Td" | "TD" => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
    out
}

/// UTF-16BE when the string carries a BOM, otherwise one char per byte.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&b| b as char).collect()
}
