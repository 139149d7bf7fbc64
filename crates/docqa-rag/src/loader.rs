//! PDF document loader

use regex::Regex;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::LazyLock;

use docqa_core::{ChunkingConfig, DocumentLoader, Error, Result, Segment};

static INLINE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").expect("valid regex"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n(\s*\n)+").expect("valid regex"));

/// Check that the input exists and is a regular file before any extraction
pub fn validate_pdf_path(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(Error::InvalidInput(format!(
            "PDF file '{}' not found",
            path.display()
        )));
    }
    Ok(())
}

/// Loads PDF pages with `lopdf`, falling back to `pdf-extract` for raw text
/// when `lopdf` cannot parse the file.
pub struct PdfLoader {
    config: ChunkingConfig,
}

impl PdfLoader {
    /// Create a loader with the default chunking configuration
    pub fn new() -> Self {
        Self {
            config: ChunkingConfig::default(),
        }
    }

    /// Create with custom chunking configuration
    pub fn with_config(config: ChunkingConfig) -> Self {
        Self { config }
    }

    /// Extract the text of every page, in page order
    fn extract_pages(&self, path: &Path) -> Result<Vec<(u32, String)>> {
        let doc = lopdf::Document::load(path)
            .map_err(|e| Error::DocumentLoader(format!("Failed to load PDF: {}", e)))?;

        let mut pages = Vec::new();
        for (page_num, _page_id) in doc.get_pages() {
            let text = match doc.extract_text(&[page_num]) {
                Ok(text) => normalize_text(&text),
                Err(e) => {
                    tracing::warn!(page = page_num, error = %e, "could not extract page text");
                    String::new()
                }
            };
            pages.push((page_num, text));
        }

        Ok(pages)
    }

    /// Chunk page text into overlapping pieces of at most `chunk_size` characters
    fn chunk_text(&self, content: &str) -> Vec<String> {
        chunk_text(content, &self.config)
    }
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLoader for PdfLoader {
    fn load_and_split(&self, path: &Path) -> Result<Vec<Segment>> {
        let pages = self.extract_pages(path)?;
        let mut segments = Vec::new();

        for (page_num, text) in pages {
            for chunk in self.chunk_text(&text) {
                if let Ok(segment) = Segment::new(chunk) {
                    segments.push(segment.on_page(page_num));
                }
            }
        }

        Ok(segments)
    }

    fn load_raw(&self, path: &Path) -> Result<Vec<String>> {
        let lopdf_error = match self.extract_pages(path) {
            Ok(pages) => return Ok(pages.into_iter().map(|(_, text)| text).collect()),
            Err(e) => e,
        };

        tracing::warn!(error = %lopdf_error, "lopdf could not read the file, trying pdf-extract");

        // pdf-extract panics on some malformed files
        let extracted = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(path)));
        match extracted {
            Ok(Ok(text)) => Ok(vec![normalize_text(&text)]),
            Ok(Err(e)) => Err(Error::DocumentLoader(format!(
                "{}; pdf-extract: {}",
                lopdf_error, e
            ))),
            Err(_) => Err(Error::DocumentLoader(format!(
                "{}; pdf-extract panicked while reading the file",
                lopdf_error
            ))),
        }
    }
}

/// Collapse runs of spaces and blank lines left behind by text extraction
pub fn normalize_text(text: &str) -> String {
    let text = INLINE_WHITESPACE.replace_all(text, " ");
    let text = BLANK_LINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Split text into character chunks with overlap
pub fn chunk_text(content: &str, config: &ChunkingConfig) -> Vec<String> {
    let chars: Vec<char> = content.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }
    if config.chunk_size == 0 || chars.len() <= config.chunk_size {
        return vec![content.to_string()];
    }

    let overlap = config.chunk_overlap.min(config.chunk_size - 1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + config.chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());

        if end >= chars.len() {
            break;
        }

        start = end - overlap;
    }

    chunks
}
