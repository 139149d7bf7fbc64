//! Document and segment types, plus the loader trait

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Where a segment's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentOrigin {
    /// Text extracted from a single page (or a chunk of one)
    Page,
    /// Sparse pages concatenated into one segment
    Combined,
    /// Generic text synthesized because extraction recovered nothing usable
    Placeholder,
}

/// A unit of extracted document text used for embedding and retrieval.
///
/// The text is never blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    text: String,
    page: Option<u32>,
    origin: SegmentOrigin,
}

impl Segment {
    /// Create a page segment, rejecting blank text
    pub fn new(text: impl Into<String>) -> Result<Self> {
        Self::with_origin(text, SegmentOrigin::Page)
    }

    /// Create a segment with an explicit origin, rejecting blank text
    pub fn with_origin(text: impl Into<String>, origin: SegmentOrigin) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::InvalidInput("segment text is empty".to_string()));
        }
        Ok(Self {
            text,
            page: None,
            origin,
        })
    }

    /// Attach the 1-based page number the text came from
    pub fn on_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn page(&self) -> Option<u32> {
        self.page
    }

    pub fn origin(&self) -> SegmentOrigin {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// A source file and the ordered segments extracted from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub source: PathBuf,
    pub segments: Vec<Segment>,
}

impl Document {
    pub fn new(source: impl Into<PathBuf>, segments: Vec<Segment>) -> Self {
        Self {
            source: source.into(),
            segments,
        }
    }

    /// File name of the source, or the full path if it has none
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.source.display().to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Result of running extraction with fallback heuristics
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// Usable segments were recovered
    Success(Vec<Segment>),
    /// Extraction ran but found no meaningful text
    EmptyInput,
    /// Extraction raised an error
    ExtractionFailed(String),
}

impl ExtractionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionOutcome::Success(_))
    }
}

/// Trait for document loaders
///
/// `load_and_split` is the primary path: page text split into chunks, blank
/// chunks dropped. `load_raw` returns every page's text unsplit, blank pages
/// included, for the fallback heuristics to inspect.
pub trait DocumentLoader: Send + Sync {
    /// Load pages and split them into segments
    fn load_and_split(&self, path: &Path) -> Result<Vec<Segment>>;

    /// Load raw page texts without splitting
    fn load_raw(&self, path: &Path) -> Result<Vec<String>>;
}
