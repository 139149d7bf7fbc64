//! Degrade-to-generic-content extraction policy
//!
//! The primary loader splits pages into segments, which are used as-is whenever
//! there are any. Otherwise the raw page texts are re-read and filtered, and
//! sparse pages are merged into one segment. If nothing survives, a placeholder segment keyed on the
//! file name stands in, so the index is never empty.

use std::path::Path;

use docqa_core::{
    Document, DocumentLoader, ExtractionOutcome, Result, Segment, SegmentOrigin,
};

/// Trimmed raw page text must be longer than this to count as meaningful
pub const MIN_PAGE_CHARS: usize = 10;

/// Fewer meaningful pages than this are merged into a single segment
pub const MIN_MEANINGFUL_PAGES: usize = 3;

/// A lone recovered segment shorter than this is treated as no content
pub const MIN_COMBINED_CHARS: usize = 50;

const PREVIEW_CHARS: usize = 300;

/// Runs the primary loader, then the raw-page heuristics if needed
pub struct FallbackExtractor<'a, L: DocumentLoader> {
    loader: &'a L,
}

impl<'a, L: DocumentLoader> FallbackExtractor<'a, L> {
    pub fn new(loader: &'a L) -> Self {
        Self { loader }
    }

    /// Extract segments, classifying the result
    pub fn extract(&self, path: &Path) -> ExtractionOutcome {
        match self.loader.load_and_split(path) {
            Ok(segments) => {
                tracing::info!(segments = segments.len(), "loaded pages");
                if !segments.is_empty() {
                    return ExtractionOutcome::Success(segments);
                }
                tracing::info!("standard loading found no text, trying raw extraction");
            }
            Err(e) => {
                tracing::warn!(error = %e, "standard loading failed, trying raw extraction");
            }
        }

        match self.loader.load_raw(path) {
            Ok(raw_pages) => {
                tracing::info!(pages = raw_pages.len(), "raw load finished");
                recover_segments(&raw_pages)
            }
            Err(e) => {
                tracing::warn!(error = %e, "raw extraction failed");
                ExtractionOutcome::ExtractionFailed(e.to_string())
            }
        }
    }
}

/// Apply the sparse-content heuristics to raw page texts
pub fn recover_segments(raw_pages: &[String]) -> ExtractionOutcome {
    let mut segments = Vec::new();
    let mut total_content = String::new();

    for (i, page) in raw_pages.iter().enumerate() {
        let content = page.trim();
        if content.chars().count() <= MIN_PAGE_CHARS {
            continue;
        }
        if let Ok(segment) = Segment::new(content) {
            tracing::debug!(page = i + 1, chars = content.len(), "kept page");
            segments.push(segment.on_page(i as u32 + 1));
            total_content.push_str(content);
            total_content.push(' ');
        }
    }

    if segments.len() < MIN_MEANINGFUL_PAGES && !total_content.trim().is_empty() {
        if let Ok(combined) = Segment::with_origin(total_content.trim(), SegmentOrigin::Combined) {
            tracing::info!(chars = combined.len(), "combined sparse pages into one segment");
            segments = vec![combined];
        }
    }

    let too_thin = segments.len() == 1 && segments[0].len() < MIN_COMBINED_CHARS;
    if segments.is_empty() || too_thin {
        return ExtractionOutcome::EmptyInput;
    }

    ExtractionOutcome::Success(segments)
}

/// Generic stand-in text for a document nothing could be extracted from.
///
/// The wording is specific to the macromolecule course notes this tool was
/// written for.
pub fn placeholder_segment(path: &Path, failure: Option<&str>) -> Result<Segment> {
    let text = match failure {
        None => {
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            format!(
                "This appears to be a slide deck or image-based PDF about macromolecules based on the filename '{}'.\n\
                \n\
                Since I cannot extract the actual text content, here are some general topics that are typically covered in macromolecule notes:\n\
                \n\
                1. The four main types of macromolecules: carbohydrates, lipids, proteins, and nucleic acids\n\
                2. Monomers and polymers - how small units combine to form large molecules\n\
                3. Dehydration synthesis and hydrolysis reactions\n\
                4. Structure and function relationships of each macromolecule type\n\
                5. Examples of each macromolecule in biological systems\n\
                \n\
                For better results, please try uploading a PDF that contains searchable text rather than just images or scanned content.",
                filename
            )
        }
        Some(reason) => format!(
            "Error processing PDF: {}\n\
            \n\
            This PDF appears to be a slide deck about macromolecules but contains primarily images or complex formatting that cannot be extracted as text.\n\
            \n\
            Common macromolecule topics include:\n\
            - Carbohydrates (sugars, starches, cellulose)\n\
            - Lipids (fats, oils, phospholipids, steroids)\n\
            - Proteins (enzymes, structural proteins, antibodies)\n\
            - Nucleic acids (DNA, RNA)\n\
            - Biochemical processes like dehydration synthesis and hydrolysis\n\
            \n\
            Please try a different PDF with searchable text content.",
            reason
        ),
    };

    Segment::with_origin(text, SegmentOrigin::Placeholder)
}

/// Turn an outcome into the segments to index; never empty
pub fn resolve_segments(outcome: ExtractionOutcome, path: &Path) -> Result<Vec<Segment>> {
    match outcome {
        ExtractionOutcome::Success(segments) if !segments.is_empty() => Ok(segments),
        ExtractionOutcome::Success(_) | ExtractionOutcome::EmptyInput => {
            tracing::warn!("no extractable text found, likely an image-based PDF");
            Ok(vec![placeholder_segment(path, None)?])
        }
        ExtractionOutcome::ExtractionFailed(reason) => {
            tracing::warn!(%reason, "extraction failed, using placeholder content");
            Ok(vec![placeholder_segment(path, Some(&reason))?])
        }
    }
}

/// Load a document through the fallback policy
pub fn load_document<L: DocumentLoader>(loader: &L, path: &Path) -> Result<Document> {
    let outcome = FallbackExtractor::new(loader).extract(path);
    let segments = resolve_segments(outcome, path)?;

    tracing::info!(segments = segments.len(), "final segment count");
    if let Some(first) = segments.first() {
        let preview: String = first
            .text()
            .chars()
            .take(PREVIEW_CHARS)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        tracing::info!("content preview: {}...", preview);
    }

    Ok(Document::new(path, segments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{write_blank_pdf, write_text_pdf, StaticLoader};
    use crate::PdfLoader;

    const LONG_PAGE: &str =
        "Enzymes are proteins that speed up chemical reactions in living cells.";

    fn raw(pages: &[&str]) -> Vec<String> {
        pages.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_primary_segments_are_used_directly() {
        let loader = StaticLoader::new(&[LONG_PAGE, "Hydrolysis breaks polymers apart."], &[]);
        let outcome = FallbackExtractor::new(&loader).extract(Path::new("bio.pdf"));

        match outcome {
            ExtractionOutcome::Success(segments) => {
                assert_eq!(segments.len(), 2);
                assert_eq!(segments[0].origin(), SegmentOrigin::Page);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_empty_primary_falls_back_to_raw_pages() {
        let pages = [
            "Carbohydrates provide quick energy to the cell.",
            "Lipids form the bilayer of the plasma membrane.",
            "Nucleic acids are polymers made of nucleotides.",
        ];
        let loader = StaticLoader::new(&[], &pages);

        match FallbackExtractor::new(&loader).extract(Path::new("bio.pdf")) {
            ExtractionOutcome::Success(segments) => {
                assert_eq!(segments.len(), 3);
                assert_eq!(segments[2].page(), Some(3));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_short_primary_page_is_still_used() {
        let loader = StaticLoader::new(&["Cells"], &[]);
        match FallbackExtractor::new(&loader).extract(Path::new("bio.pdf")) {
            ExtractionOutcome::Success(segments) => {
                assert_eq!(segments.len(), 1);
                assert_eq!(segments[0].text(), "Cells");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_failed_split_recovers_from_raw_pages() {
        let loader = StaticLoader::failing_split(
            "unsupported font encoding",
            &[
                LONG_PAGE,
                "Glycogen is the storage polysaccharide of animals.",
                "Cellulose gives plant cell walls their strength.",
            ],
        );
        match FallbackExtractor::new(&loader).extract(Path::new("bio.pdf")) {
            ExtractionOutcome::Success(segments) => {
                assert_eq!(segments.len(), 3);
                assert_eq!(segments[0].page(), Some(1));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_failed_split_and_failed_raw_is_extraction_failed() {
        let mut loader = StaticLoader::failing_split("unsupported font encoding", &[]);
        loader.raw = Err("xref table is corrupt".to_string());

        let outcome = FallbackExtractor::new(&loader).extract(Path::new("bio.pdf"));
        assert_eq!(
            outcome,
            ExtractionOutcome::ExtractionFailed("Document loader error: xref table is corrupt".to_string())
        );
    }

    #[test]
    fn test_raw_failure_is_extraction_failed() {
        let loader = StaticLoader::failing_raw("xref table is corrupt");
        let outcome = FallbackExtractor::new(&loader).extract(Path::new("bio.pdf"));
        assert_eq!(
            outcome,
            ExtractionOutcome::ExtractionFailed("Document loader error: xref table is corrupt".to_string())
        );
    }

    #[test]
    fn test_recover_filters_short_pages() {
        let outcome = recover_segments(&raw(&[
            "   ",
            "Slide 2",
            LONG_PAGE,
            "Glycogen is the storage polysaccharide of animals.",
            "Cellulose gives plant cell walls their strength.",
        ]));

        match outcome {
            ExtractionOutcome::Success(segments) => {
                assert_eq!(segments.len(), 3);
                assert_eq!(segments[0].page(), Some(3));
                assert!(segments.iter().all(|s| s.origin() == SegmentOrigin::Page));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_recover_combines_sparse_pages() {
        let outcome = recover_segments(&raw(&[
            LONG_PAGE,
            "tiny",
            "Hydrolysis adds water to break a polymer into monomers.",
        ]));

        match outcome {
            ExtractionOutcome::Success(segments) => {
                assert_eq!(segments.len(), 1);
                assert_eq!(segments[0].origin(), SegmentOrigin::Combined);
                assert_eq!(
                    segments[0].text(),
                    format!("{} Hydrolysis adds water to break a polymer into monomers.", LONG_PAGE)
                );
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_recover_thin_single_segment_is_empty_input() {
        let outcome = recover_segments(&raw(&["Chapter 4: Macromolecules"]));
        assert_eq!(outcome, ExtractionOutcome::EmptyInput);
    }

    #[test]
    fn test_recover_nothing_is_empty_input() {
        assert_eq!(recover_segments(&[]), ExtractionOutcome::EmptyInput);
        assert_eq!(recover_segments(&raw(&["", "  \n "])), ExtractionOutcome::EmptyInput);
    }

    #[test]
    fn test_placeholder_mentions_filename() {
        let segment = placeholder_segment(Path::new("/uploads/Macromolecules Notes.pdf"), None).unwrap();
        assert_eq!(segment.origin(), SegmentOrigin::Placeholder);
        assert!(segment.text().contains("'Macromolecules Notes.pdf'"));
        assert!(segment.text().contains("cannot extract the actual text content"));
    }

    #[test]
    fn test_error_placeholder_mentions_reason() {
        let segment = placeholder_segment(Path::new("deck.pdf"), Some("encrypted file")).unwrap();
        assert!(segment.text().starts_with("Error processing PDF: encrypted file"));
        assert!(segment.text().contains("searchable text"));
    }

    #[test]
    fn test_resolve_never_returns_empty() {
        let path = Path::new("deck.pdf");
        for outcome in [
            ExtractionOutcome::Success(Vec::new()),
            ExtractionOutcome::EmptyInput,
            ExtractionOutcome::ExtractionFailed("boom".to_string()),
        ] {
            let segments = resolve_segments(outcome, path).unwrap();
            assert_eq!(segments.len(), 1);
            assert!(!segments[0].text().trim().is_empty());
        }
    }

    #[test]
    fn test_load_document_with_text_pdf() {
        let pdf = write_text_pdf(&[
            "Monomers link together to build polymers",
            "Dehydration synthesis releases a water molecule",
        ]);
        let doc = load_document(&PdfLoader::new(), pdf.path()).unwrap();

        assert_eq!(doc.segments.len(), 2);
        assert!(doc.segments.iter().all(|s| s.origin() == SegmentOrigin::Page));
    }

    #[test]
    fn test_load_document_with_image_only_pdf_uses_placeholder() {
        let pdf = write_blank_pdf(3);
        let doc = load_document(&PdfLoader::new(), pdf.path()).unwrap();

        assert_eq!(doc.segments.len(), 1);
        assert_eq!(doc.segments[0].origin(), SegmentOrigin::Placeholder);
        assert!(doc.segments[0].text().contains(&doc.file_name()));
    }

    #[test]
    fn test_load_document_keeps_short_pages() {
        let pdf = write_text_pdf(&[
            "Glucose is a simple sugar used for energy",
            "Thank you",
            "Proteins are chains of amino acids",
        ]);
        let doc = load_document(&PdfLoader::new(), pdf.path()).unwrap();

        let pages: Vec<Option<u32>> = doc.segments.iter().map(|s| s.page()).collect();
        assert_eq!(pages, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(doc.segments[1].text(), "Thank you");
        assert!(doc.segments.iter().all(|s| s.origin() == SegmentOrigin::Page));
    }

    #[test]
    fn test_load_document_with_garbage_file_uses_error_placeholder() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"%PDF-garbage").unwrap();

        let doc = load_document(&PdfLoader::new(), file.path()).unwrap();
        assert_eq!(doc.segments.len(), 1);
        assert!(doc.segments[0].text().starts_with("Error processing PDF:"));
    }
}
