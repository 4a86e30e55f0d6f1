//! PDF document parser

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ingestion::{ChunkingConfig, DocumentChunk, DocumentParser, ParserType};
use crate::domain::DomainError;
use crate::infrastructure::ingestion::chunker::chunk_text;

/// Separator placed between the text of consecutive pages
const PAGE_SEPARATOR: &str = "\n\n";

/// Parser for paged PDF documents
#[derive(Debug, Clone, Default)]
pub struct PdfParser {
    config: ChunkingConfig,
}

impl PdfParser {
    /// Create a new PDF parser
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }
}

/// Join page texts with a blank line, skipping pages that extracted to nothing
fn join_pages(pages: impl IntoIterator<Item = String>) -> String {
    pages
        .into_iter()
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

/// Load a PDF and join the text of its pages
///
/// Blocking; run it off the async workers.
fn extract_pdf_text(path: &Path, filename: &str) -> Result<String, DomainError> {
    let doc = lopdf::Document::load(path)
        .map_err(|e| DomainError::parse(filename, format!("Failed to load PDF: {}", e)))?;

    let pages = doc
        .get_pages()
        .into_keys()
        .filter_map(|page_num| match doc.extract_text(&[page_num]) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(filename = filename, page = page_num, error = %e, "Could not extract page text");
                None
            }
        });

    Ok(join_pages(pages))
}

#[async_trait]
impl DocumentParser for PdfParser {
    fn parser_type(&self) -> ParserType {
        ParserType::Pdf
    }

    fn chunking_config(&self) -> ChunkingConfig {
        self.config
    }

    async fn parse(
        &self,
        path: &Path,
        file_id: i64,
        filename: &str,
    ) -> Result<Vec<DocumentChunk>, DomainError> {
        let owned_path: PathBuf = path.to_path_buf();
        let owned_name = filename.to_string();

        let text = tokio::task::spawn_blocking(move || extract_pdf_text(&owned_path, &owned_name))
            .await
            .map_err(|e| DomainError::parse(filename, format!("PDF extraction task failed: {}", e)))??;

        let chunks = chunk_text(&text, self.config, file_id, filename)?;

        debug!(
            filename = filename,
            chars = text.chars().count(),
            chunks = chunks.len(),
            "Parsed PDF file"
        );

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Build a PDF with one page per entry in `pages`
    fn build_pdf(pages: &[&str]) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    fn save_pdf(pages: &[&str]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        build_pdf(pages).save(&path).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn test_parse_pdf_pages() {
        let (_dir, path) = save_pdf(&["Alpha page text", "Beta page text"]);
        let parser = PdfParser::new(ChunkingConfig::default());

        let chunks = parser.parse(&path, 3, "doc.pdf").await.unwrap();

        assert_eq!(chunks.len(), 1);
        let text = &chunks[0].text;
        assert!(text.contains("Alpha page text"));
        assert!(text.contains("Beta page text"));
        assert!(text.find("Alpha").unwrap() < text.find("Beta").unwrap());
        assert_eq!(chunks[0].metadata.file_id, 3);
    }

    #[test]
    fn test_pages_joined_with_blank_line() {
        let (_dir, path) = save_pdf(&["One", "Two"]);

        let text = extract_pdf_text(&path, "doc.pdf").unwrap();

        let (one, two) = (text.find("One").unwrap(), text.find("Two").unwrap());
        assert!(text[one..two].contains(PAGE_SEPARATOR));
    }

    #[test]
    fn test_join_pages_keeps_page_text_verbatim() {
        let pages = vec![
            "  First page\n".to_string(),
            String::new(),
            " \n".to_string(),
            "Last".to_string(),
        ];

        assert_eq!(join_pages(pages), "  First page\n\n\n \n\n\nLast");
    }

    #[tokio::test]
    async fn test_parse_invalid_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let parser = PdfParser::new(ChunkingConfig::default());
        let result = parser.parse(&path, 1, "fake.pdf").await;

        assert!(matches!(result, Err(DomainError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_parse_missing_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let parser = PdfParser::new(ChunkingConfig::default());

        let result = parser.parse(&dir.path().join("nope.pdf"), 1, "nope.pdf").await;

        assert!(matches!(result, Err(DomainError::Parse { .. })));
    }
}
