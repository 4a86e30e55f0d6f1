//! Validation helpers for ingestion

use std::path::Path;

use crate::domain::DomainError;

use super::parser::ParserType;

/// Static extension table, keyed by lower-cased extension with its dot
pub const PARSER_TABLE: &[(&str, ParserType)] = &[
    // Text formats
    (".txt", ParserType::PlainText),
    (".md", ParserType::PlainText),
    (".markdown", ParserType::PlainText),
    (".rst", ParserType::PlainText),
    // Code formats
    (".py", ParserType::PlainText),
    (".js", ParserType::PlainText),
    (".jsx", ParserType::PlainText),
    (".ts", ParserType::PlainText),
    (".tsx", ParserType::PlainText),
    (".java", ParserType::PlainText),
    (".cpp", ParserType::PlainText),
    (".c", ParserType::PlainText),
    (".h", ParserType::PlainText),
    (".go", ParserType::PlainText),
    (".rs", ParserType::PlainText),
    (".rb", ParserType::PlainText),
    (".php", ParserType::PlainText),
    (".swift", ParserType::PlainText),
    (".kt", ParserType::PlainText),
    // Config formats
    (".json", ParserType::PlainText),
    (".yaml", ParserType::PlainText),
    (".yml", ParserType::PlainText),
    (".toml", ParserType::PlainText),
    (".ini", ParserType::PlainText),
    (".conf", ParserType::PlainText),
    (".xml", ParserType::PlainText),
    // Web formats
    (".html", ParserType::PlainText),
    (".css", ParserType::PlainText),
    (".scss", ParserType::PlainText),
    (".less", ParserType::PlainText),
    // Document formats
    (".pdf", ParserType::Pdf),
];

/// Resolve a filename's extension, lower-cased and with its leading dot
///
/// Dotfiles such as `.bashrc` have no extension.
pub fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext.to_lowercase()))
}

/// Detect parser type from filename extension
pub fn detect_parser_from_filename(filename: &str) -> Option<ParserType> {
    let ext = file_extension(filename)?;

    PARSER_TABLE
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, parser_type)| *parser_type)
}

/// Validate chunk size parameters
pub fn validate_chunk_params(chunk_size: usize, chunk_overlap: usize) -> Result<(), DomainError> {
    if chunk_size == 0 {
        return Err(DomainError::configuration(
            "Chunk size must be greater than 0",
        ));
    }

    if chunk_size > 100_000 {
        return Err(DomainError::configuration(
            "Chunk size cannot exceed 100,000 characters",
        ));
    }

    if chunk_overlap >= chunk_size {
        return Err(DomainError::configuration(
            "Chunk overlap must be less than chunk size",
        ));
    }

    Ok(())
}

/// Validate an upload payload size against the configured maximum
pub fn validate_upload_size(size: u64, max_size: u64) -> Result<(), DomainError> {
    if size > max_size {
        return Err(DomainError::file_too_large(size, max_size));
    }

    Ok(())
}

/// Validate an uploaded filename before anything is written to storage
pub fn validate_filename(filename: &str) -> Result<(), DomainError> {
    if filename.trim().is_empty() {
        return Err(DomainError::validation("Filename cannot be empty"));
    }

    let name = Path::new(filename).file_name().and_then(|n| n.to_str());

    if name != Some(filename) || filename == ".." {
        return Err(DomainError::validation(format!(
            "Filename '{}' must not contain path separators",
            filename
        )));
    }

    Ok(())
}
