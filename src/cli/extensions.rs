//! Extensions command - lists supported file types

use crate::domain::ingestion::PARSER_TABLE;

/// Print every supported extension with the parser that handles it
pub fn run() -> anyhow::Result<()> {
    let mut table: Vec<_> = PARSER_TABLE.to_vec();
    table.sort_by_key(|(ext, _)| *ext);

    for (ext, parser_type) in table {
        println!("{:<12} {}", ext, parser_type.name());
    }

    Ok(())
}
