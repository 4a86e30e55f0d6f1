//! Document parser implementations

mod pdf;
mod text;

pub use pdf::PdfParser;
pub use text::{decode_lossy, TextParser};
