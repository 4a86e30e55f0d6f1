//! Vector store domain types and traits

pub mod distance;
pub mod filter;
pub mod record;
mod store;

pub use distance::{cosine_distance, cosine_similarity};
pub use filter::MetadataFilter;
pub use record::{record_id, GetResult, QueryResult, VectorRecord};
pub use store::VectorStore;

#[cfg(test)]
pub use store::mock::FailingVectorStore;
