//! Hierarchical chunking for complaint narratives.
//!
//! Turns source records into overlapping, budget-bounded chunks that carry
//! their record id, category, position and a deterministic chunk id, then
//! hands them to embedding and vector-store collaborators.

pub mod assembler;
pub mod boundary;
pub mod embeddings;
pub mod indexing;
pub mod preprocess;
pub mod reporter;
pub mod source;
pub mod splitter;
pub mod types;
pub mod vector_store;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use assembler::{assemble, Assembly, ChunkAssembler};
pub use embeddings::{create_provider, embed_in_batches, EmbeddingProvider, TrigramProvider};
pub use indexing::{index_chunks, IndexSummary};
pub use preprocess::{preprocess, PreprocessSummary, RawComplaint};
pub use reporter::{ProgressCallback, ProgressEvent, RunReporter, RunSummary};
pub use splitter::RecursiveSplitter;
pub use types::{Chunk, ChunkMetadata, ChunkSettings, SourceRecord};
pub use vector_store::{MemoryVectorStore, SearchHit, VectorRecord, VectorStore};
