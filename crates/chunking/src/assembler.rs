//! Chunk assembly: records in, chunks with traceability metadata out.

use narrative_core::AppResult;
use rayon::prelude::*;

use crate::boundary::word_count;
use crate::reporter::{RunReporter, RunSummary};
use crate::splitter::RecursiveSplitter;
use crate::types::{Chunk, ChunkSettings, SourceRecord};

/// Output of a complete assembly run.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// Chunks in source-record order, intra-record order preserved
    pub chunks: Vec<Chunk>,

    /// Aggregate counts for the run
    pub summary: RunSummary,
}

/// Converts source records into numbered chunks.
#[derive(Debug, Clone, Copy)]
pub struct ChunkAssembler {
    splitter: RecursiveSplitter,
}

impl ChunkAssembler {
    /// Create an assembler for validated settings.
    pub fn new(settings: ChunkSettings) -> Self {
        Self {
            splitter: RecursiveSplitter::new(settings),
        }
    }

    /// Create an assembler, validating the raw sizes first.
    pub fn from_sizes(chunk_size: usize, chunk_overlap: usize) -> AppResult<Self> {
        Ok(Self::new(ChunkSettings::new(chunk_size, chunk_overlap)?))
    }

    /// Settings in effect.
    pub fn settings(&self) -> ChunkSettings {
        self.splitter.settings()
    }

    /// Chunk a single record.
    ///
    /// Returns `None` when the narrative is missing or blank. Narratives
    /// under half the budget become one chunk with their text unchanged.
    pub fn chunk_record(&self, record: &SourceRecord) -> Option<Vec<Chunk>> {
        let text = record.usable_narrative()?;
        let settings = self.settings();

        if word_count(text) < settings.split_threshold() {
            return Some(vec![Chunk::new(
                text.to_string(),
                &record.id,
                &record.category,
                0,
                0,
            )]);
        }

        let stride = settings.stride();
        let chunks = self
            .splitter
            .split(text)
            .into_iter()
            .enumerate()
            .map(|(i, piece)| Chunk::new(piece, &record.id, &record.category, i, i * stride))
            .collect();

        Some(chunks)
    }

    /// Chunk every record in source order.
    pub fn assemble(&self, records: &[SourceRecord], reporter: &mut RunReporter) -> Vec<Chunk> {
        tracing::info!(
            records = records.len(),
            chunk_size = self.settings().chunk_size(),
            chunk_overlap = self.settings().chunk_overlap(),
            "Creating text chunks"
        );
        reporter.set_total(records.len() as u64);

        let mut chunks = Vec::new();
        for record in records {
            let produced = self.chunk_record(record);
            Self::collect(record, produced, reporter, &mut chunks);
        }

        tracing::info!(
            "Created {} chunks from {} narratives",
            chunks.len(),
            records.len()
        );
        chunks
    }

    /// Chunk records across the rayon pool.
    ///
    /// Output is identical to `assemble`: chunks stay grouped by record in
    /// source order.
    pub fn assemble_parallel(
        &self,
        records: &[SourceRecord],
        reporter: &mut RunReporter,
    ) -> Vec<Chunk> {
        tracing::info!(
            records = records.len(),
            threads = rayon::current_num_threads(),
            "Creating text chunks in parallel"
        );
        reporter.set_total(records.len() as u64);

        let per_record: Vec<Option<Vec<Chunk>>> = records
            .par_iter()
            .map(|record| self.chunk_record(record))
            .collect();

        let mut chunks = Vec::new();
        for (record, produced) in records.iter().zip(per_record) {
            Self::collect(record, produced, reporter, &mut chunks);
        }

        tracing::info!(
            "Created {} chunks from {} narratives",
            chunks.len(),
            records.len()
        );
        chunks
    }

    fn collect(
        record: &SourceRecord,
        produced: Option<Vec<Chunk>>,
        reporter: &mut RunReporter,
        out: &mut Vec<Chunk>,
    ) {
        match produced {
            Some(record_chunks) => {
                reporter.record_chunked(&record.id, record_chunks.len());
                out.extend(record_chunks);
            }
            None => reporter.record_skipped(&record.id),
        }
    }
}

/// Chunk `records` with a fresh reporter and return chunks plus summary.
///
/// Fails with `AppError::Config` before touching any record when the sizes
/// are invalid.
pub fn assemble(
    records: &[SourceRecord],
    chunk_size: usize,
    chunk_overlap: usize,
) -> AppResult<Assembly> {
    let assembler = ChunkAssembler::from_sizes(chunk_size, chunk_overlap)?;
    let mut reporter = RunReporter::noop();
    let chunks = assembler.assemble(records, &mut reporter);
    Ok(Assembly {
        chunks,
        summary: reporter.finish(),
    })
}
