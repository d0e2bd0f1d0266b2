//! In-memory chunk index with cosine similarity search
//!
//! The index lives only for one process run. Chunks are embedded once at
//! build time; each query embeds the question and scans the stored vectors.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::types::Chunk;

/// Search result with chunk and similarity
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Similarity score (0.0-1.0, higher is better)
    pub similarity: f32,
}

/// A chunk with its embedding, owned by the index
struct IndexedChunk {
    chunk: Chunk,
    embedding: Vec<f32>,
}

/// Ephemeral in-memory vector index over document chunks
pub struct ChunkIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    entries: Vec<IndexedChunk>,
}

impl ChunkIndex {
    /// Build an index by embedding every chunk
    pub async fn build(embedder: Arc<dyn EmbeddingProvider>, chunks: Vec<Chunk>) -> Result<Self> {
        if chunks.is_empty() {
            return Err(Error::index("Cannot build an index from zero chunks"));
        }

        let mut entries = Vec::with_capacity(chunks.len());
        let total = chunks.len();

        for (i, chunk) in chunks.into_iter().enumerate() {
            let embedding = embedder.embed(&chunk.content).await?;
            if embedding.is_empty() {
                return Err(Error::embedding(format!(
                    "Empty embedding for chunk {} of {}",
                    chunk.chunk_index, chunk.source.filename
                )));
            }
            entries.push(IndexedChunk { chunk, embedding });

            if (i + 1) % 50 == 0 {
                tracing::info!("Embedded {}/{} chunks", i + 1, total);
            }
        }

        tracing::info!("Index built with {} chunks", entries.len());

        Ok(Self { embedder, entries })
    }

    /// Number of chunks in the index
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Retrieve the top-k chunks most similar to the query text
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedder.embed(query).await?;

        let mut results: Vec<SearchResult> = self
            .entries
            .iter()
            .map(|entry| SearchResult {
                chunk: entry.chunk.clone(),
                similarity: cosine_similarity(&query_embedding, &entry.embedding),
            })
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);

        Ok(results)
    }
}

/// Cosine similarity between two vectors; zero-norm vectors score 0
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
