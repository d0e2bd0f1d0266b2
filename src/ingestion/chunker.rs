//! Text chunking with configurable size and overlap

use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;
use crate::types::{Chunk, ChunkSource, Document};

/// Text chunker producing fixed-size overlapping chunks along sentence
/// boundaries
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between chunks
    overlap: usize,
    /// Minimum chunk size
    min_size: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
            min_size: 50,
        }
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            overlap: config.chunk_overlap,
            min_size: config.min_chunk_size,
        }
    }

    /// Chunk a document's text content
    pub fn chunk_document(&self, doc: &Document, text: &str) -> Vec<Chunk> {
        let source = ChunkSource {
            filename: doc.filename.clone(),
            file_type: doc.file_type.clone(),
        };

        let mut chunks = Vec::new();
        let sentences = self.split_into_sentences(text);

        let mut current_chunk = String::new();
        let mut current_start = 0usize;
        let mut chunk_index = 0u32;
        let mut char_pos = 0usize;

        for sentence in sentences {
            let sentence_len = sentence.len();

            // If adding this sentence exceeds chunk size, save current chunk
            if !current_chunk.is_empty() && current_chunk.len() + sentence_len > self.chunk_size {
                if current_chunk.len() >= self.min_size {
                    chunks.push(Chunk::new(
                        doc.id,
                        current_chunk.trim().to_string(),
                        source.clone(),
                        current_start,
                        char_pos,
                        chunk_index,
                    ));
                    chunk_index += 1;
                }

                // Start new chunk with overlap
                let overlap_text = self.get_overlap_text(&current_chunk);
                current_chunk = overlap_text;
                current_start = char_pos.saturating_sub(self.overlap);
            }

            current_chunk.push_str(sentence);
            char_pos += sentence_len;
        }

        // Save final chunk
        if current_chunk.trim().len() >= self.min_size {
            chunks.push(Chunk::new(
                doc.id,
                current_chunk.trim().to_string(),
                source,
                current_start,
                char_pos,
                chunk_index,
            ));
        }

        chunks
    }

    /// Split text into sentences using unicode segmentation
    fn split_into_sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split_sentence_bounds().collect()
    }

    /// Get overlap text from the end of a chunk
    fn get_overlap_text(&self, text: &str) -> String {
        if text.len() <= self.overlap {
            return text.to_string();
        }

        let mut start = text.len().saturating_sub(self.overlap);

        // Ensure we're at a valid UTF-8 character boundary
        while start > 0 && !text.is_char_boundary(start) {
            start -= 1;
        }

        let overlap_text = &text[start..];

        // Try to start at a sentence boundary
        if let Some(pos) = overlap_text.find(". ") {
            return overlap_text[pos + 2..].to_string();
        }

        // Fall back to word boundary
        if let Some(pos) = overlap_text.find(' ') {
            return overlap_text[pos + 1..].to_string();
        }

        overlap_text.to_string()
    }
}
