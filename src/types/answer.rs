//! Answer type returned by the pipeline

use serde::{Deserialize, Serialize};

use super::document::Chunk;

/// An answer produced for a single question, with the chunks used as provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// The generated answer text
    pub text: String,
    /// The chunks supplied as context, in retrieval order
    pub sources: Vec<Chunk>,
}

impl Answer {
    /// Create a new answer
    pub fn new(text: String, sources: Vec<Chunk>) -> Self {
        Self { text, sources }
    }

    /// Format the source filenames for display, deduplicated in order
    pub fn source_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for chunk in &self.sources {
            let name = chunk.source.filename.as_str();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}
