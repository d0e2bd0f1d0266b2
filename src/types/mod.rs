//! Core data types

pub mod answer;
pub mod document;

pub use answer::Answer;
pub use document::{Chunk, ChunkSource, Document, FileType};
