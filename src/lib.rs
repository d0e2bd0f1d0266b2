//! docchat: chat with a folder of documents
//!
//! Loads documents from a directory, chunks and embeds them into an ephemeral
//! in-memory vector index, then answers questions by retrieving the most
//! relevant chunks and sending them with the question and the running
//! conversation history to a local Ollama server.

pub mod config;
pub mod error;
pub mod ingestion;
pub mod memory;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod types;

pub use config::ChatConfig;
pub use error::{Error, Result};
pub use memory::{ConversationMemory, Role, Turn};
pub use pipeline::AnswerPipeline;
pub use types::{Answer, Chunk, Document};
