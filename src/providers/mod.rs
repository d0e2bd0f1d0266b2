//! Provider abstractions for embeddings and LLM generation
//!
//! Trait-based seams so the pipeline can be exercised with mock backends in
//! tests while production uses the Ollama client.

pub mod embedding;
pub mod llm;
pub mod ollama;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use ollama::OllamaClient;
