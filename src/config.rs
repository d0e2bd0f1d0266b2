//! Configuration for the chat system

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main chat configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Document loading configuration
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Ollama/LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Conversation configuration
    #[serde(default)]
    pub conversation: ConversationConfig,
}

impl ChatConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("Invalid config file {}: {}", path.display(), e)))
    }
}

/// Document loading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Directory containing the documents to index
    pub data_dir: PathBuf,
    /// Optional directory with pre-written questions; an input line naming a
    /// `<name>.txt` file in this directory is replaced by that file's contents
    pub questions_dir: Option<PathBuf>,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/knowledge"),
            questions_dir: None,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters
    pub chunk_overlap: usize,
    /// Minimum chunk size (skip smaller chunks)
    pub min_chunk_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            min_chunk_size: 50,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks to retrieve per question
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            generate_model: "llama3.2:3b".to_string(),
            temperature: 0.3,
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

/// Interface language for prompt templates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English prompts
    #[default]
    English,
    /// Portuguese prompts
    Portuguese,
}

/// Conversation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Keep a running question/answer history across turns
    pub memory_enabled: bool,
    /// Language of the system instruction
    #[serde(default)]
    pub language: Language,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            memory_enabled: true,
            language: Language::English,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChatConfig::default();
        assert_eq!(config.retrieval.top_k, 4);
        assert!(config.conversation.memory_enabled);
        assert_eq!(config.conversation.language, Language::English);
        assert!(config.chunking.chunk_overlap < config.chunking.chunk_size);
    }

    #[test]
    fn test_partial_toml() {
        let config: ChatConfig = toml::from_str(
            r#"
            [retrieval]
            top_k = 8

            [conversation]
            memory_enabled = false
            language = "portuguese"
            "#,
        )
        .unwrap();

        assert_eq!(config.retrieval.top_k, 8);
        assert!(!config.conversation.memory_enabled);
        assert_eq!(config.conversation.language, Language::Portuguese);
        // Untouched sections keep their defaults
        assert_eq!(config.llm.embed_model, "nomic-embed-text");
    }
}
