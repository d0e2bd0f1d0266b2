//! The answering pipeline: retrieve, prompt, generate, remember
//!
//! Stateless per call; all conversational state lives in the
//! `ConversationMemory` passed into each invocation. Retrieval depends only
//! on the question, never on accumulated history, so conversational drift
//! cannot influence which chunks are retrieved.

pub mod prompt;

use std::sync::Arc;

use crate::config::{ConversationConfig, Language, RetrievalConfig};
use crate::error::Result;
use crate::memory::ConversationMemory;
use crate::providers::LlmProvider;
use crate::retrieval::{ChunkIndex, SearchResult};
use crate::types::Answer;

pub use prompt::PromptBuilder;

/// Orchestrates one question-answer cycle against the index and the LLM
pub struct AnswerPipeline {
    index: Arc<ChunkIndex>,
    llm: Arc<dyn LlmProvider>,
    top_k: usize,
    language: Language,
    memory_enabled: bool,
}

impl AnswerPipeline {
    /// Create a pipeline over a built index and an LLM provider
    pub fn new(
        index: Arc<ChunkIndex>,
        llm: Arc<dyn LlmProvider>,
        retrieval: &RetrievalConfig,
        conversation: &ConversationConfig,
    ) -> Self {
        Self {
            index,
            llm,
            top_k: retrieval.top_k,
            language: conversation.language,
            memory_enabled: conversation.memory_enabled,
        }
    }

    /// Produce an answer for a question.
    ///
    /// On success the (question, answer) pair is appended to `memory` (when
    /// memory is enabled); on any failure `memory` is left unchanged.
    pub async fn answer(
        &self,
        question: &str,
        memory: &mut ConversationMemory,
    ) -> Result<Answer> {
        // Retrieval sees only the question, not the history
        let retrieved: Vec<SearchResult> = self.index.search(question, self.top_k).await?;
        tracing::debug!("Retrieved {} chunks", retrieved.len());

        let history = if self.memory_enabled {
            memory.render()
        } else {
            None
        };

        let context = PromptBuilder::build_context(&retrieved);
        let prompt =
            PromptBuilder::build_chat_prompt(question, &context, history.as_deref(), self.language);

        let text = self.llm.generate(&prompt).await?;

        if self.memory_enabled {
            memory.append(question, text.clone());
        }

        let sources = retrieved.into_iter().map(|r| r.chunk).collect();
        Ok(Answer::new(text, sources))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    use crate::error::Error;
    use crate::providers::EmbeddingProvider;
    use crate::types::{Chunk, ChunkSource, FileType};

    struct FlatEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FlatEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        fn name(&self) -> &str {
            "flat"
        }
    }

    /// LLM mock that records every prompt and returns canned answers
    struct RecordingLlm {
        prompts: Mutex<Vec<String>>,
        answers: Mutex<Vec<String>>,
    }

    impl RecordingLlm {
        fn new(answers: Vec<&str>) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                answers: Mutex::new(answers.into_iter().rev().map(String::from).collect()),
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for RecordingLlm {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.answers
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| Error::llm("no more canned answers"))
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    /// LLM mock that always fails
    struct FailingLlm;

    #[async_trait]
    impl LlmProvider for FailingLlm {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(Error::llm("simulated outage"))
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(false)
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn chunk(content: &str) -> Chunk {
        Chunk::new(
            Uuid::new_v4(),
            content.to_string(),
            ChunkSource {
                filename: "doc.txt".to_string(),
                file_type: FileType::Txt,
            },
            0,
            content.len(),
            0,
        )
    }

    async fn build_index() -> Arc<ChunkIndex> {
        let chunks = vec![chunk("alpha facts"), chunk("beta facts")];
        Arc::new(
            ChunkIndex::build(Arc::new(FlatEmbedder), chunks)
                .await
                .unwrap(),
        )
    }

    fn pipeline(index: Arc<ChunkIndex>, llm: Arc<dyn LlmProvider>) -> AnswerPipeline {
        AnswerPipeline::new(
            index,
            llm,
            &RetrievalConfig { top_k: 2 },
            &ConversationConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_success_appends_one_turn() {
        let index = build_index().await;
        let llm = Arc::new(RecordingLlm::new(vec!["a1", "a2"]));
        let pipe = pipeline(index, llm);
        let mut memory = ConversationMemory::new();

        pipe.answer("q1", &mut memory).await.unwrap();
        assert_eq!(memory.len(), 1);

        pipe.answer("q2", &mut memory).await.unwrap();
        assert_eq!(memory.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_leaves_memory_unchanged() {
        let index = build_index().await;
        let pipe = pipeline(index, Arc::new(FailingLlm));
        let mut memory = ConversationMemory::new();
        memory.append("earlier", "turn");

        let result = pipe.answer("ping", &mut memory).await;
        assert!(result.is_err());
        assert_eq!(memory.len(), 1);
        assert_eq!(memory.snapshot()[0].question, "earlier");
    }

    #[tokio::test]
    async fn test_answer_carries_provenance() {
        let index = build_index().await;
        let llm = Arc::new(RecordingLlm::new(vec!["the answer"]));
        let pipe = pipeline(index, llm);
        let mut memory = ConversationMemory::new();

        let answer = pipe.answer("q", &mut memory).await.unwrap();
        assert_eq!(answer.text, "the answer");
        assert_eq!(answer.sources.len(), 2);
    }

    #[tokio::test]
    async fn test_second_call_sees_exact_history() {
        let index = build_index().await;
        let llm = Arc::new(RecordingLlm::new(vec!["a1", "a2"]));
        let pipe = pipeline(index.clone(), llm.clone());
        let mut memory = ConversationMemory::new();

        pipe.answer("q1", &mut memory).await.unwrap();
        pipe.answer("q2", &mut memory).await.unwrap();

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 2);

        // First call had no history section at all
        assert!(!prompts[0].contains("Conversation so far"));
        assert!(!prompts[0].contains("Human:"));

        // Second call's history is exactly the q1/a1 line pair
        assert!(prompts[1].contains("Human: q1\nAssistant: a1"));
        assert_eq!(prompts[1].matches("Human:").count(), 1);
        assert_eq!(prompts[1].matches("Assistant:").count(), 1);
    }

    #[tokio::test]
    async fn test_memoryless_mode_never_appends() {
        let index = build_index().await;
        let llm = Arc::new(RecordingLlm::new(vec!["a1", "a2"]));
        let pipe = AnswerPipeline::new(
            index,
            llm.clone(),
            &RetrievalConfig { top_k: 2 },
            &ConversationConfig {
                memory_enabled: false,
                language: Language::English,
            },
        );
        let mut memory = ConversationMemory::new();

        pipe.answer("q1", &mut memory).await.unwrap();
        pipe.answer("q2", &mut memory).await.unwrap();

        assert!(memory.is_empty());
        for prompt in llm.prompts() {
            assert!(!prompt.contains("Conversation so far"));
        }
    }
}
