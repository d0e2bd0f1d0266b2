//! Prompt templates for retrieval-augmented chat

use crate::config::Language;
use crate::retrieval::SearchResult;

/// Delimiter between chunks in the serialized context
const CONTEXT_DELIMITER: &str = "\n\n";

/// Prompt builder for chat queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Serialize retrieved chunks into a single context string, concatenated
    /// in retrieval order
    pub fn build_context(results: &[SearchResult]) -> String {
        results
            .iter()
            .map(|r| r.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_DELIMITER)
    }

    /// Build the full chat prompt: system instruction embedding context and
    /// (when present) the conversation history, ending with the literal
    /// question as the user turn.
    ///
    /// `history` of `None` omits the history section entirely; an empty-but-
    /// present history is never rendered.
    pub fn build_chat_prompt(
        question: &str,
        context: &str,
        history: Option<&str>,
        language: Language,
    ) -> String {
        let history_section = match history {
            Some(h) if !h.is_empty() => match language {
                Language::English => format!("\nConversation so far:\n{}\n", h),
                Language::Portuguese => format!("\nConversa até agora:\n{}\n", h),
            },
            _ => String::new(),
        };

        match language {
            Language::English => format!(
                r#"Use the following pieces of context to answer the question at the end.
If you don't know the answer, just say that you don't know, don't try to make up an answer.
----------------
{context}
{history_section}
Question: {question}

Answer:"#,
                context = context,
                history_section = history_section,
                question = question
            ),
            Language::Portuguese => format!(
                r#"Use as seguintes partes do contexto para responder à pergunta no final.
Se você não sabe a resposta, apenas diga que não sabe, não tente inventar uma resposta.
----------------
{context}
{history_section}
Pergunta: {question}

Resposta:"#,
                context = context,
                history_section = history_section,
                question = question
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, ChunkSource, FileType};
    use uuid::Uuid;

    fn result(content: &str) -> SearchResult {
        SearchResult {
            chunk: Chunk::new(
                Uuid::new_v4(),
                content.to_string(),
                ChunkSource {
                    filename: "doc.txt".to_string(),
                    file_type: FileType::Txt,
                },
                0,
                content.len(),
                0,
            ),
            similarity: 0.9,
        }
    }

    #[test]
    fn test_context_joined_in_retrieval_order() {
        let results = vec![result("first"), result("second"), result("third")];
        assert_eq!(
            PromptBuilder::build_context(&results),
            "first\n\nsecond\n\nthird"
        );
    }

    #[test]
    fn test_no_history_omits_section() {
        let prompt =
            PromptBuilder::build_chat_prompt("What is X?", "ctx", None, Language::English);
        assert!(!prompt.contains("Conversation so far"));
        assert!(prompt.contains("ctx"));
        assert!(prompt.contains("Question: What is X?"));
    }

    #[test]
    fn test_empty_history_treated_as_absent() {
        let prompt =
            PromptBuilder::build_chat_prompt("What is X?", "ctx", Some(""), Language::English);
        assert!(!prompt.contains("Conversation so far"));
    }

    #[test]
    fn test_history_embedded_verbatim() {
        let history = "Human: q1\nAssistant: a1";
        let prompt = PromptBuilder::build_chat_prompt(
            "What is X?",
            "ctx",
            Some(history),
            Language::English,
        );
        assert!(prompt.contains("Conversation so far:\nHuman: q1\nAssistant: a1"));
        // Exactly the one line pair, no more
        assert_eq!(prompt.matches("Human:").count(), 1);
        assert_eq!(prompt.matches("Assistant:").count(), 1);
    }

    #[test]
    fn test_portuguese_template() {
        let prompt = PromptBuilder::build_chat_prompt(
            "O que é X?",
            "ctx",
            Some("Human: q\nAssistant: a"),
            Language::Portuguese,
        );
        assert!(prompt.contains("não tente inventar uma resposta"));
        assert!(prompt.contains("Conversa até agora:"));
        assert!(prompt.contains("Pergunta: O que é X?"));
    }
}
