//! Conversation memory: an append-only log of question/answer turns
//!
//! Memory is an owned value threaded explicitly through pipeline calls. It is
//! mutated only by appending a turn after a successful answer, or by being
//! cleared by an explicit reset.

use serde::{Deserialize, Serialize};

/// Message role in a rendered conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction
    System,
    /// User question
    Human,
    /// Model answer
    Assistant,
}

impl Role {
    /// Label used when rendering a message into the prompt
    pub fn label(&self) -> &'static str {
        match self {
            Role::System => "System",
            Role::Human => "Human",
            Role::Assistant => "Assistant",
        }
    }
}

/// One question/answer exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// The user's question
    pub question: String,
    /// The model's answer
    pub answer: String,
}

impl Turn {
    /// Create a new turn
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Ordered sequence of turns, unbounded for the life of one process run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationMemory {
    turns: Vec<Turn>,
}

impl ConversationMemory {
    /// Create an empty memory
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new turn at the end
    pub fn append(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(Turn::new(question, answer));
    }

    /// Full ordered sequence of turns, without mutating state
    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    /// Empty the sequence; idempotent
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Number of turns recorded
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Check if no turns have been recorded
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Render the history for prompting: each turn becomes a
    /// `Human:`/`Assistant:` line pair, turns joined by newlines.
    ///
    /// Returns `None` for an empty memory so the prompt can omit the history
    /// section entirely instead of showing a blank header.
    pub fn render(&self) -> Option<String> {
        if self.turns.is_empty() {
            return None;
        }

        let lines: Vec<String> = self
            .turns
            .iter()
            .flat_map(|turn| {
                [
                    format!("{}: {}", Role::Human.label(), turn.question),
                    format!("{}: {}", Role::Assistant.label(), turn.answer),
                ]
            })
            .collect();

        Some(lines.join("\n"))
    }
}
