//! Interactive chat binary
//!
//! Run with: cargo run --bin docchat -- [--config docchat.toml] [data_dir]

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docchat::config::ChatConfig;
use docchat::ingestion::{DirectoryLoader, TextChunker};
use docchat::memory::ConversationMemory;
use docchat::pipeline::AnswerPipeline;
use docchat::providers::{LlmProvider, OllamaClient};
use docchat::retrieval::ChunkIndex;
use docchat::types::Chunk;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docchat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = load_config()?;

    println!("{}", style("docchat — chat with your documents").bold());
    println!("Knowledge dir: {}", config.knowledge.data_dir.display());
    println!("Models: {} / {}", config.llm.embed_model, config.llm.generate_model);

    let ollama = Arc::new(OllamaClient::new(&config.llm)?);

    if !ollama.is_available().await? {
        tracing::warn!("Ollama not available at {}", config.llm.base_url);
        tracing::warn!("Please start Ollama:");
        tracing::warn!("  1. Start: ollama serve");
        tracing::warn!(
            "  2. Pull models: ollama pull {} && ollama pull {}",
            config.llm.embed_model,
            config.llm.generate_model
        );
    }

    println!("\n{}", style("Loading documents...").dim());

    let loader = DirectoryLoader::new(&config.knowledge.data_dir);
    let documents = loader.load_all()?;

    let chunker = TextChunker::from_config(&config.chunking);
    let mut chunks: Vec<Chunk> = Vec::new();
    for loaded in &documents {
        chunks.extend(chunker.chunk_document(&loaded.document, &loaded.text));
    }
    tracing::info!("Chunked {} documents into {} chunks", documents.len(), chunks.len());

    println!("{}", style("Embedding and indexing...").dim());
    let index = Arc::new(ChunkIndex::build(ollama.clone(), chunks).await?);

    let pipeline = AnswerPipeline::new(
        index,
        ollama.clone() as Arc<dyn LlmProvider>,
        &config.retrieval,
        &config.conversation,
    );
    let mut memory = ConversationMemory::new();

    // Take the questions dir out of config so the loop owns it
    let questions_dir = config.knowledge.questions_dir.take();

    println!("{}", style("Ready.").green());
    println!("Type a question, 'clearmemory' to reset the conversation, or 'exit' to quit.\n");

    let stdin = std::io::stdin();
    loop {
        print!("{} ", style(">").cyan());
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF behaves like exit
            memory.clear();
            break;
        }
        let input = line.trim();

        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "exit" => {
                memory.clear();
                println!("Bye.");
                break;
            }
            "clearmemory" => {
                memory.clear();
                println!("{}", style("Conversation memory cleared.").dim());
                continue;
            }
            _ => {}
        }

        let question = resolve_question(input, questions_dir.as_deref());

        match pipeline.answer(&question, &mut memory).await {
            Ok(answer) => {
                println!("\n{}\n{}", style("Answer:").bold(), answer.text.trim());
                let names = answer.source_names();
                if !names.is_empty() {
                    println!("{} {}", style("Sources:").dim(), names.join(", "));
                }
                println!();
            }
            Err(e) => {
                // Per-question failures never terminate the loop
                eprintln!("{} {}\n", style("Error:").red(), e);
            }
        }
    }

    Ok(())
}

/// Parse CLI arguments and load configuration
fn load_config() -> anyhow::Result<ChatConfig> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut config_path: Option<PathBuf> = None;
    let mut data_dir: Option<PathBuf> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args
                    .get(i)
                    .ok_or_else(|| anyhow::anyhow!("--config requires a path"))?;
                config_path = Some(PathBuf::from(path));
            }
            "--help" | "-h" => {
                println!("Usage: docchat [--config <file.toml>] [data_dir]");
                std::process::exit(0);
            }
            other => {
                data_dir = Some(PathBuf::from(other));
            }
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => ChatConfig::from_file(&path)?,
        None => ChatConfig::default(),
    };

    if let Some(dir) = data_dir {
        config.knowledge.data_dir = dir;
    }

    Ok(config)
}

/// Resolve user input into a question.
///
/// When a questions directory is configured and `<dir>/<input>.txt` exists,
/// that file's contents become the question; otherwise the input itself is
/// the question.
fn resolve_question(input: &str, questions_dir: Option<&std::path::Path>) -> String {
    if let Some(dir) = questions_dir {
        let candidate = dir.join(format!("{}.txt", input));
        if let Ok(text) = std::fs::read_to_string(&candidate) {
            tracing::info!("Using question from {}", candidate.display());
            return text.trim().to_string();
        }
    }
    input.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_file_lookup_with_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("warmup.txt"), "What is in the manual?\n").unwrap();

        let resolved = resolve_question("warmup", Some(dir.path()));
        assert_eq!(resolved, "What is in the manual?");

        // Absent file: the input itself is the question
        let resolved = resolve_question("how does this work", Some(dir.path()));
        assert_eq!(resolved, "how does this work");

        // No questions dir configured at all
        let resolved = resolve_question("warmup", None);
        assert_eq!(resolved, "warmup");
    }
}
