//! Directory loader for the knowledge base

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::{Document, FileType};

/// A document together with its extracted text
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Document metadata
    pub document: Document,
    /// Extracted text content
    pub text: String,
}

/// Loads documents of supported types from a directory tree
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    /// Create a loader for the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load every supported file under the root directory.
    ///
    /// Unsupported extensions are skipped with a log line; unreadable or
    /// corrupt supported files are fatal. Files whose content hash matches an
    /// already loaded document are skipped as duplicates.
    pub fn load_all(&self) -> Result<Vec<LoadedDocument>> {
        if !self.root.is_dir() {
            return Err(Error::EmptyKnowledgeBase(
                self.root.to_string_lossy().to_string(),
            ));
        }

        let mut documents: Vec<LoadedDocument> = Vec::new();
        let mut seen_hashes: Vec<String> = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let file_type = path
                .extension()
                .map(|ext| FileType::from_extension(&ext.to_string_lossy()))
                .unwrap_or(FileType::Unknown);

            if !file_type.is_supported() {
                tracing::debug!("Skipping unsupported file: {}", path.display());
                continue;
            }

            let loaded = self.load_file(path, file_type)?;

            if seen_hashes.contains(&loaded.document.content_hash) {
                tracing::info!("Skipping duplicate content: {}", loaded.document.filename);
                continue;
            }
            seen_hashes.push(loaded.document.content_hash.clone());
            documents.push(loaded);
        }

        if documents.is_empty() {
            return Err(Error::EmptyKnowledgeBase(
                self.root.to_string_lossy().to_string(),
            ));
        }

        tracing::info!("Loaded {} documents from {}", documents.len(), self.root.display());

        Ok(documents)
    }

    /// Load a single file of a known type
    fn load_file(&self, path: &Path, file_type: FileType) -> Result<LoadedDocument> {
        let filename = path
            .strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        tracing::info!("Loading {}", filename);

        let text = match file_type {
            FileType::Txt | FileType::Markdown => std::fs::read_to_string(path)
                .map_err(|e| Error::document_load(&filename, e.to_string()))?,
            FileType::Pdf => pdf_extract::extract_text(path)
                .map_err(|e| Error::document_load(&filename, e.to_string()))?,
            FileType::Unknown => {
                return Err(Error::UnsupportedFileType(filename));
            }
        };

        if text.trim().is_empty() {
            return Err(Error::document_load(&filename, "file contains no text"));
        }

        let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let document = Document::new(filename, file_type, hash_content(&text), file_size);

        Ok(LoadedDocument { document, text })
    }
}

/// SHA-256 hash of document content, used for deduplication
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_loads_txt_and_md() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "Alpha document content.").unwrap();
        std::fs::write(dir.path().join("b.md"), "# Beta\n\nMarkdown content.").unwrap();
        std::fs::write(dir.path().join("c.bin"), [0u8, 1, 2]).unwrap();

        let loader = DirectoryLoader::new(dir.path());
        let docs = loader.load_all().unwrap();

        assert_eq!(docs.len(), 2);
        assert!(docs.iter().any(|d| d.document.filename == "a.txt"));
        assert!(docs.iter().any(|d| d.document.filename == "b.md"));
    }

    #[test]
    fn test_empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DirectoryLoader::new(dir.path());
        assert!(matches!(
            loader.load_all(),
            Err(Error::EmptyKnowledgeBase(_))
        ));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let loader = DirectoryLoader::new("/nonexistent/docchat-test");
        assert!(matches!(
            loader.load_all(),
            Err(Error::EmptyKnowledgeBase(_))
        ));
    }

    #[test]
    fn test_duplicate_content_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "Same content.").unwrap();
        std::fs::write(dir.path().join("b.txt"), "Same content.").unwrap();

        let loader = DirectoryLoader::new(dir.path());
        let docs = loader.load_all().unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_empty_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = std::fs::File::create(dir.path().join("empty.txt")).unwrap();
        f.write_all(b"   \n").unwrap();

        let loader = DirectoryLoader::new(dir.path());
        assert!(loader.load_all().is_err());
    }
}
