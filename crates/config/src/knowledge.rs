//! Knowledge base loader
//!
//! Loads corpus documents from YAML/JSON files. The engine itself takes a
//! plain `Vec<KnowledgeDocument>`; this module only covers getting that
//! list off disk.

use std::path::Path;

use serde::{Deserialize, Serialize};

use smartzap_core::KnowledgeDocument;

use crate::ConfigError;

/// Knowledge base file format
#[derive(Debug, Serialize, Deserialize)]
pub struct KnowledgeFile {
    /// Version for format compatibility
    #[serde(default)]
    pub version: Option<String>,
    /// List of documents
    pub documents: Vec<KnowledgeDocument>,
}

/// Loader for knowledge base files
pub struct KnowledgeLoader;

impl KnowledgeLoader {
    /// Load every knowledge file in a directory
    ///
    /// Scans for `.yaml`/`.yml`/`.json` files and aggregates their
    /// documents. Unreadable or malformed files are logged and skipped;
    /// the call only fails when the directory yields no documents at all.
    pub fn load_directory(knowledge_dir: &Path) -> Result<Vec<KnowledgeDocument>, ConfigError> {
        if !knowledge_dir.exists() {
            return Err(ConfigError::FileNotFound(
                knowledge_dir.display().to_string(),
            ));
        }

        let entries = std::fs::read_dir(knowledge_dir).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to read directory {}: {}",
                knowledge_dir.display(),
                e
            ))
        })?;

        let mut documents = Vec::new();

        for entry in entries {
            let entry = entry
                .map_err(|e| ConfigError::ParseError(format!("failed to read entry: {}", e)))?;
            let path = entry.path();

            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if !matches!(extension, "yaml" | "yml" | "json") {
                continue;
            }

            match Self::load_file(&path) {
                Ok(mut docs) => {
                    tracing::info!(
                        file = %path.display(),
                        documents = docs.len(),
                        "Loaded knowledge file"
                    );
                    documents.append(&mut docs);
                },
                Err(e) => {
                    tracing::error!(
                        file = %path.display(),
                        error = %e,
                        "Failed to load knowledge file"
                    );
                },
            }
        }

        if documents.is_empty() {
            return Err(ConfigError::Empty(format!(
                "no knowledge documents found in {}",
                knowledge_dir.display()
            )));
        }

        tracing::info!(
            directory = %knowledge_dir.display(),
            total_documents = documents.len(),
            "Knowledge base loading complete"
        );

        Ok(documents)
    }

    /// Load a single knowledge file (YAML or JSON by extension)
    pub fn load_file(path: &Path) -> Result<Vec<KnowledgeDocument>, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let knowledge: KnowledgeFile = match extension {
            "json" => serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e)))?,
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| ConfigError::ParseError(format!("YAML parse error: {}", e)))?,
            _ => {
                return Err(ConfigError::ParseError(format!(
                    "unsupported file type: {}",
                    extension
                )))
            },
        };

        for doc in &knowledge.documents {
            if doc.is_blank() {
                return Err(ConfigError::InvalidValue {
                    field: "documents".to_string(),
                    message: format!(
                        "blank source or content in {} (source: {:?})",
                        path.display(),
                        doc.source
                    ),
                });
            }
        }

        Ok(knowledge.documents)
    }

    /// Create a sample knowledge file showing the expected format
    pub fn create_sample_file(path: &Path) -> Result<(), ConfigError> {
        let sample = KnowledgeFile {
            version: Some("1.0".to_string()),
            documents: vec![
                KnowledgeDocument::new(
                    "professor_credenciais",
                    "O professor é advogado atuante há mais de 15 anos, pós-graduado, \
                     e já formou milhares de alunos na prática jurídica.",
                ),
                KnowledgeDocument::new(
                    "precos_planos",
                    "O investimento é de R$ 1.997 à vista ou em até 12x no cartão. \
                     O acesso é liberado imediatamente após a confirmação.",
                ),
            ],
        };

        let yaml = serde_yaml::to_string(&sample)
            .map_err(|e| ConfigError::ParseError(format!("failed to serialize: {}", e)))?;

        std::fs::write(path, yaml)
            .map_err(|e| ConfigError::ParseError(format!("failed to write file: {}", e)))?;

        tracing::info!(path = %path.display(), "Created sample knowledge file");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_yaml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kb.yaml");
        std::fs::write(
            &path,
            r#"
version: "1.0"
documents:
  - source: bonus_incluidos
    content: "Bônus inclusos: modelos de petição, comunidade e mentoria mensal."
  - source: suporte_alunos
    content: "Suporte direto pelo WhatsApp em horário comercial."
"#,
        )
        .unwrap();

        let docs = KnowledgeLoader::load_file(&path).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].source, "bonus_incluidos");
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kb.json");
        std::fs::write(
            &path,
            r#"{"documents": [{"source": "modalidade_online", "content": "Curso 100% online."}]}"#,
        )
        .unwrap();

        let docs = KnowledgeLoader::load_file(&path).unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_blank_document_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kb.yaml");
        std::fs::write(&path, "documents:\n  - source: \"\"\n    content: \"x\"\n").unwrap();

        assert!(matches!(
            KnowledgeLoader::load_file(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_file_not_found() {
        assert!(matches!(
            KnowledgeLoader::load_file(Path::new("/nonexistent/kb.yaml")),
            Err(ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kb.yaml");
        std::fs::write(&path, "documents: [solto, sem, estrutura]\n").unwrap();

        assert!(matches!(
            KnowledgeLoader::load_file(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_directory_skips_bad_files_but_needs_one_good() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("bad.yaml"), "documents: [not a doc]").unwrap();
        std::fs::write(
            dir.path().join("good.yaml"),
            "documents:\n  - source: como_funciona\n    content: \"Aulas gravadas + IA.\"\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("ignored.txt"), "not knowledge").unwrap();

        let docs = KnowledgeLoader::load_directory(dir.path()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].source, "como_funciona");
    }

    #[test]
    fn test_empty_directory_fails() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            KnowledgeLoader::load_directory(dir.path()),
            Err(ConfigError::Empty(_))
        ));
    }

    #[test]
    fn test_create_sample_file_roundtrips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample_knowledge.yaml");

        KnowledgeLoader::create_sample_file(&path).unwrap();

        let docs = KnowledgeLoader::load_file(&path).unwrap();
        assert_eq!(docs.len(), 2);
    }
}
