//! Synonym map configuration
//!
//! The map is static, hand-authored domain data: each topic key carries the
//! surface forms contacts actually type for that topic, including slang and
//! the product's price point. The retrieval crate stems these at build time;
//! entries here stay in natural spelling.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Synonym topics, loaded from YAML or built in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynonymsConfig {
    /// Version for format compatibility
    #[serde(default)]
    pub version: Option<String>,
    /// Topic key to surface forms
    pub topics: HashMap<String, Vec<String>>,
}

impl SynonymsConfig {
    /// Load a synonym file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        let config: SynonymsConfig = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("YAML parse error: {}", e)))?;

        if config.topics.is_empty() {
            return Err(ConfigError::Empty(format!(
                "no synonym topics in {}",
                path.display()
            )));
        }

        Ok(config)
    }

    /// The hand-authored map the product ships with
    ///
    /// Tuned against real conversations. "tubarão" is money slang; "1997"
    /// and "997" are how contacts type the R$ 1.997 price point.
    pub fn builtin() -> Self {
        let mut topics = HashMap::new();

        topics.insert(
            "pagamento".to_string(),
            str_vec(&[
                "preço",
                "preco",
                "valor",
                "investimento",
                "custa",
                "custo",
                "pagar",
                "pagamento",
                "pix",
                "cartão",
                "boleto",
                "parcela",
                "parcelamento",
                "1997",
                "997",
                "dinheiro",
                "grana",
                "tubarão",
            ]),
        );
        topics.insert(
            "professor".to_string(),
            str_vec(&[
                "professor",
                "mentor",
                "docente",
                "fundador",
                "criador",
                "especialista",
            ]),
        );
        topics.insert(
            "bonus".to_string(),
            str_vec(&["bônus", "bonus", "brinde", "presente", "extra", "grátis"]),
        );
        topics.insert(
            "suporte".to_string(),
            str_vec(&["suporte", "ajuda", "atendimento", "dúvida", "contato"]),
        );
        topics.insert(
            "matricula".to_string(),
            str_vec(&[
                "matrícula",
                "inscrição",
                "inscrever",
                "acessar",
                "entrar",
                "começar",
                "cadastro",
            ]),
        );
        topics.insert(
            "ia".to_string(),
            str_vec(&[
                "inteligência",
                "artificial",
                "iajur",
                "maria",
                "robô",
                "chatgpt",
                "gpt",
                "automação",
                "ferramenta",
            ]),
        );
        topics.insert(
            "provas".to_string(),
            str_vec(&[
                "prova",
                "provas",
                "depoimento",
                "depoimentos",
                "resultado",
                "resultados",
                "aluno",
                "alunos",
                "feedback",
                "testemunho",
            ]),
        );
        topics.insert(
            "conteudo".to_string(),
            str_vec(&[
                "conteúdo",
                "módulo",
                "módulos",
                "aula",
                "aulas",
                "material",
                "ementa",
                "grade",
            ]),
        );
        topics.insert(
            "area".to_string(),
            str_vec(&["área", "áreas", "especialidade", "ramo", "nicho", "atuação"]),
        );
        topics.insert(
            "tempo".to_string(),
            str_vec(&[
                "tempo",
                "prazo",
                "duração",
                "hora",
                "horas",
                "carga",
                "demora",
                "acesso",
            ]),
        );
        topics.insert(
            "modalidade".to_string(),
            str_vec(&[
                "online",
                "presencial",
                "ead",
                "distância",
                "gravado",
                "gravadas",
                "modalidade",
            ]),
        );

        Self {
            version: Some("1.0".to_string()),
            topics,
        }
    }

    /// Overlay loaded topics on the builtin map
    ///
    /// A topic present in `other` replaces the builtin list wholesale so
    /// operators can retune a topic without merging surprises.
    pub fn merged_with(mut self, other: SynonymsConfig) -> Self {
        for (topic, terms) in other.topics {
            self.topics.insert(topic, terms);
        }
        self
    }
}

fn str_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
