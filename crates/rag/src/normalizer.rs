//! Text normalization for Brazilian Portuguese WhatsApp messages
//!
//! One pipeline serves both sides of the index: documents at build time and
//! queries at call time run through exactly the same steps, so stems always
//! agree. The stemmer is a heuristic plural-stripper, not a linguistic
//! stemmer; it only has to be consistent, not correct.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use unicode_normalization::UnicodeNormalization;

use smartzap_config::constants::text;

/// Portuguese stopwords, stored diacritic-stripped because the check runs
/// after diacritics are removed ("não" is matched as "nao").
static BUILTIN_STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "ao", "aos", "aquela", "aquelas", "aquele", "aqueles", "aquilo", "as", "ate", "com",
        "como", "da", "das", "de", "dela", "delas", "dele", "deles", "depois", "do", "dos", "e",
        "ela", "elas", "ele", "eles", "em", "entre", "era", "eram", "essa", "essas", "esse",
        "esses", "esta", "estamos", "estao", "estas", "estava", "estavam", "este", "esteja",
        "estes", "estou", "eu", "foi", "fomos", "for", "foram", "fosse", "fui", "ha", "isso",
        "isto", "ja", "lhe", "lhes", "mais", "mas", "me", "mesmo", "meu", "meus", "minha",
        "minhas", "muito", "na", "nao", "nas", "nem", "no", "nos", "nossa", "nossas", "nosso",
        "nossos", "num", "numa", "o", "os", "ou", "para", "pela", "pelas", "pelo", "pelos", "por",
        "qual", "quando", "que", "quem", "sao", "se", "seja", "sem", "ser", "sera", "seu", "seus",
        "so", "somos", "sou", "sua", "suas", "tambem", "te", "tem", "temos", "tenho", "ter",
        "teu", "teus", "teve", "tinha", "tive", "tu", "tua", "tuas", "um", "uma", "voce", "voces",
        "vos",
    ]
    .into_iter()
    .collect()
});

/// Punctuation replaced by spaces before tokenization
const PUNCTUATION: &[char] = &['.', ',', '?', '!', ';', ':'];

/// Normalizer shared by index build and query handling
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    stopwords: HashSet<String>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self {
            stopwords: BUILTIN_STOPWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TextNormalizer {
    /// Normalizer with the builtin Portuguese stopword list
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizer with a custom stopword list (already diacritic-stripped)
    pub fn with_stopwords(stopwords: impl IntoIterator<Item = String>) -> Self {
        Self {
            stopwords: stopwords.into_iter().collect(),
        }
    }

    /// Full pipeline: lowercase, punctuation to spaces, diacritics stripped,
    /// tokenized, short tokens and stopwords dropped, each survivor stemmed
    pub fn normalize(&self, text: &str) -> Vec<String> {
        self.clean(text)
            .split_whitespace()
            .filter(|token| token.chars().count() >= text::MIN_TOKEN_LEN)
            .filter(|token| !self.stopwords.contains(*token))
            .map(stem)
            .collect()
    }

    /// Loose form: lowercase, punctuation to spaces, diacritics stripped,
    /// whitespace collapsed. No token dropping, no stemming.
    ///
    /// Topic rules run their substring checks against this form, so trigger
    /// phrases keep stopwords ("quanto custa", "quem e o professor").
    pub fn normalize_loose(&self, text: &str) -> String {
        self.clean(text).split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn clean(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let spaced: String = lowered
            .chars()
            .map(|c| if PUNCTUATION.contains(&c) { ' ' } else { c })
            .collect();
        strip_diacritics(&spaced)
    }
}

/// NFD-decompose and drop combining marks (U+0300..U+036F)
///
/// Turns "não" into "nao" and "ção" into "cao"; the cedilla decomposes into
/// a combining mark too, so "ç" becomes "c".
pub fn strip_diacritics(text: &str) -> String {
    text.nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

/// Heuristic Portuguese plural-stripper
///
/// First matching suffix wins. Words shorter than four characters or not
/// ending in `s` pass through unchanged. Input is expected to be lowercase
/// and diacritic-stripped.
pub fn stem(token: &str) -> String {
    if token.chars().count() < text::MIN_STEM_LEN || !token.ends_with('s') {
        return token.to_string();
    }
    if let Some(base) = token.strip_suffix("oes") {
        return format!("{base}ao");
    }
    if let Some(base) = token.strip_suffix("aes") {
        return format!("{base}ao");
    }
    if let Some(base) = token.strip_suffix("ais") {
        return format!("{base}al");
    }
    if let Some(base) = token.strip_suffix("eis") {
        return format!("{base}el");
    }
    if let Some(base) = token.strip_suffix("ois") {
        return format!("{base}ol");
    }
    // "-res"/"-zes" keep the consonant: professores -> professor, vozes -> voz
    if token.ends_with("res") || token.ends_with("zes") {
        return token[..token.len() - 2].to_string();
    }
    if let Some(base) = token.strip_suffix("ns") {
        return format!("{base}m");
    }
    token[..token.len() - 1].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stems(text: &str) -> Vec<String> {
        TextNormalizer::new().normalize(text)
    }

    #[test]
    fn test_stemmer_suffix_table() {
        assert_eq!(stem("licoes"), "licao");
        assert_eq!(stem("paes"), "pao");
        assert_eq!(stem("animais"), "animal");
        assert_eq!(stem("papeis"), "papel");
        assert_eq!(stem("lencois"), "lencol");
        assert_eq!(stem("professores"), "professor");
        assert_eq!(stem("vozes"), "voz");
        assert_eq!(stem("bens"), "bem");
        assert_eq!(stem("cursos"), "curso");
    }

    #[test]
    fn test_stemmer_leaves_short_and_singular_words() {
        assert_eq!(stem("mes"), "mes");
        assert_eq!(stem("pix"), "pix");
        assert_eq!(stem("valor"), "valor");
        assert_eq!(stem("1997"), "1997");
    }

    #[test]
    fn test_stemmer_idempotent_on_own_output() {
        for word in ["licoes", "animais", "professores", "bens", "cursos", "vozes"] {
            let once = stem(word);
            assert_eq!(stem(&once), once, "stem({word}) not stable");
        }
    }

    #[test]
    fn test_diacritics_and_punctuation() {
        assert_eq!(stems("Quanto custa?"), vec!["quanto", "custa"]);
        assert_eq!(stems("tubarão"), vec!["tubarao"]);
        assert_eq!(stems("petições!"), vec!["peticao"]);
    }

    #[test]
    fn test_stopwords_and_short_tokens_dropped() {
        // "não" and "tenho" are stopwords, "eu" is too short anyway
        assert_eq!(stems("eu não tenho tempo"), vec!["tempo"]);
        assert_eq!(stems("o que é de a"), Vec::<String>::new());
    }

    #[test]
    fn test_price_with_thousands_separator() {
        // "R$ 1.997" loses the separator; only the long token survives
        assert_eq!(stems("custa R$ 1.997"), vec!["custa", "997"]);
    }

    #[test]
    fn test_normalize_idempotent() {
        let normalizer = TextNormalizer::new();
        let first = normalizer.normalize("Vocês têm aulas gravadas? Quero ver as lições.");
        let again = normalizer.normalize(&first.join(" "));
        assert_eq!(first, again);
    }

    #[test]
    fn test_loose_form_keeps_phrases() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize_loose("Tá CARO!!!"), "ta caro");
        assert_eq!(
            normalizer.normalize_loose("Quem é o professor?"),
            "quem e o professor"
        );
    }

    #[test]
    fn test_custom_stopwords() {
        let normalizer = TextNormalizer::with_stopwords(vec!["curso".to_string()]);
        assert_eq!(normalizer.normalize("não quero o curso"), vec!["nao", "quero"]);
    }
}
