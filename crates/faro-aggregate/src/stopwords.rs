//! Spanish stop-word list used by dominant-term extraction.
//!
//! Trimmed to the high-frequency function words that actually occur in
//! client/bot chat transcripts. Callers may extend the set before passing it
//! to [`crate::terms::dominant_terms`].

pub const SPANISH_STOPWORDS: &[&str] = &[
    "a", "al", "algo", "algunas", "algunos", "ante", "antes", "aqui", "as", "asi", "aun", "bien",
    "cada", "como", "con", "contra", "cual", "cuando", "de", "del", "desde", "donde", "dos",
    "el", "ella", "ellas", "ellos", "en", "entre", "era", "eran", "es", "esa", "esas", "ese",
    "eso", "esos", "esta", "estaba", "estamos", "estan", "estar", "este", "esto", "estos",
    "fue", "fueron", "ha", "haber", "habia", "hace", "hacer", "han", "hasta", "hay", "hola",
    "la", "las", "le", "les", "lo", "los", "mas", "me", "mi", "mis", "mucho", "muy", "nada",
    "ni", "no", "nos", "nosotros", "nuestra", "nuestro", "o", "os", "otra", "otro", "para",
    "pero", "poco", "por", "porque", "puede", "pues", "que", "quien", "se", "sea", "segun",
    "ser", "si", "sin", "sobre", "solo", "son", "soy", "su", "sus", "tambien", "tan", "tanto",
    "te", "tengo", "ti", "tiene", "tienen", "toda", "todas", "todo", "todos", "tu", "tus",
    "un", "una", "uno", "unos", "usted", "va", "vamos", "ya", "yo",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_is_sorted_and_deduplicated() {
        let mut sorted = SPANISH_STOPWORDS.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, SPANISH_STOPWORDS);
    }
}
