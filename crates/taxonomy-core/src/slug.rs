use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::model::TaxonomyKey;

/// Per-taxonomy slug functions that take precedence over the configured style.
pub type SlugifierOverrides = HashMap<TaxonomyKey, Arc<dyn Slugifier>>;

/// Turns a display label into a URL-safe term slug.
pub trait Slugifier: Send + Sync {
    fn slugify(&self, label: &str) -> String;
}

impl<F> Slugifier for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn slugify(&self, label: &str) -> String {
        self(label)
    }
}

/// Built-in slug functions selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlugStyle {
    /// Lowercase words joined by hyphens: "Old Tag" -> "old-tag", "fooBar" -> "foo-bar".
    #[default]
    Kebab,
    /// Anchor style: whitespace becomes hyphens, punctuation dropped, case folded.
    Heading,
    /// Label used unchanged.
    Verbatim,
}

impl Slugifier for SlugStyle {
    fn slugify(&self, label: &str) -> String {
        match self {
            SlugStyle::Kebab => kebab_case(label),
            SlugStyle::Heading => slugify_heading(label),
            SlugStyle::Verbatim => label.to_string(),
        }
    }
}

/// Strip diacritics from Latin letters: "Crème Brûlée" -> "Creme Brulee".
///
/// Letters that do not decompose (`ß`, `æ`, `ø`...) are spelled out.
pub fn deburr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfd().filter(|c| !is_combining_mark(*c)) {
        match c {
            'ß' => out.push_str("ss"),
            'Æ' => out.push_str("Ae"),
            'æ' => out.push_str("ae"),
            'Œ' => out.push_str("Oe"),
            'œ' => out.push_str("oe"),
            'Þ' => out.push_str("Th"),
            'þ' => out.push_str("th"),
            'Ø' => out.push('O'),
            'ø' => out.push('o'),
            'Đ' | 'Ð' => out.push('D'),
            'đ' | 'ð' => out.push('d'),
            'Ł' => out.push('L'),
            'ł' => out.push('l'),
            'ı' => out.push('i'),
            c => out.push(c),
        }
    }
    out
}

/// Split `text` into words and join them lowercased with `-`.
///
/// Diacritics are folded first (see [`deburr`]). Word boundaries are any non-alphanumeric character, a lower-to-upper case
/// change, the end of an acronym ("XMLHttp" -> "xml", "http") and a change
/// between letters and digits. Apostrophes are dropped so "Don't" stays one word.
///
/// # Examples
///
/// ```
/// use taxonomy_core::kebab_case;
///
/// assert_eq!(kebab_case("Old Tag"), "old-tag");
/// assert_eq!(kebab_case("fooBar"), "foo-bar");
/// assert_eq!(kebab_case("__FOO_BAR__"), "foo-bar");
/// assert_eq!(kebab_case("Rust 2024"), "rust-2024");
/// ```
pub fn kebab_case(text: &str) -> String {
    let chars: Vec<char> = deburr(text)
        .chars()
        .filter(|c| *c != '\'' && *c != '\u{2019}')
        .collect();

    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            flush_word(&mut words, &mut current);
            continue;
        }

        if let Some(prev) = current.chars().last() {
            let next = chars.get(i + 1).copied();
            let boundary = (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_alphabetic() && c.is_numeric())
                || (prev.is_numeric() && c.is_alphabetic())
                || (prev.is_uppercase()
                    && c.is_uppercase()
                    && next.is_some_and(|n| n.is_lowercase()));
            if boundary {
                flush_word(&mut words, &mut current);
            }
        }
        current.push(c);
    }
    flush_word(&mut words, &mut current);

    words
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

fn flush_word(words: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

/// Slugify heading-like text.
///
/// - Convert to lowercase
/// - Preserve Unicode letters and digits
/// - Replace whitespace with hyphens
/// - Remove other characters (punctuation, emoji)
/// - Trim leading/trailing hyphens
///
/// ```
/// use taxonomy_core::slugify_heading;
///
/// assert_eq!(slugify_heading("Hello (World)!"), "hello-world");
/// assert_eq!(slugify_heading("A  B"), "a--b");
/// ```
pub fn slugify_heading(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                Some(c)
            } else if c.is_whitespace() {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("Blue"), "blue");
        assert_eq!(kebab_case("blue"), "blue");
        assert_eq!(kebab_case("Old Tag"), "old-tag");
        assert_eq!(kebab_case("  spaced   out  "), "spaced-out");
        assert_eq!(kebab_case("camelCaseTag"), "camel-case-tag");
        assert_eq!(kebab_case("XMLHttpRequest"), "xml-http-request");
        assert_eq!(kebab_case("Don't Panic"), "dont-panic");
        assert_eq!(kebab_case("v2"), "v-2");
        assert_eq!(kebab_case("Café Crème"), "cafe-creme");
        assert_eq!(kebab_case("Straße Ødegaard"), "strasse-odegaard");
        assert_eq!(kebab_case("你好 World"), "你好-world");
        assert_eq!(kebab_case("!!!"), "");
    }

    #[test]
    fn test_deburr() {
        assert_eq!(deburr("Crème Brûlée"), "Creme Brulee");
        assert_eq!(deburr("Æsir Łódź"), "Aesir Lodz");
        assert_eq!(deburr("plain"), "plain");
    }

    #[test]
    fn test_slugify_heading() {
        assert_eq!(slugify_heading("My Header"), "my-header");
        assert_eq!(slugify_heading("-Hello-"), "hello");
        assert_eq!(slugify_heading("🎉 Party"), "party");
        assert_eq!(slugify_heading("你好 World"), "你好-world");
    }

    #[test]
    fn test_styles_and_closures() {
        assert_eq!(SlugStyle::Kebab.slugify("Old Tag"), "old-tag");
        assert_eq!(SlugStyle::Heading.slugify("Old  Tag"), "old--tag");
        assert_eq!(SlugStyle::Verbatim.slugify("Old Tag"), "Old Tag");

        let upper = |label: &str| label.to_uppercase();
        assert_eq!(upper.slugify("tag"), "TAG");
    }
}
