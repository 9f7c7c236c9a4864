// crates/gazetteer-core/src/phonetic.rs

//! # Phonetic Key
//!
//! A sortable sound-alike fingerprint stored with every record and used for
//! prefix range scans. Each word becomes its first two literal characters
//! plus its Double Metaphone code; words are sorted so input order does not
//! matter, except that directionals and filler words always sort last. That
//! way `"north haden"` and `"haden"` share the prefix `"haTN"`.
//!
//! ```
//! use gazetteer_core::phonetic::phonetic_key;
//!
//! assert_eq!(phonetic_key("north haden"), phonetic_key("haden north"));
//! assert!(phonetic_key("north haden").starts_with(&phonetic_key("haden")));
//! ```

use rphonetic::{DoubleMetaphone, Encoder};

/// Words that always sort after the others.
pub const STOP_WORDS: &[&str] = &[
    "east", "west", "north", "south", "the", "of", "town", "city", "county", "and", "on", "by",
    "new", "old", "big", "little", "royal", "borough", "department", "region",
];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

fn metaphone(word: &str) -> String {
    // The encoder only ever sees ASCII letters.
    let letters: String = word.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    if letters.is_empty() {
        return String::new();
    }
    DoubleMetaphone::default().encode(&letters)
}

fn word_code(word: &str) -> String {
    let code = metaphone(word);
    let lead: String = word.chars().take(2).collect();
    if lead.chars().count() > 1 {
        format!("{lead}{code}")
    } else {
        code
    }
}

/// Phonetic key of already-normalized text. Wildcards are ignored.
pub fn phonetic_key(text: &str) -> String {
    let mut words: Vec<&str> = text
        .split_whitespace()
        .map(|w| w.strip_prefix("l'").or_else(|| w.strip_prefix("d'")).unwrap_or(w))
        .map(|w| w.trim_matches('*'))
        .filter(|w| !w.is_empty())
        .collect();
    words.sort_by_key(|w| (is_stop_word(w), *w));

    let key = words
        .iter()
        .map(|w| word_code(w))
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if key.is_empty() {
        text.trim().to_string()
    } else {
        key
    }
}

/// Every variant of `key` with exactly one word removed. Empty for keys of
/// fewer than two words.
pub fn drop_one_variants(key: &str) -> Vec<String> {
    let words: Vec<&str> = key.split(' ').filter(|w| !w.is_empty()).collect();
    if words.len() < 2 {
        return Vec::new();
    }
    (0..words.len())
        .map(|skip| {
            words
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, w)| *w)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
