//! Turn untrusted record text into a file name and a section directory name.
//!
//! Changelog: earlier versions meant to strip spaces and periods before
//! composing the name but never applied the result, so names kept both.
//! The stripping is now applied to section and description alike, and
//! covers every kind of whitespace, not just spaces.
//!
//! Names are capped: a file name never exceeds 240 bytes (leaving room for
//! a `-N` collision suffix under the usual 255-byte limit) and a section
//! folder never exceeds 200. An over-long part is cut on a char boundary
//! and tagged with the first 8 hex digits of its blake3 hash, so distinct
//! long inputs stay distinct and the same input always gives the same name.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static DISALLOWED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w-]").unwrap());

const MAX_NAME_BYTES: usize = 240;
const MAX_SECTION_BYTES: usize = 64;
const MAX_DIR_BYTES: usize = 200;
const TAG_LEN: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("section {section:?} cannot be used as a directory name")]
pub struct UnsafeSection {
    pub section: String,
}

fn clean(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect();
    DISALLOWED_RE.replace_all(&stripped, "").into_owned()
}

/// Cut `text` to at most `max` bytes, marking the cut with a hash tag.
fn shorten(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let hex = blake3::hash(text.as_bytes()).to_hex();
    let tag = &hex.as_str()[..TAG_LEN];

    let mut end = max.saturating_sub(TAG_LEN + 1);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}-{}", &text[..end], tag)
}

/// `{section}_{description}.txt`, both parts reduced to word chars and `-`.
pub fn record_filename(section: &str, description: &str) -> String {
    let section = shorten(&clean(section), MAX_SECTION_BYTES);
    let budget = MAX_NAME_BYTES - section.len() - "_".len() - ".txt".len();
    format!("{}_{}.txt", section, shorten(&clean(description), budget))
}

/// Directory name for a section. Separators become `_` so the result is
/// always one path component below the output root.
pub fn section_dir_name(section: &str) -> Result<String, UnsafeSection> {
    let name: String = section
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();

    if name.is_empty() || name == "." || name == ".." {
        return Err(UnsafeSection {
            section: section.to_string(),
        });
    }
    Ok(shorten(&name, MAX_DIR_BYTES))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_removed() {
        assert_eq!(record_filename("P3", "Buy milk, eggs & bread."), "P3_Buymilkeggsbread.txt");
    }

    #[test]
    fn spaces_and_periods_removed_from_both() {
        let name = record_filename("P1 Rust v1.2", "1. The Book");
        assert_eq!(name, "P1Rustv12_1TheBook.txt");
        let stem = name.strip_suffix(".txt").unwrap();
        assert!(!stem.contains(' '));
        assert!(!stem.contains('.'));
    }

    #[test]
    fn hyphen_and_underscore_kept() {
        assert_eq!(record_filename("P2", "2. multi-part_name"), "P2_2multi-part_name.txt");
    }

    #[test]
    fn separators_never_reach_filename() {
        let name = record_filename("P1/../x", "1. a/b\\c: d");
        assert!(!name.contains('/'));
        assert!(!name.contains('\\'));
        assert!(!name.contains(':'));
        assert_eq!(name, "P1x_1abcd.txt");
    }

    #[test]
    fn unicode_letters_survive() {
        assert_eq!(record_filename("P5", "5. Café crème"), "P5_5Cafécrème.txt");
    }

    #[test]
    fn deterministic() {
        assert_eq!(record_filename("P1", "1. Same"), record_filename("P1", "1. Same"));
    }

    #[test]
    fn all_whitespace_removed() {
        assert_eq!(record_filename("P1", "1.\tFoo\u{a0}bar"), "P1_1Foobar.txt");
        assert_eq!(record_filename("P1\tx", "1. a"), "P1x_1a.txt");
    }

    #[test]
    fn long_description_is_capped() {
        let long = format!("2. {}", "word ".repeat(70));
        let name = record_filename("P1", &long);
        assert!(name.len() <= MAX_NAME_BYTES);
        assert!(name.starts_with("P1_2wordword"));
        assert!(name.ends_with(".txt"));
        assert_eq!(name, record_filename("P1", &long));

        let other = format!("2. {}x", "word ".repeat(70));
        assert_ne!(name, record_filename("P1", &other));
    }

    #[test]
    fn cap_respects_char_boundaries() {
        let long = format!("1. {}", "é".repeat(300));
        let name = record_filename("P1", &long);
        assert!(name.len() <= MAX_NAME_BYTES);
        assert!(name.contains("éé"));
    }

    #[test]
    fn long_section_is_capped() {
        let section = format!("P1{}", "x".repeat(500));
        let name = record_filename(&section, "1. a");
        assert!(name.len() <= MAX_NAME_BYTES);
        assert!(name.ends_with("_1a.txt"));
        assert!(section_dir_name(&section).unwrap().len() <= MAX_DIR_BYTES);
    }

    #[test]
    fn short_names_untouched() {
        assert_eq!(shorten("abc", 10), "abc");
        assert_eq!(shorten(&"a".repeat(20), 12).len(), 12);
    }

    #[test]
    fn dir_name_plain() {
        assert_eq!(section_dir_name("P1").unwrap(), "P1");
        assert_eq!(section_dir_name("P1 Rust books").unwrap(), "P1 Rust books");
    }

    #[test]
    fn dir_name_traversal_is_flattened() {
        let name = section_dir_name("P1/../../etc").unwrap();
        assert_eq!(name, "P1_.._.._etc");
        assert_eq!(std::path::Path::new(&name).components().count(), 1);
    }

    #[test]
    fn dir_name_rejects_dot_names() {
        assert!(section_dir_name("..").is_err());
        assert!(section_dir_name(" . ").is_err());
        assert!(section_dir_name("").is_err());
    }
}
