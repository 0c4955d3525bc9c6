use std::sync::LazyLock;

use regex::Regex;

static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^P\d+").unwrap());
static DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s").unwrap());
static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(https?://|www\.)\S+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedLine {
    Section(String),
    Description(String),
    Url(String),
    Unrecognized,
}

/// Classify one raw input line. The line is trimmed first and the trimmed
/// text is what gets stored in the variant.
///
/// Section beats description beats url: a line is tested against each
/// pattern in that order and the first hit wins.
pub fn classify_line(raw: &str) -> ClassifiedLine {
    let line = raw.trim();

    if SECTION_RE.is_match(line) {
        return ClassifiedLine::Section(line.to_string());
    }
    if DESCRIPTION_RE.is_match(line) {
        return ClassifiedLine::Description(line.to_string());
    }
    if URL_RE.is_match(line) {
        return ClassifiedLine::Url(line.to_string());
    }

    ClassifiedLine::Unrecognized
}
