use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(https?://\S+)").unwrap());

/// Every http(s) url in a line, in order. A url runs to the next whitespace.
pub fn urls_in_line(line: &str) -> impl Iterator<Item = &str> {
    URL_RE.find_iter(line).map(|m| m.as_str())
}

pub fn read_urls(path: &Path) -> io::Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut urls = Vec::new();
    for line in reader.lines() {
        let line = line?;
        urls.extend(urls_in_line(&line).map(str::to_string));
    }
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn several_per_line() {
        let urls: Vec<_> = urls_in_line("see https://a.com/x and http://b.org, or www.c.com").collect();
        assert_eq!(urls, ["https://a.com/x", "http://b.org,"]);
    }

    #[test]
    fn none() {
        assert_eq!(urls_in_line("1. Just a description").count(), 0);
        assert_eq!(urls_in_line("https:// broken").count(), 0);
    }

    #[test]
    fn from_generated_record() {
        let urls = read_urls(Path::new("tests/fixtures/qr_input/P1/P1_1TheBook.txt")).unwrap();
        assert_eq!(urls, ["https://doc.rust-lang.org/book/"]);
    }

    #[test]
    fn whole_file() {
        let urls = read_urls(Path::new("tests/fixtures/qr_input/links.TXT")).unwrap();
        assert_eq!(
            urls,
            ["https://example.com/one", "https://example.com/two", "http://example.org/three"]
        );
    }
}
