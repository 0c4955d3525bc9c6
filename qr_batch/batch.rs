use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use crate::output::{image_name, ImageWriter};
use crate::render::{render, Strategy, SvgStyle};
use crate::urls::read_urls;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub files: usize,
    pub urls: usize,
    pub images: usize,
    /// Saves that replaced an image written earlier in the same run.
    pub overwritten: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn print(&self) {
        println!("\nQR codes generated successfully.\n");
        println!(
            "{} files, {} urls: {} images saved ({} overwritten), {} failed.",
            self.files, self.urls, self.images, self.overwritten, self.failed,
        );
    }
}

/// Render every url of every file into `{stem}.svg` below the writer's folder.
///
/// Files with several urls reuse one image name, so only the last url of
/// such a file survives. That is counted in `overwritten`, not prevented.
pub fn run_batch(
    files: &[PathBuf],
    writer: &ImageWriter,
    strategy: Strategy,
    style: &SvgStyle,
) -> Result<BatchSummary> {
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let mut summary = BatchSummary::default();
    let mut saved: HashSet<PathBuf> = HashSet::new();

    for file in files {
        let urls = read_urls(file).with_context(|| format!("cannot read {}", file.display()))?;
        let name = image_name(file);
        pb.set_message(name.clone());
        print_urls(&pb, file, &urls);

        if urls.len() > 1 {
            warn!(
                file = %file.display(),
                urls = urls.len(),
                image = %name,
                "several urls share one image name; only the last is kept"
            );
        }

        for url in &urls {
            summary.urls += 1;
            let svg = match render(url, strategy, style) {
                Ok(svg) => svg,
                Err(e) => {
                    warn!(file = %file.display(), "{e}");
                    summary.failed += 1;
                    continue;
                }
            };
            let path = writer.save(&name, &svg)?;
            pb.println(format!("QR code for {url} saved to {}", path.display()));

            summary.images += 1;
            if !saved.insert(path) {
                summary.overwritten += 1;
            }
        }

        summary.files += 1;
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(summary)
}

fn print_urls(pb: &ProgressBar, file: &Path, urls: &[String]) {
    pb.println(format!("\n{} URLs in {}", urls.len(), file.display()));
    for url in urls {
        pb.println(format!("  Found URL: {url}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::find_text_files;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn fixture_folder() {
        let out = TempDir::new().unwrap();
        let files = find_text_files(Path::new("tests/fixtures/qr_input")).unwrap();
        assert_eq!(files.len(), 4);

        let summary = run_batch(
            &files,
            &ImageWriter::new(out.path()),
            Strategy::Path,
            &SvgStyle::default(),
        )
        .unwrap();

        assert_eq!(summary.files, 4);
        assert_eq!(summary.urls, 5);
        assert_eq!(summary.images, 5);
        // links.TXT has three urls and keeps one image
        assert_eq!(summary.overwritten, 2);
        assert_eq!(summary.failed, 0);

        let mut names: Vec<_> = fs::read_dir(out.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, ["P1_1TheBook.svg", "P3_1Buymilkeggsbread.svg", "links.svg"]);
    }

    #[test]
    fn same_stem_in_two_folders_counts_as_overwrite() {
        let dir = TempDir::new().unwrap();
        for sub in ["a", "b"] {
            fs::create_dir(dir.path().join(sub)).unwrap();
            fs::write(dir.path().join(sub).join("notes.txt"), format!("https://{sub}.com\n")).unwrap();
        }
        let files = find_text_files(dir.path()).unwrap();
        let out = dir.path().join("svg");

        let summary =
            run_batch(&files, &ImageWriter::new(&out), Strategy::Basic, &SvgStyle::default()).unwrap();
        assert_eq!(summary.images, 2);
        assert_eq!(summary.overwritten, 1);
        assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
    }

    #[test]
    fn unencodable_url_is_counted_not_fatal() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("long.txt");
        fs::write(&input, format!("https://x.com/{}\nhttps://ok.com\n", "y".repeat(8000))).unwrap();

        let summary = run_batch(
            &[input],
            &ImageWriter::new(dir.path().join("svg")),
            Strategy::Fragment,
            &SvgStyle::default(),
        )
        .unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.images, 1);
    }

    #[test]
    fn unreadable_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let result = run_batch(
            &[dir.path().join("vanished.txt")],
            &ImageWriter::new(dir.path()),
            Strategy::Basic,
            &SvgStyle::default(),
        );
        assert!(result.is_err());
    }
}
