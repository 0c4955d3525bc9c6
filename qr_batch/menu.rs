use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Completion, Confirm, Input};

use crate::render::Strategy;

/// Completes file system paths: the unique match, or the longest prefix
/// shared by all entries in the directory being typed.
pub struct PathCompletion;

impl Completion for PathCompletion {
    fn get(&self, input: &str) -> Option<String> {
        let typed_dir = input.is_empty() || input.ends_with('/') || input.ends_with(std::path::MAIN_SEPARATOR);
        let (dir, prefix) = if typed_dir {
            (PathBuf::from(input), "")
        } else {
            let path = Path::new(input);
            let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
            (parent, path.file_name()?.to_str()?)
        };
        let listed = if dir.as_os_str().is_empty() { Path::new(".") } else { dir.as_path() };

        let mut hits: Vec<String> = fs::read_dir(listed)
            .ok()?
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| name.starts_with(prefix))
            .collect();
        hits.sort();

        let head = input.strip_suffix(prefix)?;
        match hits.as_slice() {
            [] => None,
            [only] => {
                let mut done = format!("{head}{only}");
                if dir.join(only).is_dir() {
                    done.push('/');
                }
                Some(done)
            }
            [first, rest @ ..] => {
                let shared = rest.iter().fold(first.as_str(), |acc, name| common_prefix(acc, name));
                (shared.len() > prefix.len()).then(|| format!("{head}{shared}"))
            }
        }
    }
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()));
    &a[..end]
}

/// Completes one of a fixed set of words once the prefix is unambiguous.
pub struct Vocabulary(pub &'static [&'static str]);

impl Completion for Vocabulary {
    fn get(&self, input: &str) -> Option<String> {
        let lower = input.to_lowercase();
        let mut hits = self.0.iter().filter(|w| w.starts_with(&lower));
        match (hits.next(), hits.next()) {
            (Some(word), None) => Some(word.to_string()),
            _ => None,
        }
    }
}

pub fn prompt_input_folder(theme: &ColorfulTheme) -> Result<PathBuf> {
    let folder: String = Input::with_theme(theme)
        .with_prompt("Enter the path to the input folder")
        .completion_with(&PathCompletion)
        .validate_with(|s: &String| {
            if Path::new(s).is_dir() {
                Ok(())
            } else {
                Err("Invalid input folder path.")
            }
        })
        .interact_text()?;
    Ok(PathBuf::from(folder))
}

pub fn print_files(root: &Path, files: &[PathBuf]) {
    println!("\n{} files found in {}.\n", files.len(), root.display());
    for file in files {
        println!("{}", file.display());
    }
    println!();
}

/// Ask for the output folder and create it. A path naming an existing
/// file is rejected and asked again.
pub fn prompt_output_folder(theme: &ColorfulTheme) -> Result<PathBuf> {
    let folder: String = Input::with_theme(theme)
        .with_prompt("Enter the path to the output folder")
        .completion_with(&PathCompletion)
        .validate_with(|s: &String| {
            let p = Path::new(s);
            if !p.exists() || p.is_dir() {
                Ok(())
            } else {
                Err("Invalid output folder path.")
            }
        })
        .interact_text()?;
    let folder = PathBuf::from(folder);
    ensure_output_folder(&folder)?;
    Ok(folder)
}

pub fn ensure_output_folder(folder: &Path) -> Result<()> {
    fs::create_dir_all(folder)
        .with_context(|| format!("cannot create output folder {}", folder.display()))
}

pub fn confirm_generation(theme: &ColorfulTheme) -> Result<bool> {
    Ok(Confirm::with_theme(theme)
        .with_prompt("Generate QR codes for all URLs in input folder?")
        .interact()?)
}

pub fn prompt_strategy(theme: &ColorfulTheme) -> Result<Strategy> {
    let names = Vocabulary(Strategy::NAMES);
    let answer: String = Input::with_theme(theme)
        .with_prompt("Generate QR codes using what factory method? (basic/fragment/path)")
        .completion_with(&names)
        .validate_with(|s: &String| s.parse::<Strategy>().map(|_| ()).map_err(|e| e.to_string()))
        .interact_text()?;
    Ok(answer.parse()?)
}

pub fn cancelled() {
    println!("\n{}\n", style("Operation cancelled.").yellow());
}
