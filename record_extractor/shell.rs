use std::path::{Path, PathBuf};

use anyhow::Result;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Completion, Input};

use crate::parse::parse_file;
use crate::settings::OnCollision;

const ACTIONS: &[&str] = &["parse", "exit"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RunParse,
    Exit,
    Reprompt(String),
}

/// The action loop, minus the terminal.
#[derive(Debug, Default)]
pub struct Shell {
    parses: usize,
    finished: bool,
}

impl Shell {
    pub fn step(&mut self, input: &str) -> Effect {
        if self.finished {
            return Effect::Exit;
        }
        match input.trim() {
            "parse" => {
                self.parses += 1;
                Effect::RunParse
            }
            "exit" => {
                self.finished = true;
                Effect::Exit
            }
            other => Effect::Reprompt(format!(
                "Unknown action {other:?}, expected one of: {}",
                ACTIONS.join(", ")
            )),
        }
    }

    pub fn parses(&self) -> usize {
        self.parses
    }
}

/// Completes a prefix when exactly one word of the vocabulary fits.
pub struct Vocabulary(pub &'static [&'static str]);

impl Completion for Vocabulary {
    fn get(&self, input: &str) -> Option<String> {
        let mut hits = self.0.iter().filter(|w| w.starts_with(input));
        match (hits.next(), hits.next()) {
            (Some(word), None) => Some(word.to_string()),
            _ => None,
        }
    }
}

fn check_input_file(path: &str) -> Result<(), &'static str> {
    if Path::new(path).is_file() {
        Ok(())
    } else {
        Err("Invalid input file path.")
    }
}

/// A missing folder is fine, it is created on the first write.
fn check_output_folder(path: &str) -> Result<(), &'static str> {
    let p = Path::new(path);
    if !p.exists() || p.is_dir() {
        Ok(())
    } else {
        Err("Invalid output folder path.")
    }
}

pub fn run_interactive(policy: OnCollision) -> Result<()> {
    let theme = ColorfulTheme::default();
    let input: String = Input::with_theme(&theme)
        .with_prompt("Enter input file path")
        .validate_with(|s: &String| check_input_file(s))
        .interact_text()?;
    let output: String = Input::with_theme(&theme)
        .with_prompt("Enter output folder path")
        .validate_with(|s: &String| check_output_folder(s))
        .interact_text()?;
    let (input, output) = (PathBuf::from(input), PathBuf::from(output));

    let actions = Vocabulary(ACTIONS);
    let mut shell = Shell::default();
    loop {
        let action: String = Input::with_theme(&theme)
            .with_prompt("Enter action (parse or exit)")
            .completion_with(&actions)
            .interact_text()?;

        match shell.step(&action) {
            Effect::RunParse => {
                let summary = parse_file(&input, &output, policy)?;
                println!("{}", style("Parsing complete!").green().bold());
                summary.print();
            }
            Effect::Exit => break,
            Effect::Reprompt(msg) => println!("{}", style(msg).yellow()),
        }
    }

    tracing::debug!(parses = shell.parses(), "shell finished");
    Ok(())
}
