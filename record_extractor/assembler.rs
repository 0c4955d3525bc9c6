use std::io;

use tracing::{debug, warn};

use crate::classify::{classify_line, ClassifiedLine};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub section: String,
    pub description: String,
    pub url: String,
}

/// The three slots a record is assembled from.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParserState {
    pub current_section: Option<String>,
    pub current_description: Option<String>,
    pub current_url: Option<String>,
}

impl ParserState {
    fn set_section(&mut self, section: String) {
        self.current_section = Some(section);
        self.current_description = None;
        self.current_url = None;
    }

    fn set_description(&mut self, description: String) {
        self.current_description = Some(description);
        self.current_url = None;
    }

    /// Take a complete record out of the state, leaving the section in place.
    /// Returns None (and leaves everything untouched) if any slot is empty.
    fn take_record(&mut self) -> Option<Record> {
        let filled = |slot: &Option<String>| slot.as_deref().is_some_and(|s| !s.is_empty());
        if !(filled(&self.current_section)
            && filled(&self.current_description)
            && filled(&self.current_url))
        {
            return None;
        }

        Some(Record {
            section: self.current_section.clone()?,
            description: self.current_description.take()?,
            url: self.current_url.take()?,
        })
    }

    fn missing_slots(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.current_section.is_none() {
            missing.push("section");
        }
        if self.current_description.is_none() {
            missing.push("description");
        }
        missing
    }
}

/// Streaming fold from classified lines to records.
#[derive(Debug, Default)]
pub struct RecordAssembler {
    state: ParserState,
    lines: usize,
    skipped: usize,
}

impl RecordAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw line; returns a record when this line completed one.
    pub fn feed(&mut self, raw: &str) -> Option<Record> {
        self.lines += 1;

        match classify_line(raw) {
            ClassifiedLine::Section(s) => {
                debug!(line = self.lines, section = %s, "section");
                self.state.set_section(s);
                None
            }
            ClassifiedLine::Description(d) => {
                self.state.set_description(d);
                None
            }
            ClassifiedLine::Url(u) => {
                self.state.current_url = Some(u);
                let record = self.state.take_record();
                if record.is_none() {
                    self.skipped += 1;
                    warn!(
                        line = self.lines,
                        url = self.state.current_url.as_deref().unwrap_or_default(),
                        missing = ?self.state.missing_slots(),
                        "url without a complete record; skipped"
                    );
                }
                record
            }
            ClassifiedLine::Unrecognized => None,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &ParserState {
        &self.state
    }

    pub fn lines_seen(&self) -> usize {
        self.lines
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Lazy iterator of records over a line source. Read errors are passed
/// through; the assembler keeps no more than the current three slots.
pub struct Records<I> {
    lines: I,
    assembler: RecordAssembler,
}

impl<I> Records<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    pub fn new(lines: I) -> Self {
        Records {
            lines,
            assembler: RecordAssembler::new(),
        }
    }

    pub fn assembler(&self) -> &RecordAssembler {
        &self.assembler
    }
}

impl<I> Iterator for Records<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = io::Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            match line {
                Ok(line) => {
                    if let Some(record) = self.assembler.feed(&line) {
                        return Some(Ok(record));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}
