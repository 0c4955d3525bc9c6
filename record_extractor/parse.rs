use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::assembler::Records;
use crate::settings::OnCollision;
use crate::writer::RecordWriter;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParseSummary {
    pub lines: usize,
    pub records: usize,
    pub skipped: usize,
    pub overwritten: usize,
}

impl ParseSummary {
    pub fn print(&self) {
        println!(
            "Read {} lines: wrote {} records, skipped {} incomplete, overwrote {}.",
            self.lines, self.records, self.skipped, self.overwritten,
        );
    }
}

/// One full pass: stream `input` line by line, writing each completed
/// record below `output_root`. I/O failures abort the pass.
pub fn parse_file(input: &Path, output_root: &Path, policy: OnCollision) -> Result<ParseSummary> {
    let file = File::open(input).with_context(|| format!("cannot open {}", input.display()))?;
    let mut records = Records::new(BufReader::new(file).lines());
    let mut writer = RecordWriter::new(output_root, policy);
    let mut summary = ParseSummary::default();

    for record in records.by_ref() {
        let record = record.with_context(|| format!("cannot read {}", input.display()))?;
        let written = writer.write(&record)?;
        info!(file = %written.path.display(), section = %record.section, "record saved");

        summary.records += 1;
        if written.replaced {
            summary.overwritten += 1;
        }
    }

    summary.lines = records.assembler().lines_seen();
    summary.skipped = records.assembler().skipped();
    Ok(summary)
}
