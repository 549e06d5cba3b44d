//! Ranked-result serialization: tab-separated (default) or comma-separated.
//!
//! Percentages are rounded to two decimal places here, at the presentation
//! boundary only; ranking upstream always uses the unrounded values. The
//! p-value column keeps the estimate/bound distinction (`0.0400` vs
//! `<0.0200`) rather than collapsing bounds to a plain number.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Result;

use crate::engine::ResultSet;

/// Output format for the result table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Tsv,
    Csv,
}

impl ReportFormat {
    /// Parse a format name as given on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "tsv" => Some(Self::Tsv),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    fn separator(&self) -> char {
        match self {
            Self::Tsv => '\t',
            Self::Csv => ',',
        }
    }
}

/// Write the ranked result table to `out_path`, or stdout when unset.
///
/// `ids` maps batch index to the candidate identifier carried from input;
/// indices without one (synthetic batches) fall back to "unknown".
pub fn write_report(
    results: &ResultSet,
    ids: &[String],
    format: ReportFormat,
    out_path: Option<&PathBuf>,
) -> Result<()> {
    let stdout = io::stdout();
    let mut writer: Box<dyn Write> = if let Some(path) = out_path {
        Box::new(BufWriter::new(File::create(path)?))
    } else {
        Box::new(BufWriter::new(stdout.lock()))
    };
    write_records(&mut writer, results, ids, format)?;
    writer.flush()?;
    Ok(())
}

fn write_records(
    writer: &mut dyn Write,
    results: &ResultSet,
    ids: &[String],
    format: ReportFormat,
) -> io::Result<()> {
    let sep = format.separator();
    writeln!(
        writer,
        "id{sep}index{sep}identity{sep}coverage{sep}combined_score{sep}alignment_score{sep}p_value"
    )?;
    for record in results {
        let id = ids
            .get(record.index)
            .map(String::as_str)
            .unwrap_or("unknown");
        writeln!(
            writer,
            "{}{sep}{}{sep}{:.2}{sep}{:.2}{sep}{:.2}{sep}{}{sep}{}",
            id, record.index, record.identity, record.coverage, record.combined, record.score,
            record.p_value
        )?;
    }
    Ok(())
}
