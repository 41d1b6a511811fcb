use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;

use crate::record::StudentRecord;

const COLUMNS: [&str; 10] = [
    "student_id",
    "name",
    "class",
    "comprehension",
    "attention",
    "focus",
    "retention",
    "engagement_time",
    "assessment_score",
    "persona",
];

fn number_cell(v: f64) -> String {
    // f64 Display renders whole values without a fraction ("85", not "85.0").
    v.to_string()
}

fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn row_cells(r: &StudentRecord) -> [String; 10] {
    [
        r.student_id.clone(),
        r.name.clone(),
        r.class_name.clone(),
        number_cell(r.comprehension),
        number_cell(r.attention),
        number_cell(r.focus),
        number_cell(r.retention),
        number_cell(r.engagement_time),
        number_cell(r.assessment_score),
        r.persona.clone(),
    ]
}

/// Serialize records to CSV text. The header row is unquoted column names in
/// declaration order; every data value is double-quoted with embedded quotes
/// doubled. Rows are newline-joined with no trailing newline. An empty record
/// set serializes to an empty string, not a header-only file.
pub fn to_csv(records: &[StudentRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }
    let mut lines: Vec<String> = Vec::with_capacity(records.len() + 1);
    lines.push(COLUMNS.join(","));
    for r in records {
        let cells = row_cells(r);
        let quoted_cells: Vec<String> = cells.iter().map(|c| quoted(c)).collect();
        lines.push(quoted_cells.join(","));
    }
    lines.join("\n")
}

/// Second-resolution ISO-8601 suffix so repeated exports in one session get
/// distinct names.
pub fn timestamped_filename(prefix: &str) -> String {
    format!("{}_{}.csv", prefix, Utc::now().format("%Y-%m-%dT%H:%M:%S"))
}

/// Write serialized rows under `dir` with a fixed filename. Serialization and
/// file I/O stay separate so exports are testable without touching disk.
pub fn write_export(dir: &Path, filename: &str, records: &[StudentRecord]) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create export dir {}", dir.display()))?;
    let path = dir.join(filename);
    std::fs::write(&path, to_csv(records))
        .with_context(|| format!("write export {}", path.display()))?;
    Ok(path)
}
