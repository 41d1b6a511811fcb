use std::path::Path;

use anyhow::Context;
use calamine::{open_workbook_auto, Data, Reader};
use serde_json::{Map, Value};

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::String(String::new()),
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => Value::Number((*i).into()),
        Data::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(String::new())),
        Data::Bool(b) => Value::Bool(*b),
        other => Value::String(other.to_string()),
    }
}

fn is_blank(v: &Value) -> bool {
    matches!(v, Value::String(s) if s.is_empty())
}

/// Read the first sheet of an xlsx/xls workbook into loosely-typed row
/// objects keyed by the header row. Missing cells become empty strings,
/// fully blank rows are skipped, blank header cells drop their column.
pub fn read_rows(path: &Path) -> anyhow::Result<Vec<Map<String, Value>>> {
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("open workbook {}", path.display()))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(r) => r.context("read first sheet")?,
        None => anyhow::bail!("workbook has no sheets"),
    };

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<Option<String>> = header_row
        .iter()
        .map(|c| {
            let h = c.to_string().trim().to_string();
            if h.is_empty() {
                None
            } else {
                Some(h)
            }
        })
        .collect();

    let mut out: Vec<Map<String, Value>> = Vec::new();
    for row in rows {
        let mut obj = Map::new();
        for (idx, header) in headers.iter().enumerate() {
            let Some(key) = header else { continue };
            let value = row.get(idx).map(cell_value).unwrap_or(Value::String(String::new()));
            obj.insert(key.clone(), value);
        }
        if obj.values().all(is_blank) {
            continue;
        }
        out.push(obj);
    }
    Ok(out)
}
