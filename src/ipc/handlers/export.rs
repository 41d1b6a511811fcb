use std::path::PathBuf;

use serde_json::json;

use crate::csvout;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::query::{paginate, view_rows};
use crate::record::StudentRecord;

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "export.filtered" => Some(handle_filtered(state, req)),
        "export.page" => Some(handle_page(state, req)),
        "export.student" => Some(handle_student(state, req)),
        "export.persona" => Some(handle_persona(state, req)),
        _ => None,
    }
}

fn out_dir(state: &AppState, req: &Request) -> Result<PathBuf, serde_json::Value> {
    if let Some(dir) = req.params.get("outDir").and_then(|v| v.as_str()) {
        return Ok(PathBuf::from(dir));
    }
    state
        .export_dir()
        .ok_or_else(|| err(&req.id, "no_workspace", "select a workspace first", None))
}

/// Zero rows is not an error: the export still happens and yields an empty
/// file.
fn write(
    req: &Request,
    dir: PathBuf,
    filename: String,
    rows: &[StudentRecord],
) -> serde_json::Value {
    match csvout::write_export(&dir, &filename, rows) {
        Ok(path) => ok(
            &req.id,
            json!({ "path": path.to_string_lossy(), "rows": rows.len() }),
        ),
        Err(e) => err(&req.id, "io_failed", format!("{e:#}"), None),
    }
}

fn handle_filtered(state: &mut AppState, req: &Request) -> serde_json::Value {
    let dir = match out_dir(state, req) {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let rows = view_rows(&state.dataset, &state.view);
    write(
        req,
        dir,
        csvout::timestamped_filename("students_filtered"),
        &rows,
    )
}

fn handle_page(state: &mut AppState, req: &Request) -> serde_json::Value {
    let dir = match out_dir(state, req) {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let rows = view_rows(&state.dataset, &state.view);
    let page = paginate(&rows, state.view.page, state.view.page_size);
    write(
        req,
        dir,
        csvout::timestamped_filename("students_page"),
        &page.rows,
    )
}

fn handle_student(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(id) = req.params.get("studentId").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing params.studentId", None);
    };
    let dir = match out_dir(state, req) {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let Some(record) = state.dataset.iter().find(|r| r.student_id == id).cloned() else {
        return err(&req.id, "not_found", format!("no student {id}"), None);
    };
    write(req, dir, format!("student_{}.csv", record.student_id), &[record])
}

/// Persona export slices the current filtered+sorted view, so an active
/// search or score range narrows it further.
fn handle_persona(state: &mut AppState, req: &Request) -> serde_json::Value {
    let persona = req
        .params
        .get("persona")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if persona.is_empty() {
        return err(&req.id, "bad_params", "missing params.persona", None);
    }
    let dir = match out_dir(state, req) {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let rows: Vec<StudentRecord> = view_rows(&state.dataset, &state.view)
        .into_iter()
        .filter(|r| r.persona == persona)
        .collect();
    write(req, dir, format!("students_persona_{persona}.csv"), &rows)
}
