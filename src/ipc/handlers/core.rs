use std::path::PathBuf;

use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::record::normalize_rows;
use crate::sheet;

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        "dataset.load" => Some(handle_dataset_load(state, req)),
        "dataset.uploadSheet" => Some(handle_upload_sheet(state, req)),
        _ => None,
    }
}

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string()),
            "students": state.dataset.len(),
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    if let Err(e) = std::fs::create_dir_all(&path) {
        return err(
            &req.id,
            "io_failed",
            format!("cannot use workspace {}: {e}", path.display()),
            None,
        );
    }
    state.workspace = Some(path.clone());
    ok(&req.id, json!({ "workspacePath": path.to_string_lossy() }))
}

/// Load `<workspace>/data/students.json`. A missing or malformed file is
/// tolerated silently: the previous dataset stays in place and the response
/// reports `loaded: false`.
fn handle_dataset_load(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(data_dir) = state.data_dir() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let path = data_dir.join("students.json");

    let text = match std::fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) => {
            log::warn!("students.json unreadable at {}: {}", path.display(), e);
            return ok(
                &req.id,
                json!({ "loaded": false, "students": state.dataset.len() }),
            );
        }
    };
    let rows = match serde_json::from_str::<Vec<serde_json::Map<String, serde_json::Value>>>(&text)
    {
        Ok(rows) => rows,
        Err(e) => {
            log::warn!("students.json invalid at {}: {}", path.display(), e);
            return ok(
                &req.id,
                json!({ "loaded": false, "students": state.dataset.len() }),
            );
        }
    };

    state.replace_dataset(normalize_rows(&rows));
    ok(
        &req.id,
        json!({ "loaded": true, "students": state.dataset.len() }),
    )
}

/// Replace the dataset from an uploaded spreadsheet, all or nothing: a parse
/// failure is reported to the caller and leaves the current dataset intact.
fn handle_upload_sheet(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    match sheet::read_rows(&path) {
        Ok(rows) => {
            state.replace_dataset(normalize_rows(&rows));
            ok(&req.id, json!({ "students": state.dataset.len() }))
        }
        Err(e) => err(&req.id, "parse_failed", format!("{e:#}"), None),
    }
}
