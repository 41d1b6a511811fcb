use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::model;
use crate::record::{NumericField, SKILL_FIELDS};
use crate::stats;

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "analytics.overview" => Some(handle_overview(state, req)),
        "analytics.student" => Some(handle_student(state, req)),
        "personaMap.get" => Some(handle_persona_map(state, req)),
        "model.get" => Some(handle_model(state, req)),
        _ => None,
    }
}

/// KPI averages plus the per-skill bar series, always over the full record
/// set rather than the filtered view.
fn handle_overview(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "students": state.dataset.len(),
            "avgAssessment": stats::average(&state.dataset, NumericField::AssessmentScore),
            "avgEngagement": stats::average(&state.dataset, NumericField::EngagementTime),
            "bars": stats::bar_series(&state.dataset),
        }),
    )
}

fn load_model(state: &AppState) -> Option<model::ModelSummary> {
    let data_dir = state.data_dir()?;
    model::load_model_summary(&data_dir.join("model_summary.json"))
}

fn handle_student(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(id) = req.params.get("studentId").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing params.studentId", None);
    };
    let Some(record) = state.dataset.iter().find(|r| r.student_id == id) else {
        return err(&req.id, "not_found", format!("no student {id}"), None);
    };

    // The model file is re-read per request: one shot, no retry, no cache.
    let summary = load_model(state);
    let predicted = summary
        .as_ref()
        .and_then(|m| m.linear.as_ref())
        .map(|lin| model::predict_linear(lin, record));
    let importances = summary
        .as_ref()
        .and_then(|m| m.rf.as_ref())
        .map(model::ranked_importances);

    let skills: Vec<&str> = SKILL_FIELDS.iter().map(|f| f.name()).collect();
    ok(
        &req.id,
        json!({
            "student": record,
            "skills": skills,
            "radar": stats::radar_series(record),
            "predicted": predicted,
            "importances": importances,
        }),
    )
}

fn handle_persona_map(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(data_dir) = state.data_dir() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let map = model::load_persona_map(&data_dir.join("persona_map.json"));
    ok(&req.id, json!(map))
}

fn handle_model(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(data_dir) = state.data_dir() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let summary = model::load_model_summary(&data_dir.join("model_summary.json"));
    ok(&req.id, json!({ "model": summary }))
}
