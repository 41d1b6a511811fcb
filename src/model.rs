use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::{NumericField, StudentRecord};
use crate::stats::round1;

/// One point of the precomputed persona scatter (typically a 2-D projection
/// of the skill space produced offline).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaPoint {
    pub x: f64,
    pub y: f64,
    pub persona: String,
    pub student_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaMap {
    pub points: Vec<PersonaPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn finite_or_zero(v: Option<&Value>) -> f64 {
    let n = match v {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

fn point_string(v: Option<&Value>) -> Option<String> {
    match v {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Load the persona-map JSON. Any failure (missing file, bad JSON, wrong
/// shape) is a user-visible empty state, never an error to the caller.
pub fn load_persona_map(path: &Path) -> PersonaMap {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            log::warn!("persona map unreadable at {}: {}", path.display(), e);
            return PersonaMap {
                points: Vec::new(),
                error: Some(format!("failed to load persona map: {e}")),
            };
        }
    };
    let parsed: Value = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("persona map is not valid JSON: {e}");
            return PersonaMap {
                points: Vec::new(),
                error: Some(format!("persona map is not valid JSON: {e}")),
            };
        }
    };
    let Some(items) = parsed.as_array() else {
        return PersonaMap {
            points: Vec::new(),
            error: Some("persona map is not an array".to_string()),
        };
    };

    let points = items
        .iter()
        .enumerate()
        .map(|(i, p)| PersonaPoint {
            x: finite_or_zero(p.get("x")),
            y: finite_or_zero(p.get("y")),
            persona: point_string(p.get("persona")).unwrap_or_else(|| "Unknown".to_string()),
            // Historical fallback is the 0-based index, unlike record rows.
            student_id: point_string(p.get("student_id")).unwrap_or_else(|| i.to_string()),
            name: point_string(p.get("name")).unwrap_or_else(|| format!("Student {}", i + 1)),
        })
        .collect();
    PersonaMap {
        points,
        error: None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearModel {
    #[serde(default)]
    pub intercept: f64,
    #[serde(default)]
    pub coef: HashMap<String, f64>,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RfModel {
    #[serde(default)]
    pub feature_importances: HashMap<String, f64>,
}

/// Precomputed model coefficients, consumed for display only. Field names
/// mirror the exporter's JSON, so no case renaming here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linear: Option<LinearModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rf: Option<RfModel>,
}

/// Missing or malformed summary degrades to None; the UI shows a dash.
pub fn load_model_summary(path: &Path) -> Option<ModelSummary> {
    let text = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str::<ModelSummary>(&text) {
        Ok(m) => Some(m),
        Err(e) => {
            log::warn!("model summary at {} ignored: {}", path.display(), e);
            None
        }
    }
}

/// Linear prediction over the model's feature list; unknown features and
/// missing coefficients contribute 0. Rounded to one decimal for display.
pub fn predict_linear(model: &LinearModel, record: &StudentRecord) -> f64 {
    let mut s = model.intercept;
    for feature in &model.features {
        let coef = model.coef.get(feature).copied().unwrap_or(0.0);
        let value = NumericField::parse(feature)
            .map(|f| record.numeric(f))
            .unwrap_or(0.0);
        s += coef * value;
    }
    round1(s)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// RF importances ranked heaviest first.
pub fn ranked_importances(model: &RfModel) -> Vec<FeatureImportance> {
    let mut out: Vec<FeatureImportance> = model
        .feature_importances
        .iter()
        .map(|(feature, importance)| FeatureImportance {
            feature: feature.clone(),
            importance: *importance,
        })
        .collect();
    out.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    out
}
