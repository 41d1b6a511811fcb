use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical student record. Field order here is the CSV column order and the
/// JSON key order produced for the UI, so keep new fields at the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: String,
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub comprehension: f64,
    pub attention: f64,
    pub focus: f64,
    pub retention: f64,
    pub engagement_time: f64,
    pub assessment_score: f64,
    pub persona: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    Comprehension,
    Attention,
    Focus,
    Retention,
    EngagementTime,
    AssessmentScore,
}

/// Skill fields charted per student, in display order.
pub const SKILL_FIELDS: [NumericField; 5] = [
    NumericField::Comprehension,
    NumericField::Attention,
    NumericField::Focus,
    NumericField::Retention,
    NumericField::EngagementTime,
];

impl NumericField {
    pub fn name(self) -> &'static str {
        match self {
            NumericField::Comprehension => "comprehension",
            NumericField::Attention => "attention",
            NumericField::Focus => "focus",
            NumericField::Retention => "retention",
            NumericField::EngagementTime => "engagement_time",
            NumericField::AssessmentScore => "assessment_score",
        }
    }

    pub fn parse(s: &str) -> Option<NumericField> {
        match s {
            "comprehension" => Some(NumericField::Comprehension),
            "attention" => Some(NumericField::Attention),
            "focus" => Some(NumericField::Focus),
            "retention" => Some(NumericField::Retention),
            "engagement_time" => Some(NumericField::EngagementTime),
            "assessment_score" => Some(NumericField::AssessmentScore),
            _ => None,
        }
    }
}

impl StudentRecord {
    pub fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Comprehension => self.comprehension,
            NumericField::Attention => self.attention,
            NumericField::Focus => self.focus,
            NumericField::Retention => self.retention,
            NumericField::EngagementTime => self.engagement_time,
            NumericField::AssessmentScore => self.assessment_score,
        }
    }
}

/// Ordered column aliases accepted per target field. Matching is first by
/// exact key, then case-insensitive, and resolution stops at the first alias
/// present in the row even when its cell is blank (the blank then falls back
/// to the field default, not to a later alias).
const STUDENT_ID_ALIASES: [&str; 3] = ["student_id", "id", "student id"];
const NAME_ALIASES: [&str; 1] = ["name"];
const CLASS_ALIASES: [&str; 2] = ["class", "section"];
const COMPREHENSION_ALIASES: [&str; 1] = ["comprehension"];
const ATTENTION_ALIASES: [&str; 1] = ["attention"];
const FOCUS_ALIASES: [&str; 1] = ["focus"];
const RETENTION_ALIASES: [&str; 1] = ["retention"];
const ENGAGEMENT_ALIASES: [&str; 3] = ["engagement_time", "engagement time", "engagement"];
const SCORE_ALIASES: [&str; 3] = ["assessment_score", "score", "assessment score"];
const PERSONA_ALIASES: [&str; 1] = ["persona"];

fn resolve<'a>(row: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    for alias in aliases {
        if let Some(v) = row.get(*alias) {
            return Some(v);
        }
        if let Some((_, v)) = row.iter().find(|(k, _)| k.eq_ignore_ascii_case(alias)) {
            return Some(v);
        }
    }
    None
}

/// JS `Number()`-style coercion with one correction: non-finite results
/// (unparseable strings, objects) become 0 instead of NaN.
fn coerce_number(v: Option<&Value>) -> f64 {
    let Some(v) = v else { return 0.0 };
    let n = match v {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                0.0
            } else {
                t.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        _ => f64::NAN,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

fn is_falsy(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !*b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f == 0.0).unwrap_or(true),
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

fn coerce_string(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        // Spreadsheet cells arrive as floats; whole values print without the
        // fraction so a numeric id 42 stays "42".
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        _ => String::new(),
    }
}

/// Normalize one loosely-typed row at 0-based position `index` into the
/// canonical shape. Never fails: malformed cells degrade to field defaults.
pub fn normalize_row(row: &Map<String, Value>, index: usize) -> StudentRecord {
    let id = resolve(row, &STUDENT_ID_ALIASES);
    let student_id = if is_falsy(id) {
        (index + 1).to_string()
    } else {
        coerce_string(id)
    };

    let name_v = resolve(row, &NAME_ALIASES);
    let name = if is_falsy(name_v) {
        format!("Student {}", index + 1)
    } else {
        coerce_string(name_v)
    };

    StudentRecord {
        student_id,
        name,
        class_name: coerce_string(resolve(row, &CLASS_ALIASES)),
        comprehension: coerce_number(resolve(row, &COMPREHENSION_ALIASES)),
        attention: coerce_number(resolve(row, &ATTENTION_ALIASES)),
        focus: coerce_number(resolve(row, &FOCUS_ALIASES)),
        retention: coerce_number(resolve(row, &RETENTION_ALIASES)),
        engagement_time: coerce_number(resolve(row, &ENGAGEMENT_ALIASES)),
        assessment_score: coerce_number(resolve(row, &SCORE_ALIASES)),
        persona: coerce_string(resolve(row, &PERSONA_ALIASES)),
    }
}

pub fn normalize_rows(rows: &[Map<String, Value>]) -> Vec<StudentRecord> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| normalize_row(row, i))
        .collect()
}
