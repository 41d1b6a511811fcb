use serde::Serialize;

use crate::record::{NumericField, StudentRecord, SKILL_FIELDS};

/// Round to one decimal, matching the dashboard's `toFixed(1)` displays.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Mean of one numeric field over the whole set, rounded to one decimal.
/// An empty set averages to 0, never NaN.
pub fn average(records: &[StudentRecord], field: NumericField) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: f64 = records.iter().map(|r| r.numeric(field)).sum();
    round1(sum / records.len() as f64)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarPoint {
    pub skill: String,
    pub avg_skill: f64,
    pub avg_score: f64,
}

/// One entry per skill field, each carrying the overall assessment average
/// for side-by-side bars. Labels swap underscores for spaces.
pub fn bar_series(records: &[StudentRecord]) -> Vec<BarPoint> {
    let avg_score = average(records, NumericField::AssessmentScore);
    SKILL_FIELDS
        .iter()
        .map(|&field| BarPoint {
            skill: field.name().replace('_', " "),
            avg_skill: average(records, field),
            avg_score,
        })
        .collect()
}

/// Per-student radar values in `SKILL_FIELDS` order. Engagement minutes are
/// halved to sit on the same 0-100 axis as the other skills; the raw range
/// is assumed 0-200, so keep the divisor as is.
pub fn radar_series(record: &StudentRecord) -> Vec<f64> {
    SKILL_FIELDS
        .iter()
        .map(|&field| {
            let v = record.numeric(field);
            if field == NumericField::EngagementTime {
                (v / 2.0).round()
            } else {
                v
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub classes: Vec<String>,
    pub personas: Vec<String>,
}

/// Distinct non-empty class and persona labels in first-seen order, for the
/// filter dropdowns and persona chips.
pub fn facets(records: &[StudentRecord]) -> Facets {
    let mut classes: Vec<String> = Vec::new();
    let mut personas: Vec<String> = Vec::new();
    for r in records {
        if !r.class_name.is_empty() && !classes.contains(&r.class_name) {
            classes.push(r.class_name.clone());
        }
        if !r.persona.is_empty() && !personas.contains(&r.persona) {
            personas.push(r.persona.clone());
        }
    }
    Facets { classes, personas }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(class: &str, persona: &str, engagement: f64, score: f64) -> StudentRecord {
        StudentRecord {
            student_id: "1".to_string(),
            name: "S".to_string(),
            class_name: class.to_string(),
            comprehension: 60.0,
            attention: 70.0,
            focus: 80.0,
            retention: 90.0,
            engagement_time: engagement,
            assessment_score: score,
            persona: persona.to_string(),
        }
    }

    #[test]
    fn average_of_empty_set_is_zero() {
        assert_eq!(average(&[], NumericField::AssessmentScore), 0.0);
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        let records = vec![
            student("", "", 0.0, 80.0),
            student("", "", 0.0, 85.0),
            student("", "", 0.0, 91.0),
        ];
        // 256 / 3 = 85.333...
        assert_eq!(average(&records, NumericField::AssessmentScore), 85.3);
    }

    #[test]
    fn bar_series_pairs_each_skill_with_overall_score() {
        let records = vec![student("", "", 100.0, 88.0)];
        let bars = bar_series(&records);
        assert_eq!(bars.len(), 5);
        assert_eq!(bars[0].skill, "comprehension");
        assert_eq!(bars[4].skill, "engagement time");
        assert_eq!(bars[4].avg_skill, 100.0);
        assert!(bars.iter().all(|b| b.avg_score == 88.0));
    }

    #[test]
    fn radar_halves_engagement_only() {
        let r = student("", "", 145.0, 0.0);
        let radar = radar_series(&r);
        assert_eq!(radar, vec![60.0, 70.0, 80.0, 90.0, 73.0]);
    }

    #[test]
    fn facets_deduplicate_and_drop_empties() {
        let records = vec![
            student("7A", "Striver", 0.0, 0.0),
            student("", "", 0.0, 0.0),
            student("7B", "Striver", 0.0, 0.0),
            student("7A", "Explorer", 0.0, 0.0),
        ];
        let f = facets(&records);
        assert_eq!(f.classes, vec!["7A", "7B"]);
        assert_eq!(f.personas, vec!["Striver", "Explorer"]);
    }
}
