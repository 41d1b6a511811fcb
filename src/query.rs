use serde::{Deserialize, Serialize};

use crate::record::{NumericField, StudentRecord};

fn default_max_score() -> f64 {
    100.0
}

/// Structured filter constraints. Empty `class`/`persona` mean unconstrained;
/// the score bounds are inclusive on `assessment_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub persona: String,
    #[serde(default)]
    pub min_score: f64,
    #[serde(default = "default_max_score")]
    pub max_score: f64,
}

impl Default for Filters {
    fn default() -> Self {
        Filters {
            class: String::new(),
            persona: String::new(),
            min_score: 0.0,
            max_score: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SortState {
    pub key: NumericField,
    pub dir: SortDir,
}

impl Default for SortState {
    fn default() -> Self {
        SortState {
            key: NumericField::AssessmentScore,
            dir: SortDir::Desc,
        }
    }
}

/// The single owned container for search/filter/sort/page state. Mutation
/// goes through the reducer methods below so the page-reset rules live in
/// one place.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub search: String,
    pub filters: Filters,
    pub sort: SortState,
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            search: String::new(),
            filters: Filters::default(),
            sort: SortState::default(),
            page: 0,
            page_size: 20,
        }
    }
}

impl ViewState {
    pub fn set_search(&mut self, q: String) {
        self.search = q;
        self.page = 0;
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = filters;
        self.page = 0;
    }

    /// Sort changes keep the current page.
    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
    }

    pub fn set_page(&mut self, page: usize, total_pages: usize) {
        self.page = page.min(total_pages.saturating_sub(1));
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 0;
    }
}

fn matches_search(record: &StudentRecord, needle: &str) -> bool {
    record.name.to_lowercase().contains(needle)
        || record.student_id.to_lowercase().contains(needle)
        || record.class_name.to_lowercase().contains(needle)
        || record.persona.to_lowercase().contains(needle)
}

fn matches_filters(record: &StudentRecord, filters: &Filters) -> bool {
    if !filters.class.is_empty() && record.class_name != filters.class {
        return false;
    }
    if !filters.persona.is_empty() && record.persona != filters.persona {
        return false;
    }
    record.assessment_score >= filters.min_score && record.assessment_score <= filters.max_score
}

/// Free-text search and structured filters, conjunctive. Empty search text
/// matches everything. Returns a new vector; the input is untouched.
pub fn apply_query(
    records: &[StudentRecord],
    search: &str,
    filters: &Filters,
) -> Vec<StudentRecord> {
    let needle = search.trim().to_lowercase();
    records
        .iter()
        .filter(|r| needle.is_empty() || matches_search(r, &needle))
        .filter(|r| matches_filters(r, filters))
        .cloned()
        .collect()
}

/// Stable sort on the chosen numeric key. Normalized records hold only
/// finite values, so `total_cmp` is a plain ordering here.
pub fn sort_records(mut records: Vec<StudentRecord>, sort: SortState) -> Vec<StudentRecord> {
    records.sort_by(|a, b| {
        let ord = a.numeric(sort.key).total_cmp(&b.numeric(sort.key));
        match sort.dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
    records
}

/// The full pipeline a view consumes: search + filters, then sort.
pub fn view_rows(records: &[StudentRecord], view: &ViewState) -> Vec<StudentRecord> {
    sort_records(
        apply_query(records, &view.search, &view.filters),
        view.sort,
    )
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub rows: Vec<StudentRecord>,
    pub total: usize,
    pub total_pages: usize,
}

/// Slice out one fixed-size page. An out-of-range page yields empty rows;
/// clamping the page number is the caller's job.
pub fn paginate(records: &[StudentRecord], page: usize, page_size: usize) -> Page {
    let total = records.len();
    let total_pages = std::cmp::max(1, total.div_ceil(page_size));
    let start = page.saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);
    Page {
        rows: records[start..end].to_vec(),
        total,
        total_pages,
    }
}
