use std::path::PathBuf;

use serde::Deserialize;

use crate::query::ViewState;
use crate::record::StudentRecord;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// The one owner of everything a page view would hold: the workspace (data
/// directory), the canonical record set, and the view state.
pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub dataset: Vec<StudentRecord>,
    pub view: ViewState,
}

impl AppState {
    pub fn new() -> AppState {
        AppState {
            workspace: None,
            dataset: Vec::new(),
            view: ViewState::default(),
        }
    }

    /// A completed load replaces the record set wholesale (no merge) and
    /// snaps back to the first page. Search, filters, sort and page size
    /// survive the reload.
    pub fn replace_dataset(&mut self, records: Vec<StudentRecord>) {
        self.dataset = records;
        self.view.page = 0;
    }

    pub fn data_dir(&self) -> Option<PathBuf> {
        self.workspace.as_ref().map(|w| w.join("data"))
    }

    pub fn export_dir(&self) -> Option<PathBuf> {
        self.workspace.as_ref().map(|w| w.join("exports"))
    }
}
