use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::query::{paginate, view_rows, Filters, SortState};
use crate::stats;

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "view.search" => Some(handle_search(state, req)),
        "view.filters" => Some(handle_filters(state, req)),
        "view.sort" => Some(handle_sort(state, req)),
        "view.page" => Some(handle_page(state, req)),
        "view.pageSize" => Some(handle_page_size(state, req)),
        "students.query" => Some(handle_query(state, req)),
        "students.facets" => Some(handle_facets(state, req)),
        "students.get" => Some(handle_get(state, req)),
        _ => None,
    }
}

fn view_json(state: &AppState) -> serde_json::Value {
    json!({ "view": &state.view })
}

fn handle_search(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(q) = req.params.get("q").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing params.q", None);
    };
    state.view.set_search(q.to_string());
    ok(&req.id, view_json(state))
}

fn handle_filters(state: &mut AppState, req: &Request) -> serde_json::Value {
    match serde_json::from_value::<Filters>(req.params.clone()) {
        Ok(filters) => {
            state.view.set_filters(filters);
            ok(&req.id, view_json(state))
        }
        Err(e) => err(&req.id, "bad_params", format!("bad filters: {e}"), None),
    }
}

fn handle_sort(state: &mut AppState, req: &Request) -> serde_json::Value {
    match serde_json::from_value::<SortState>(req.params.clone()) {
        Ok(sort) => {
            state.view.set_sort(sort);
            ok(&req.id, view_json(state))
        }
        Err(e) => err(&req.id, "bad_params", format!("bad sort: {e}"), None),
    }
}

fn handle_page(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(page) = req.params.get("page").and_then(|v| v.as_u64()) else {
        return err(&req.id, "bad_params", "missing params.page", None);
    };
    let rows = view_rows(&state.dataset, &state.view);
    let total_pages = paginate(&rows, 0, state.view.page_size).total_pages;
    state.view.set_page(page as usize, total_pages);
    ok(&req.id, view_json(state))
}

fn handle_page_size(state: &mut AppState, req: &Request) -> serde_json::Value {
    let size = req.params.get("pageSize").and_then(|v| v.as_u64());
    let Some(size) = size.filter(|s| *s >= 1) else {
        return err(&req.id, "bad_params", "pageSize must be >= 1", None);
    };
    state.view.set_page_size(size as usize);
    ok(&req.id, view_json(state))
}

fn handle_query(state: &mut AppState, req: &Request) -> serde_json::Value {
    let rows = view_rows(&state.dataset, &state.view);
    let page = paginate(&rows, state.view.page, state.view.page_size);
    ok(
        &req.id,
        json!({
            "rows": page.rows,
            "total": page.total,
            "totalPages": page.total_pages,
            "page": state.view.page,
            "pageSize": state.view.page_size,
        }),
    )
}

fn handle_facets(state: &mut AppState, req: &Request) -> serde_json::Value {
    let facets = stats::facets(&state.dataset);
    ok(&req.id, json!(facets))
}

fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(id) = req.params.get("studentId").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing params.studentId", None);
    };
    match state.dataset.iter().find(|r| r.student_id == id) {
        Some(record) => ok(&req.id, json!({ "student": record })),
        None => err(&req.id, "not_found", format!("no student {id}"), None),
    }
}
