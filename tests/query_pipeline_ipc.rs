mod test_support;

use serde_json::json;
use test_support::{
    request_ok, sample_students_json, spawn_sidecar, temp_dir, write_data_file,
};

fn row_ids(result: &serde_json::Value) -> Vec<String> {
    result
        .get("rows")
        .and_then(|v| v.as_array())
        .expect("rows array")
        .iter()
        .map(|r| {
            r.get("student_id")
                .and_then(|v| v.as_str())
                .expect("student_id")
                .to_string()
        })
        .collect()
}

#[test]
fn load_sort_page_and_filter_shape_the_view() {
    let workspace = temp_dir("cogdashd-query-pipeline");
    write_data_file(&workspace, "students.json", &sample_students_json());
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let load = request_ok(&mut stdin, &mut reader, "2", "dataset.load", json!({}));
    assert_eq!(load.get("loaded").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(load.get("students").and_then(|v| v.as_u64()), Some(25));

    // Default view: assessment_score desc, page 0, size 20.
    let first = request_ok(&mut stdin, &mut reader, "3", "students.query", json!({}));
    assert_eq!(first.get("total").and_then(|v| v.as_u64()), Some(25));
    assert_eq!(first.get("totalPages").and_then(|v| v.as_u64()), Some(2));
    let ids = row_ids(&first);
    assert_eq!(ids.len(), 20);
    assert_eq!(ids[0], "25", "highest score first");
    assert_eq!(ids[19], "6");

    // Page size 10, second page: positions 11..20 of the sorted order.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "view.pageSize",
        json!({ "pageSize": 10 }),
    );
    let _ = request_ok(&mut stdin, &mut reader, "5", "view.page", json!({ "page": 1 }));
    let second = request_ok(&mut stdin, &mut reader, "6", "students.query", json!({}));
    assert_eq!(second.get("totalPages").and_then(|v| v.as_u64()), Some(3));
    let ids = row_ids(&second);
    assert_eq!(ids.first().map(String::as_str), Some("15"));
    assert_eq!(ids.last().map(String::as_str), Some("6"));

    // Ascending flips the order.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "view.sort",
        json!({ "key": "assessment_score", "dir": "asc" }),
    );
    let _ = request_ok(&mut stdin, &mut reader, "8", "view.page", json!({ "page": 0 }));
    let asc = request_ok(&mut stdin, &mut reader, "9", "students.query", json!({}));
    assert_eq!(row_ids(&asc)[0], "1");

    // Score range is inclusive and resets the page.
    let view = request_ok(
        &mut stdin,
        &mut reader,
        "10",
        "view.filters",
        json!({ "minScore": 71, "maxScore": 100 }),
    );
    assert_eq!(
        view.pointer("/view/page").and_then(|v| v.as_u64()),
        Some(0)
    );
    let ranged = request_ok(&mut stdin, &mut reader, "11", "students.query", json!({}));
    assert_eq!(ranged.get("total").and_then(|v| v.as_u64()), Some(5));
    assert_eq!(row_ids(&ranged), vec!["21", "22", "23", "24", "25"]);

    // Search composes with the range filter.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "12",
        "view.search",
        json!({ "q": "7a" }),
    );
    let searched = request_ok(&mut stdin, &mut reader, "13", "students.query", json!({}));
    assert_eq!(row_ids(&searched), vec!["22", "24"]);

    // Exact persona match on top of everything else.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "14",
        "view.filters",
        json!({ "persona": "Explorer", "minScore": 0, "maxScore": 100 }),
    );
    let _ = request_ok(&mut stdin, &mut reader, "15", "view.search", json!({ "q": "" }));
    let explorers = request_ok(&mut stdin, &mut reader, "16", "students.query", json!({}));
    assert_eq!(explorers.get("total").and_then(|v| v.as_u64()), Some(13));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn facets_keep_first_seen_order_and_drop_empties() {
    let workspace = temp_dir("cogdashd-facets");
    write_data_file(
        &workspace,
        "students.json",
        r#"[
            {"student_id": 1, "class": "7B", "persona": "Striver"},
            {"student_id": 2, "class": "", "persona": ""},
            {"student_id": 3, "class": "7A", "persona": "Striver"},
            {"student_id": 4, "class": "7B", "persona": "Explorer"}
        ]"#,
    );
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let _ = request_ok(&mut stdin, &mut reader, "2", "dataset.load", json!({}));
    let facets = request_ok(&mut stdin, &mut reader, "3", "students.facets", json!({}));
    assert_eq!(facets.get("classes"), Some(&json!(["7B", "7A"])));
    assert_eq!(facets.get("personas"), Some(&json!(["Striver", "Explorer"])));

    let got = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "students.get",
        json!({ "studentId": "3" }),
    );
    assert_eq!(
        got.pointer("/student/class").and_then(|v| v.as_str()),
        Some("7A")
    );

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}
