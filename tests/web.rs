//! Browser-side checks of the exported functions. Run with
//! `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use newtab_shelf::browser::{FolderOptions, get_all_folders};
use newtab_shelf::{highlight_match, layout_columns, match_score};
use serde::Serialize;
use serde_json::{Value, json};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn to_js(value: &Value) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap()
}

fn create_test_folders(count: usize) -> Value {
    Value::Array(
        (0..count)
            .map(|i| {
                json!({
                    "id": format!("f{}", i),
                    "title": format!("Folder {}", i),
                    "children": [{"id": format!("b{}", i), "title": "Docs", "url": "https://docs.rs"}]
                })
            })
            .collect(),
    )
}

#[wasm_bindgen_test]
fn test_match_score_tiers() {
    assert_eq!(match_score("GitHub", "github"), 100);
    assert_eq!(match_score("GitHub", "git"), 80);
    assert_eq!(match_score("百度", "baidu"), 30);
    assert_eq!(match_score("GitHub", "xyz"), 0);
}

#[wasm_bindgen_test]
fn test_highlight_match() {
    assert_eq!(highlight_match("GitHub", "hub"), "Git<em>Hub</em>");
    assert_eq!(highlight_match("我的百度", "baidu"), "我的<em>百度</em>");
}

#[wasm_bindgen_test]
fn test_layout_columns_fresh() {
    let columns = layout_columns(to_js(&create_test_folders(6)), JsValue::NULL).unwrap();
    let columns: Vec<Vec<Value>> = serde_wasm_bindgen::from_value(columns).unwrap();

    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0][1]["id"], json!("f3"));
}

#[wasm_bindgen_test]
fn test_layout_columns_restores_state() {
    let state = json!({
        "f0": {"columnIndex": 1, "indexInColumn": 0},
        "f1": {"columnIndex": 0, "indexInColumn": 0, "isExpanded": true}
    });

    let columns = layout_columns(to_js(&create_test_folders(2)), to_js(&state)).unwrap();
    let columns: Vec<Vec<Value>> = serde_wasm_bindgen::from_value(columns).unwrap();

    assert_eq!(columns.len(), 2);
    assert_eq!(columns[0][0]["id"], json!("f1"));
    assert_eq!(columns[1][0]["id"], json!("f0"));
}

#[wasm_bindgen_test]
fn test_layout_columns_rejects_bad_input() {
    assert!(layout_columns(JsValue::from_str("nope"), JsValue::NULL).is_err());
}

// Outside the extension the bookmark tree rejects while the optional sources resolve empty
#[wasm_bindgen_test]
async fn test_get_all_folders_reports_missing_bookmark_tree() {
    let options = FolderOptions {
        show_most_visited: true,
        show_recently_closed: true,
        ..Default::default()
    };

    let loaded = get_all_folders(&options).await;

    assert!(!loaded.bookmarks_loaded);
    assert!(loaded.folders.is_empty());
}
