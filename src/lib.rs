/// Newtab Shelf - Chrome new tab page showing bookmark folders in columns
/// Built with Rust + WASM + Yew

pub mod bookmark_data;
pub mod browser;
pub mod dashboard;
pub mod drag;
pub mod highlight;
pub mod layout;
pub mod matching;
pub mod pinyin;
pub mod quick_search;
pub mod search;
pub mod settings;
pub mod storage;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export the matching core for JavaScript access
#[wasm_bindgen]
pub fn match_score(title: &str, query: &str) -> u8 {
    matching::score(title, query)
}

#[wasm_bindgen]
pub fn highlight_match(text: &str, query: &str) -> String {
    highlight::highlight(text, query)
}

/// Columns for a list of folders and a stored folder state, both as plain
/// JS objects
#[wasm_bindgen]
pub fn layout_columns(folders: JsValue, folder_state: JsValue) -> Result<JsValue, JsValue> {
    let folders: Vec<bookmark_data::FolderItem> = serde_wasm_bindgen::from_value(folders)?;
    let folder_state: bookmark_data::FolderState = if folder_state.is_null() || folder_state.is_undefined() {
        bookmark_data::FolderState::new()
    } else {
        serde_wasm_bindgen::from_value(folder_state)?
    };

    let columns = layout::rebuild_layout(&folders, &folder_state);
    Ok(serde_wasm_bindgen::to_value(&columns)?)
}

// Start the Yew app for the new tab page
#[wasm_bindgen]
pub fn start_newtab() {
    yew::Renderer::<ui::NewTab>::new().render();
}
