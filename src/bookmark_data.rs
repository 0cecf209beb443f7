/// Data structures for the new tab page
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Emoji shown on a folder header until the user picks one
pub const DEFAULT_FOLDER_EMOJI: &str = "⭐";

/// Emojis a folder header steps through when its emoji is clicked
pub const FOLDER_EMOJI_CYCLE: &[&str] = &["⭐", "📁", "📚", "💼", "🛠️", "🎮", "🎵", "🔖"];

/// The emoji after `current` in [`FOLDER_EMOJI_CYCLE`]; anything not in the
/// cycle starts it over
pub fn next_folder_emoji(current: &str) -> &'static str {
    let next = FOLDER_EMOJI_CYCLE
        .iter()
        .position(|emoji| *emoji == current)
        .map_or(0, |i| (i + 1) % FOLDER_EMOJI_CYCLE.len());
    FOLDER_EMOJI_CYCLE[next]
}

/// What happens when an entry is opened, if not plain navigation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BookmarkAction {
    /// Reopen a recently closed window through the sessions API
    RestoreSession {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    /// Hand the query to the browser's default search engine
    DefaultSearch { query: String },
}

/// A single bookmark (or bookmark-like entry such as a top site)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkItem {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<BookmarkAction>,
}

impl BookmarkItem {
    pub fn new(id: &str, title: &str, url: &str) -> BookmarkItem {
        BookmarkItem {
            id: id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            parent_id: None,
            action: None,
        }
    }
}

/// A named group of bookmarks, one cell of the column layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FolderItem {
    pub id: String,
    pub title: String,
    pub children: Vec<BookmarkItem>,
}

/// Left-to-right columns, each a top-to-bottom list of folders
pub type FolderColumns = Vec<Vec<FolderItem>>;

/// Per-folder persisted preferences and last known position
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FolderStateEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_expanded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_index")]
    pub column_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_index")]
    pub index_in_column: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl FolderStateEntry {
    pub fn expanded(&self) -> bool {
        self.is_expanded.unwrap_or(false)
    }

    pub fn emoji_or_default(&self) -> &str {
        self.emoji.as_deref().unwrap_or(DEFAULT_FOLDER_EMOJI)
    }

    /// Stored position, only when both halves are present
    pub fn position(&self) -> Option<(usize, usize)> {
        Some((self.column_index?, self.index_in_column?))
    }
}

/// Folder id -> state. May hold entries for folders that no longer exist.
pub type FolderState = BTreeMap<String, FolderStateEntry>;

/// Whether a folder is expanded, tolerating a missing entry
pub fn is_expanded(state: &FolderState, folder_id: &str) -> bool {
    state.get(folder_id).is_some_and(FolderStateEntry::expanded)
}

/// The folder's emoji, tolerating a missing entry
pub fn folder_emoji<'a>(state: &'a FolderState, folder_id: &str) -> &'a str {
    state
        .get(folder_id)
        .map_or(DEFAULT_FOLDER_EMOJI, FolderStateEntry::emoji_or_default)
}

/// Accept any JSON value for a position field; anything that is not a
/// non-negative integer reads as "no position".
fn lenient_index<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| {
            v.as_u64().or_else(|| {
                v.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            })
        })
        .and_then(|n| usize::try_from(n).ok()))
}

/// A bookmark flattened for searching, with its folder for context
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchableBookmark {
    #[serde(flatten)]
    pub bookmark: BookmarkItem,
    pub folder_id: String,
    pub folder_title: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ResultKind {
    Bookmark,
    WebSearch,
}

/// One row of the quick search overlay
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(rename = "type")]
    pub kind: ResultKind,
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<BookmarkAction>,
}

impl From<&SearchableBookmark> for SearchResult {
    fn from(item: &SearchableBookmark) -> Self {
        SearchResult {
            kind: ResultKind::Bookmark,
            id: item.bookmark.id.clone(),
            title: item.bookmark.title.clone(),
            url: item.bookmark.url.clone(),
            folder_title: Some(item.folder_title.clone()),
            action: item.bookmark.action.clone(),
        }
    }
}

/// Payload carried while a folder is being dragged
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DragItem {
    pub folder_id: String,
    pub source_col: usize,
    pub source_index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bookmark_item_creation() {
        let bookmark = BookmarkItem::new("1", "GitHub", "https://github.com");

        assert_eq!(bookmark.id, "1");
        assert_eq!(bookmark.title, "GitHub");
        assert_eq!(bookmark.url, "https://github.com");
        assert!(bookmark.parent_id.is_none());
        assert!(bookmark.action.is_none());
    }

    #[test]
    fn test_folder_state_defaults_for_missing_entry() {
        let state = FolderState::new();

        assert!(!is_expanded(&state, "missing"));
        assert_eq!(folder_emoji(&state, "missing"), "⭐");
    }

    #[test]
    fn test_next_folder_emoji() {
        assert_eq!(next_folder_emoji(DEFAULT_FOLDER_EMOJI), "📁");
        assert_eq!(next_folder_emoji("🔖"), "⭐");
        assert_eq!(next_folder_emoji("🚀"), "⭐");
    }

    #[test]
    fn test_folder_state_reads_camel_case_blob() {
        let json = r#"{
            "1": {"isExpanded": true, "columnIndex": 2, "indexInColumn": 0, "emoji": "📚"},
            "2": {"isExpanded": false}
        }"#;

        let state: FolderState = serde_json::from_str(json).unwrap();

        assert!(is_expanded(&state, "1"));
        assert_eq!(folder_emoji(&state, "1"), "📚");
        assert_eq!(state["1"].position(), Some((2, 0)));
        assert_eq!(state["2"].position(), None);
        assert_eq!(folder_emoji(&state, "2"), "⭐");
    }

    #[test]
    fn test_invalid_positions_read_as_missing() {
        let json = r#"{"a": {"columnIndex": -1, "indexInColumn": 1.5}}"#;

        let state: FolderState = serde_json::from_str(json).unwrap();

        assert_eq!(state["a"].column_index, None);
        assert_eq!(state["a"].index_in_column, None);
    }

    #[test]
    fn test_search_result_serialization() {
        let result = SearchResult {
            kind: ResultKind::WebSearch,
            id: "web-search-default".to_string(),
            title: "rust".to_string(),
            url: String::new(),
            folder_title: None,
            action: Some(BookmarkAction::DefaultSearch {
                query: "rust".to_string(),
            }),
        };

        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["type"], "web-search");
        assert_eq!(json["action"]["type"], "defaultSearch");
        assert!(json.get("folderTitle").is_none());
    }
}
