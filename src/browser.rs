/// Browser data adapter: bookmarks, top sites and recently closed sessions
/// turned into folders for the layout

use crate::bookmark_data::{BookmarkAction, BookmarkItem, FolderItem};
use js_sys::Promise;
use serde::Deserialize;
use thiserror::Error;
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

pub const TOP_SITES_FOLDER_ID: &str = "topsite-folder";
pub const RECENTLY_CLOSED_FOLDER_ID: &str = "recent-folder";

const UNNAMED: &str = "unnamed";

// Import JS bridge functions
#[wasm_bindgen(module = "/newtab.js")]
extern "C" {
    // Plain promises so all three requests can be in flight together
    #[wasm_bindgen(catch)]
    fn getBookmarkTree() -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch)]
    fn getTopSites() -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch)]
    fn getRecentlyClosed() -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch)]
    async fn restoreSession(session_id: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn defaultSearch(query: &str, new_tab: bool) -> Result<(), JsValue>;

    fn openUrl(url: &str, new_tab: bool);

    fn faviconBase() -> String;
}

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("browser API call failed: {0}")]
    Bridge(String),
    #[error("unexpected data from browser: {0}")]
    Payload(String),
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Node of `chrome.bookmarks.getTree()`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkTreeNode {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub children: Vec<BookmarkTreeNode>,
}

/// Entry of `chrome.topSites.get()`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TopSite {
    pub url: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionTab {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionWindow {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub tabs: Vec<SessionTab>,
}

/// Entry of `chrome.sessions.getRecentlyClosed()`: a tab or a whole window
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClosedSession {
    #[serde(default)]
    pub tab: Option<SessionTab>,
    #[serde(default)]
    pub window: Option<SessionWindow>,
}

/// Which synthetic folders to add, and how big they get
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderOptions {
    pub show_most_visited: bool,
    pub show_recently_closed: bool,
    pub top_sites_limit: usize,
    pub recently_closed_limit: usize,
}

impl Default for FolderOptions {
    fn default() -> Self {
        FolderOptions {
            show_most_visited: false,
            show_recently_closed: false,
            top_sites_limit: 10,
            recently_closed_limit: 10,
        }
    }
}

fn title_or_unnamed(title: &str) -> String {
    if title.is_empty() {
        UNNAMED.to_string()
    } else {
        title.to_string()
    }
}

/// Every bookmark folder that directly holds bookmarks, depth first. Root
/// nodes themselves are skipped.
pub fn bookmark_folders(tree: &[BookmarkTreeNode]) -> Vec<FolderItem> {
    let mut folders = Vec::new();
    for root in tree {
        collect_folders(&root.children, &mut folders);
    }
    folders
}

fn collect_folders(nodes: &[BookmarkTreeNode], folders: &mut Vec<FolderItem>) {
    for node in nodes {
        if node.url.is_some() || node.children.is_empty() {
            continue;
        }

        let bookmarks: Vec<BookmarkItem> = node
            .children
            .iter()
            .filter_map(|child| {
                child.url.as_ref().map(|url| BookmarkItem {
                    id: child.id.clone(),
                    title: title_or_unnamed(&child.title),
                    url: url.clone(),
                    parent_id: child.parent_id.clone(),
                    action: None,
                })
            })
            .collect();

        if !bookmarks.is_empty() {
            folders.push(FolderItem {
                id: node.id.clone(),
                title: title_or_unnamed(&node.title),
                children: bookmarks,
            });
        }

        collect_folders(&node.children, folders);
    }
}

/// "Most Visited" folder, or `None` when there are no top sites
pub fn top_sites_folder(sites: &[TopSite], limit: usize) -> Option<FolderItem> {
    if sites.is_empty() {
        return None;
    }

    let children = sites
        .iter()
        .take(limit)
        .enumerate()
        .map(|(index, site)| BookmarkItem {
            id: format!("topsite-{}", index),
            title: title_or_unnamed(&site.title),
            url: site.url.clone(),
            parent_id: Some(TOP_SITES_FOLDER_ID.to_string()),
            action: None,
        })
        .collect();

    Some(FolderItem {
        id: TOP_SITES_FOLDER_ID.to_string(),
        title: "Most Visited".to_string(),
        children,
    })
}

/// "Recently Closed" folder. A closed tab becomes a plain entry; a closed
/// window with several tabs becomes one entry that restores the window.
pub fn recently_closed_folder(sessions: &[ClosedSession], limit: usize) -> Option<FolderItem> {
    let mut entries = Vec::new();

    for (index, session) in sessions.iter().enumerate() {
        if let Some(tab) = &session.tab {
            entries.push(BookmarkItem {
                id: format!("recent-tab-{}", index),
                title: title_or_unnamed(&tab.title),
                url: tab.url.clone(),
                parent_id: Some(RECENTLY_CLOSED_FOLDER_ID.to_string()),
                action: None,
            });
        } else if let Some(window) = &session.window {
            let Some(first) = window.tabs.first() else {
                continue;
            };
            let action = match (&window.session_id, window.tabs.len()) {
                (Some(session_id), n) if n > 1 => Some(BookmarkAction::RestoreSession {
                    session_id: session_id.clone(),
                }),
                _ => None,
            };
            let title = if action.is_some() {
                format!("{} tabs: {}", window.tabs.len(), title_or_unnamed(&first.title))
            } else {
                title_or_unnamed(&first.title)
            };

            entries.push(BookmarkItem {
                id: format!("recent-window-{}", index),
                title,
                url: first.url.clone(),
                parent_id: Some(RECENTLY_CLOSED_FOLDER_ID.to_string()),
                action,
            });
        }
    }

    if entries.is_empty() {
        return None;
    }
    entries.truncate(limit);

    Some(FolderItem {
        id: RECENTLY_CLOSED_FOLDER_ID.to_string(),
        title: "Recently Closed".to_string(),
        children: entries,
    })
}

/// Bookmark folders with the enabled synthetic folders in front, top sites
/// first
pub fn assemble_folders(
    bookmark_folders: Vec<FolderItem>,
    top_sites: Option<FolderItem>,
    recently_closed: Option<FolderItem>,
    options: &FolderOptions,
) -> Vec<FolderItem> {
    let mut folders = Vec::with_capacity(bookmark_folders.len() + 2);

    if options.show_most_visited {
        folders.extend(top_sites);
    }
    if options.show_recently_closed {
        folders.extend(recently_closed);
    }
    folders.extend(bookmark_folders);

    folders
}

/// `<base>?pageUrl=<page>&size=<size>` for the extension favicon endpoint
pub fn favicon_url(base: &str, page_url: &str, size: u32) -> Result<String, BrowserError> {
    let mut url = Url::parse(base)?;
    let page_url = if page_url.is_empty() { "none" } else { page_url };
    url.query_pairs_mut()
        .append_pair("pageUrl", page_url)
        .append_pair("size", &size.to_string());
    Ok(url.to_string())
}

/// Favicon for a page, through the running extension
pub fn page_favicon(page_url: &str) -> Option<String> {
    favicon_url(&faviconBase(), page_url, 32)
        .map_err(|e| log::warn!("favicon url for {} failed: {}", page_url, e))
        .ok()
}

async fn fetch<T: for<'de> Deserialize<'de>>(started: Result<Promise, JsValue>) -> Result<T, BrowserError> {
    let bridge_error = |e: JsValue| BrowserError::Bridge(format!("{:?}", e));
    let value = JsFuture::from(started.map_err(bridge_error)?)
        .await
        .map_err(bridge_error)?;
    serde_wasm_bindgen::from_value(value).map_err(|e| BrowserError::Payload(e.to_string()))
}

/// Await an optional source, logging a failure and treating it as absent
async fn fetch_optional<T: for<'de> Deserialize<'de>>(
    started: Option<Result<Promise, JsValue>>,
    source: &str,
) -> Option<T> {
    match fetch(started?).await {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("{} failed: {}", source, e);
            None
        }
    }
}

/// Everything shown on the page, and whether the bookmark tree itself was
/// read. Without the tree the list is partial and must not be used to decide
/// which saved folder state is stale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedFolders {
    pub folders: Vec<FolderItem>,
    pub bookmarks_loaded: bool,
}

/// Load everything shown on the page. All sources are requested at once;
/// each one that fails is logged and left out, so the worst case is an
/// empty list.
pub async fn get_all_folders(options: &FolderOptions) -> LoadedFolders {
    let tree = getBookmarkTree();
    let sites = options.show_most_visited.then(getTopSites);
    let sessions = options.show_recently_closed.then(getRecentlyClosed);

    let (folders, bookmarks_loaded) = match fetch::<Vec<BookmarkTreeNode>>(tree).await {
        Ok(tree) => (bookmark_folders(&tree), true),
        Err(e) => {
            log::error!("getBookmarkFolders failed: {}", e);
            (Vec::new(), false)
        }
    };

    let top_sites = fetch_optional::<Vec<TopSite>>(sites, "getTopSites")
        .await
        .and_then(|sites| top_sites_folder(&sites, options.top_sites_limit));
    let recently_closed = fetch_optional::<Vec<ClosedSession>>(sessions, "getRecentlyClosed")
        .await
        .and_then(|sessions| recently_closed_folder(&sessions, options.recently_closed_limit));

    LoadedFolders {
        folders: assemble_folders(folders, top_sites, recently_closed, options),
        bookmarks_loaded,
    }
}

/// Carry out a bookmark's action
pub async fn run_action(action: &BookmarkAction, new_tab: bool) -> Result<(), BrowserError> {
    let result = match action {
        BookmarkAction::RestoreSession { session_id } => restoreSession(session_id).await,
        BookmarkAction::DefaultSearch { query } => defaultSearch(query, new_tab).await,
    };
    result.map_err(|e| BrowserError::Bridge(format!("{:?}", e)))
}

pub fn navigate(url: &str, new_tab: bool) {
    openUrl(url, new_tab);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_tree() -> Vec<BookmarkTreeNode> {
        let json = r#"[{
            "id": "0",
            "title": "",
            "children": [
                {"id": "1", "title": "Bookmarks Bar", "children": [
                    {"id": "10", "parentId": "1", "title": "GitHub", "url": "https://github.com"},
                    {"id": "11", "parentId": "1", "title": "Dev", "children": [
                        {"id": "110", "parentId": "11", "title": "", "url": "https://docs.rs"}
                    ]}
                ]},
                {"id": "2", "title": "Other Bookmarks", "children": [
                    {"id": "20", "title": "Empty folder", "children": []}
                ]}
            ]
        }]"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_bookmark_folders_depth_first() {
        let folders = bookmark_folders(&create_test_tree());

        assert_eq!(folders.len(), 2);
        assert_eq!(folders[0].id, "1");
        assert_eq!(folders[0].children.len(), 1);
        assert_eq!(folders[0].children[0].parent_id.as_deref(), Some("1"));
        assert_eq!(folders[1].id, "11");
        assert_eq!(folders[1].children[0].title, "unnamed");
    }

    #[test]
    fn test_top_sites_folder() {
        let sites: Vec<TopSite> = (0..15)
            .map(|i| TopSite {
                url: format!("https://site{}.com", i),
                title: String::new(),
            })
            .collect();

        let folder = top_sites_folder(&sites, 10).unwrap();

        assert_eq!(folder.id, TOP_SITES_FOLDER_ID);
        assert_eq!(folder.children.len(), 10);
        assert_eq!(folder.children[3].id, "topsite-3");
        assert_eq!(folder.children[3].title, "unnamed");
        assert!(top_sites_folder(&[], 10).is_none());
    }

    #[test]
    fn test_recently_closed_folder() {
        let json = r#"[
            {"tab": {"url": "https://a.com", "title": "A", "sessionId": "s1"}},
            {"window": {"sessionId": "w1", "tabs": [
                {"url": "https://b.com", "title": "B"},
                {"url": "https://c.com", "title": "C"}
            ]}},
            {"window": {"sessionId": "w2", "tabs": [{"url": "https://d.com", "title": "D"}]}},
            {"window": {"sessionId": "w3", "tabs": []}}
        ]"#;
        let sessions: Vec<ClosedSession> = serde_json::from_str(json).unwrap();

        let folder = recently_closed_folder(&sessions, 10).unwrap();

        assert_eq!(folder.children.len(), 3);
        assert_eq!(folder.children[0].id, "recent-tab-0");
        assert!(folder.children[0].action.is_none());
        assert_eq!(folder.children[1].title, "2 tabs: B");
        assert_eq!(
            folder.children[1].action,
            Some(BookmarkAction::RestoreSession {
                session_id: "w1".to_string()
            })
        );
        assert_eq!(folder.children[2].title, "D");
        assert!(folder.children[2].action.is_none());
    }

    #[test]
    fn test_recently_closed_empty() {
        assert!(recently_closed_folder(&[], 10).is_none());
    }

    #[test]
    fn test_assemble_folders_prepends_enabled_synthetics() {
        let bookmarks = vec![FolderItem {
            id: "1".to_string(),
            title: "Bar".to_string(),
            children: Vec::new(),
        }];
        let top = top_sites_folder(
            &[TopSite {
                url: "https://a.com".to_string(),
                title: "A".to_string(),
            }],
            10,
        );
        let recent = Some(FolderItem {
            id: RECENTLY_CLOSED_FOLDER_ID.to_string(),
            title: "Recently Closed".to_string(),
            children: Vec::new(),
        });
        let options = FolderOptions {
            show_most_visited: true,
            show_recently_closed: true,
            ..Default::default()
        };

        let all = assemble_folders(bookmarks.clone(), top.clone(), recent.clone(), &options);
        let ids: Vec<&str> = all.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec![TOP_SITES_FOLDER_ID, RECENTLY_CLOSED_FOLDER_ID, "1"]);

        let plain = assemble_folders(bookmarks, top, recent, &FolderOptions::default());
        assert_eq!(plain.len(), 1);
    }

    #[test]
    fn test_favicon_url() {
        let url = favicon_url("chrome-extension://abc/_favicon/", "https://github.com/rust", 32).unwrap();

        assert_eq!(
            url,
            "chrome-extension://abc/_favicon/?pageUrl=https%3A%2F%2Fgithub.com%2Frust&size=32"
        );
    }

    #[test]
    fn test_favicon_url_empty_page() {
        let url = favicon_url("chrome-extension://abc/_favicon/", "", 16).unwrap();

        assert!(url.ends_with("?pageUrl=none&size=16"));
        assert!(favicon_url("not a base", "https://a.com", 16).is_err());
    }
}
