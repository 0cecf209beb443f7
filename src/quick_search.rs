/// Keyboard-driven search overlay state

use crate::bookmark_data::{BookmarkAction, SearchResult, SearchableBookmark};
use crate::search::{MAX_SHORTCUT_RESULTS, SearchEngine};
use crate::settings::LinkOpen;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSession {
    pub is_active: bool,
    pub query: String,
    pub selected_index: usize,
    pub results: Vec<SearchResult>,
}

/// What the page should do after a key press reached the overlay
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// Not ours, let the browser have it
    Ignored,
    /// Consumed; prevent the default action
    Handled,
    Closed,
    Open(SearchResult),
}

/// How a chosen result is carried out
#[derive(Debug, Clone, PartialEq)]
pub enum OpenTarget {
    Run { action: BookmarkAction, new_tab: bool },
    Navigate { url: String, new_tab: bool },
}

/// Whether a key press on the page should start a search: a single
/// printable character with no command modifier
pub fn is_typing_key(key: &str, ctrl: bool, meta: bool, alt: bool) -> bool {
    if ctrl || meta || alt {
        return false;
    }
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => !c.is_control() && !c.is_whitespace(),
        _ => false,
    }
}

pub fn open_target(result: &SearchResult, link_open: LinkOpen) -> OpenTarget {
    let new_tab = link_open == LinkOpen::NewTab;
    match &result.action {
        Some(action) => OpenTarget::Run {
            action: action.clone(),
            new_tab,
        },
        None => OpenTarget::Navigate {
            url: result.url.clone(),
            new_tab,
        },
    }
}

impl SearchSession {
    /// Open the overlay with an empty query
    pub fn activate(&mut self) {
        *self = SearchSession {
            is_active: true,
            ..SearchSession::default()
        };
    }

    /// Close the overlay and forget the query
    pub fn deactivate(&mut self) {
        *self = SearchSession::default();
    }

    /// Recompute results for a new query; the first result is selected
    pub fn update_query(&mut self, engine: &SearchEngine, bookmarks: &[SearchableBookmark], query: &str) {
        self.query = query.to_string();
        self.results = engine.create_search_results(bookmarks, query);
        self.selected_index = 0;
    }

    pub fn selected(&self) -> Option<&SearchResult> {
        self.results.get(self.selected_index)
    }

    pub fn select_next(&mut self) {
        if !self.results.is_empty() {
            self.selected_index = (self.selected_index + 1) % self.results.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.results.is_empty() {
            let len = self.results.len();
            self.selected_index = (self.selected_index + len - 1) % len;
        }
    }

    pub fn select(&mut self, index: usize) {
        if index < self.results.len() {
            self.selected_index = index;
        }
    }

    /// Take a result and close the overlay
    fn open(&mut self, index: usize) -> KeyOutcome {
        match self.results.get(index).cloned() {
            Some(result) => {
                self.deactivate();
                KeyOutcome::Open(result)
            }
            None => KeyOutcome::Handled,
        }
    }

    pub fn handle_key(&mut self, key: &str) -> KeyOutcome {
        if !self.is_active {
            return KeyOutcome::Ignored;
        }

        match key {
            "Escape" => {
                self.deactivate();
                KeyOutcome::Closed
            }
            "ArrowDown" => {
                self.select_next();
                KeyOutcome::Handled
            }
            "ArrowUp" => {
                self.select_previous();
                KeyOutcome::Handled
            }
            "Enter" => self.open(self.selected_index),
            _ => match key.parse::<usize>() {
                Ok(n) if (1..=MAX_SHORTCUT_RESULTS).contains(&n) => self.open(n - 1),
                _ => KeyOutcome::Ignored,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmark_data::{BookmarkItem, FolderItem, ResultKind};
    use crate::search::{SearchConfig, flatten_bookmarks};

    fn create_test_session(query: &str) -> SearchSession {
        let folder = FolderItem {
            id: "dev".to_string(),
            title: "Dev".to_string(),
            children: vec![
                BookmarkItem::new("1", "GitHub", "https://github.com"),
                BookmarkItem::new("2", "GitLab", "https://gitlab.com"),
            ],
        };
        let bookmarks = flatten_bookmarks(&[folder], &[]);
        let engine = SearchEngine::new(SearchConfig::default());

        let mut session = SearchSession::default();
        session.activate();
        session.update_query(&engine, &bookmarks, query);
        session
    }

    #[test]
    fn test_update_query_selects_first() {
        let mut session = create_test_session("git");
        session.select(2);

        let bookmarks: Vec<SearchableBookmark> = Vec::new();
        session.update_query(&SearchEngine::new(SearchConfig::default()), &bookmarks, "gi");

        assert_eq!(session.selected_index, 0);
        assert_eq!(session.query, "gi");
    }

    #[test]
    fn test_selection_wraps() {
        let mut session = create_test_session("git");
        assert_eq!(session.results.len(), 3);

        session.select_previous();
        assert_eq!(session.selected_index, 2);

        session.select_next();
        assert_eq!(session.selected_index, 0);
    }

    #[test]
    fn test_selection_on_empty_results() {
        let mut session = SearchSession::default();

        session.select_next();
        session.select_previous();

        assert_eq!(session.selected_index, 0);
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_escape_closes_and_clears() {
        let mut session = create_test_session("git");

        assert_eq!(session.handle_key("Escape"), KeyOutcome::Closed);
        assert!(!session.is_active);
        assert!(session.query.is_empty());
        assert!(session.results.is_empty());
    }

    #[test]
    fn test_enter_opens_selected() {
        let mut session = create_test_session("git");
        session.handle_key("ArrowDown");

        match session.handle_key("Enter") {
            KeyOutcome::Open(result) => assert_eq!(result.title, "GitLab"),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(!session.is_active);
    }

    #[test]
    fn test_number_keys_open_by_position() {
        let mut session = create_test_session("git");

        match session.handle_key("3") {
            KeyOutcome::Open(result) => assert_eq!(result.kind, ResultKind::WebSearch),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_number_key_beyond_results() {
        let mut session = create_test_session("git");

        assert_eq!(session.handle_key("5"), KeyOutcome::Handled);
        assert!(session.is_active);
        assert_eq!(session.handle_key("6"), KeyOutcome::Ignored);
        assert_eq!(session.handle_key("0"), KeyOutcome::Ignored);
    }

    #[test]
    fn test_inactive_session_ignores_keys() {
        let mut session = SearchSession::default();

        assert_eq!(session.handle_key("Enter"), KeyOutcome::Ignored);
        assert_eq!(session.handle_key("Escape"), KeyOutcome::Ignored);
    }

    #[test]
    fn test_is_typing_key() {
        assert!(is_typing_key("a", false, false, false));
        assert!(is_typing_key("百", false, false, false));
        assert!(!is_typing_key("a", true, false, false));
        assert!(!is_typing_key("a", false, true, false));
        assert!(!is_typing_key("Enter", false, false, false));
        assert!(!is_typing_key(" ", false, false, false));
    }

    #[test]
    fn test_open_target() {
        let session = create_test_session("git");

        assert_eq!(
            open_target(&session.results[0], LinkOpen::NewTab),
            OpenTarget::Navigate {
                url: "https://github.com".to_string(),
                new_tab: true,
            }
        );
        assert_eq!(
            open_target(&session.results[2], LinkOpen::CurrentTab),
            OpenTarget::Run {
                action: BookmarkAction::DefaultSearch { query: "git".to_string() },
                new_tab: false,
            }
        );
    }
}
