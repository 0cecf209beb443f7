/// Quick search over bookmarks: flattening, ranking and web-search fallback

use crate::bookmark_data::{BookmarkAction, FolderItem, ResultKind, SearchResult, SearchableBookmark};
use crate::matching::score;
use url::Url;

/// Results are bound to the number keys 1-5
pub const MAX_SHORTCUT_RESULTS: usize = 5;

pub const DEFAULT_MAX_RESULTS: usize = 5;

pub const QUERY_PLACEHOLDER: &str = "{query}";

/// A user-configured engine such as `Google,https://www.google.com/search?q={query}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEngineTemplate {
    pub name: String,
    pub url_template: String,
}

impl SearchEngineTemplate {
    /// Template URL with the percent-encoded query substituted
    pub fn url_for(&self, query: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        self.url_template.replace(QUERY_PLACEHOLDER, &encoded)
    }
}

/// Parse `name,url;name,url` pairs. Entries without a name, without the
/// `{query}` placeholder, or with an unparseable URL are skipped.
pub fn parse_search_engines(templates: &str) -> Vec<SearchEngineTemplate> {
    templates
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let Some((name, url_template)) = entry.split_once(',') else {
                log::warn!("search engine entry without url: {}", entry);
                return None;
            };
            let (name, url_template) = (name.trim(), url_template.trim());

            if name.is_empty() || !url_template.contains(QUERY_PLACEHOLDER) {
                log::warn!("ignoring malformed search engine entry: {}", entry);
                return None;
            }
            if let Err(e) = Url::parse(&url_template.replace(QUERY_PLACEHOLDER, "q")) {
                log::warn!("ignoring search engine {} with bad url: {}", name, e);
                return None;
            }

            Some(SearchEngineTemplate {
                name: name.to_string(),
                url_template: url_template.to_string(),
            })
        })
        .collect()
}

/// Search behaviour, built from the user's settings
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub max_results: usize,
    /// Folder ids whose bookmarks are left out of search
    pub excluded_folders: Vec<String>,
    pub engines: Vec<SearchEngineTemplate>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_results: DEFAULT_MAX_RESULTS,
            excluded_folders: Vec::new(),
            engines: Vec::new(),
        }
    }
}

/// Every bookmark of every folder, tagged with its folder
pub fn flatten_bookmarks(folders: &[FolderItem], excluded_folders: &[String]) -> Vec<SearchableBookmark> {
    folders
        .iter()
        .filter(|folder| !excluded_folders.contains(&folder.id))
        .flat_map(|folder| {
            folder.children.iter().map(move |bookmark| SearchableBookmark {
                bookmark: bookmark.clone(),
                folder_id: folder.id.clone(),
                folder_title: folder.title.clone(),
            })
        })
        .collect()
}

/// Score for a title that misses but whose URL contains the query
pub const URL_MATCH_SCORE: u8 = 15;
/// Score for a title that misses but whose folder title contains the query
pub const FOLDER_MATCH_SCORE: u8 = 10;

/// Relevance of one bookmark. The title decides; URL and folder title only
/// count when it misses, and they score below every title match.
pub fn bookmark_score(bookmark: &SearchableBookmark, query: &str) -> u8 {
    let title_score = score(&bookmark.bookmark.title, query);
    if title_score > 0 {
        return title_score;
    }

    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        0
    } else if bookmark.bookmark.url.to_lowercase().contains(&needle) {
        URL_MATCH_SCORE
    } else if bookmark.folder_title.to_lowercase().contains(&needle) {
        FOLDER_MATCH_SCORE
    } else {
        0
    }
}

/// Matching bookmarks, best first. Ties keep their original order.
pub fn search_bookmarks<'a>(
    bookmarks: &'a [SearchableBookmark],
    query: &str,
    max_results: usize,
) -> Vec<&'a SearchableBookmark> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(u8, &SearchableBookmark)> = bookmarks
        .iter()
        .map(|bookmark| (bookmark_score(bookmark, query), bookmark))
        .filter(|(s, _)| *s > 0)
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(max_results)
        .map(|(_, bookmark)| bookmark)
        .collect()
}

/// Ranking with an injected configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SearchEngine {
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> SearchEngine {
        let max_results = config.max_results.clamp(1, MAX_SHORTCUT_RESULTS);
        SearchEngine {
            config: SearchConfig { max_results, ..config },
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn flatten(&self, folders: &[FolderItem]) -> Vec<SearchableBookmark> {
        flatten_bookmarks(folders, &self.config.excluded_folders)
    }

    /// Bookmark matches followed by web-search entries.
    ///
    /// The default-engine entry is always present for a non-empty query; the
    /// configured engines are only offered when no bookmark matched.
    pub fn create_search_results(&self, bookmarks: &[SearchableBookmark], query: &str) -> Vec<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let mut results: Vec<SearchResult> = search_bookmarks(bookmarks, query, self.config.max_results)
            .into_iter()
            .map(SearchResult::from)
            .collect();
        let matched_any = !results.is_empty();

        results.push(SearchResult {
            kind: ResultKind::WebSearch,
            id: "web-search-default".to_string(),
            title: format!("Search \"{}\"", query),
            url: String::new(),
            folder_title: None,
            action: Some(BookmarkAction::DefaultSearch {
                query: query.to_string(),
            }),
        });

        if !matched_any {
            results.extend(self.config.engines.iter().enumerate().map(|(index, engine)| {
                SearchResult {
                    kind: ResultKind::WebSearch,
                    id: format!("web-search-{}", index),
                    title: format!("Search \"{}\" on {}", query, engine.name),
                    url: engine.url_for(query),
                    folder_title: None,
                    action: None,
                }
            }));
        }

        results
    }
}
