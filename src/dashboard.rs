/// Page-level state: the folder columns, their saved state and the drag in
/// progress. Every mutation that should be persisted hands back the new
/// folder state; writing it out is left to the caller.

use crate::bookmark_data::{DragItem, FolderColumns, FolderItem, FolderState, folder_emoji, next_folder_emoji};
use crate::browser::{LoadedFolders, RECENTLY_CLOSED_FOLDER_ID, TOP_SITES_FOLDER_ID};
use crate::drag::{DragState, DropSpot};
use crate::layout::{flatten_columns, move_folder, prune_folder_state, rebuild_layout, update_folder_positions};
use crate::settings::AppSettings;

/// Folders that are not hidden by the user, in their original order
pub fn visible_folders(folders: &[FolderItem], hidden: &[String]) -> Vec<FolderItem> {
    folders
        .iter()
        .filter(|folder| !hidden.contains(&folder.id))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    columns: FolderColumns,
    folder_state: FolderState,
    drag: DragState,
}

impl Dashboard {
    /// Lay out `loaded` from a saved folder state. Stale entries are only
    /// pruned against a list that includes the bookmark tree; entries for
    /// synthetic and hidden folders always survive.
    pub fn load(loaded: &LoadedFolders, saved_state: FolderState, settings: &AppSettings) -> Dashboard {
        let folders = &loaded.folders;
        let folder_state = if settings.prune_stale_state && loaded.bookmarks_loaded {
            let mut keep = vec![TOP_SITES_FOLDER_ID, RECENTLY_CLOSED_FOLDER_ID];
            keep.extend(settings.hidden_folders.iter().map(String::as_str));

            let pruned = prune_folder_state(&saved_state, folders, &keep);
            if pruned.len() < saved_state.len() {
                log::info!("dropped {} stale folder entries", saved_state.len() - pruned.len());
            }
            pruned
        } else {
            if !loaded.bookmarks_loaded {
                log::warn!("bookmark tree missing, keeping all saved folder state");
            }
            saved_state
        };

        let visible = visible_folders(folders, &settings.hidden_folders);
        let columns = rebuild_layout(&visible, &folder_state);

        Dashboard {
            columns,
            folder_state,
            drag: DragState::Idle,
        }
    }

    pub fn columns(&self) -> &FolderColumns {
        &self.columns
    }

    pub fn folder_state(&self) -> &FolderState {
        &self.folder_state
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Every displayed folder, column by column
    pub fn folders(&self) -> Vec<FolderItem> {
        flatten_columns(&self.columns)
    }

    pub fn toggle_folder(&mut self, folder_id: &str) -> FolderState {
        let entry = self.folder_state.entry(folder_id.to_string()).or_default();
        entry.is_expanded = Some(!entry.expanded());
        self.folder_state.clone()
    }

    pub fn set_emoji(&mut self, folder_id: &str, emoji: &str) -> FolderState {
        let entry = self.folder_state.entry(folder_id.to_string()).or_default();
        entry.emoji = Some(emoji.to_string());
        self.folder_state.clone()
    }

    /// Step the folder's emoji to the next one in the cycle
    pub fn cycle_emoji(&mut self, folder_id: &str) -> FolderState {
        let next = next_folder_emoji(folder_emoji(&self.folder_state, folder_id));
        self.set_emoji(folder_id, next)
    }

    /// Start dragging the folder at `column`/`index`. Fails when the layout
    /// is locked or nothing is there.
    pub fn begin_drag(&mut self, column: usize, index: usize, lock_layout: bool) -> bool {
        let Some(folder) = self.columns.get(column).and_then(|c| c.get(index)) else {
            return false;
        };

        let item = DragItem {
            folder_id: folder.id.clone(),
            source_col: column,
            source_index: index,
        };
        self.drag.begin(item, lock_layout)
    }

    pub fn hover(&mut self, spot: DropSpot, lock_layout: bool) {
        self.drag.hover(spot, lock_layout);
    }

    pub fn leave(&mut self) {
        self.drag.leave();
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Finish the drag on `spot`. Returns the folder state to persist when
    /// the layout actually changed.
    pub fn drop_on(&mut self, spot: DropSpot, lock_layout: bool) -> Option<FolderState> {
        let (item, spot) = self.drag.drop_on(spot, lock_layout)?;
        let columns = move_folder(&self.columns, &item, spot.target, spot.index)?;

        self.folder_state = update_folder_positions(&columns, &self.folder_state);
        self.columns = columns;
        Some(self.folder_state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmark_data::{BookmarkItem, FolderStateEntry};

    fn create_test_folders(count: usize) -> Vec<FolderItem> {
        (0..count)
            .map(|i| FolderItem {
                id: format!("f{}", i),
                title: format!("Folder {}", i),
                children: vec![BookmarkItem::new(&format!("b{}", i), "Bookmark", "https://example.com")],
            })
            .collect()
    }

    fn loaded(folders: &[FolderItem]) -> LoadedFolders {
        LoadedFolders {
            folders: folders.to_vec(),
            bookmarks_loaded: true,
        }
    }

    fn positioned(column: usize, index: usize) -> FolderStateEntry {
        FolderStateEntry {
            column_index: Some(column),
            index_in_column: Some(index),
            ..Default::default()
        }
    }

    fn ids(columns: &FolderColumns) -> Vec<Vec<&str>> {
        columns
            .iter()
            .map(|column| column.iter().map(|f| f.id.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_visible_folders() {
        let folders = create_test_folders(3);

        let visible = visible_folders(&folders, &["f1".to_string()]);

        assert_eq!(visible.len(), 2);
        assert_eq!(visible[1].id, "f2");
    }

    #[test]
    fn test_load_hides_folders_without_forgetting_them() {
        let folders = create_test_folders(4);
        let mut state = FolderState::new();
        state.insert("f1".to_string(), positioned(0, 0));
        let settings = AppSettings {
            hidden_folders: vec!["f1".to_string()],
            ..Default::default()
        };

        let dashboard = Dashboard::load(&loaded(&folders), state, &settings);

        assert!(dashboard.folders().iter().all(|f| f.id != "f1"));
        assert_eq!(dashboard.folders().len(), 3);
        assert!(dashboard.folder_state().contains_key("f1"));
    }

    #[test]
    fn test_load_prunes_stale_entries() {
        let mut state = FolderState::new();
        state.insert("gone".to_string(), positioned(0, 0));
        state.insert("f0".to_string(), positioned(0, 0));

        let pruned = Dashboard::load(&loaded(&create_test_folders(2)), state.clone(), &AppSettings::default());
        assert!(!pruned.folder_state().contains_key("gone"));

        let settings = AppSettings {
            prune_stale_state: false,
            ..Default::default()
        };
        let kept = Dashboard::load(&loaded(&create_test_folders(2)), state, &settings);
        assert!(kept.folder_state().contains_key("gone"));
    }

    #[test]
    fn test_toggle_folder() {
        let mut dashboard = Dashboard::load(&loaded(&create_test_folders(1)), FolderState::new(), &AppSettings::default());

        let state = dashboard.toggle_folder("f0");
        assert_eq!(state["f0"].is_expanded, Some(true));

        let state = dashboard.toggle_folder("f0");
        assert_eq!(state["f0"].is_expanded, Some(false));
    }

    #[test]
    fn test_set_emoji_keeps_position() {
        let mut state = FolderState::new();
        state.insert("f0".to_string(), positioned(0, 0));
        let mut dashboard = Dashboard::load(&loaded(&create_test_folders(1)), state, &AppSettings::default());

        let state = dashboard.set_emoji("f0", "🚀");

        assert_eq!(state["f0"].emoji.as_deref(), Some("🚀"));
        assert_eq!(state["f0"].position(), Some((0, 0)));
    }

    #[test]
    fn test_drag_to_new_column_persists_positions() {
        let folders = create_test_folders(6);
        let mut dashboard = Dashboard::load(&loaded(&folders), FolderState::new(), &AppSettings::default());
        assert_eq!(ids(dashboard.columns()), vec![vec!["f0", "f3"], vec!["f1", "f4"], vec!["f2", "f5"]]);

        assert!(dashboard.begin_drag(0, 1, false));
        dashboard.hover(DropSpot::new_column(3), false);
        let state = dashboard.drop_on(DropSpot::new_column(3), false).unwrap();

        assert_eq!(dashboard.columns().len(), 4);
        assert_eq!(state["f3"].position(), Some((3, 0)));
        assert_eq!(state["f0"].position(), Some((0, 0)));
        assert_eq!(*dashboard.drag_state(), DragState::Idle);
    }

    #[test]
    fn test_reload_restores_dragged_layout() {
        let folders = create_test_folders(6);
        let mut dashboard = Dashboard::load(&loaded(&folders), FolderState::new(), &AppSettings::default());
        dashboard.begin_drag(2, 0, false);
        let state = dashboard.drop_on(DropSpot::in_column(0, 0), false).unwrap();

        let reloaded = Dashboard::load(&loaded(&folders), state, &AppSettings::default());

        assert_eq!(reloaded.columns(), dashboard.columns());
    }

    #[test]
    fn test_locked_layout_rejects_drag() {
        let mut dashboard = Dashboard::load(&loaded(&create_test_folders(6)), FolderState::new(), &AppSettings::default());

        assert!(!dashboard.begin_drag(0, 0, true));
        assert!(dashboard.drop_on(DropSpot::new_column(3), true).is_none());
    }

    #[test]
    fn test_drop_in_place_changes_nothing() {
        let mut dashboard = Dashboard::load(&loaded(&create_test_folders(6)), FolderState::new(), &AppSettings::default());
        let before = dashboard.columns().clone();

        dashboard.begin_drag(0, 0, false);
        assert!(dashboard.drop_on(DropSpot::in_column(0, 1), false).is_none());

        assert_eq!(*dashboard.columns(), before);
        assert_eq!(*dashboard.drag_state(), DragState::Idle);
    }

    #[test]
    fn test_begin_drag_out_of_range() {
        let mut dashboard = Dashboard::load(&loaded(&create_test_folders(2)), FolderState::new(), &AppSettings::default());

        assert!(!dashboard.begin_drag(4, 0, false));
    }

    #[test]
    fn test_cycle_emoji_persists_next_emoji() {
        let mut state = FolderState::new();
        state.insert("f0".to_string(), positioned(0, 0));
        let mut dashboard = Dashboard::load(&loaded(&create_test_folders(1)), state, &AppSettings::default());

        let state = dashboard.cycle_emoji("f0");
        assert_eq!(state["f0"].emoji.as_deref(), Some("📁"));
        assert_eq!(state["f0"].position(), Some((0, 0)));

        let state = dashboard.cycle_emoji("f0");
        assert_eq!(state["f0"].emoji.as_deref(), Some("📚"));
    }

    #[test]
    fn test_failed_bookmark_load_keeps_saved_state() {
        let mut state = FolderState::new();
        state.insert(
            "bookmarks-bar".to_string(),
            FolderStateEntry {
                column_index: Some(1),
                index_in_column: Some(0),
                emoji: Some("📁".to_string()),
                ..Default::default()
            },
        );
        let partial = LoadedFolders {
            folders: vec![FolderItem {
                id: TOP_SITES_FOLDER_ID.to_string(),
                title: "Most visited".to_string(),
                children: Vec::new(),
            }],
            bookmarks_loaded: false,
        };

        let mut dashboard = Dashboard::load(&partial, state, &AppSettings::default());
        let persisted = dashboard.toggle_folder(TOP_SITES_FOLDER_ID);

        assert_eq!(persisted["bookmarks-bar"].position(), Some((1, 0)));
        assert_eq!(persisted["bookmarks-bar"].emoji.as_deref(), Some("📁"));
        assert!(persisted.contains_key(TOP_SITES_FOLDER_ID));
    }

    #[test]
    fn test_pruning_keeps_synthetic_and_hidden_entries() {
        let mut state = FolderState::new();
        for id in [TOP_SITES_FOLDER_ID, RECENTLY_CLOSED_FOLDER_ID, "hidden", "gone"] {
            state.insert(id.to_string(), positioned(0, 0));
        }
        let settings = AppSettings {
            hidden_folders: vec!["hidden".to_string()],
            ..Default::default()
        };

        // Most visited and recently closed switched off: neither synthetic folder is listed
        let dashboard = Dashboard::load(&loaded(&create_test_folders(2)), state, &settings);

        let state = dashboard.folder_state();
        assert!(state.contains_key(TOP_SITES_FOLDER_ID));
        assert!(state.contains_key(RECENTLY_CLOSED_FOLDER_ID));
        assert!(state.contains_key("hidden"));
        assert!(!state.contains_key("gone"));
    }
}
