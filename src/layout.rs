/// Column layout: distributing folders into columns, restoring saved
/// positions and applying drag-and-drop moves

use crate::bookmark_data::{DragItem, FolderColumns, FolderItem, FolderState};
use std::collections::HashSet;

/// Stored column indices at or above this are treated as garbage
pub const MAX_STORED_COLUMNS: usize = 10;

/// Tuning knobs for rebuilding a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Upper bound on columns produced by smart distribution
    pub max_columns: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions { max_columns: 5 }
    }
}

/// Where a dragged folder is dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Into an existing column
    Column(usize),
    /// As a brand new column (the edge drop zones)
    NewColumn,
}

impl DropTarget {
    /// Decode the raw column value used by drop zones, where `-1` means
    /// "new column"
    pub fn from_raw(target_col: i32) -> Option<DropTarget> {
        match target_col {
            -1 => Some(DropTarget::NewColumn),
            col if col >= 0 => usize::try_from(col).ok().map(DropTarget::Column),
            _ => None,
        }
    }
}

/// Number of columns for a fresh layout of `folder_count` folders
///
/// - up to 3 folders: 1 column
/// - up to 9: 3 columns
/// - up to 16: 4 columns
/// - otherwise: one column per 4 folders, at most 5
pub fn optimal_column_count(folder_count: usize) -> usize {
    match folder_count {
        0..=3 => 1,
        4..=9 => 3,
        10..=16 => 4,
        n => n.div_ceil(4).min(5),
    }
}

/// Round-robin folders into `column_count` columns, keeping input order
pub fn distribute_folders(folders: &[FolderItem], column_count: usize) -> FolderColumns {
    if folders.is_empty() {
        return Vec::new();
    }

    let column_count = column_count.clamp(1, folders.len());
    let mut columns: FolderColumns = vec![Vec::new(); column_count];

    for (index, folder) in folders.iter().enumerate() {
        columns[index % column_count].push(folder.clone());
    }

    columns
}

/// Fresh layout with a column count picked from the folder count
pub fn smart_distribute(folders: &[FolderItem], max_columns: usize) -> FolderColumns {
    let column_count = optimal_column_count(folders.len()).min(max_columns.max(1));
    distribute_folders(folders, column_count)
}

/// A folder together with the cell it was last seen in
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedFolder {
    pub folder: FolderItem,
    pub column_index: usize,
    pub index_in_column: usize,
}

/// Split folders into those with a usable stored position and the rest,
/// both in input order
pub fn categorize_folders(
    folders: &[FolderItem],
    folder_state: &FolderState,
) -> (Vec<PositionedFolder>, Vec<FolderItem>) {
    let mut positioned = Vec::new();
    let mut unpositioned = Vec::new();

    for folder in folders {
        let position = folder_state
            .get(&folder.id)
            .and_then(|entry| entry.position())
            .filter(|(column_index, _)| *column_index < MAX_STORED_COLUMNS);

        match position {
            Some((column_index, index_in_column)) => positioned.push(PositionedFolder {
                folder: folder.clone(),
                column_index,
                index_in_column,
            }),
            None => unpositioned.push(folder.clone()),
        }
    }

    (positioned, unpositioned)
}

/// Rebuild columns from stored positions. Folders are ordered by stored
/// cell, ties by input order, so gaps and empty columns disappear and two
/// folders claiming one cell both survive.
pub fn restore_columns(positioned: &[PositionedFolder]) -> FolderColumns {
    let mut ordered: Vec<(usize, &PositionedFolder)> = positioned.iter().enumerate().collect();
    ordered.sort_by_key(|(order, p)| (p.column_index, p.index_in_column, *order));

    let mut columns: FolderColumns = Vec::new();
    let mut current_column = None;

    for (_, item) in ordered {
        if current_column != Some(item.column_index) {
            columns.push(Vec::new());
            current_column = Some(item.column_index);
        }
        if let Some(column) = columns.last_mut() {
            column.push(item.folder.clone());
        }
    }

    columns
}

/// Append each folder to the column currently holding the fewest folders
/// (first such column on ties)
pub fn distribute_to_shortest_columns(columns: &FolderColumns, folders: &[FolderItem]) -> FolderColumns {
    let mut columns = columns.clone();

    for folder in folders {
        let shortest = columns
            .iter()
            .enumerate()
            .min_by_key(|(index, column)| (column.len(), *index))
            .map(|(index, _)| index);

        match shortest {
            Some(index) => columns[index].push(folder.clone()),
            None => columns.push(vec![folder.clone()]),
        }
    }

    columns
}

/// Arrange folders into columns, honouring stored positions
pub fn rebuild_layout(folders: &[FolderItem], folder_state: &FolderState) -> FolderColumns {
    rebuild_layout_with(folders, folder_state, &LayoutOptions::default())
}

pub fn rebuild_layout_with(
    folders: &[FolderItem],
    folder_state: &FolderState,
    options: &LayoutOptions,
) -> FolderColumns {
    let (positioned, unpositioned) = categorize_folders(folders, folder_state);

    if positioned.is_empty() {
        log::debug!("no stored positions, distributing {} folders", folders.len());
        return smart_distribute(folders, options.max_columns);
    }

    let columns = restore_columns(&positioned);

    if unpositioned.is_empty() {
        columns
    } else {
        log::debug!(
            "restored {} folders, placing {} new ones",
            positioned.len(),
            unpositioned.len()
        );
        distribute_to_shortest_columns(&columns, &unpositioned)
    }
}

/// Overwrite the position of every folder in `columns`; everything else in
/// the state (expansion, emoji, entries for vanished folders) is kept
pub fn update_folder_positions(columns: &FolderColumns, current_state: &FolderState) -> FolderState {
    let mut state = current_state.clone();

    for (column_index, column) in columns.iter().enumerate() {
        for (index_in_column, folder) in column.iter().enumerate() {
            let entry = state.entry(folder.id.clone()).or_default();
            entry.column_index = Some(column_index);
            entry.index_in_column = Some(index_in_column);
        }
    }

    state
}

/// Drop state entries whose folder is no longer present, except those
/// listed in `keep`
pub fn prune_folder_state(state: &FolderState, folders: &[FolderItem], keep: &[&str]) -> FolderState {
    let live: HashSet<&str> = folders
        .iter()
        .map(|f| f.id.as_str())
        .chain(keep.iter().copied())
        .collect();

    state
        .iter()
        .filter(|(id, _)| live.contains(id.as_str()))
        .map(|(id, entry)| (id.clone(), entry.clone()))
        .collect()
}

/// All folders in column-major order
pub fn flatten_columns(columns: &FolderColumns) -> Vec<FolderItem> {
    columns.iter().flatten().cloned().collect()
}

/// Move a dragged folder. Returns `None` when nothing should change: the
/// payload no longer matches the layout, the target is out of range, or the
/// folder would land where it already is.
pub fn move_folder(
    columns: &FolderColumns,
    item: &DragItem,
    target: DropTarget,
    target_index: usize,
) -> Option<FolderColumns> {
    let found = columns
        .get(item.source_col)
        .and_then(|column| column.get(item.source_index));

    match found {
        Some(folder) if folder.id == item.folder_id => {}
        _ => {
            log::warn!("could not find dragged folder {:?}", item);
            return None;
        }
    }

    if let DropTarget::Column(target_col) = target {
        if target_col >= columns.len() {
            log::warn!("drop target column {} out of range", target_col);
            return None;
        }
        let target_len = columns[target_col].len();
        if target_col == item.source_col
            && shifted_index(target_index.min(target_len), item.source_index) == item.source_index
        {
            return None;
        }
    }

    let mut new_columns = columns.clone();
    let folder = new_columns[item.source_col].remove(item.source_index);

    match target {
        DropTarget::NewColumn => {
            let mut insert_at = target_index;
            if new_columns[item.source_col].is_empty() {
                new_columns.remove(item.source_col);
                if target_index > item.source_col {
                    insert_at -= 1;
                }
            }
            let insert_at = insert_at.min(new_columns.len());
            new_columns.insert(insert_at, vec![folder]);
        }
        DropTarget::Column(target_col) => {
            let index = if target_col == item.source_col {
                shifted_index(target_index, item.source_index)
            } else {
                target_index
            };
            let column = &mut new_columns[target_col];
            let index = index.min(column.len());
            column.insert(index, folder);

            // Judged after the insert: a same-column move never empties its column
            if new_columns[item.source_col].is_empty() {
                new_columns.remove(item.source_col);
            }
        }
    }

    if new_columns == *columns {
        None
    } else {
        Some(new_columns)
    }
}

/// Insert index after the dragged entry has been taken out of its column
fn shifted_index(target_index: usize, source_index: usize) -> usize {
    if target_index > source_index {
        target_index - 1
    } else {
        target_index
    }
}
