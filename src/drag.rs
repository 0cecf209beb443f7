/// Drag-and-drop of folders as an explicit state machine.
///
/// Hover feedback and the final drop both go through [`can_drop`], so a
/// drop indicator is only ever shown where a drop would be accepted.

use crate::bookmark_data::DragItem;
use crate::layout::DropTarget;

/// A drop zone: a target column (or new column) plus an insert index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropSpot {
    pub target: DropTarget,
    pub index: usize,
}

impl DropSpot {
    pub fn in_column(column: usize, index: usize) -> DropSpot {
        DropSpot {
            target: DropTarget::Column(column),
            index,
        }
    }

    pub fn new_column(index: usize) -> DropSpot {
        DropSpot {
            target: DropTarget::NewColumn,
            index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragItem),
    Hovering(DragItem, DropSpot),
}

/// Whether `item` may be dropped on `spot`.
///
/// Drop zones directly above and below the dragged folder in its own column
/// would leave it where it is, so they are rejected. A locked layout accepts
/// nothing.
pub fn can_drop(item: &DragItem, spot: &DropSpot, lock_layout: bool) -> bool {
    if lock_layout {
        return false;
    }

    match spot.target {
        DropTarget::NewColumn => true,
        DropTarget::Column(column) => {
            !(item.source_col == column
                && (spot.index == item.source_index || spot.index == item.source_index + 1))
        }
    }
}

impl DragState {
    pub fn dragged(&self) -> Option<&DragItem> {
        match self {
            DragState::Idle => None,
            DragState::Dragging(item) | DragState::Hovering(item, _) => Some(item),
        }
    }

    /// Pick a folder up. Refused while another drag is in progress or the
    /// layout is locked.
    pub fn begin(&mut self, item: DragItem, lock_layout: bool) -> bool {
        if lock_layout || !matches!(self, DragState::Idle) {
            return false;
        }
        *self = DragState::Dragging(item);
        true
    }

    /// Pointer moved over a drop zone
    pub fn hover(&mut self, spot: DropSpot, lock_layout: bool) {
        let next = match std::mem::take(self) {
            DragState::Idle => DragState::Idle,
            DragState::Dragging(item) | DragState::Hovering(item, _) => {
                if can_drop(&item, &spot, lock_layout) {
                    DragState::Hovering(item, spot)
                } else {
                    DragState::Dragging(item)
                }
            }
        };
        *self = next;
    }

    /// Pointer left whatever drop zone it was over
    pub fn leave(&mut self) {
        if let DragState::Hovering(item, _) = self {
            *self = DragState::Dragging(item.clone());
        }
    }

    /// Release over `spot`. Always returns to `Idle`; yields the item and
    /// spot only when the drop is accepted.
    pub fn drop_on(&mut self, spot: DropSpot, lock_layout: bool) -> Option<(DragItem, DropSpot)> {
        match std::mem::take(self) {
            DragState::Idle => None,
            DragState::Dragging(item) | DragState::Hovering(item, _) => {
                if can_drop(&item, &spot, lock_layout) {
                    Some((item, spot))
                } else {
                    log::debug!("drop of {} on {:?} rejected", item.folder_id, spot);
                    None
                }
            }
        }
    }

    pub fn cancel(&mut self) {
        *self = DragState::Idle;
    }

    /// Whether the indicator for `spot` should be lit
    pub fn shows_indicator(&self, spot: &DropSpot) -> bool {
        matches!(self, DragState::Hovering(_, current) if current == spot)
    }
}
