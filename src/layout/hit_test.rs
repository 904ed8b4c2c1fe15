//! Resize handle hit testing.

use super::geometry::HeaderCell;

/// Half-width of the grab band around a column boundary, in pixels.
pub const RESIZE_BAND_PX: f64 = 5.0;

/// What the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Inside the header cell of this column.
    HeaderCell(usize),
    /// Over the head but outside any cell (padding, background).
    HeaderBackground,
    /// Outside the table head.
    Elsewhere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleHit {
    Miss,
    /// Dragging resizes this column.
    Handle { column: usize },
}

impl HandleHit {
    pub fn column(&self) -> Option<usize> {
        match self {
            HandleHit::Handle { column } => Some(*column),
            HandleHit::Miss => None,
        }
    }
}

/// Classify a pointer at `head_x` (pixels from the head's left edge).
///
/// Near a cell's left edge the previous column is grabbed, near its right
/// edge the cell's own column. Over the background the last cell starting
/// at or before the pointer is used.
pub fn locate_resize_handle(cells: &[HeaderCell], target: PointerTarget, head_x: f64) -> HandleHit {
    let index = match target {
        PointerTarget::Elsewhere => return HandleHit::Miss,
        PointerTarget::HeaderCell(index) => index,
        PointerTarget::HeaderBackground => cells
            .partition_point(|cell| cell.offset_left <= head_x)
            .saturating_sub(1),
    };
    let Some(cell) = cells.get(index) else {
        return HandleHit::Miss;
    };

    let x = head_x - cell.offset_left;
    if x < RESIZE_BAND_PX && index != 0 {
        HandleHit::Handle { column: index - 1 }
    } else if x > cell.width - RESIZE_BAND_PX {
        HandleHit::Handle { column: index }
    } else {
        HandleHit::Miss
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::geometry::cells_from_widths;

    fn cells() -> Vec<HeaderCell> {
        cells_from_widths(&[100.0, 100.0, 100.0])
    }

    #[test]
    fn right_edge_grabs_own_column() {
        let hit = locate_resize_handle(&cells(), PointerTarget::HeaderCell(0), 97.0);
        assert_eq!(hit, HandleHit::Handle { column: 0 });
    }

    #[test]
    fn left_edge_grabs_previous_column() {
        let hit = locate_resize_handle(&cells(), PointerTarget::HeaderCell(1), 102.0);
        assert_eq!(hit, HandleHit::Handle { column: 0 });
    }

    #[test]
    fn left_edge_of_first_column_is_not_a_handle() {
        let hit = locate_resize_handle(&cells(), PointerTarget::HeaderCell(0), 2.0);
        assert_eq!(hit, HandleHit::Miss);
    }

    #[test]
    fn interior_is_not_a_handle() {
        let hit = locate_resize_handle(&cells(), PointerTarget::HeaderCell(1), 150.0);
        assert_eq!(hit, HandleHit::Miss);
    }

    #[test]
    fn background_scan_finds_cell_under_pointer() {
        let hit = locate_resize_handle(&cells(), PointerTarget::HeaderBackground, 298.0);
        assert_eq!(hit, HandleHit::Handle { column: 2 });
        let hit = locate_resize_handle(&cells(), PointerTarget::HeaderBackground, 201.0);
        assert_eq!(hit, HandleHit::Handle { column: 1 });
    }

    #[test]
    fn background_left_of_first_cell_misses() {
        let hit = locate_resize_handle(&cells(), PointerTarget::HeaderBackground, -50.0);
        assert_eq!(hit, HandleHit::Miss);
    }

    #[test]
    fn outside_head_misses() {
        let hit = locate_resize_handle(&cells(), PointerTarget::Elsewhere, 99.0);
        assert_eq!(hit, HandleHit::Miss);
    }

    #[test]
    fn unknown_cell_misses() {
        let hit = locate_resize_handle(&cells(), PointerTarget::HeaderCell(7), 99.0);
        assert_eq!(hit, HandleHit::Miss);
    }
}
