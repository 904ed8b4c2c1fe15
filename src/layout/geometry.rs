//! Measurements the host reports about the rendered table.

/// One header cell, relative to the table head.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeaderCell {
    /// Left edge in pixels from the head's left edge.
    pub offset_left: f64,
    pub width: f64,
}

/// DOM-free snapshot of the table's layout at mount time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableGeometry {
    /// Inner width of the widget container.
    pub container_client_width: f64,
    /// Natural width of the table before its width percentage is applied.
    pub table_offset_width: f64,
    /// Natural width of the table head.
    pub head_offset_width: f64,
    pub head_offset_height: f64,
    /// Viewport x of the head's left edge, scrolling excluded.
    pub head_origin_x: f64,
    /// Width of the scrollable area the table width percentage refers to.
    pub scroll_offset_width: f64,
    /// Natural header cells in column order.
    pub cells: Vec<HeaderCell>,
}

/// Cells laid out left to right from pixel widths.
pub fn cells_from_widths(widths: &[f64]) -> Vec<HeaderCell> {
    widths
        .iter()
        .scan(0.0, |left, &width| {
            let cell = HeaderCell {
                offset_left: *left,
                width,
            };
            *left += width;
            Some(cell)
        })
        .collect()
}
