//! Column resize engine.
//!
//! Widths live in two units. Percentages (of the table width for columns, of
//! the scroll area for the table) are what gets persisted; pixels are what the
//! host applies while the table is mounted. A drag edits pixels live and
//! converts back to percentages when it ends.

use super::debounce::LayoutTimer;
use super::geometry::{cells_from_widths, TableGeometry};
use super::hit_test::{locate_resize_handle, HandleHit, PointerTarget};
use super::touch::{SyntheticMouse, TouchPhase, TouchTranslator};
use std::time::Instant;
use tracing::debug;

/// Pointer event in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub client_x: f64,
    /// 0 is the primary button.
    pub button: u8,
    pub target: PointerTarget,
}

impl PointerEvent {
    pub fn primary(client_x: f64, target: PointerTarget) -> Self {
        Self {
            client_x,
            button: 0,
            target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub client_x: f64,
    pub client_y: f64,
    pub target: PointerTarget,
}

/// Cursor the table head should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    ColResize,
}

impl Cursor {
    /// CSS `cursor` value, empty for the inherited default.
    pub fn as_css(&self) -> &'static str {
        match self {
            Cursor::Default => "",
            Cursor::ColResize => "col-resize",
        }
    }
}

/// Widths in percent after a drag, rounded to two decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedWidths {
    /// Table width relative to the scroll area.
    pub width: f64,
    /// Column widths relative to the table, in column order.
    pub column_widths: Vec<f64>,
}

/// Result of a touch event after translation.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchOutcome {
    pub mouse: SyntheticMouse,
    /// Set when the touch ended a drag.
    pub committed: Option<CommittedWidths>,
}

#[derive(Debug, Clone, PartialEq)]
struct ResizeSession {
    column: usize,
    initial_x: f64,
    initial_column_px: f64,
    initial_table_px: f64,
    scroll_width_px: f64,
    timer: LayoutTimer,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEngine {
    editable: bool,
    column_min_width: f64,
    /// Table width, percent.
    width: f64,
    /// Column widths, percent. Unknown ones are measured at mount.
    column_widths: Vec<Option<f64>>,

    mounted: bool,
    listening: bool,
    client_width: f64,
    scroll_width: f64,
    head_origin_x: f64,
    head_left: f64,
    head_padding_top: f64,
    table_width_px: f64,
    cell_widths_px: Vec<f64>,
    ghost_widths_px: Vec<f64>,
    cursor: Cursor,
    session: Option<ResizeSession>,
    touch: TouchTranslator,
}

impl LayoutEngine {
    pub fn new(
        column_widths: Vec<Option<f64>>,
        width: f64,
        column_min_width: f64,
        editable: bool,
    ) -> Self {
        Self {
            editable,
            column_min_width,
            width,
            column_widths,
            mounted: false,
            listening: false,
            client_width: 0.0,
            scroll_width: 0.0,
            head_origin_x: 0.0,
            head_left: 0.0,
            head_padding_top: 0.0,
            table_width_px: 0.0,
            cell_widths_px: Vec::new(),
            ghost_widths_px: Vec::new(),
            cursor: Cursor::Default,
            session: None,
            touch: TouchTranslator::default(),
        }
    }

    // ===== Accessors =====

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Pointer, resize and touch input is handled.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn is_resizing(&self) -> bool {
        self.session.is_some()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn column_widths(&self) -> &[Option<f64>] {
        &self.column_widths
    }

    pub fn table_width_px(&self) -> f64 {
        self.table_width_px
    }

    pub fn cell_widths_px(&self) -> &[f64] {
        &self.cell_widths_px
    }

    /// Widths of the column group elements.
    pub fn ghost_widths_px(&self) -> &[f64] {
        &self.ghost_widths_px
    }

    /// Left offset of the head, the negated horizontal scroll.
    pub fn head_left(&self) -> f64 {
        self.head_left
    }

    /// Top padding of the scroll area, so rows start below the fixed head.
    pub fn head_padding_top(&self) -> f64 {
        self.head_padding_top
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// When the host should call [`poll_timer`](Self::poll_timer) next.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.session.as_ref().and_then(|s| s.timer.deadline())
    }

    // ===== Lifecycle =====

    /// Apply widths to the freshly rendered table. Runs once; later calls and
    /// calls with fewer header cells than columns return false.
    pub fn mount(&mut self, geometry: &TableGeometry) -> bool {
        if self.mounted {
            return false;
        }
        let columns = self.column_widths.len();
        if geometry.cells.len() < columns {
            debug!(
                cells = geometry.cells.len(),
                columns, "Header not rendered, skipping layout"
            );
            return false;
        }

        self.client_width = geometry.container_client_width;
        self.scroll_width = geometry.scroll_offset_width;
        self.head_origin_x = geometry.head_origin_x;
        self.head_padding_top = geometry.head_offset_height;
        self.table_width_px = self.width / 100.0 * geometry.table_offset_width;

        let head_width = geometry.head_offset_width;
        let mut cells = Vec::with_capacity(columns);
        for (slot, cell) in self.column_widths.iter_mut().zip(&geometry.cells) {
            let percent = slot.unwrap_or_else(|| {
                if head_width > 0.0 {
                    cell.width / head_width * 100.0
                } else {
                    100.0 / columns as f64
                }
            });
            *slot = Some(percent);
            cells.push(percent / 100.0 * self.table_width_px);
        }
        self.ghost_widths_px = cells.clone();
        self.cell_widths_px = cells;

        self.mounted = true;
        self.listening = self.editable;
        debug!(
            table_width_px = self.table_width_px,
            listening = self.listening,
            "Table layout set"
        );
        true
    }

    /// Stop handling input. Any drag in progress is dropped.
    pub fn destroy(&mut self) {
        self.listening = false;
        self.mounted = false;
        self.session = None;
        self.cursor = Cursor::Default;
    }

    /// Sync column group widths with the header cells.
    pub fn update_layout(&mut self) {
        if !self.mounted {
            return;
        }
        self.ghost_widths_px.clone_from(&self.cell_widths_px);
    }

    /// Scale every pixel width by the container's change in width.
    pub fn on_viewport_resize(&mut self, container_client_width: f64) -> bool {
        if !self.listening || container_client_width <= 0.0 || self.client_width <= 0.0 {
            return false;
        }
        let scale = container_client_width / self.client_width;
        self.client_width = container_client_width;
        self.scroll_width *= scale;
        self.table_width_px *= scale;
        for width in &mut self.cell_widths_px {
            *width *= scale;
        }
        self.update_layout();
        true
    }

    /// Keep the fixed head aligned with the horizontally scrolled body.
    pub fn on_scroll(&mut self, scroll_left: f64) -> bool {
        if !self.mounted || -self.head_left == scroll_left {
            return false;
        }
        self.head_left = -scroll_left;
        true
    }

    // ===== Pointer input =====

    fn hit(&self, event: &PointerEvent) -> HandleHit {
        let head_x = event.client_x - (self.head_origin_x + self.head_left);
        let cells = cells_from_widths(&self.cell_widths_px);
        locate_resize_handle(&cells, event.target, head_x)
    }

    /// Start a drag when the primary button goes down on a resize handle.
    pub fn on_header_mouse_down(&mut self, event: &PointerEvent) -> bool {
        if !self.listening || event.button != 0 {
            return false;
        }
        let Some(column) = self.hit(event).column() else {
            return false;
        };
        let Some(&initial_column_px) = self.ghost_widths_px.get(column) else {
            return false;
        };
        debug!(column, "Column resize started");
        self.session = Some(ResizeSession {
            column,
            initial_x: event.client_x,
            initial_column_px,
            initial_table_px: self.table_width_px,
            scroll_width_px: self.scroll_width,
            timer: LayoutTimer::default(),
        });
        true
    }

    /// Update the cursor and, during a drag, the dragged column. Returns true
    /// when widths changed.
    pub fn on_mouse_move(&mut self, event: &PointerEvent, now: Instant) -> bool {
        if !self.listening {
            return false;
        }
        self.cursor = match self.hit(event) {
            HandleHit::Handle { .. } => Cursor::ColResize,
            HandleHit::Miss => Cursor::Default,
        };

        let min_width = self.column_min_width;
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let new_column_px =
            (session.initial_column_px + event.client_x - session.initial_x).max(min_width);
        self.table_width_px = session.initial_table_px + (new_column_px - session.initial_column_px);
        self.cell_widths_px[session.column] = new_column_px;
        self.ghost_widths_px[session.column] = new_column_px;
        session.timer.arm(now);
        true
    }

    /// Run the debounced layout refresh if it is due.
    pub fn poll_timer(&mut self, now: Instant) -> bool {
        let fired = self
            .session
            .as_mut()
            .is_some_and(|session| session.timer.fire_if_due(now));
        if fired {
            self.update_layout();
        }
        fired
    }

    /// End a drag and return the new widths for persisting.
    pub fn on_mouse_up(&mut self) -> Option<CommittedWidths> {
        if !self.listening {
            return None;
        }
        let session = self.session.take()?;

        if session.scroll_width_px > 0.0 {
            self.width = round2(self.table_width_px / session.scroll_width_px * 100.0);
        }
        if self.table_width_px > 0.0 {
            for (slot, px) in self.column_widths.iter_mut().zip(&self.cell_widths_px) {
                *slot = Some(round2(px / self.table_width_px * 100.0));
            }
        }
        self.update_layout();

        let committed = CommittedWidths {
            width: self.width,
            column_widths: self.column_widths.iter().map(|w| w.unwrap_or(0.0)).collect(),
        };
        debug!(column = session.column, width = committed.width, "Column resize committed");
        Some(committed)
    }

    /// Feed a touch event through the mouse handlers. A tap drops any drag it
    /// started and reports `Click` for the host to treat as a header click.
    pub fn handle_touch(&mut self, event: &TouchEvent, now: Instant) -> Option<TouchOutcome> {
        if !self.listening {
            return None;
        }
        let mouse = self
            .touch
            .translate(event.phase, event.client_x, event.client_y);
        let pointer = PointerEvent::primary(event.client_x, event.target);
        let committed = match mouse {
            SyntheticMouse::Down => {
                self.on_header_mouse_down(&pointer);
                None
            }
            SyntheticMouse::Move => {
                self.on_mouse_move(&pointer, now);
                None
            }
            SyntheticMouse::Up => self.on_mouse_up(),
            SyntheticMouse::Click => {
                self.session = None;
                None
            }
        };
        Some(TouchOutcome { mouse, committed })
    }
}

#[cfg(test)]
#[path = "resize_tests.rs"]
mod tests;
