//! Table layout and column resizing (pure).
//!
//! The host measures the rendered table into a [`TableGeometry`], feeds
//! pointer, touch, scroll and viewport events in, and applies the pixel
//! widths the [`LayoutEngine`] reports back.

pub mod debounce;
pub mod geometry;
pub mod hit_test;
pub mod resize;
pub mod touch;

pub use debounce::{LayoutTimer, LAYOUT_DEBOUNCE};
pub use geometry::{cells_from_widths, HeaderCell, TableGeometry};
pub use hit_test::{locate_resize_handle, HandleHit, PointerTarget, RESIZE_BAND_PX};
pub use resize::{CommittedWidths, Cursor, LayoutEngine, PointerEvent, TouchEvent, TouchOutcome};
pub use touch::{SyntheticMouse, TouchPhase, TouchTranslator, TAP_DISTANCE_PX};
