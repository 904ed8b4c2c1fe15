//! Derived view data (pure).
//!
//! Everything a render layer needs to draw a table from engine state:
//!
//! - `cell`: display strings and body placeholders
//! - `links`: link cells with `{field}` href templating
//! - `header`: per-column sort indicators
//! - `footer`: "showing" summary and paging option lists
//! - `grid`: plain-text table rendering

pub mod cell;
pub mod footer;
pub mod grid;
pub mod header;
pub mod links;

pub use cell::{body_state, display_value, BodyState};
pub use footer::{
    footer_summary, page_options, showing_text, FooterSummary, MAX_PAGE_OPTIONS,
    PAGE_SIZE_OPTIONS,
};
pub use grid::render_grid;
pub use header::{header_cells, sort_indicator, HeaderView, SortIndicator};
pub use links::{resolve_links, substitute_fields, LinkElement, ResolvedLink};
