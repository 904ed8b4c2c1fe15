//! tablestate
//!
//! View-state and column-resize engine for paginated, sortable, searchable
//! data tables. The engine is sans-IO: it hands out load tickets and takes
//! results back, so any host (browser bridge, TUI, test) can drive it.
//!
//! - `engine`: ingest, coerce, sort, filter and paginate a record set
//! - `layout`: column resize drags, viewport scaling, scroll sync
//! - `persistence`: key/value and snapshot persistence of table state
//! - `table`: the facade tying one of each together

pub mod config;
pub mod engine;
pub mod format;
pub mod layout;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod projection;
pub mod source;
pub mod table;

pub use table::Table;
