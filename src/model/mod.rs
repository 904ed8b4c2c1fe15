//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod column;
pub mod error;
pub mod record;
pub mod sort;
pub mod value;

// Re-export for convenience
pub use column::{ColumnKind, ColumnSpec, InvalidColumn, LinkSpec, UnknownDataType};
pub use error::{AppError, FetchError, PersistenceError};
pub use record::{Record, RecordIndex, INTERNAL_PREFIX};
pub use sort::{SortDirection, SortKey, SortSpec};
pub use value::{SortValue, Value};
