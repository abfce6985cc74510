//! In-memory stores
//!
//! Two independent namespaces: integer lists keyed by name, and plain
//! string scalars. The same key may exist in both.

pub mod list;
pub mod scalar;
pub mod window;

pub use list::{ListMap, ListStore, PopMode};
pub use scalar::{MemoryScalarStore, ScalarKind, ScalarStore};
pub use window::CountSpec;
