//! FILENAME: tabular-engine/src/lib.rs
//! PURPOSE: Main library entry point for the tabular cache.
//! CONTEXT: Re-exports public types and modules for use by other crates.
//!
//! The cache is single-threaded and synchronous. It is `Send` (converters
//! are `Send + Sync`) but every navigation, remap and sort call takes
//! `&mut self`; share it across threads only behind a lock.

pub mod access;
pub mod cache;
pub mod cell;
pub mod convert;
pub mod cursor;
pub mod error;
pub mod mapper;
pub mod metadata;
pub mod sort;
pub mod source;
pub mod value;

// Re-export commonly used types at the crate root
pub use access::{ResolutionStep, RESOLUTION_ORDER};
pub use cache::TabularCache;
pub use cell::{Cell, Row};
pub use convert::{ColumnConverter, OnDemandConverter, PassThroughConverter};
pub use cursor::Cursor;
pub use error::{CacheError, ConversionError, Result};
pub use mapper::Mapper;
pub use metadata::{ColumnMeta, ResultMetadata};
pub use sort::{SortKey, ValueComparator};
pub use source::{Snapshot, TabularSource};
pub use value::{OpaqueValue, Value, ValueKind, ValueType};
