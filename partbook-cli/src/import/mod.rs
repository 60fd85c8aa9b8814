//! Workbook import & reconciliation engine
//!
//! Parses an uploaded spare-part workbook (grid data plus images anchored
//! over specific rows), validates each row, classifies rows as new or
//! update against the existing catalog, and on commit persists images and
//! upserts parts with per-row failure isolation.

pub mod container;
pub mod drawing;
pub mod executor;
pub mod preview;
pub mod relationships;
pub mod sheet;
pub mod template;
pub mod types;
pub mod validate;

pub use preview::{build_preview, parse_workbook};
pub use types::{ImportError, ImportOutcome, ImportRow, PreviewResult};
