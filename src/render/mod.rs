//! Rendering support: page frames, break indicators and diffs

mod diff;
mod display;

pub use diff::{DiffEngine, PagePatch, PaginationDiff};
pub use display::{page_break_offsets, DisplayItem, DisplayList, DisplayPage};
