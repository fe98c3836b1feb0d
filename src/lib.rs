//! Paged-editor: print-layout pagination core for a browser rich-text editor
//!
//! The hosting editor renders its content into one continuous surface; this
//! crate decides where the visual page breaks go:
//! - Greedy, order-preserving pagination of top-level blocks into page ranges
//! - Oversized blocks get a page of their own, blocks are never split
//! - Injected height sources (host measurements, synthetic, text estimates)
//! - Letter page geometry at 96 DPI, display lists and page diffs for the host

pub mod layout;
pub mod render;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmPaginator;

// Re-export primary types
pub use layout::{
    calculate_pagination, BlockKind, FontMetrics, HeightSource, MeasureError, MeasuredHeights,
    PageGeometry, PageInfo, PageRange, Pagination, Paginator, TextBlock, TextMeasurer,
};
pub use render::{DiffEngine, DisplayItem, DisplayList, DisplayPage, PagePatch, PaginationDiff};

use serde::{Deserialize, Serialize};

/// Editor rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}
