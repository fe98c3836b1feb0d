//! Display list: render-ready page frames and break indicators

use crate::layout::{PageGeometry, PageRange, Pagination};
use crate::Rect;
use serde::{Deserialize, Serialize};

/// A display item to render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DisplayItem {
    /// Page break indicator at the top edge of a page
    #[serde(rename_all = "camelCase")]
    PageBreak { y: f32, page_number: usize },
    /// Marker for a block that is taller than the page content area
    #[serde(rename_all = "camelCase")]
    OversizedBlock { block_index: usize, overflow: f32 },
}

/// Display list for a single page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPage {
    pub page_index: usize,
    pub bounds: Rect,
    pub range: PageRange,
    pub items: Vec<DisplayItem>,
}

/// Complete display list for rendering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayList {
    /// Total height of the stacked pages
    pub document_height: f32,
    pub pages: Vec<DisplayPage>,
}

impl DisplayList {
    /// Build display list for the pages intersecting `viewport`.
    ///
    /// Pages are stacked vertically, each `geometry.page_height` tall.
    pub fn build(pagination: &Pagination, geometry: &PageGeometry, viewport: Rect) -> Self {
        let page_height = geometry.page_height;
        let budget = pagination.budget() as f32;
        let mut pages = Vec::new();

        for (page_index, page) in pagination.pages().iter().enumerate() {
            let bounds = Rect::new(
                0.0,
                page_index as f32 * page_height,
                geometry.page_width,
                page_height,
            );
            if !bounds.intersects(&viewport) {
                continue;
            }

            let mut items = Vec::new();
            if page_index > 0 {
                items.push(DisplayItem::PageBreak {
                    y: bounds.y,
                    page_number: page_index + 1,
                });
            }
            if page.oversized {
                items.push(DisplayItem::OversizedBlock {
                    block_index: page.range.start_index,
                    overflow: page.used_height as f32 - budget,
                });
            }

            pages.push(DisplayPage {
                page_index,
                bounds,
                range: page.range,
                items,
            });
        }

        Self {
            document_height: pagination.page_count() as f32 * page_height,
            pages,
        }
    }

    /// Get page count
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Offsets in a single continuous editing surface where each page after the
/// first begins: the summed height of every block before it.
pub fn page_break_offsets(pagination: &Pagination) -> Vec<u64> {
    pagination
        .pages()
        .iter()
        .scan(0u64, |y, page| {
            let top = *y;
            *y += page.used_height;
            Some(top)
        })
        .skip(1)
        .collect()
}
