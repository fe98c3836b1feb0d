//! WASM bindings for the paginator

pub mod flat_buffer;

use crate::layout::{calculate_pagination, MeasuredHeights, PageGeometry, PageRange, Pagination};
use crate::render::{DiffEngine, DisplayList, PaginationDiff};
use crate::Rect;
use flat_buffer::RangeBuffer;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Paginate host-measured block heights against a page content height.
///
/// Returns a JSON array of `{startIndex, endIndex}`. Missing heights
/// (`null`/`undefined`) mean there is nothing to paginate.
#[wasm_bindgen(js_name = calculatePagination)]
pub fn calculate_pagination_js(heights: Option<Box<[f64]>>, page_content_height_px: f64) -> String {
    let ranges = match heights {
        Some(heights) => calculate_pagination(&*heights, page_content_height_px),
        None => Vec::new(),
    };
    to_json(&ranges)
}

/// Check host measurements before paginating; errors name the bad block
#[wasm_bindgen(js_name = validateHeights)]
pub fn validate_heights(heights: &[f64]) -> Result<usize, JsError> {
    Ok(MeasuredHeights::try_from_px(heights)?.len())
}

/// WASM-exposed paginator keeping the last pass for diffs and buffer views
#[wasm_bindgen]
pub struct WasmPaginator {
    geometry: PageGeometry,
    pagination: Pagination,
    buffer: RangeBuffer,
    diff_engine: DiffEngine,
    last_diff: PaginationDiff,
}

#[wasm_bindgen]
impl WasmPaginator {
    /// Create a paginator with default page size (US Letter)
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::from_geometry(PageGeometry::letter())
    }

    /// Create paginator with custom page dimensions
    #[wasm_bindgen(js_name = withGeometry)]
    pub fn with_geometry(
        page_width: f32,
        page_height: f32,
        margin_top: f32,
        margin_bottom: f32,
        margin_left: f32,
        margin_right: f32,
    ) -> Result<WasmPaginator, JsError> {
        let geometry = PageGeometry {
            page_width,
            page_height,
            margin_top,
            margin_bottom,
            margin_left,
            margin_right,
        };
        geometry.validate()?;
        Ok(Self::from_geometry(geometry))
    }

    /// Create paginator from a camelCase geometry JSON object
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(json: &str) -> Result<WasmPaginator, JsError> {
        Ok(Self::from_geometry(PageGeometry::from_json(json)?))
    }

    /// Paginate against the geometry's content height; returns page count
    pub fn paginate(&mut self, heights: &[f64]) -> usize {
        let budget = self.geometry.page_budget();
        self.paginate_with_budget(heights, budget)
    }

    /// Paginate against an explicit budget; returns page count
    #[wasm_bindgen(js_name = paginateWithBudget)]
    pub fn paginate_with_budget(&mut self, heights: &[f64], budget: f64) -> usize {
        let started = current_timestamp();

        self.pagination = Pagination::compute(heights, budget);
        self.buffer.write(&self.pagination);
        self.last_diff = self.diff_engine.compute_diff(&self.pagination);

        tracing::debug!(
            blocks = heights.len(),
            pages = self.pagination.page_count(),
            patches = self.last_diff.patch_count(),
            elapsed_ms = current_timestamp().saturating_sub(started),
            "paginated"
        );
        self.pagination.page_count()
    }

    /// Get page count of the last pass
    #[wasm_bindgen(js_name = getPageCount)]
    pub fn get_page_count(&self) -> usize {
        self.pagination.page_count()
    }

    /// Page holding the given block, if any
    #[wasm_bindgen(js_name = pageOfBlock)]
    pub fn page_of_block(&self, block_index: usize) -> Option<u32> {
        self.pagination
            .page_of_block(block_index)
            .map(|page| page as u32)
    }

    /// Pointer into WASM memory for the flat range buffer
    #[wasm_bindgen(js_name = rangesPtr)]
    pub fn ranges_ptr(&self) -> u32 {
        self.buffer.u32_ptr()
    }

    /// Length (in u32 values) of the flat range buffer
    #[wasm_bindgen(js_name = rangesLen)]
    pub fn ranges_len(&self) -> u32 {
        self.buffer.u32_len()
    }

    /// Page ranges of the last pass (returns JSON)
    #[wasm_bindgen(js_name = rangesJson)]
    pub fn ranges_json(&self) -> String {
        to_json(&self.pagination.ranges())
    }

    /// Pages of the last pass with fill and oversized flags (returns JSON)
    #[wasm_bindgen(js_name = pagesJson)]
    pub fn pages_json(&self) -> String {
        to_json(&self.pagination.pages())
    }

    /// Changes since the previous pass (returns JSON)
    #[wasm_bindgen(js_name = diffJson)]
    pub fn diff_json(&self) -> String {
        self.last_diff.as_json().to_string()
    }

    /// Page frames and indicators for a viewport (returns JSON)
    #[wasm_bindgen(js_name = displayListJson)]
    pub fn display_list_json(&self, viewport_y: f32, viewport_height: f32) -> String {
        let viewport = Rect::new(0.0, viewport_y, self.geometry.page_width, viewport_height);
        to_json(&DisplayList::build(&self.pagination, &self.geometry, viewport))
    }

    /// Page container style (returns JSON)
    #[wasm_bindgen(js_name = pageStyleJson)]
    pub fn page_style_json(&self) -> String {
        to_json(&self.geometry.page_style())
    }

    /// Get layout geometry (returns JSON)
    #[wasm_bindgen(js_name = geometryJson)]
    pub fn geometry_json(&self) -> String {
        to_json(&GeometryJS {
            geometry: self.geometry,
            content_width: self.geometry.content_width(),
            content_height: self.geometry.content_height(),
        })
    }

    #[wasm_bindgen(js_name = contentHeight)]
    pub fn content_height(&self) -> f32 {
        self.geometry.content_height()
    }

    #[wasm_bindgen(js_name = contentWidth)]
    pub fn content_width(&self) -> f32 {
        self.geometry.content_width()
    }

    /// Forget the previous pass; the next diff inserts every page
    pub fn reset(&mut self) {
        self.pagination = Pagination::default();
        self.buffer.clear();
        self.diff_engine.reset();
        self.last_diff = PaginationDiff::default();
    }
}

impl WasmPaginator {
    pub fn from_geometry(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pagination: Pagination::default(),
            buffer: RangeBuffer::new(),
            diff_engine: DiffEngine::new(),
            last_diff: PaginationDiff::default(),
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn last_diff(&self) -> &PaginationDiff {
        &self.last_diff
    }

    /// Raw flat buffer contents
    pub fn buffer_data(&self) -> &[u32] {
        &self.buffer.u32_data
    }

    pub fn ranges(&self) -> Vec<PageRange> {
        self.pagination.ranges()
    }
}

impl Default for WasmPaginator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeometryJS {
    #[serde(flatten)]
    geometry: PageGeometry,
    content_width: f32,
    content_height: f32,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        tracing::warn!(%err, "failed to serialize for JS");
        String::from("null")
    })
}

/// Get current timestamp in milliseconds
fn current_timestamp() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}
