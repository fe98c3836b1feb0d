//! Page model, block measurement and pagination

pub mod estimate;
pub mod font;
mod line_break;
pub mod measure;
pub mod page;
mod pagination;

pub use estimate::{BlockKind, TextBlock, TextMeasurer, INDENT_WIDTH};
pub use font::FontMetrics;
pub use line_break::{LineBreaker, LineSpan};
pub use measure::{round_up_px, FnHeights, HeightSource, MeasureError, MeasuredHeights};
pub use page::{ConfigError, PageGeometry, PageStyle};
pub use pagination::{calculate_pagination, is_oversized, PageInfo, PageRange, Pagination, Paginator};
