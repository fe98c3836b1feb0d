//! Pagination diff for incremental page-indicator updates
//!
//! Every pass recomputes pages from scratch; the diff tells the host which
//! page containers actually need touching.

use crate::layout::{PageInfo, Pagination};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A single patch operation for the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PagePatch {
    /// Append a page that did not exist before
    #[serde(rename_all = "camelCase")]
    InsertPage { page_index: usize, page: PageInfo },
    /// A page whose range or fill changed
    #[serde(rename_all = "camelCase")]
    UpdatePage { page_index: usize, page: PageInfo },
    /// Remove a trailing page
    #[serde(rename_all = "camelCase")]
    RemovePage { page_index: usize },
}

impl PagePatch {
    pub fn page_index(&self) -> usize {
        match self {
            PagePatch::InsertPage { page_index, .. }
            | PagePatch::UpdatePage { page_index, .. }
            | PagePatch::RemovePage { page_index } => *page_index,
        }
    }
}

/// Complete diff to send to the renderer
#[derive(Debug, Clone, Default)]
pub struct PaginationDiff {
    pub version: u64,
    pub patches: SmallVec<[PagePatch; 4]>,
}

impl PaginationDiff {
    /// Create empty diff
    pub fn new(version: u64) -> Self {
        Self {
            version,
            patches: SmallVec::new(),
        }
    }

    /// Add a patch
    pub fn add_patch(&mut self, patch: PagePatch) {
        self.patches.push(patch);
    }

    /// Check if there are any patches
    pub fn has_patches(&self) -> bool {
        !self.patches.is_empty()
    }

    /// Get patch count
    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }

    /// Lowest page index touched by this diff
    pub fn first_changed_page(&self) -> Option<usize> {
        self.patches.iter().map(PagePatch::page_index).min()
    }

    /// Serializable view of the diff
    pub fn as_json(&self) -> serde_json::Value {
        serde_json::json!({
            "version": self.version,
            "patches": self.patches.as_slice(),
        })
    }
}

/// Diff engine for computing pagination diffs between passes
#[derive(Debug, Default)]
pub struct DiffEngine {
    version: u64,
    previous: Vec<PageInfo>,
}

impl DiffEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Version of the last computed diff
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Forget the previous pagination; the next diff inserts every page
    pub fn reset(&mut self) {
        self.previous.clear();
    }

    /// Compute diff between the previous pass and `current`.
    ///
    /// Removals come last and in descending order, so patches can be applied
    /// in sequence without shifting the indices of later ones.
    pub fn compute_diff(&mut self, current: &Pagination) -> PaginationDiff {
        self.version += 1;
        let mut diff = PaginationDiff::new(self.version);
        let current_pages = current.pages();

        for (page_index, page) in current_pages.iter().enumerate() {
            match self.previous.get(page_index) {
                Some(previous) if previous == page => {}
                Some(_) => diff.add_patch(PagePatch::UpdatePage {
                    page_index,
                    page: *page,
                }),
                None => diff.add_patch(PagePatch::InsertPage {
                    page_index,
                    page: *page,
                }),
            }
        }

        for page_index in (current_pages.len()..self.previous.len()).rev() {
            diff.add_patch(PagePatch::RemovePage { page_index });
        }

        tracing::debug!(
            version = diff.version,
            patches = diff.patch_count(),
            first_changed = ?diff.first_changed_page(),
            "pagination diff"
        );

        self.previous.clear();
        self.previous.extend_from_slice(current_pages);
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PageRange;

    const BUDGET: f64 = 864.0;

    fn paginate(heights: &[u32]) -> Pagination {
        Pagination::compute(heights, BUDGET)
    }

    #[test]
    fn test_pagination_diff() {
        let mut diff = PaginationDiff::new(1);
        assert!(!diff.has_patches());
        assert_eq!(diff.first_changed_page(), None);

        diff.add_patch(PagePatch::RemovePage { page_index: 3 });
        assert!(diff.has_patches());
        assert_eq!(diff.patch_count(), 1);
        assert_eq!(diff.first_changed_page(), Some(3));
    }

    #[test]
    fn test_first_pass_inserts_every_page() {
        let mut engine = DiffEngine::new();
        let diff = engine.compute_diff(&paginate(&[500, 500, 500]));
        assert_eq!(diff.version, 1);
        assert_eq!(diff.patch_count(), 3);
        assert!(diff
            .patches
            .iter()
            .all(|p| matches!(p, PagePatch::InsertPage { .. })));
    }

    #[test]
    fn test_unchanged_pass_is_empty() {
        let mut engine = DiffEngine::new();
        engine.compute_diff(&paginate(&[500, 500]));
        let diff = engine.compute_diff(&paginate(&[500, 500]));
        assert!(!diff.has_patches());
        assert_eq!(diff.version, 2);
        assert_eq!(engine.version(), 2);
    }

    #[test]
    fn test_growth_updates_shifted_pages() {
        let mut engine = DiffEngine::new();
        engine.compute_diff(&paginate(&[400, 400, 100]));
        // The first block grows and pushes the second block down a page
        let diff = engine.compute_diff(&paginate(&[500, 400, 100]));

        assert_eq!(diff.first_changed_page(), Some(0));
        assert_eq!(
            diff.patches.as_slice(),
            &[
                PagePatch::UpdatePage {
                    page_index: 0,
                    page: PageInfo {
                        range: PageRange::single(0),
                        used_height: 500,
                        oversized: false,
                    },
                },
                PagePatch::UpdatePage {
                    page_index: 1,
                    page: PageInfo {
                        range: PageRange::new(1, 2),
                        used_height: 500,
                        oversized: false,
                    },
                },
            ]
        );
    }

    #[test]
    fn test_shrink_removes_trailing_pages_descending() {
        let mut engine = DiffEngine::new();
        engine.compute_diff(&paginate(&[800, 800, 800, 800]));
        let diff = engine.compute_diff(&paginate(&[800, 10, 10, 10]));

        let removed: Vec<usize> = diff
            .patches
            .iter()
            .filter_map(|p| match p {
                PagePatch::RemovePage { page_index } => Some(*page_index),
                _ => None,
            })
            .collect();
        assert_eq!(removed, vec![3, 2, 1]);
        assert_eq!(diff.first_changed_page(), Some(0));
    }

    #[test]
    fn test_reset_reinserts() {
        let mut engine = DiffEngine::new();
        engine.compute_diff(&paginate(&[10]));
        engine.reset();
        let diff = engine.compute_diff(&paginate(&[10]));
        assert!(matches!(diff.patches[0], PagePatch::InsertPage { page_index: 0, .. }));
    }

    #[test]
    fn test_diff_json() {
        let mut engine = DiffEngine::new();
        let diff = engine.compute_diff(&paginate(&[10]));
        let json = diff.as_json();
        assert_eq!(json["version"], 1);
        assert_eq!(json["patches"][0]["op"], "insertPage");
        assert_eq!(json["patches"][0]["page"]["range"]["endIndex"], 0);
    }
}
