//! Pagination for multi-page documents
//!
//! Top-level blocks are packed greedily onto pages in document order. A block
//! is never split: one taller than the page budget gets a page to itself.
//! Splitting would mean rewriting document structure, which breaks undo
//! history and editing semantics in the underlying editor model.

use crate::layout::measure::HeightSource;
use serde::{Deserialize, Serialize};

/// Inclusive range of block indices shown on one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRange {
    /// Index of the first block on the page
    pub start_index: usize,
    /// Index of the last block on the page
    pub end_index: usize,
}

impl PageRange {
    pub fn new(start_index: usize, end_index: usize) -> Self {
        debug_assert!(start_index <= end_index);
        Self {
            start_index,
            end_index,
        }
    }

    /// Range holding a single block
    pub fn single(index: usize) -> Self {
        Self::new(index, index)
    }

    /// Number of blocks on the page
    pub fn len(&self) -> usize {
        self.end_index - self.start_index + 1
    }

    pub fn is_single(&self) -> bool {
        self.start_index == self.end_index
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index <= self.end_index
    }
}

/// A laid-out page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub range: PageRange,
    /// Sum of block heights on the page
    pub used_height: u64,
    /// Dedicated page for a block taller than the budget
    pub oversized: bool,
}

/// A block taller than the page budget. Strictly greater: a block exactly as
/// tall as the budget still fits on an empty page.
#[inline]
pub fn is_oversized(height: u32, budget: f64) -> bool {
    f64::from(height) > budget
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PageState {
    /// No page open; the next block starts one
    PageClosed,
    BuildingPage { start: usize, accumulated: u64 },
}

/// Streaming greedy paginator.
///
/// Heights are pushed in block order; [`Paginator::finish`] flushes the
/// trailing page.
#[derive(Debug, Clone)]
pub struct Paginator {
    budget: f64,
    state: PageState,
    next_index: usize,
    pages: Vec<PageInfo>,
}

impl Paginator {
    pub fn new(budget: f64) -> Self {
        Self::with_capacity(budget, 0)
    }

    pub fn with_capacity(budget: f64, pages: usize) -> Self {
        Self {
            budget,
            state: PageState::PageClosed,
            next_index: 0,
            pages: Vec::with_capacity(pages),
        }
    }

    /// Place the next block
    pub fn push(&mut self, height: u32) {
        let index = self.next_index;
        self.next_index += 1;

        if let PageState::BuildingPage { start, accumulated } = self.state {
            let total = accumulated + u64::from(height);
            if total as f64 <= self.budget {
                self.state = PageState::BuildingPage {
                    start,
                    accumulated: total,
                };
                return;
            }

            self.close_page(start, index - 1, accumulated);
        }

        self.open_page(index, height);
    }

    /// Flush any unfinished page and return the result
    pub fn finish(mut self) -> Pagination {
        if let PageState::BuildingPage { start, accumulated } = self.state {
            self.close_page(start, self.next_index - 1, accumulated);
        }

        Pagination {
            pages: self.pages,
            budget: self.budget,
        }
    }

    /// Start a page at `index`; an oversized block closes it immediately
    fn open_page(&mut self, index: usize, height: u32) {
        if is_oversized(height, self.budget) {
            tracing::trace!(index, height, budget = self.budget, "oversized block on its own page");
            self.pages.push(PageInfo {
                range: PageRange::single(index),
                used_height: u64::from(height),
                oversized: true,
            });
            self.state = PageState::PageClosed;
        } else {
            self.state = PageState::BuildingPage {
                start: index,
                accumulated: u64::from(height),
            };
        }
    }

    fn close_page(&mut self, start: usize, end: usize, used_height: u64) {
        self.pages.push(PageInfo {
            range: PageRange::new(start, end),
            used_height,
            oversized: false,
        });
        self.state = PageState::PageClosed;
    }
}

/// Result of a pagination pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pages: Vec<PageInfo>,
    budget: f64,
}

impl Pagination {
    /// Paginate every block of `source` against `budget`
    pub fn compute<S: HeightSource + ?Sized>(source: &S, budget: f64) -> Self {
        let count = source.block_count();
        let mut paginator = Paginator::new(budget);
        for index in 0..count {
            paginator.push(source.height_of(index));
        }
        let pagination = paginator.finish();

        tracing::debug!(
            blocks = count,
            pages = pagination.page_count(),
            budget,
            "pagination computed"
        );
        pagination
    }

    pub fn pages(&self) -> &[PageInfo] {
        &self.pages
    }

    /// Page ranges in document order
    pub fn ranges(&self) -> Vec<PageRange> {
        self.pages.iter().map(|p| p.range).collect()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    /// Number of blocks covered
    pub fn block_count(&self) -> usize {
        self.pages.last().map_or(0, |p| p.range.end_index + 1)
    }

    /// Page holding the block at `index`
    pub fn page_of_block(&self, index: usize) -> Option<usize> {
        let page = self
            .pages
            .partition_point(|p| p.range.end_index < index);
        self.pages
            .get(page)
            .filter(|p| p.range.contains(index))
            .map(|_| page)
    }

    /// Indices of pages holding a single oversized block
    pub fn oversized_pages(&self) -> impl Iterator<Item = usize> + '_ {
        self.pages
            .iter()
            .enumerate()
            .filter(|(_, p)| p.oversized)
            .map(|(i, _)| i)
    }
}

/// Partition blocks into page ranges without splitting any block.
///
/// An empty source yields no pages. With a non-positive budget every block
/// of positive height is oversized and lands on its own page.
pub fn calculate_pagination<S: HeightSource + ?Sized>(
    source: &S,
    page_content_height_px: f64,
) -> Vec<PageRange> {
    Pagination::compute(source, page_content_height_px).ranges()
}
