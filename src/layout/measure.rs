//! Block height sources
//!
//! The calculator never touches a rendering surface. Anything that can report
//! how tall the block at a given index is can be paginated: heights measured
//! by the host after layout settles, synthetic heights in tests, or the text
//! estimator in [`crate::layout::estimate`].

use thiserror::Error;

/// Provides the rendered height of each top-level block, in whole pixels
pub trait HeightSource {
    /// Number of top-level blocks
    fn block_count(&self) -> usize;

    /// Height of the block at `index`, already rounded up to whole pixels
    fn height_of(&self, index: usize) -> u32;
}

impl<S: HeightSource + ?Sized> HeightSource for &S {
    fn block_count(&self) -> usize {
        (**self).block_count()
    }

    fn height_of(&self, index: usize) -> u32 {
        (**self).height_of(index)
    }
}

impl HeightSource for [u32] {
    fn block_count(&self) -> usize {
        self.len()
    }

    fn height_of(&self, index: usize) -> u32 {
        self[index]
    }
}

impl HeightSource for Vec<u32> {
    fn block_count(&self) -> usize {
        self.len()
    }

    fn height_of(&self, index: usize) -> u32 {
        self[index]
    }
}

/// Fractional measurements are rounded up so sub-pixel layout cannot flip a
/// fit decision between two otherwise identical passes.
impl HeightSource for [f64] {
    fn block_count(&self) -> usize {
        self.len()
    }

    fn height_of(&self, index: usize) -> u32 {
        round_up_px(self[index])
    }
}

impl HeightSource for Vec<f64> {
    fn block_count(&self) -> usize {
        self.len()
    }

    fn height_of(&self, index: usize) -> u32 {
        round_up_px(self[index])
    }
}

/// Round a measured height up to whole pixels.
///
/// NaN and negative values clamp to 0; values past `u32::MAX` saturate.
pub fn round_up_px(height: f64) -> u32 {
    if height.is_nan() || height <= 0.0 {
        return 0;
    }
    // float -> int casts saturate
    height.ceil() as u32
}

/// A measurement the host should not have handed over
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MeasureError {
    #[error("block {index} has a non-finite height ({value})")]
    NotFinite { index: usize, value: f64 },
    #[error("block {index} has a negative height ({value})")]
    Negative { index: usize, value: f64 },
}

/// Validated, rounded block heights for a single pagination pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasuredHeights {
    heights: Vec<u32>,
}

impl MeasuredHeights {
    pub fn new(heights: Vec<u32>) -> Self {
        Self { heights }
    }

    /// Round fractional measurements up, rejecting NaN, infinities and
    /// negative values
    pub fn try_from_px(measurements: &[f64]) -> Result<Self, MeasureError> {
        let heights = measurements
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                if !value.is_finite() {
                    Err(MeasureError::NotFinite { index, value })
                } else if value < 0.0 {
                    Err(MeasureError::Negative { index, value })
                } else {
                    Ok(round_up_px(value))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { heights })
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.heights
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Sum of all block heights
    pub fn total(&self) -> u64 {
        self.heights.iter().map(|&h| u64::from(h)).sum()
    }
}

impl From<Vec<u32>> for MeasuredHeights {
    fn from(heights: Vec<u32>) -> Self {
        Self::new(heights)
    }
}

impl HeightSource for MeasuredHeights {
    fn block_count(&self) -> usize {
        self.heights.len()
    }

    fn height_of(&self, index: usize) -> u32 {
        self.heights[index]
    }
}

/// Closure-backed height source
pub struct FnHeights<F> {
    count: usize,
    height_fn: F,
}

impl<F: Fn(usize) -> u32> FnHeights<F> {
    pub fn new(count: usize, height_fn: F) -> Self {
        Self { count, height_fn }
    }
}

impl<F: Fn(usize) -> u32> HeightSource for FnHeights<F> {
    fn block_count(&self) -> usize {
        self.count
    }

    fn height_of(&self, index: usize) -> u32 {
        (self.height_fn)(index)
    }
}
