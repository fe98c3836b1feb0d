//! Intrinsic height estimation for plain-text blocks
//!
//! Produces block heights from text and font metrics instead of a rendered
//! surface, so documents can be paginated in tests, benchmarks and previews
//! before the host has laid anything out.

use crate::layout::font::FontMetrics;
use crate::layout::line_break::LineBreaker;
use crate::layout::measure::MeasuredHeights;
use crate::layout::page::PageGeometry;
use rustc_hash::FxHashMap;

/// Indentation width per level
pub const INDENT_WIDTH: f32 = 24.0;

/// Upper bound on cached heights between full passes
pub const MAX_CACHED_BLOCKS: usize = 4096;

/// The kind of top-level block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockKind {
    /// Regular paragraph
    #[default]
    Paragraph,
    /// Heading with level (1-6)
    Heading { level: u8 },
    /// List item
    ListItem { indent_level: u8 },
    Blockquote,
    CodeBlock,
    HorizontalRule,
}

impl BlockKind {
    /// Get the line height multiplier for this block kind
    pub fn line_height_multiplier(&self) -> f32 {
        match self {
            BlockKind::Heading { level } => match level {
                1 => 1.5,
                2 => 1.4,
                3 => 1.3,
                _ => 1.2,
            },
            _ => 1.0,
        }
    }

    /// Get the spacing after this block (in line heights)
    pub fn spacing_after(&self) -> f32 {
        match self {
            BlockKind::Paragraph | BlockKind::Blockquote | BlockKind::CodeBlock => 1.0,
            BlockKind::Heading { .. } | BlockKind::HorizontalRule => 0.5,
            BlockKind::ListItem { .. } => 0.25,
        }
    }

    /// Horizontal space taken from the content width
    pub fn indent(&self) -> f32 {
        match self {
            BlockKind::ListItem { indent_level } => (*indent_level as f32 + 1.0) * INDENT_WIDTH,
            BlockKind::Blockquote => INDENT_WIDTH,
            _ => 0.0,
        }
    }
}

/// A top-level block of plain text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextBlock {
    pub kind: BlockKind,
    pub text: String,
}

impl TextBlock {
    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph, text)
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::new(BlockKind::Heading { level: level.clamp(1, 6) }, text)
    }

    pub fn list_item(indent_level: u8, text: impl Into<String>) -> Self {
        Self::new(BlockKind::ListItem { indent_level }, text)
    }

    /// Split plain text into paragraphs at blank lines
    pub fn paragraphs_from_text(text: &str) -> Vec<TextBlock> {
        text.split("\n\n").map(TextBlock::paragraph).collect()
    }
}

/// Estimates block heights from font metrics, caching by content.
///
/// A full [`TextMeasurer::measure`] pass keeps only the blocks of the document
/// it was given, so edited-away blocks do not linger.
#[derive(Debug)]
pub struct TextMeasurer {
    metrics: FontMetrics,
    content_width: f32,
    line_breaker: LineBreaker,
    cache: FxHashMap<TextBlock, u32>,
}

impl TextMeasurer {
    pub fn new(metrics: FontMetrics, content_width: f32) -> Self {
        Self {
            metrics,
            content_width,
            line_breaker: LineBreaker::new(),
            cache: FxHashMap::default(),
        }
    }

    /// Measure at the content width of `geometry`
    pub fn for_geometry(metrics: FontMetrics, geometry: &PageGeometry) -> Self {
        Self::new(metrics, geometry.content_width())
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    pub fn set_metrics(&mut self, metrics: FontMetrics) {
        if self.metrics != metrics {
            self.metrics = metrics;
            self.cache.clear();
        }
    }

    pub fn set_content_width(&mut self, content_width: f32) {
        if self.content_width != content_width {
            self.content_width = content_width;
            self.cache.clear();
        }
    }

    pub fn cached_blocks(&self) -> usize {
        self.cache.len()
    }

    /// Height of one block in whole pixels
    pub fn measure_block(&mut self, block: &TextBlock) -> u32 {
        if let Some(&height) = self.cache.get(block) {
            return height;
        }

        let height = self.layout_height(block);
        if self.cache.len() >= MAX_CACHED_BLOCKS {
            self.cache.clear();
        }
        self.cache.insert(block.clone(), height);
        height
    }

    /// Heights of all blocks, in order. The cache is replaced by the entries
    /// of `blocks`.
    pub fn measure(&mut self, blocks: &[TextBlock]) -> MeasuredHeights {
        let mut previous = std::mem::take(&mut self.cache);
        let mut heights = Vec::with_capacity(blocks.len());

        for block in blocks {
            let height = match self.cache.get(block) {
                Some(&height) => height,
                None => {
                    let height = previous
                        .remove(block)
                        .unwrap_or_else(|| self.layout_height(block));
                    self.cache.insert(block.clone(), height);
                    height
                }
            };
            heights.push(height);
        }

        tracing::trace!(
            blocks = blocks.len(),
            cached = self.cache.len(),
            evicted = previous.len(),
            "measured text blocks"
        );
        heights.into()
    }

    fn layout_height(&self, block: &TextBlock) -> u32 {
        let line_height = self.metrics.line_height;
        let lines = match block.kind {
            BlockKind::HorizontalRule => 1,
            _ => {
                let width = (self.content_width - block.kind.indent()).max(self.metrics.default_width);
                self.line_breaker
                    .break_lines(&block.text, width, &self.metrics)
                    .len()
            }
        };

        let height = lines as f32 * line_height * block.kind.line_height_multiplier()
            + block.kind.spacing_after() * line_height;
        height.ceil() as u32
    }
}

impl Default for TextMeasurer {
    fn default() -> Self {
        Self::for_geometry(FontMetrics::default(), &PageGeometry::letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurer(width: f32) -> TextMeasurer {
        TextMeasurer::new(FontMetrics::monospace(10.0, 8.0), width)
    }

    #[test]
    fn test_paragraph_height() {
        let mut measurer = measurer(40.0);
        // two lines + one line of spacing
        assert_eq!(measurer.measure_block(&TextBlock::paragraph("Hello World")), 30);
        // one empty line + spacing
        assert_eq!(measurer.measure_block(&TextBlock::paragraph("")), 20);
    }

    #[test]
    fn test_heading_and_list_heights() {
        let mut measurer = measurer(400.0);
        // 1 line * 10 * 1.5 + 0.5 * 10
        assert_eq!(measurer.measure_block(&TextBlock::heading(1, "Title")), 20);
        // 1 line * 10 + 0.25 * 10 = 12.5 -> 13
        assert_eq!(measurer.measure_block(&TextBlock::list_item(0, "item")), 13);
        assert_eq!(
            measurer.measure_block(&TextBlock::new(BlockKind::HorizontalRule, "")),
            15
        );
    }

    #[test]
    fn test_indent_narrows_wrap_width() {
        let mut measurer = measurer(64.0);
        // 8 chars fit on a 64px paragraph line
        assert_eq!(measurer.measure_block(&TextBlock::paragraph("abcdefgh")), 20);
        // a first-level list item leaves 40px: the word wraps onto 2 lines
        assert_eq!(measurer.measure_block(&TextBlock::list_item(0, "abcdefgh")), 23);
    }

    #[test]
    fn test_cache_reuse_and_invalidation() {
        let mut measurer = measurer(40.0);
        let blocks = vec![
            TextBlock::paragraph("Hello World"),
            TextBlock::paragraph("Hello World"),
            TextBlock::heading(2, "Hello"),
        ];
        let heights = measurer.measure(&blocks);
        assert_eq!(heights.len(), 3);
        assert_eq!(measurer.cached_blocks(), 2);

        measurer.set_content_width(400.0);
        assert_eq!(measurer.cached_blocks(), 0);
        assert_eq!(measurer.measure_block(&blocks[0]), 20);
    }

    #[test]
    fn test_set_metrics_invalidates_cache() {
        let mut measurer = measurer(400.0);
        let block = TextBlock::paragraph("Hello");
        assert_eq!(measurer.measure_block(&block), 20);

        measurer.set_metrics(FontMetrics::monospace(10.0, 8.0));
        assert_eq!(measurer.cached_blocks(), 1);

        measurer.set_metrics(FontMetrics::monospace(20.0, 8.0));
        assert_eq!(measurer.metrics().line_height, 20.0);
        assert_eq!(measurer.cached_blocks(), 0);
        assert_eq!(measurer.measure_block(&block), 40);
    }

    #[test]
    fn test_cache_follows_the_document() {
        let mut measurer = measurer(400.0);
        let mut blocks: Vec<TextBlock> = (0..10)
            .map(|i| TextBlock::paragraph(format!("block {}", i)))
            .collect();

        // Every keystroke replaces one block with new content
        for edit in 0..1_000 {
            blocks[edit % 10] = TextBlock::paragraph(format!("edit {}", edit));
            measurer.measure(&blocks);
            assert!(measurer.cached_blocks() <= blocks.len());
        }
        assert_eq!(measurer.cached_blocks(), 10);
    }

    #[test]
    fn test_single_block_cache_is_capped() {
        let mut measurer = measurer(400.0);
        for i in 0..MAX_CACHED_BLOCKS + 10 {
            measurer.measure_block(&TextBlock::paragraph(i.to_string()));
        }
        assert!(measurer.cached_blocks() <= MAX_CACHED_BLOCKS);
    }

    #[test]
    fn test_cache_keys_on_kind_and_text() {
        let mut measurer = measurer(40.0);
        let heights = measurer.measure(&[
            TextBlock::paragraph("Title"),
            TextBlock::list_item(0, "Title"),
            TextBlock::paragraph("Hello World"),
        ]);
        // list indent leaves 16px, so "Title" wraps to 3 lines
        assert_eq!(heights.as_slice(), &[20, 33, 30]);
        assert_eq!(measurer.cached_blocks(), 3);
    }

    #[test]
    fn test_paragraphs_from_text() {
        let blocks = TextBlock::paragraphs_from_text("one\n\ntwo\n\nthree");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1], TextBlock::paragraph("two"));
    }
}
