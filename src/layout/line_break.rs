//! Line breaking for text height estimation

use crate::layout::font::FontMetrics;
use std::ops::Range;
use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

/// A wrapped line of text
#[derive(Debug, Clone, PartialEq)]
pub struct LineSpan {
    /// Byte range of the line, without its terminating newline
    pub byte_range: Range<usize>,
    /// Width of the visible content
    pub width: f32,
}

/// Greedy line breaker over UAX #14 break opportunities
#[derive(Debug, Default)]
pub struct LineBreaker;

struct LineBuilder<'a> {
    text: &'a str,
    lines: Vec<LineSpan>,
    start: usize,
    end: usize,
    x: f32,
    visible: f32,
}

impl<'a> LineBuilder<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            lines: Vec::new(),
            start: 0,
            end: 0,
            x: 0.0,
            visible: 0.0,
        }
    }

    fn is_empty(&self) -> bool {
        self.end == self.start
    }

    fn close(&mut self) {
        let line = self.text[self.start..self.end].trim_end_matches(&['\n', '\r'][..]);
        self.lines.push(LineSpan {
            byte_range: self.start..self.start + line.len(),
            width: self.visible,
        });
        self.start = self.end;
        self.x = 0.0;
        self.visible = 0.0;
    }

    fn append(&mut self, end: usize, width: f32, visible_width: f32) {
        self.visible = self.x + visible_width;
        self.x += width;
        self.end = end;
    }
}

impl LineBreaker {
    pub fn new() -> Self {
        Self
    }

    /// Wrap `text` into lines no wider than `max_width`.
    ///
    /// An empty text still occupies one line. A word wider than the line is
    /// broken between grapheme clusters.
    pub fn break_lines(&self, text: &str, max_width: f32, metrics: &FontMetrics) -> Vec<LineSpan> {
        let mut builder = LineBuilder::new(text);
        let mut segment_start = 0;

        for (offset, opportunity) in linebreaks(text) {
            if offset <= segment_start {
                continue;
            }
            let segment = &text[segment_start..offset];
            let width = metrics.text_width(segment);
            let visible_width = metrics.text_width(segment.trim_end());

            if builder.x + visible_width > max_width && !builder.is_empty() {
                builder.close();
            }

            if visible_width > max_width {
                self.break_word(&mut builder, segment_start, segment, max_width, metrics);
            } else {
                builder.append(offset, width, visible_width);
            }

            if opportunity == BreakOpportunity::Mandatory && offset < text.len() {
                builder.close();
            }
            segment_start = offset;
        }

        if !builder.is_empty() || builder.lines.is_empty() {
            builder.close();
        }
        if text.ends_with('\n') {
            builder.close();
        }

        builder.lines
    }

    /// Emergency break inside an overlong word
    fn break_word(
        &self,
        builder: &mut LineBuilder<'_>,
        segment_start: usize,
        segment: &str,
        max_width: f32,
        metrics: &FontMetrics,
    ) {
        for (idx, grapheme) in segment.grapheme_indices(true) {
            let width = metrics.cluster_width(grapheme);
            let visible_width = if grapheme.trim().is_empty() { 0.0 } else { width };
            if builder.x + visible_width > max_width && !builder.is_empty() {
                builder.close();
            }
            let visible = if visible_width > 0.0 {
                visible_width
            } else {
                builder.visible - builder.x
            };
            builder.append(segment_start + idx + grapheme.len(), width, visible);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> FontMetrics {
        FontMetrics::monospace(10.0, 8.0)
    }

    #[test]
    fn test_empty_text() {
        let lines = LineBreaker::new().break_lines("", 100.0, &metrics());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].byte_range, 0..0);
    }

    #[test]
    fn test_single_line() {
        let lines = LineBreaker::new().break_lines("Hello", 100.0, &metrics());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].byte_range, 0..5);
        assert_eq!(lines[0].width, 40.0);
    }

    #[test]
    fn test_line_wrap() {
        // With 8px per char, 40px width = 5 chars per line
        let lines = LineBreaker::new().break_lines("Hello World", 40.0, &metrics());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].byte_range, 0..6);
        assert_eq!(lines[0].width, 40.0);
        assert_eq!(lines[1].byte_range, 6..11);
    }

    #[test]
    fn test_explicit_newline() {
        let lines = LineBreaker::new().break_lines("Hello\nWorld", 1000.0, &metrics());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].byte_range, 0..5);
        assert_eq!(lines[1].byte_range, 6..11);
    }

    #[test]
    fn test_trailing_newline_adds_line() {
        let lines = LineBreaker::new().break_lines("Hello\n", 1000.0, &metrics());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].byte_range, 6..6);
    }

    #[test]
    fn test_long_word_breaks_between_graphemes() {
        let lines = LineBreaker::new().break_lines("abcdefghij", 32.0, &metrics());
        let ranges: Vec<_> = lines.iter().map(|l| l.byte_range.clone()).collect();
        assert_eq!(ranges, vec![0..4, 4..8, 8..10]);
    }
}
