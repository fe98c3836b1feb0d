//! Font metrics for height estimation

use unicode_segmentation::UnicodeSegmentation;

/// Metrics needed for text layout
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    /// Line height in logical pixels
    pub line_height: f32,
    /// Width of ASCII characters (0-127)
    pub char_widths: Vec<f32>,
    /// Default width for non-ASCII characters
    pub default_width: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        // 16px body text at 1.5 line height, ~8px average advance
        Self::monospace(24.0, 8.0)
    }
}

impl FontMetrics {
    pub fn new(line_height: f32, char_widths: Vec<f32>, default_width: f32) -> Self {
        Self {
            line_height,
            char_widths,
            default_width,
        }
    }

    /// Every character has the same advance
    pub fn monospace(line_height: f32, advance: f32) -> Self {
        Self::new(line_height, vec![advance; 128], advance)
    }

    /// Get width of a character
    pub fn width(&self, c: char) -> f32 {
        if c.is_ascii() {
            if let Some(w) = self.char_widths.get(c as usize) {
                return *w;
            }
        }
        self.default_width
    }

    /// Width of a grapheme cluster
    pub fn cluster_width(&self, grapheme: &str) -> f32 {
        if grapheme == "\t" {
            self.default_width * 4.0
        } else if grapheme.chars().all(|c| c.is_control()) {
            0.0
        } else {
            grapheme.chars().map(|c| self.width(c)).sum()
        }
    }

    /// Width of a run of text, measured cluster by cluster
    pub fn text_width(&self, text: &str) -> f32 {
        text.graphemes(true).map(|g| self.cluster_width(g)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        let mut metrics = FontMetrics::monospace(10.0, 8.0);
        metrics.char_widths['i' as usize] = 3.0;

        assert_eq!(metrics.width('a'), 8.0);
        assert_eq!(metrics.width('i'), 3.0);
        assert_eq!(metrics.width('é'), 8.0);
        assert_eq!(metrics.cluster_width("\n"), 0.0);
        assert_eq!(metrics.cluster_width("\t"), 32.0);
        assert_eq!(metrics.text_width("hi"), 11.0);
    }
}
