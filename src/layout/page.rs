//! Page size model for the on-screen print preview
//!
//! Inches are converted to CSS pixels with a fixed 96 DPI assumption, which
//! gives a predictable letter page in every browser:
//! - Width (8.5in)  -> 816px
//! - Height (11in)  -> 1056px
//! - Margin (1in)   -> 96px

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Browser DPI assumption for on-screen preview
pub const DPI: f32 = 96.0;
pub const LETTER_WIDTH_IN: f32 = 8.5;
pub const LETTER_HEIGHT_IN: f32 = 11.0;
pub const PAGE_MARGIN_IN: f32 = 1.0;

pub const PAGE_WIDTH_PX: f32 = LETTER_WIDTH_IN * DPI; // 816
pub const PAGE_HEIGHT_PX: f32 = LETTER_HEIGHT_IN * DPI; // 1056
pub const PAGE_MARGIN_PX: f32 = PAGE_MARGIN_IN * DPI; // 96

/// Page padding is the margin; screen and print share one source of truth
pub const PAGE_PADDING_PX: f32 = PAGE_MARGIN_PX;

pub const CONTENT_WIDTH_PX: f32 = PAGE_WIDTH_PX - PAGE_PADDING_PX * 2.0; // 624
pub const CONTENT_HEIGHT_PX: f32 = PAGE_HEIGHT_PX - PAGE_PADDING_PX * 2.0; // 864

/// Errors from loading a page geometry
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid page geometry JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be a finite, non-negative pixel value (got {value})")]
    InvalidDimension { field: &'static str, value: f32 },
    #[error("{axis} margins leave no room for content")]
    MarginsExceedPage { axis: &'static str },
}

/// Page dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}

impl PageGeometry {
    /// US Letter with 1in margins at 96 DPI
    pub fn letter() -> Self {
        Self::uniform(PAGE_WIDTH_PX, PAGE_HEIGHT_PX, PAGE_MARGIN_PX)
    }

    /// Page with the same margin on all four sides
    pub fn uniform(page_width: f32, page_height: f32, margin: f32) -> Self {
        Self {
            page_width,
            page_height,
            margin_top: margin,
            margin_bottom: margin,
            margin_left: margin,
            margin_right: margin,
        }
    }

    /// Build from physical inches at the given DPI, rounding to whole pixels
    pub fn from_inches(width_in: f32, height_in: f32, margin_in: f32, dpi: f32) -> Self {
        Self::uniform(
            (width_in * dpi).round(),
            (height_in * dpi).round(),
            (margin_in * dpi).round(),
        )
    }

    /// Parse a camelCase JSON object; missing fields fall back to letter
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let geometry: Self = serde_json::from_str(json)?;
        geometry.validate()?;
        Ok(geometry)
    }

    /// Reject negative or non-finite sizes and margins that swallow the page
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("pageWidth", self.page_width),
            ("pageHeight", self.page_height),
            ("marginTop", self.margin_top),
            ("marginBottom", self.margin_bottom),
            ("marginLeft", self.margin_left),
            ("marginRight", self.margin_right),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidDimension { field, value });
            }
        }

        if self.content_width() <= 0.0 {
            return Err(ConfigError::MarginsExceedPage { axis: "horizontal" });
        }
        if self.content_height() <= 0.0 {
            return Err(ConfigError::MarginsExceedPage { axis: "vertical" });
        }
        Ok(())
    }

    /// Get usable content width
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Get usable content height per page
    pub fn content_height(&self) -> f32 {
        self.page_height - self.margin_top - self.margin_bottom
    }

    /// Page content height as a pagination budget
    pub fn page_budget(&self) -> f64 {
        f64::from(self.content_height())
    }

    /// Inline style the host applies to a page container
    pub fn page_style(&self) -> PageStyle {
        let uniform = self.margin_top == self.margin_bottom
            && self.margin_top == self.margin_left
            && self.margin_top == self.margin_right;

        let padding = if uniform {
            px(self.margin_top)
        } else {
            format!(
                "{} {} {} {}",
                px(self.margin_top),
                px(self.margin_right),
                px(self.margin_bottom),
                px(self.margin_left)
            )
        };

        PageStyle {
            width: px(self.page_width),
            height: px(self.page_height),
            padding,
        }
    }
}

/// CSS pixel strings for a page container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageStyle {
    pub width: String,
    pub height: String,
    pub padding: String,
}

fn px(value: f32) -> String {
    format!("{}px", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_constants() {
        assert_eq!(PAGE_WIDTH_PX, 816.0);
        assert_eq!(PAGE_HEIGHT_PX, 1056.0);
        assert_eq!(PAGE_MARGIN_PX, 96.0);
        assert_eq!(CONTENT_WIDTH_PX, 624.0);
        assert_eq!(CONTENT_HEIGHT_PX, 864.0);
    }

    #[test]
    fn test_letter_geometry() {
        let geometry = PageGeometry::letter();
        assert_eq!(geometry.content_width(), 624.0);
        assert_eq!(geometry.content_height(), 864.0);
        assert_eq!(geometry.page_budget(), 864.0);
        assert_eq!(geometry, PageGeometry::from_inches(8.5, 11.0, 1.0, 96.0));
    }

    #[test]
    fn test_page_style() {
        let style = PageGeometry::letter().page_style();
        assert_eq!(style.width, "816px");
        assert_eq!(style.height, "1056px");
        assert_eq!(style.padding, "96px");

        let mut geometry = PageGeometry::letter();
        geometry.margin_left = 48.0;
        assert_eq!(geometry.page_style().padding, "96px 96px 96px 48px");
    }

    #[test]
    fn test_from_json_defaults_missing_fields() {
        let geometry = PageGeometry::from_json(r#"{"marginTop": 72, "marginBottom": 72}"#).unwrap();
        assert_eq!(geometry.page_height, 1056.0);
        assert_eq!(geometry.content_height(), 912.0);
        assert_eq!(geometry.content_width(), 624.0);
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(matches!(
            PageGeometry::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            PageGeometry::from_json(r#"{"pageWidth": -1}"#),
            Err(ConfigError::InvalidDimension { field: "pageWidth", .. })
        ));
        assert!(matches!(
            PageGeometry::from_json(r#"{"marginTop": 600, "marginBottom": 600}"#),
            Err(ConfigError::MarginsExceedPage { axis: "vertical" })
        ));
    }
}
