//! Free-standing text elements.

use serde_json::{Map, Value, json};
use unicode_width::UnicodeWidthStr;

use crate::{
    element::{ElementCommon, ElementKind, Primitive},
    geometry::Size,
    style::{FONT_SIZE, LINE_HEIGHT, Style},
};

/// Average glyph advance as a fraction of the font size.
///
/// Excalidraw's hand-drawn font is close to monospaced at this ratio, which is
/// good enough for sizing containers around text.
pub const CHAR_WIDTH_RATIO: f32 = 0.6;

const FALLBACK_FONT_SIZE: f32 = 20.0;
const FALLBACK_LINE_HEIGHT: f32 = 1.25;

/// A block of text centered on its position.
///
/// The bounding box is estimated from the content unless an explicit size
/// was given; see [`Text::estimate_size`].
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    text: String,
    common: ElementCommon,
}

impl Text {
    pub fn new(text: impl Into<String>, common: ElementCommon) -> Self {
        Self {
            text: text.into(),
            common,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Estimates the box occupied by `text` when rendered with `style`.
    ///
    /// Width is the widest line in terminal columns (so CJK and emoji count
    /// double) times `fontSize * CHAR_WIDTH_RATIO`; height is the number of
    /// lines times `fontSize * lineHeight`. An empty string still occupies one
    /// line. Appending content never shrinks the estimate.
    ///
    /// # Examples
    ///
    /// ```
    /// # use exsketch_core::element::Text;
    /// # use exsketch_core::style::{Style, StyleFamily, StyleProfiles};
    /// let style = StyleProfiles::standard().profile(StyleFamily::Text).clone();
    ///
    /// let one = Text::estimate_size("Hello", &style);
    /// let two = Text::estimate_size("Hello\nworld!", &style);
    /// assert!(two.width() > one.width());
    /// assert_eq!(two.height(), 2.0 * one.height());
    /// ```
    pub fn estimate_size(text: &str, style: &Style) -> Size {
        let font_size = style.get_f32(FONT_SIZE).unwrap_or(FALLBACK_FONT_SIZE);
        let line_height = style.get_f32(LINE_HEIGHT).unwrap_or(FALLBACK_LINE_HEIGHT);

        let (line_count, columns) = text
            .split('\n')
            .map(|line| line.trim_end_matches('\r').width())
            .fold((0usize, 0usize), |(count, widest), width| {
                (count + 1, widest.max(width))
            });

        Size::new(
            columns as f32 * font_size * CHAR_WIDTH_RATIO,
            line_count as f32 * font_size * line_height,
        )
    }

    pub(super) fn common_mut(&mut self) -> &mut ElementCommon {
        &mut self.common
    }
}

impl Primitive for Text {
    fn common(&self) -> &ElementCommon {
        &self.common
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Text
    }

    fn write_fields(&self, fields: &mut Map<String, Value>) {
        fields.insert("text".into(), json!(self.text));
        fields.insert("originalText".into(), json!(self.text));
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::style::{StyleFamily, StyleProfiles};

    /// Appending text never makes the estimated box smaller.
    fn check_estimate_is_monotonic(base: String, suffix: String) -> Result<(), TestCaseError> {
        let style = StyleProfiles::standard().profile(StyleFamily::Text).clone();
        let short = Text::estimate_size(&base, &style);
        let long = Text::estimate_size(&format!("{base}{suffix}"), &style);

        prop_assert!(long.width() >= short.width());
        prop_assert!(long.height() >= short.height());
        Ok(())
    }

    proptest! {
        #[test]
        fn estimate_is_monotonic(base in "[a-z \\n]{0,40}", suffix in "[a-z \\n]{0,40}") {
            check_estimate_is_monotonic(base, suffix)?;
        }
    }
}
