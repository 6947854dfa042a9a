//! Color handling for sketch styles
//!
//! Stroke and background colors supplied as style values are parsed with the
//! `DynamicColor` type from the color crate, so that typos fail at the builder
//! boundary instead of producing a document the editor silently renders
//! black.

use std::str::FromStr;

use color::DynamicColor;

/// The keyword Excalidraw uses for "no fill".
pub const TRANSPARENT: &str = "transparent";

/// Parse a CSS color string such as "#ff0000", "rgb(255, 0, 0)" or "red".
///
/// The `transparent` keyword is accepted in any case.
///
/// # Examples
///
/// ```
/// use exsketch_core::color::parse_color;
///
/// assert!(parse_color("#ff0000").is_ok());
/// assert!(parse_color("Transparent").is_ok());
/// assert!(parse_color("not-a-color").is_err());
/// ```
pub fn parse_color(color_str: &str) -> Result<DynamicColor, String> {
    let css = if color_str.eq_ignore_ascii_case(TRANSPARENT) {
        "rgba(0, 0, 0, 0)"
    } else {
        color_str
    };
    DynamicColor::from_str(css).map_err(|err| format!("invalid color `{color_str}`: {err}"))
}
