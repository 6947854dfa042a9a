//! Exsketch Core Types and Definitions
//!
//! This crate provides the element model behind Exsketch, a builder for
//! Excalidraw documents. It includes:
//!
//! - **Geometry**: Points, sizes, bounds and angle helpers ([`geometry`] module)
//! - **Identifiers**: Element and group identifiers ([`identifier`] module)
//! - **Colors**: CSS color parsing for style validation ([`color::parse_color`])
//! - **Styles**: Style property bags and default profiles ([`style`] module)
//! - **Elements**: Shapes, text and lines with their geometric queries
//!   ([`element`] module)

pub mod color;
pub mod element;
pub mod geometry;
pub mod identifier;
pub mod style;
