//! The capability surface a slide encoder must provide.
//!
//! Layout code targets this trait instead of any one document library, so
//! the renderer core can be retargeted to a different binary-format
//! encoder without touching the layout rules.

use thiserror::Error;

/// A rectangle on the slide canvas, in inches from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Frame {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

/// An RGB color as a six-digit uppercase hex string without `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub &'static str);

impl Color {
    pub fn hex(&self) -> &'static str {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Middle,
}

/// A styled block of text; each entry in `lines` becomes its own paragraph.
#[derive(Debug, Clone)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub size_pt: u32,
    pub bold: bool,
    pub color: Color,
    pub align: Align,
    pub anchor: Anchor,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, size_pt: u32, color: Color) -> Self {
        Self {
            lines: vec![text.into()],
            size_pt,
            bold: false,
            color,
            align: Align::Left,
            anchor: Anchor::Top,
        }
    }

    pub fn multi_line(lines: Vec<String>, size_pt: u32, color: Color) -> Self {
        Self {
            lines,
            size_pt,
            bold: false,
            color,
            align: Align::Left,
            anchor: Anchor::Top,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }
}

/// Styling for a numbered bullet list.
#[derive(Debug, Clone, Copy)]
pub struct ListStyle {
    pub size_pt: u32,
    pub color: Color,
    /// Paragraph spacing after each item, in points.
    pub space_after_pt: u32,
}

/// Raised when an image asset cannot be embedded. Layout code treats this
/// as a per-element condition (substitute or omit), never as a slide
/// failure.
#[derive(Error, Debug)]
#[error("image embedding failed: {0}")]
pub struct EmbedError(pub String);

/// One slide's drawing surface.
pub trait SlideCanvas {
    fn set_background(&mut self, color: Color);
    fn add_rect(&mut self, frame: Frame, fill: Color);
    /// Embed a PNG image. Fails without side effects when the bytes are
    /// not embeddable.
    fn add_image(&mut self, png: &[u8], frame: Frame) -> Result<(), EmbedError>;
    fn add_text(&mut self, block: &TextBlock, frame: Frame);
    fn add_numbered_list(&mut self, items: &[String], frame: Frame, style: ListStyle);
    fn set_notes(&mut self, notes: &str);
}
