//! OOXML (.pptx) presentation renderer for proposal decks.
//!
//! A .pptx file is a ZIP archive of XML parts. The layout rules in
//! [`layout`] compose each slide against the [`canvas::SlideCanvas`]
//! capability trait; [`xmlwriter::XmlCanvas`] encodes those calls as
//! slide-part XML, and [`package`] assembles the parts into the archive.

pub mod canvas;
pub mod layout;
pub mod package;
pub mod render;
pub mod xmlwriter;

pub use canvas::{Align, Anchor, Color, EmbedError, Frame, ListStyle, SlideCanvas, TextBlock};
pub use layout::{RenderConfig, SlideArchetype};
pub use render::PptxRenderer;
