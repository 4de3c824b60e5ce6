//! Layout rules for the two slide archetypes.
//!
//! Geometry, palette, and font sizes are fixed presentation constants; the
//! cover and content compositions write them through the [`SlideCanvas`]
//! trait. Logo embedding is defensive per element: the cover and header
//! logos substitute a text label on failure, the footer logo is simply
//! dropped.

use crate::canvas::{Align, Anchor, Color, Frame, ListStyle, SlideCanvas, TextBlock};
use proposal_core::Slide;

/// Canvas size in inches, applied to every slide.
pub const PAGE_WIDTH_IN: f64 = 10.0;
pub const PAGE_HEIGHT_IN: f64 = 7.5;

/// Brand palette.
pub const BRAND_COLOR: Color = Color("1F4788");
pub const WHITE: Color = Color("FFFFFF");
pub const BODY_TEXT_COLOR: Color = Color("333333");
pub const PAGE_NUMBER_COLOR: Color = Color("666666");

/// Organization identity stamped into metadata and logo fallbacks.
pub const ORG_NAME: &str = "Okihawa Asset Bridge Co., Ltd.";
pub const ORG_NAME_SHORT: &str = "Okihawa Asset Bridge";

// Cover geometry.
const COVER_LOGO: Frame = Frame::new(0.5, 0.5, 3.0, 0.6);
const COVER_TITLE: Frame = Frame::new(0.5, 2.5, 9.0, 1.5);
const COVER_SUBTITLE: Frame = Frame::new(1.0, 4.2, 8.0, 2.0);

// Content geometry.
const HEADER_BAR: Frame = Frame::new(0.0, 0.0, PAGE_WIDTH_IN, 1.0);
const HEADER_LOGO: Frame = Frame::new(6.5, 0.2, 3.0, 0.6);
const HEADER_TITLE: Frame = Frame::new(0.5, 0.2, 6.0, 0.6);
const BODY: Frame = Frame::new(0.8, 1.5, 8.4, 5.0);
const PAGE_NUMBER: Frame = Frame::new(9.2, 7.0, 0.5, 0.3);
const FOOTER_LOGO: Frame = Frame::new(0.3, 6.8, 2.0, 0.4);

const BODY_LIST_STYLE: ListStyle = ListStyle {
    size_pt: 18,
    color: BODY_TEXT_COLOR,
    space_after_pt: 12,
};

/// Fixed presentation constants plus the optional logo asset.
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// PNG bytes of the organization logo, if one is configured.
    pub logo: Option<Vec<u8>>,
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logo(mut self, png: Vec<u8>) -> Self {
        self.logo = Some(png);
        self
    }
}

/// Which layout a slide gets, decided purely by its position in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideArchetype {
    Cover,
    /// `page` is the slide's 1-based position; the cover counts as page 1,
    /// so the first content slide is page 2.
    Content { page: usize },
}

impl SlideArchetype {
    pub fn for_index(index: usize) -> Self {
        if index == 0 {
            Self::Cover
        } else {
            Self::Content { page: index + 1 }
        }
    }
}

/// Compose one slide onto a canvas according to its archetype.
pub fn compose(canvas: &mut dyn SlideCanvas, slide: &Slide, archetype: SlideArchetype, config: &RenderConfig) {
    match archetype {
        SlideArchetype::Cover => compose_cover(canvas, slide, config),
        SlideArchetype::Content { page } => compose_content(canvas, slide, page, config),
    }
}

fn compose_cover(canvas: &mut dyn SlideCanvas, slide: &Slide, config: &RenderConfig) {
    canvas.set_background(BRAND_COLOR);

    if !embed_logo(canvas, config, COVER_LOGO) {
        // Substitute the organization name at the logo position.
        canvas.add_text(&TextBlock::new(ORG_NAME, 14, WHITE).bold(), COVER_LOGO);
    }

    canvas.add_text(
        &TextBlock::new(&slide.title, 44, WHITE)
            .bold()
            .align(Align::Center)
            .anchor(Anchor::Middle),
        COVER_TITLE,
    );

    canvas.add_text(
        &TextBlock::multi_line(slide.bullets.clone(), 18, WHITE).align(Align::Center),
        COVER_SUBTITLE,
    );
}

fn compose_content(canvas: &mut dyn SlideCanvas, slide: &Slide, page: usize, config: &RenderConfig) {
    canvas.set_background(WHITE);
    canvas.add_rect(HEADER_BAR, BRAND_COLOR);

    if !embed_logo(canvas, config, HEADER_LOGO) {
        canvas.add_text(
            &TextBlock::new(ORG_NAME_SHORT, 12, WHITE).align(Align::Right),
            HEADER_LOGO,
        );
    }

    canvas.add_text(
        &TextBlock::new(&slide.title, 28, WHITE)
            .bold()
            .anchor(Anchor::Middle),
        HEADER_TITLE,
    );

    canvas.add_numbered_list(&slide.bullets, BODY, BODY_LIST_STYLE);

    canvas.add_text(
        &TextBlock::new(page.to_string(), 12, PAGE_NUMBER_COLOR).align(Align::Right),
        PAGE_NUMBER,
    );

    // Footer logo is cosmetic only; failure drops it with no substitute.
    if let Some(png) = &config.logo {
        if let Err(e) = canvas.add_image(png, FOOTER_LOGO) {
            log::debug!("footer logo omitted: {}", e);
        }
    }

    if let Some(notes) = &slide.notes {
        canvas.set_notes(notes);
    }
}

/// Try to embed the configured logo. Returns false when there is no logo
/// or embedding failed, in which case the caller places its substitute.
fn embed_logo(canvas: &mut dyn SlideCanvas, config: &RenderConfig, frame: Frame) -> bool {
    match &config.logo {
        Some(png) => match canvas.add_image(png, frame) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("logo embedding failed, substituting text label: {}", e);
                false
            }
        },
        None => false,
    }
}
