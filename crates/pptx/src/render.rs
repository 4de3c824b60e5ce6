//! Top-level rendering: slide plan in, presentation bytes out.

use crate::layout::{compose, RenderConfig, SlideArchetype, ORG_NAME};
use crate::package::{build_package, DocMeta};
use crate::xmlwriter::XmlCanvas;
use proposal_core::{OutputFormat, RenderedDocument, Result, SlidePlan};

/// Renders a [`SlidePlan`] into a presentation package.
///
/// The primary format (`.pptx`) is always encoded faithfully. A secondary
/// (`.odp`) request is served by reusing the primary bytes under the
/// requested name, flagged as degraded and logged, since no dedicated
/// OpenDocument encoder exists.
#[derive(Debug, Clone, Default)]
pub struct PptxRenderer {
    config: RenderConfig,
}

impl PptxRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render the plan. Per-element asset failures are absorbed by the
    /// layout rules; the only error paths left are internal encoding
    /// failures.
    pub fn render(
        &self,
        plan: &SlidePlan,
        title: &str,
        audience: &str,
        format: OutputFormat,
    ) -> Result<RenderedDocument> {
        let mut parts = Vec::with_capacity(plan.len());
        for (index, slide) in plan.slides.iter().enumerate() {
            let mut canvas = XmlCanvas::new();
            compose(&mut canvas, slide, SlideArchetype::for_index(index), &self.config);
            parts.push(canvas.finish()?);
        }

        let meta = DocMeta {
            title: format!("{} Proposal", title),
            subject: format!("{} - proposal for {}", title, audience),
            author: ORG_NAME.to_string(),
            company: ORG_NAME.to_string(),
        };
        let bytes = build_package(&parts, &meta)?;

        let degraded = match format {
            OutputFormat::Pptx => false,
            OutputFormat::Odp => {
                log::warn!(
                    "no dedicated ODP encoder; delivering OOXML bytes under an .odp name"
                );
                true
            }
        };

        Ok(RenderedDocument {
            bytes,
            format,
            filename: format!("{}_proposal.{}", sanitize_filename(title), format.extension()),
            degraded,
        })
    }
}

/// Keep filenames portable: alphanumerics, hyphen, underscore, and CJK
/// stay; spaces become underscores; everything else is dropped.
fn sanitize_filename(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                Some(c)
            } else if c.is_whitespace() {
                Some('_')
            } else {
                None
            }
        })
        .collect();

    if cleaned.is_empty() {
        "property".to_string()
    } else {
        cleaned
    }
}
