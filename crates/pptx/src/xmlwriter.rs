//! Slide-part XML encoding.
//!
//! [`XmlCanvas`] implements [`SlideCanvas`] by writing DrawingML shape
//! events with `quick_xml`. Coordinates arrive in inches and are converted
//! to EMU (914400 per inch).

use crate::canvas::{Align, Anchor, Color, EmbedError, Frame, ListStyle, SlideCanvas, TextBlock};
use proposal_core::{Error, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

const EMU_PER_INCH: f64 = 914_400.0;

/// PNG file signature; anything else is treated as unembeddable.
const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Left indent for numbered list items, in EMU (3/8 inch).
const LIST_INDENT_EMU: i64 = 342_900;

/// The encoded output of one slide: its XML part, the images it embeds
/// (in relationship order, starting at rId2), and optional speaker notes.
#[derive(Debug, Clone)]
pub struct SlidePart {
    pub xml: String,
    pub images: Vec<Vec<u8>>,
    pub notes: Option<String>,
}

/// A [`SlideCanvas`] that encodes drawing calls as slide XML.
pub struct XmlCanvas {
    shapes: Writer<Vec<u8>>,
    background: Option<Color>,
    images: Vec<Vec<u8>>,
    notes: Option<String>,
    next_shape_id: u32,
    error: Option<quick_xml::Error>,
}

impl XmlCanvas {
    pub fn new() -> Self {
        Self {
            shapes: Writer::new(Vec::new()),
            background: None,
            images: Vec::new(),
            notes: None,
            // Shape id 1 belongs to the group shape tree itself.
            next_shape_id: 2,
            error: None,
        }
    }

    /// Finish the slide and hand back its encoded part.
    pub fn finish(self) -> Result<SlidePart> {
        if let Some(e) = self.error {
            return Err(Error::XmlError(e.to_string()));
        }

        let shapes = String::from_utf8(self.shapes.into_inner())
            .map_err(|e| Error::XmlError(e.to_string()))?;

        let background = match self.background {
            Some(color) => format!(
                "<p:bg><p:bgPr><a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>",
                color.hex()
            ),
            None => String::new(),
        };

        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <p:sld xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
             xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
             xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">\
             <p:cSld>{background}\
             <p:spTree>\
             <p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
             <p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/>\
             <a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>\
             {shapes}\
             </p:spTree></p:cSld>\
             <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"
        );

        Ok(SlidePart {
            xml,
            images: self.images,
            notes: self.notes,
        })
    }

    fn take_shape_id(&mut self) -> u32 {
        let id = self.next_shape_id;
        self.next_shape_id += 1;
        id
    }

    /// Run an XML-producing closure, remembering the first failure so
    /// `finish` can surface it.
    fn record<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Self) -> std::result::Result<(), quick_xml::Error>,
    {
        if self.error.is_none() {
            if let Err(e) = f(self) {
                self.error = Some(e);
            }
        }
    }
}

impl Default for XmlCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl SlideCanvas for XmlCanvas {
    fn set_background(&mut self, color: Color) {
        self.background = Some(color);
    }

    fn add_rect(&mut self, frame: Frame, fill: Color) {
        let id = self.take_shape_id();
        self.record(|c| {
            let w = &mut c.shapes;
            start(w, "p:sp", &[])?;
            start(w, "p:nvSpPr", &[])?;
            empty(w, "p:cNvPr", &[("id", &id.to_string()), ("name", &format!("Rectangle {id}"))])?;
            empty(w, "p:cNvSpPr", &[])?;
            empty(w, "p:nvPr", &[])?;
            end(w, "p:nvSpPr")?;
            write_sp_pr(w, frame, Some(fill))?;
            end(w, "p:sp")
        });
    }

    fn add_image(&mut self, png: &[u8], frame: Frame) -> std::result::Result<(), EmbedError> {
        if !png.starts_with(PNG_MAGIC) {
            return Err(EmbedError("not a PNG image".to_string()));
        }

        // Image relationships follow rId1 (the slide layout).
        let rel_id = format!("rId{}", 2 + self.images.len());
        self.images.push(png.to_vec());

        let id = self.take_shape_id();
        self.record(|c| {
            let w = &mut c.shapes;
            start(w, "p:pic", &[])?;
            start(w, "p:nvPicPr", &[])?;
            empty(w, "p:cNvPr", &[("id", &id.to_string()), ("name", &format!("Logo {id}"))])?;
            empty(w, "p:cNvPicPr", &[])?;
            empty(w, "p:nvPr", &[])?;
            end(w, "p:nvPicPr")?;
            start(w, "p:blipFill", &[])?;
            empty(w, "a:blip", &[("r:embed", &rel_id)])?;
            start(w, "a:stretch", &[])?;
            empty(w, "a:fillRect", &[])?;
            end(w, "a:stretch")?;
            end(w, "p:blipFill")?;
            write_sp_pr(w, frame, None)?;
            end(w, "p:pic")
        });

        Ok(())
    }

    fn add_text(&mut self, block: &TextBlock, frame: Frame) {
        let id = self.take_shape_id();
        let block = block.clone();
        self.record(|c| {
            let w = &mut c.shapes;
            start(w, "p:sp", &[])?;
            start(w, "p:nvSpPr", &[])?;
            empty(w, "p:cNvPr", &[("id", &id.to_string()), ("name", &format!("TextBox {id}"))])?;
            empty(w, "p:cNvSpPr", &[("txBox", "1")])?;
            empty(w, "p:nvPr", &[])?;
            end(w, "p:nvSpPr")?;
            write_sp_pr(w, frame, None)?;

            start(w, "p:txBody", &[])?;
            empty(w, "a:bodyPr", &[("wrap", "square"), ("anchor", anchor_attr(block.anchor))])?;
            for line in &block.lines {
                start(w, "a:p", &[])?;
                if block.align != Align::Left {
                    empty(w, "a:pPr", &[("algn", align_attr(block.align))])?;
                }
                write_run(w, line, block.size_pt, block.bold, block.color)?;
                end(w, "a:p")?;
            }
            end(w, "p:txBody")?;
            end(w, "p:sp")
        });
    }

    fn add_numbered_list(&mut self, items: &[String], frame: Frame, style: ListStyle) {
        let id = self.take_shape_id();
        let items = items.to_vec();
        self.record(|c| {
            let w = &mut c.shapes;
            start(w, "p:sp", &[])?;
            start(w, "p:nvSpPr", &[])?;
            empty(w, "p:cNvPr", &[("id", &id.to_string()), ("name", &format!("Body {id}"))])?;
            empty(w, "p:cNvSpPr", &[("txBox", "1")])?;
            empty(w, "p:nvPr", &[])?;
            end(w, "p:nvSpPr")?;
            write_sp_pr(w, frame, None)?;

            start(w, "p:txBody", &[])?;
            empty(w, "a:bodyPr", &[("wrap", "square"), ("anchor", "t")])?;
            for item in &items {
                start(w, "a:p", &[])?;
                start(
                    w,
                    "a:pPr",
                    &[
                        ("marL", &LIST_INDENT_EMU.to_string()),
                        ("indent", &(-LIST_INDENT_EMU).to_string()),
                    ],
                )?;
                start(w, "a:spcAft", &[])?;
                empty(w, "a:spcPts", &[("val", &(style.space_after_pt * 100).to_string())])?;
                end(w, "a:spcAft")?;
                empty(w, "a:buFont", &[("typeface", "Arial")])?;
                empty(w, "a:buAutoNum", &[("type", "arabicPeriod")])?;
                end(w, "a:pPr")?;
                write_run(w, item, style.size_pt, false, style.color)?;
                end(w, "a:p")?;
            }
            end(w, "p:txBody")?;
            end(w, "p:sp")
        });
    }

    fn set_notes(&mut self, notes: &str) {
        self.notes = Some(notes.to_string());
    }
}

fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

fn anchor_attr(anchor: Anchor) -> &'static str {
    match anchor {
        Anchor::Top => "t",
        Anchor::Middle => "ctr",
    }
}

fn align_attr(align: Align) -> &'static str {
    match align {
        Align::Left => "l",
        Align::Center => "ctr",
        Align::Right => "r",
    }
}

fn start(w: &mut Writer<Vec<u8>>, name: &str, attrs: &[(&str, &str)]) -> std::result::Result<(), quick_xml::Error> {
    let mut e = BytesStart::new(name);
    for (k, v) in attrs {
        e.push_attribute((*k, *v));
    }
    w.write_event(Event::Start(e))
}

fn empty(w: &mut Writer<Vec<u8>>, name: &str, attrs: &[(&str, &str)]) -> std::result::Result<(), quick_xml::Error> {
    let mut e = BytesStart::new(name);
    for (k, v) in attrs {
        e.push_attribute((*k, *v));
    }
    w.write_event(Event::Empty(e))
}

fn end(w: &mut Writer<Vec<u8>>, name: &str) -> std::result::Result<(), quick_xml::Error> {
    w.write_event(Event::End(BytesEnd::new(name)))
}

/// Shape properties: position, extent, rectangle geometry, optional fill.
fn write_sp_pr(w: &mut Writer<Vec<u8>>, frame: Frame, fill: Option<Color>) -> std::result::Result<(), quick_xml::Error> {
    start(w, "p:spPr", &[])?;
    start(w, "a:xfrm", &[])?;
    empty(w, "a:off", &[("x", &emu(frame.x).to_string()), ("y", &emu(frame.y).to_string())])?;
    empty(w, "a:ext", &[("cx", &emu(frame.w).to_string()), ("cy", &emu(frame.h).to_string())])?;
    end(w, "a:xfrm")?;
    start(w, "a:prstGeom", &[("prst", "rect")])?;
    empty(w, "a:avLst", &[])?;
    end(w, "a:prstGeom")?;
    if let Some(color) = fill {
        start(w, "a:solidFill", &[])?;
        empty(w, "a:srgbClr", &[("val", color.hex())])?;
        end(w, "a:solidFill")?;
    }
    end(w, "p:spPr")
}

/// One styled text run. Font sizes are in hundredths of a point on the wire.
fn write_run(w: &mut Writer<Vec<u8>>, text: &str, size_pt: u32, bold: bool, color: Color) -> std::result::Result<(), quick_xml::Error> {
    start(w, "a:r", &[])?;
    let sz = (size_pt * 100).to_string();
    let mut attrs: Vec<(&str, &str)> = vec![("lang", "en-US"), ("sz", &sz)];
    if bold {
        attrs.push(("b", "1"));
    }
    start(w, "a:rPr", &attrs)?;
    start(w, "a:solidFill", &[])?;
    empty(w, "a:srgbClr", &[("val", color.hex())])?;
    end(w, "a:solidFill")?;
    end(w, "a:rPr")?;
    start(w, "a:t", &[])?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    end(w, "a:t")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_png() -> Vec<u8> {
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.extend_from_slice(&[0u8; 16]);
        bytes
    }

    #[test]
    fn test_text_is_escaped() {
        let mut canvas = XmlCanvas::new();
        canvas.add_text(
            &TextBlock::new("Land & buildings <440 tsubo>", 18, Color("333333")),
            Frame::new(1.0, 1.0, 4.0, 1.0),
        );
        let part = canvas.finish().unwrap();
        assert!(part.xml.contains("Land &amp; buildings &lt;440 tsubo&gt;"));
    }

    #[test]
    fn test_background_present_only_when_set() {
        let mut with_bg = XmlCanvas::new();
        with_bg.set_background(Color("1F4788"));
        assert!(with_bg.finish().unwrap().xml.contains("<p:bg>"));

        let without = XmlCanvas::new();
        assert!(!without.finish().unwrap().xml.contains("<p:bg>"));
    }

    #[test]
    fn test_image_relationship_ids_start_after_layout() {
        let mut canvas = XmlCanvas::new();
        canvas.add_image(&valid_png(), Frame::new(0.5, 0.5, 3.0, 0.6)).unwrap();
        canvas.add_image(&valid_png(), Frame::new(0.3, 6.8, 2.0, 0.4)).unwrap();
        let part = canvas.finish().unwrap();

        assert_eq!(part.images.len(), 2);
        assert!(part.xml.contains("r:embed=\"rId2\""));
        assert!(part.xml.contains("r:embed=\"rId3\""));
    }

    #[test]
    fn test_non_png_rejected_without_side_effects() {
        let mut canvas = XmlCanvas::new();
        let err = canvas.add_image(b"GIF89a...", Frame::new(0.0, 0.0, 1.0, 1.0));
        assert!(err.is_err());
        let part = canvas.finish().unwrap();
        assert!(part.images.is_empty());
        assert!(!part.xml.contains("p:pic"));
    }

    #[test]
    fn test_emu_conversion() {
        assert_eq!(emu(1.0), 914_400);
        assert_eq!(emu(10.0), 9_144_000);
        assert_eq!(emu(7.5), 6_858_000);
        assert_eq!(emu(0.2), 182_880);
    }

    #[test]
    fn test_numbered_list_styling() {
        let mut canvas = XmlCanvas::new();
        canvas.add_numbered_list(
            &["First".to_string(), "Second".to_string()],
            Frame::new(0.8, 1.5, 8.4, 5.0),
            ListStyle {
                size_pt: 18,
                color: Color("333333"),
                space_after_pt: 12,
            },
        );
        let part = canvas.finish().unwrap();
        assert!(part.xml.contains("buAutoNum type=\"arabicPeriod\""));
        assert!(part.xml.contains("spcPts val=\"1200\""));
        assert!(part.xml.contains("sz=\"1800\""));
    }

    #[test]
    fn test_notes_carried_on_part() {
        let mut canvas = XmlCanvas::new();
        canvas.set_notes("Speak slowly.");
        let part = canvas.finish().unwrap();
        assert_eq!(part.notes.as_deref(), Some("Speak slowly."));
    }
}
