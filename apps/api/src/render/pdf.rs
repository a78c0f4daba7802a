//! PDF backend — turns laid-out pages of draw ops into PDF bytes.
//!
//! Uses `printpdf` 0.8's data-oriented API: each [`PageOps`] becomes a
//! `PdfPage` holding a `Vec<Op>`, serialized in one pass by
//! `PdfDocument::save`. Layout coordinates are top-down; PDF's origin is the
//! bottom-left corner, so y flips here and nowhere else.

use printpdf::{
    BuiltinFont, Color, Line, LinePoint, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg,
    Point, Pt, Rgb, TextItem,
};
use thiserror::Error;
use tracing::debug;

use crate::layout::cursor::PageGeometry;
use crate::layout::document::{DrawOp, PageOps, RULE_THICKNESS};
use crate::layout::font_metrics::FontFace;
use crate::layout::DOC_TITLE;

/// Failure while producing the PDF byte stream. Only observable as stream
/// termination once the response has started.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF backend failure: {0}")]
    Backend(String),
}

/// Rule color from the original form: #aaaaaa.
const RULE_GRAY: f32 = 0.667;

const PT_TO_MM: f32 = 25.4 / 72.0;

fn builtin(face: FontFace) -> BuiltinFont {
    match face {
        FontFace::Helvetica => BuiltinFont::Helvetica,
        FontFace::HelveticaBold => BuiltinFont::HelveticaBold,
        FontFace::HelveticaOblique => BuiltinFont::HelveticaOblique,
    }
}

/// Serializes the assembled pages into a complete PDF document.
pub fn render(pages: &[PageOps], geometry: &PageGeometry) -> Result<Vec<u8>, RenderError> {
    let page_w = Mm(geometry.width * PT_TO_MM);
    let page_h = Mm(geometry.height * PT_TO_MM);

    let mut doc = PdfDocument::new(DOC_TITLE);
    let mut pdf_pages: Vec<PdfPage> = Vec::with_capacity(pages.len());

    for page in pages {
        let mut ops: Vec<Op> = Vec::with_capacity(page.ops.len() * 5);

        for draw in &page.ops {
            match draw {
                DrawOp::Text {
                    text,
                    face,
                    size,
                    x,
                    y,
                } => {
                    // `y` marks the top of the line box; the baseline sits one
                    // font size below it.
                    let baseline = geometry.height - (y + size);
                    let font = builtin(*face);
                    ops.push(Op::StartTextSection);
                    ops.push(Op::SetTextCursor {
                        pos: Point {
                            x: Pt(*x),
                            y: Pt(baseline),
                        },
                    });
                    ops.push(Op::SetFontSizeBuiltinFont {
                        size: Pt(*size),
                        font,
                    });
                    ops.push(Op::WriteTextBuiltinFont {
                        items: vec![TextItem::Text(text.clone())],
                        font,
                    });
                    ops.push(Op::EndTextSection);
                }
                DrawOp::Rule { x1, x2, y } => {
                    let flipped = geometry.height - y;
                    ops.push(Op::SetOutlineColor {
                        col: Color::Rgb(Rgb {
                            r: RULE_GRAY,
                            g: RULE_GRAY,
                            b: RULE_GRAY,
                            icc_profile: None,
                        }),
                    });
                    ops.push(Op::SetOutlineThickness {
                        pt: Pt(RULE_THICKNESS),
                    });
                    ops.push(Op::DrawLine {
                        line: Line {
                            points: vec![
                                LinePoint {
                                    p: Point {
                                        x: Pt(*x1),
                                        y: Pt(flipped),
                                    },
                                    bezier: false,
                                },
                                LinePoint {
                                    p: Point {
                                        x: Pt(*x2),
                                        y: Pt(flipped),
                                    },
                                    bezier: false,
                                },
                            ],
                            is_closed: false,
                        },
                    });
                }
            }
        }

        pdf_pages.push(PdfPage::new(page_w, page_h, ops));
    }

    doc.with_pages(pdf_pages);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    debug!(
        pages = pages.len(),
        bytes = bytes.len(),
        warnings = warnings.len(),
        "PDF serialized"
    );

    if bytes.is_empty() {
        return Err(RenderError::Backend("empty PDF output".to_string()));
    }
    Ok(bytes)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
