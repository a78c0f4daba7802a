//! Document builder and assembler — linearizes the evaluation into draw ops.
//!
//! The builder owns the layout cursor and an append-only op list per page.
//! Every element checks room before emitting (the cursor never observes a
//! half-drawn element across a page boundary), and a page break flushes the
//! current op list and starts a new one. The assembler fixes the document
//! order: centered title, metadata block, the four sections, summary.
//!
//! Ops carry absolute positions in top-down page coordinates; the PDF backend
//! flips y and maps faces to builtin fonts.

use crate::layout::compose::{compose_label, score_token};
use crate::layout::cursor::{Advance, LayoutCursor, PageGeometry};
use crate::layout::font_metrics::{text_width, FontFace};
use crate::layout::section::{render_section, render_summary, SECTIONS};
use crate::models::evaluation::EvaluationRecord;

/// Document title drawn on page one and embedded in the PDF metadata.
pub const DOC_TITLE: &str = "Evaluación de Pase de Visita - R2 Cuidados Intensivos";

pub const TITLE_SIZE: f32 = 16.0;
pub const META_SIZE: f32 = 11.0;
pub const SECTION_TITLE_SIZE: f32 = 13.0;
pub const BODY_SIZE: f32 = 9.0;

/// Fixed gap between a criteria label and its right-aligned score token.
pub const SCORE_GAP: f32 = 5.0;
/// Left indent of comment text under its label.
pub const COMMENT_INDENT: f32 = 15.0;
/// Vertical distance between a section title's baseline box and its rule.
pub const RULE_OFFSET: f32 = 2.0;
pub const RULE_THICKNESS: f32 = 0.5;

/// Line box height for a font size.
pub fn line_height(size_pt: f32) -> f32 {
    size_pt * 1.15
}

// ────────────────────────────────────────────────────────────────────────────
// Draw ops
// ────────────────────────────────────────────────────────────────────────────

/// One drawing command, positioned in top-down page coordinates (points).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Text at `(x, y)` where `y` is the top of the line box.
    Text {
        text: String,
        face: FontFace,
        size: f32,
        x: f32,
        y: f32,
    },
    /// Thin horizontal rule at `y`.
    Rule { x1: f32, x2: f32, y: f32 },
}

/// Ordered draw ops for one physical page.
#[derive(Debug, Clone, Default)]
pub struct PageOps {
    pub ops: Vec<DrawOp>,
}

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

/// Forward-only op emitter over a [`LayoutCursor`].
pub struct DocumentBuilder {
    cursor: LayoutCursor,
    pages: Vec<PageOps>,
    current: Vec<DrawOp>,
}

impl DocumentBuilder {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            cursor: LayoutCursor::new(geometry),
            pages: Vec::new(),
            current: Vec::new(),
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        self.cursor.geometry()
    }

    /// Reserves room for a block of known height, breaking the page first if
    /// needed. Elements that must not be split (title + rule, comment label +
    /// first line) reserve their combined height up front.
    pub fn ensure_block(&mut self, height: f32) {
        let advance = self.cursor.ensure_room(height);
        self.sync(advance);
    }

    pub fn move_down(&mut self, points: f32) {
        let advance = self.cursor.move_down(points);
        self.sync(advance);
    }

    /// Left-aligned text line at the left margin.
    pub fn line(&mut self, text: &str, face: FontFace, size: f32) {
        self.line_at(text, face, size, 0.0);
    }

    /// Left-aligned text line, indented from the left margin.
    pub fn line_at(&mut self, text: &str, face: FontFace, size: f32, indent: f32) {
        let advance = self.cursor.ensure_room(line_height(size));
        self.sync(advance);
        let x = self.geometry().margin_left + indent;
        let y = self.cursor.y;
        self.push_text(text, face, size, x, y);
        self.cursor.advance(line_height(size));
    }

    /// Horizontally centered text line.
    pub fn line_centered(&mut self, text: &str, face: FontFace, size: f32) {
        let advance = self.cursor.ensure_room(line_height(size));
        self.sync(advance);
        let geometry = *self.geometry();
        let width = text_width(text, face, size);
        let x = geometry.margin_left + ((geometry.content_width() - width) / 2.0).max(0.0);
        let y = self.cursor.y;
        self.push_text(text, face, size, x, y);
        self.cursor.advance(line_height(size));
    }

    /// One criteria line: composed label left-aligned, score token
    /// right-aligned on the same baseline.
    pub fn scored_line(&mut self, label: &str, score: Option<&str>) {
        let advance = self.cursor.ensure_room(line_height(BODY_SIZE));
        self.sync(advance);
        let geometry = *self.geometry();

        let token = score_token(score);
        // Token width is measured, never assumed: bracket and digit widths
        // differ per face.
        let token_width = text_width(&token, FontFace::Helvetica, BODY_SIZE);
        let budget = geometry.content_width() - token_width - SCORE_GAP;
        let composed = compose_label(label, budget, FontFace::Helvetica, BODY_SIZE);

        let y = self.cursor.y;
        self.push_text(&composed.text, FontFace::Helvetica, BODY_SIZE, geometry.margin_left, y);
        self.push_text(
            &token,
            FontFace::Helvetica,
            BODY_SIZE,
            geometry.right_edge() - token_width,
            y,
        );
        self.cursor.advance(line_height(BODY_SIZE));
    }

    /// Thin rule from the left margin to the right margin, just below the
    /// current position. Callers reserve its height via [`ensure_block`].
    pub fn rule(&mut self) {
        let geometry = *self.geometry();
        let y = self.cursor.y + RULE_OFFSET;
        self.current.push(DrawOp::Rule {
            x1: geometry.margin_left,
            x2: geometry.right_edge(),
            y,
        });
        self.cursor.advance(RULE_OFFSET + RULE_THICKNESS);
    }

    /// Closes the document, flushing the final page even when partially
    /// filled.
    pub fn finish(mut self) -> Vec<PageOps> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(PageOps {
                ops: std::mem::take(&mut self.current),
            });
        }
        self.pages
    }

    fn push_text(&mut self, text: &str, face: FontFace, size: f32, x: f32, y: f32) {
        if text.is_empty() {
            return;
        }
        debug_assert!(x >= self.geometry().margin_left - 1e-3);
        debug_assert!(y >= 0.0);
        self.current.push(DrawOp::Text {
            text: text.to_string(),
            face,
            size,
            x,
            y,
        });
    }

    fn sync(&mut self, advance: Advance) {
        if advance == Advance::NewPage {
            self.pages.push(PageOps {
                ops: std::mem::take(&mut self.current),
            });
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Assembler
// ────────────────────────────────────────────────────────────────────────────

/// Lays out the full document: header, the four sections in declaration
/// order, then the summary block. The record is already validated; layout
/// itself cannot fail, it only degrades per-section.
pub fn assemble(record: &EvaluationRecord, geometry: PageGeometry) -> Vec<PageOps> {
    let mut builder = DocumentBuilder::new(geometry);

    builder.line_centered(DOC_TITLE, FontFace::HelveticaBold, TITLE_SIZE);
    builder.move_down(1.5 * line_height(META_SIZE));
    builder.line(
        &format!("Residente: {}", record.resident_name),
        FontFace::HelveticaBold,
        META_SIZE,
    );
    builder.line(
        &format!("Evaluador: {}", record.evaluator_name),
        FontFace::HelveticaBold,
        META_SIZE,
    );

    for spec in &SECTIONS {
        render_section(&mut builder, spec, record);
    }
    render_summary(&mut builder, record);

    builder.finish()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        scores: &[(&str, Option<&str>)],
        comments: &[(&str, &str)],
    ) -> EvaluationRecord {
        EvaluationRecord {
            evaluator_name: "Dra. García".to_string(),
            resident_name: "Dr. López".to_string(),
            scores: scores
                .iter()
                .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
                .collect(),
            comments: comments
                .iter()
                .map(|(k, v)| (k.to_string(), Some(v.to_string())))
                .collect(),
            recommendation: None,
            average_score: None,
        }
    }

    fn all_texts(pages: &[PageOps]) -> Vec<String> {
        pages
            .iter()
            .flat_map(|p| p.ops.iter())
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.clone()),
                DrawOp::Rule { .. } => None,
            })
            .collect()
    }

    fn position_of(texts: &[String], needle: &str) -> usize {
        texts
            .iter()
            .position(|t| t == needle)
            .unwrap_or_else(|| panic!("{needle:?} not found in rendered text"))
    }

    #[test]
    fn test_section_order_is_fixed_regardless_of_score_keys() {
        // Keys deliberately listed out of order; BTreeMap canonicalizes.
        let pages = assemble(
            &record(
                &[
                    ("crit_4_1", Some("2")),
                    ("crit_1_1", Some("3")),
                    ("crit_3_2", Some("4")),
                    ("crit_2_2", Some("5")),
                ],
                &[],
            ),
            PageGeometry::letter(),
        );
        let texts = all_texts(&pages);
        let order = [
            "1. Manejo Clínico y Toma de Decisiones",
            "2. Comunicación",
            "3. Liderazgo y Organización",
            "4. Profesionalismo",
            "Evaluación General",
        ]
        .map(|title| position_of(&texts, title));
        assert!(
            order.windows(2).all(|w| w[0] < w[1]),
            "sections out of order: {order:?}"
        );
    }

    #[test]
    fn test_header_present() {
        let pages = assemble(&record(&[], &[]), PageGeometry::letter());
        let texts = all_texts(&pages);
        assert!(texts.contains(&DOC_TITLE.to_string()));
        assert!(texts.contains(&"Residente: Dr. López".to_string()));
        assert!(texts.contains(&"Evaluador: Dra. García".to_string()));
    }

    #[test]
    fn test_each_matching_criterion_rendered_exactly_once() {
        let pages = assemble(
            &record(&[("crit_1_1", Some("3")), ("crit_1_2", None)], &[]),
            PageGeometry::letter(),
        );
        let texts = all_texts(&pages);
        let count = texts
            .iter()
            .filter(|t| t.as_str() == "Evaluación inicial y priorización de problemas")
            .count();
        assert_eq!(count, 1);
        assert_eq!(
            texts
                .iter()
                .filter(|t| *t == "Razonamiento diagnóstico e interpretación de exámenes")
                .count(),
            1
        );
    }

    #[test]
    fn test_unmatched_prefix_keys_dropped_silently() {
        let pages = assemble(
            &record(&[("crit_9_1", Some("5")), ("otro", Some("1"))], &[]),
            PageGeometry::letter(),
        );
        let texts = all_texts(&pages);
        assert!(!texts.iter().any(|t| t.contains("crit_9_1")));
        assert!(!texts.iter().any(|t| t == "otro" || t.contains("[ 5 ]")));
    }

    #[test]
    fn test_unknown_key_with_known_prefix_shows_raw_key() {
        let pages = assemble(
            &record(&[("crit_1_9", Some("4"))], &[]),
            PageGeometry::letter(),
        );
        let texts = all_texts(&pages);
        assert!(texts.contains(&"crit_1_9".to_string()));
    }

    #[test]
    fn test_spec_worked_example() {
        // scores = {crit_1_1: "3"}, comments = {comments_1: "ok"}
        let pages = assemble(
            &record(&[("crit_1_1", Some("3"))], &[("comments_1", "ok")]),
            PageGeometry::letter(),
        );
        let texts = all_texts(&pages);

        let s1 = position_of(&texts, "1. Manejo Clínico y Toma de Decisiones");
        let label = position_of(&texts, "Evaluación inicial y priorización de problemas");
        let token = position_of(&texts, "[ 3 ]");
        let comment = position_of(&texts, "ok");
        let s2 = position_of(&texts, "2. Comunicación");
        assert!(s1 < label && label < token && token < comment && comment < s2);

        // Sections 2–4 have no criteria lines, only placeholder comments.
        assert_eq!(
            texts.iter().filter(|t| t.starts_with("[ ")).count(),
            1,
            "only section 1 has a score token"
        );
        assert_eq!(
            texts
                .iter()
                .filter(|t| t.as_str() == "(Sin comentarios)")
                .count(),
            4,
            "sections 2-4 and the summary fall back to the placeholder"
        );
    }

    #[test]
    fn test_summary_fallbacks() {
        let pages = assemble(&record(&[], &[]), PageGeometry::letter());
        let texts = all_texts(&pages);
        assert!(texts.contains(&"Recomendación Final: N/A".to_string()));
        assert!(texts.contains(&"Puntaje Promedio: --".to_string()));
    }

    #[test]
    fn test_summary_uses_provided_values() {
        let mut rec = record(&[], &[("comments_general", "síntesis")]);
        rec.recommendation = Some("Aprobado".to_string());
        rec.average_score = Some("3.5".to_string());
        let pages = assemble(&rec, PageGeometry::letter());
        let texts = all_texts(&pages);
        assert!(texts.contains(&"Recomendación Final: Aprobado".to_string()));
        assert!(texts.contains(&"Puntaje Promedio: 3.5".to_string()));
        assert!(texts.contains(&"síntesis".to_string()));
    }

    #[test]
    fn test_long_comments_paginate() {
        let long = "palabra ".repeat(900);
        let pages = assemble(
            &record(
                &[("crit_1_1", Some("3"))],
                &[
                    ("comments_1", long.as_str()),
                    ("comments_2", long.as_str()),
                    ("comments_3", long.as_str()),
                ],
            ),
            PageGeometry::letter(),
        );
        assert!(pages.len() > 1, "expected a page break, got 1 page");
        for page in &pages {
            assert!(!page.ops.is_empty(), "no page should be emitted empty");
        }
    }

    #[test]
    fn test_all_ops_stay_inside_margins() {
        let long = "texto de comentario razonablemente largo ".repeat(60);
        let geometry = PageGeometry::letter();
        let pages = assemble(
            &record(
                &[("crit_1_1", Some("3")), ("crit_2_1", None)],
                &[("comments_1", long.as_str()), ("comments_4", long.as_str())],
            ),
            geometry,
        );
        for page in &pages {
            for op in &page.ops {
                match op {
                    DrawOp::Text { x, y, size, .. } => {
                        assert!(*x >= geometry.margin_left - 1e-3);
                        assert!(*y >= geometry.margin_top - 1e-3);
                        assert!(
                            y + line_height(*size) <= geometry.bottom_limit() + 1e-3,
                            "text line crosses the bottom margin (y = {y})"
                        );
                    }
                    DrawOp::Rule { x1, x2, y } => {
                        assert!(*x1 >= geometry.margin_left - 1e-3);
                        assert!(*x2 <= geometry.right_edge() + 1e-3);
                        assert!(*y <= geometry.bottom_limit() + 1e-3);
                    }
                }
            }
        }
    }

    #[test]
    fn test_score_token_right_aligned_within_margin() {
        let geometry = PageGeometry::letter();
        let pages = assemble(
            &record(&[("crit_1_4", Some("10"))], &[]),
            geometry,
        );
        let token = pages
            .iter()
            .flat_map(|p| p.ops.iter())
            .find_map(|op| match op {
                DrawOp::Text { text, x, face, size, .. } if text.starts_with("[ ") => {
                    Some((text.clone(), *x, *face, *size))
                }
                _ => None,
            })
            .expect("score token rendered");
        let (text, x, face, size) = token;
        let width = crate::layout::font_metrics::text_width(&text, face, size);
        assert!(
            (x + width - geometry.right_edge()).abs() < 1e-2,
            "token should end at the right margin"
        );
    }
}
