//! Section renderer — one titled block of criteria lines plus a comment.
//!
//! The four section specs and the criterionId → label table are process-wide
//! constants. A section degrades gracefully: no matching scores means an
//! empty criteria list, a missing comment gets the placeholder — a partial
//! record never fails the render.

use crate::layout::compose::wrap_text;
use crate::layout::document::{
    line_height, DocumentBuilder, BODY_SIZE, COMMENT_INDENT, META_SIZE, RULE_OFFSET,
    RULE_THICKNESS, SECTION_TITLE_SIZE,
};
use crate::layout::font_metrics::FontFace;
use crate::models::evaluation::EvaluationRecord;

/// Placeholder for an absent or blank comment.
pub const NO_COMMENTS: &str = "(Sin comentarios)";

/// Comment key of the final summary block.
pub const GENERAL_COMMENT_KEY: &str = "comments_general";

/// One logical document section: title, criteria key prefix, comment key.
#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    pub title: &'static str,
    pub criteria_prefix: &'static str,
    pub comment_key: &'static str,
}

/// The fixed document structure, in render order.
pub const SECTIONS: [SectionSpec; 4] = [
    SectionSpec {
        title: "1. Manejo Clínico y Toma de Decisiones",
        criteria_prefix: "crit_1_",
        comment_key: "comments_1",
    },
    SectionSpec {
        title: "2. Comunicación",
        criteria_prefix: "crit_2_",
        comment_key: "comments_2",
    },
    SectionSpec {
        title: "3. Liderazgo y Organización",
        criteria_prefix: "crit_3_",
        comment_key: "comments_3",
    },
    SectionSpec {
        title: "4. Profesionalismo",
        criteria_prefix: "crit_4_",
        comment_key: "comments_4",
    },
];

/// criterionId → human-readable label. Keys outside this table render as the
/// raw key.
static CRITERION_LABELS: &[(&str, &str)] = &[
    ("crit_1_1", "Evaluación inicial y priorización de problemas"),
    ("crit_1_2", "Razonamiento diagnóstico e interpretación de exámenes"),
    ("crit_1_3", "Plan terapéutico integral (farma/no-farma, objetivos)"),
    ("crit_1_4", "Manejo de soporte orgánico (VM, vasoactivos, etc.)"),
    ("crit_2_1", "Presentación del caso (claridad, concisión, síntesis)"),
    ("crit_2_2", "Comunicación con paciente/familia (plan, empatía)"),
    ("crit_2_3", "Interacción con equipo (claridad, respeto, colaboración)"),
    ("crit_3_1", "Dirección del pase de visita"),
    ("crit_3_2", "Gestión del tiempo y enfoque"),
    ("crit_3_3", "Involucramiento del equipo (enfermería, etc.)"),
    ("crit_4_1", "Actitud y conducta profesional (respeto, responsabilidad)"),
    ("crit_4_2", "Respuesta a preguntas (reflexiva, honesta, no defensiva)"),
    ("crit_4_3", "Reconocimiento de limitaciones y búsqueda de ayuda"),
];

/// Looks up the display label for a criterion key.
pub fn criterion_label(key: &str) -> Option<&'static str> {
    CRITERION_LABELS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
}

/// Renders one section: title + rule, matching criteria lines in canonical
/// key order, then the comment block.
pub fn render_section(builder: &mut DocumentBuilder, spec: &SectionSpec, record: &EvaluationRecord) {
    builder.move_down(1.5 * line_height(SECTION_TITLE_SIZE));
    section_title(builder, spec.title);

    for (key, score) in record.scores_for(spec.criteria_prefix) {
        let label = criterion_label(key).unwrap_or(key);
        builder.scored_line(label, score);
    }

    comment_block(builder, "Comentarios:", record.comment(spec.comment_key));
}

/// Renders the closing summary: general comments, recommendation, average.
pub fn render_summary(builder: &mut DocumentBuilder, record: &EvaluationRecord) {
    builder.move_down(1.5 * line_height(SECTION_TITLE_SIZE));
    section_title(builder, "Evaluación General");
    comment_block(
        builder,
        "Comentarios Generales / Síntesis:",
        record.comment(GENERAL_COMMENT_KEY),
    );

    builder.move_down(line_height(META_SIZE));
    builder.line(
        &format!(
            "Recomendación Final: {}",
            record.recommendation().unwrap_or("N/A")
        ),
        FontFace::HelveticaBold,
        META_SIZE,
    );
    builder.line(
        &format!("Puntaje Promedio: {}", record.average_score().unwrap_or("--")),
        FontFace::HelveticaBold,
        META_SIZE,
    );
}

/// Bold title with a thin rule to the right margin. Title and rule are
/// reserved together so a page break can never separate them.
fn section_title(builder: &mut DocumentBuilder, title: &str) {
    builder.ensure_block(
        line_height(SECTION_TITLE_SIZE) + RULE_OFFSET + RULE_THICKNESS
            + 0.5 * line_height(SECTION_TITLE_SIZE),
    );
    builder.line(title, FontFace::HelveticaBold, SECTION_TITLE_SIZE);
    builder.rule();
    builder.move_down(0.5 * line_height(SECTION_TITLE_SIZE));
}

/// Oblique label line followed by the indented, word-wrapped comment text.
fn comment_block(builder: &mut DocumentBuilder, label: &str, text: Option<&str>) {
    builder.move_down(0.5 * line_height(BODY_SIZE));
    // Keep the label attached to at least the first text line.
    builder.ensure_block(2.0 * line_height(BODY_SIZE));
    builder.line(label, FontFace::HelveticaOblique, BODY_SIZE);

    let text = text.unwrap_or(NO_COMMENTS);
    let max_width = builder.geometry().content_width() - COMMENT_INDENT;
    for line in wrap_text(text, max_width, FontFace::Helvetica, BODY_SIZE) {
        builder.line_at(&line, FontFace::Helvetica, BODY_SIZE, COMMENT_INDENT);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
