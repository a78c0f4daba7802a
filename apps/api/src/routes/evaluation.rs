//! Axum route handler for PDF generation.

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::layout::assemble;
use crate::models::evaluation::{EvaluationRecord, EvaluationRequest};
use crate::render::stream::pdf_body;
use crate::state::AppState;

/// POST /generate-pdf
///
/// Validates the record, lays out the document, and streams the PDF back as
/// an attachment. Validation failures return a structured 400 before any
/// body byte is produced.
pub async fn handle_generate_pdf(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Response, AppError> {
    let record = request.into_record().map_err(AppError::Validation)?;

    info!(
        resident = %record.resident_name,
        evaluator = %record.evaluator_name,
        "generating evaluation PDF"
    );

    let pages = assemble(&record, state.geometry);
    let filename = suggested_filename(&record);
    let body: Body = pdf_body(pages, state.geometry);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(body)
        .map_err(|e| AppError::Internal(e.into()))
}

/// Download filename: `Evaluacion_<resident>_<evaluator>.pdf`.
///
/// Each name keeps only `[A-Za-z0-9_]`; everything else becomes `_`. Any
/// remaining double quote is stripped before the value is embedded in the
/// Content-Disposition header.
pub fn suggested_filename(record: &EvaluationRecord) -> String {
    let resident = sanitize_name(&record.resident_name, "Residente");
    let evaluator = sanitize_name(&record.evaluator_name, "Evaluador");
    format!("Evaluacion_{resident}_{evaluator}.pdf").replace('"', "")
}

fn sanitize_name(name: &str, fallback: &str) -> String {
    let base = if name.is_empty() { fallback } else { name };
    base.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
