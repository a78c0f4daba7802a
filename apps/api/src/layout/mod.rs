//! Document layout engine: text metrics, line composition, pagination,
//! section rendering, and the document assembler.

pub mod compose;
pub mod cursor;
pub mod document;
pub mod font_metrics;
pub mod section;

pub use cursor::{Advance, LayoutCursor, PageGeometry};
pub use document::{assemble, DocumentBuilder, DrawOp, PageOps, DOC_TITLE};
pub use font_metrics::FontFace;
