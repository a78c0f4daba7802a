//! PDF serialization backend and response streaming.

pub mod pdf;
pub mod stream;

pub use pdf::RenderError;
