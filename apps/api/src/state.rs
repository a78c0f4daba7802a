use crate::config::Config;
use crate::layout::PageGeometry;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Every render is stateless; the only cross-request data are the constant
/// label/section tables and this read-only geometry.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Page geometry used for every render: US Letter with the form's margins.
    pub geometry: PageGeometry,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            geometry: PageGeometry::letter(),
        }
    }
}
