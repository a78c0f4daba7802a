//! Cursor & pagination tracker — vertical position across page boundaries.
//!
//! The cursor grows downward from the top margin. Callers check room for an
//! element of known height BEFORE emitting its draw ops; when the element
//! would cross the bottom margin the cursor resets to the top of a fresh page
//! and reports `NewPage` so the builder can start a new op list. A page break
//! is resolved synchronously — callers never observe an intermediate state.

use serde::{Deserialize, Serialize};

/// Physical page dimensions and margins, in points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl PageGeometry {
    /// US Letter (612×792 pt) with the evaluation form's margins.
    pub fn letter() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            margin_top: 50.0,
            margin_bottom: 50.0,
            margin_left: 60.0,
            margin_right: 60.0,
        }
    }

    /// Horizontal space between the left and right margins.
    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// x coordinate of the right margin.
    pub fn right_edge(&self) -> f32 {
        self.width - self.margin_right
    }

    /// Lowest y (measured from the page top) content may occupy.
    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margin_bottom
    }
}

/// Outcome of a cursor operation that may cross a page boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Still on the same page.
    Stayed,
    /// A new page was started; y has been reset to the top margin.
    NewPage,
}

/// Mutable layout cursor for a single render pass.
#[derive(Debug, Clone)]
pub struct LayoutCursor {
    pub page_index: usize,
    /// Current vertical position, measured downward from the page top.
    pub y: f32,
    geometry: PageGeometry,
}

impl LayoutCursor {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            page_index: 0,
            y: geometry.margin_top,
            geometry,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Guarantees room for an element of `height` points, breaking the page
    /// first when it would cross the bottom margin.
    pub fn ensure_room(&mut self, height: f32) -> Advance {
        if self.y + height > self.geometry.bottom_limit() {
            self.break_page();
            Advance::NewPage
        } else {
            Advance::Stayed
        }
    }

    /// Moves past content that has just been drawn. Callers must have called
    /// [`ensure_room`](Self::ensure_room) for the same height first.
    pub fn advance(&mut self, delta: f32) {
        debug_assert!(delta >= 0.0, "cursor never moves upward");
        self.y += delta;
    }

    /// Inserts vertical whitespace. Whitespace that would cross the bottom
    /// margin collapses into a page break instead of carrying over.
    pub fn move_down(&mut self, units: f32) -> Advance {
        if self.y + units > self.geometry.bottom_limit() {
            self.break_page();
            Advance::NewPage
        } else {
            self.y += units;
            Advance::Stayed
        }
    }

    fn break_page(&mut self) {
        self.page_index += 1;
        self.y = self.geometry.margin_top;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
