//! Seam between the core algorithms and the platform accessibility layer.
//!
//! The surrounding system supplies tree captures, window geometry, and raw
//! input injection through [`UiBackend`]; this crate never talks to an
//! accessibility API directly.

use crate::errors::AutomationError;
use crate::geometry::{Frame, Point};
use crate::tree::TraversalSnapshot;
use tracing::warn;

/// Platform capabilities the core needs. Input posting is fire-and-forget;
/// delivery latency is absorbed by the reveal controller's settle delays.
#[async_trait::async_trait]
pub trait UiBackend: Send + Sync {
    /// Geometry of the process main window, if it has one.
    fn window_frame(&self, pid: u32) -> Result<Option<Frame>, AutomationError>;

    /// Geometry of every window belonging to the process, main window first.
    fn all_window_frames(&self, pid: u32) -> Result<Vec<Frame>, AutomationError>;

    /// Capture the element tree as a flat depth-first pre-order sequence.
    /// Implementors must keep each parent immediately ahead of its subtree;
    /// the locator and text resolver depend on that ordering and do not
    /// validate it.
    async fn capture_traversal(
        &self,
        pid: u32,
        only_visible: bool,
    ) -> Result<TraversalSnapshot, AutomationError>;

    /// Post a scroll event at `point`. Negative vertical units move the view
    /// toward content below the viewport (wheel-down).
    fn post_scroll(
        &self,
        point: Point,
        units_vertical: f64,
        units_horizontal: f64,
    ) -> Result<(), AutomationError>;

    /// Post a click at `point`.
    fn post_click(&self, point: Point) -> Result<(), AutomationError>;

    /// Post a named key press, e.g. `Escape` or `Return`.
    fn post_key(&self, key: &str) -> Result<(), AutomationError>;

    /// Current global cursor location.
    fn cursor_position(&self) -> Result<Point, AutomationError>;

    /// Warp the global cursor.
    fn set_cursor_position(&self, point: Point) -> Result<(), AutomationError>;
}

/// Scoped save/restore of the global cursor around a pointer action.
///
/// The cursor is process-wide, user-visible state; a synthetic click warps it.
/// The guard captures the position on acquisition and puts it back when
/// dropped, so every exit path restores it, error paths included. Restore
/// failures are logged and swallowed; they must never mask the action result.
pub struct CursorGuard<'a> {
    backend: &'a dyn UiBackend,
    saved: Option<Point>,
}

impl<'a> CursorGuard<'a> {
    pub fn acquire(backend: &'a dyn UiBackend) -> Self {
        let saved = match backend.cursor_position() {
            Ok(point) => Some(point),
            Err(err) => {
                warn!("could not capture cursor position: {err}");
                None
            }
        };
        Self { backend, saved }
    }

    /// The position that will be restored, if one was captured.
    pub fn saved(&self) -> Option<Point> {
        self.saved
    }
}

impl Drop for CursorGuard<'_> {
    fn drop(&mut self) {
        if let Some(point) = self.saved.take() {
            if let Err(err) = self.backend.set_cursor_position(point) {
                warn!("could not restore cursor position: {err}");
            }
        }
    }
}
