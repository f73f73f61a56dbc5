//! Visible window frame resolution, with a fallback chain.

use crate::backend::UiBackend;
use crate::geometry::{Frame, Point};
use crate::tree::TraversalSnapshot;
use tracing::debug;

/// Resolve the viewport for `pid`. First success wins:
///
/// 1. the window frame recorded in an already-captured traversal,
/// 2. when a target point is supplied, the first window of the process whose
///    frame contains it (multi-window disambiguation beats the main window),
/// 3. the main window's geometry, or failing that the first enumerated
///    window.
///
/// None means no window geometry is knowable right now; callers skip
/// scroll adjustment and use their point unmodified.
pub fn resolve_viewport(
    backend: &dyn UiBackend,
    pid: u32,
    snapshot: Option<&TraversalSnapshot>,
    point: Option<Point>,
) -> Option<Frame> {
    if let Some(frame) = snapshot.and_then(|s| s.window_frame()) {
        return Some(frame);
    }

    let candidates = match backend.all_window_frames(pid) {
        Ok(frames) => frames,
        Err(err) => {
            debug!(pid, "window enumeration failed: {err}");
            Vec::new()
        }
    };

    if let Some(point) = point {
        if let Some(frame) = candidates.iter().copied().find(|f| f.contains(point)) {
            debug!(pid, ?frame, "target point pinned to a candidate window");
            return Some(frame);
        }
    }

    match backend.window_frame(pid) {
        Ok(Some(frame)) => Some(frame),
        Ok(None) => candidates.first().copied(),
        Err(err) => {
            debug!(pid, "main window query failed: {err}");
            candidates.first().copied()
        }
    }
}
