//! Bounded scroll-to-reveal: bring an off-viewport target point's element
//! into view by posting scroll events and re-probing the tree after each one.
//!
//! Scroll distance per unit is not constant across UI implementations, so the
//! loop never dead-reckons in pixels. It re-locates the target by text
//! identity after every step; finding the text inside the viewport is the
//! only trusted termination signal. Budgets cap every phase, and exhausting
//! them degrades to the best point known rather than failing the action.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::backend::UiBackend;
use crate::geometry::{Frame, Point};
use crate::locate::{self, DEFAULT_MAX_DEPTH};
use crate::text::{resolve_text, ResolverConfig};
use crate::tree::TraversalSnapshot;
use crate::viewport::resolve_viewport;

/// Tuning for the reveal loop. Defaults carry the calibration used in
/// production; step thresholds trade precision near the viewport for fewer
/// steps when the target is far away.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealConfig {
    /// Hard cap on scroll events in the tracking and scanning phases.
    pub max_steps: u32,
    /// Extra single-unit steps allowed while chasing a just-discovered
    /// element.
    pub max_nudge_steps: u32,
    /// Delay after each scroll while tracking a known text.
    pub track_settle: Duration,
    /// Longer delay while scanning for content that has not materialized yet.
    pub scan_settle: Duration,
    /// Distance below which one scroll unit per step is enough.
    pub near_distance: f64,
    /// Distance beyond which three units per step are used.
    pub far_distance: f64,
    /// How far inside the leading viewport edge the diagnostic probe sits.
    pub edge_probe_inset: f64,
    /// Recursion cap handed to the locator.
    pub max_depth: usize,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            max_steps: 30,
            max_nudge_steps: 8,
            track_settle: Duration::from_millis(100),
            scan_settle: Duration::from_millis(150),
            near_distance: 80.0,
            far_distance: 250.0,
            edge_probe_inset: 60.0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Which way the content has to move to reveal the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrollDirection {
    /// Reveal content below the viewport.
    Forward,
    /// Reveal content above it.
    Backward,
}

impl ScrollDirection {
    fn for_target(point: Point, viewport: Frame) -> Option<Self> {
        if point.y > viewport.bottom() {
            Some(Self::Forward)
        } else if point.y < viewport.top() {
            Some(Self::Backward)
        } else {
            None
        }
    }

    /// Negative vertical units reveal lower content (wheel-down).
    fn signed(self, units: f64) -> f64 {
        match self {
            Self::Forward => -units,
            Self::Backward => units,
        }
    }
}

/// Adjust `target` so a subsequent pointer action lands on the element the
/// caller aimed at, scrolling it into view when necessary.
///
/// A point already inside the viewport is returned unchanged and never
/// refined further; re-deriving it from the tree would risk snapping to an
/// overlapping full-span container instead of the intended element. All
/// failure modes degrade to the unmodified input point.
pub async fn resolve_click_point(
    backend: &dyn UiBackend,
    pid: u32,
    target: Point,
    config: &RevealConfig,
    resolver: &ResolverConfig,
    cancel: &CancellationToken,
) -> Point {
    let probe = match backend.capture_traversal(pid, false).await {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            debug!(pid, "pre-scroll capture failed: {err}");
            None
        }
    };

    let Some(viewport) = resolve_viewport(backend, pid, probe.as_ref(), Some(target)) else {
        debug!(pid, "no viewport resolved; using the requested point as-is");
        return target;
    };

    if viewport.contains(target) {
        return target;
    }

    let Some(direction) = ScrollDirection::for_target(target, viewport) else {
        debug!("target is outside the viewport horizontally; scrolling cannot help");
        return target;
    };

    let probe_text = probe.as_ref().and_then(|snapshot| {
        let index = locate::node_at_point(snapshot, target, config.max_depth)?;
        resolve_text(snapshot, &snapshot.nodes[index], resolver)
    });

    let mut session = ScrollSession {
        backend,
        pid,
        target,
        viewport,
        direction,
        step_units: step_magnitude(target, viewport, config),
        steps_taken: 0,
        config,
        resolver,
        cancel,
    };

    match probe_text {
        Some(text) => {
            debug!(%text, ?direction, "tracking target text through the scroll");
            session.track(&text).await.unwrap_or(target)
        }
        None => {
            debug!(?direction, "nothing resolvable at the target; scanning");
            session.scan().await
        }
    }
}

/// Scroll units per step, keyed on how far the target sits from the nearer
/// viewport edge. Coarse steps for far targets keep the step count bounded.
fn step_magnitude(target: Point, viewport: Frame, config: &RevealConfig) -> f64 {
    let distance = if target.y > viewport.bottom() {
        target.y - viewport.bottom()
    } else {
        viewport.top() - target.y
    };
    if distance < config.near_distance {
        1.0
    } else if distance < config.far_distance {
        2.0
    } else {
        3.0
    }
}

/// Transient state for one reveal attempt.
struct ScrollSession<'a> {
    backend: &'a dyn UiBackend,
    pid: u32,
    target: Point,
    viewport: Frame,
    direction: ScrollDirection,
    step_units: f64,
    steps_taken: u32,
    config: &'a RevealConfig,
    resolver: &'a ResolverConfig,
    cancel: &'a CancellationToken,
}

impl ScrollSession<'_> {
    /// Known-text strategy: scroll, settle, re-locate the text inside the
    /// inset viewport. Returns None when the budget runs out or the attempt
    /// is cancelled.
    async fn track(&mut self, text: &str) -> Option<Point> {
        while self.take_step()? {
            self.scroll(self.step_units);
            if !self.settle(self.config.track_settle).await {
                return None;
            }
            let Some(snapshot) = self.capture().await else {
                continue;
            };
            if let Some(center) = self.find_text(&snapshot, text) {
                return Some(self.stabilized(center, text).await);
            }
        }
        warn!(
            steps = self.steps_taken,
            "scroll budget exhausted before the target text came into view"
        );
        None
    }

    /// Unknown-text strategy: scroll blind and watch the target point until
    /// it yields an element with resolvable text, then hand over to text
    /// tracking (with a short nudge budget if the element is still outside
    /// the viewport). Falls back to the last place the element was seen, or
    /// the original point.
    async fn scan(&mut self) -> Point {
        loop {
            match self.take_step() {
                Some(true) => {}
                Some(false) => {
                    warn!(
                        steps = self.steps_taken,
                        "scroll budget exhausted with nothing resolvable at the target point"
                    );
                    return self.target;
                }
                None => return self.target,
            }
            self.scroll(self.step_units);
            if !self.settle(self.config.scan_settle).await {
                return self.target;
            }
            let Some(snapshot) = self.capture().await else {
                continue;
            };
            self.trace_leading_edge(&snapshot);

            let Some(index) = locate::node_at_point(&snapshot, self.target, self.config.max_depth)
            else {
                continue;
            };
            let node = snapshot.nodes[index].clone();
            let fallback = node.frame.map(|f| f.center());
            let Some(text) = resolve_text(&snapshot, &node, self.resolver) else {
                continue;
            };
            if let Some(center) = self.find_text(&snapshot, &text) {
                return self.stabilized(center, &text).await;
            }
            debug!(%text, "target resolved to text still outside the viewport; nudging");
            return self.nudge(&text, fallback).await;
        }
    }

    /// A short run of single-unit steps after scanning discovers the
    /// target's text, in case the last full step overshot or layout is still
    /// catching up. Direction is preserved.
    async fn nudge(&mut self, text: &str, discovered_at: Option<Point>) -> Point {
        let mut last_seen = discovered_at;
        for _ in 0..self.config.max_nudge_steps {
            if self.cancel.is_cancelled() {
                debug!("reveal cancelled during nudges");
                break;
            }
            self.scroll(1.0);
            if !self.settle(self.config.scan_settle).await {
                break;
            }
            let Some(snapshot) = self.capture().await else {
                continue;
            };
            if let Some(center) = self.find_text(&snapshot, text) {
                return self.stabilized(center, text).await;
            }
            // Keep following the element itself while it stays locatable.
            if let Some(index) =
                locate::node_at_point(&snapshot, self.target, self.config.max_depth)
            {
                if let Some(frame) = snapshot.nodes[index].frame {
                    last_seen = Some(frame.center());
                }
            }
        }
        if let Some(point) = last_seen {
            warn!("nudge budget exhausted; using the last place the element was seen");
            point
        } else {
            warn!("nudge budget exhausted and the element vanished; keeping the original point");
            self.target
        }
    }

    /// One more settle after a hit so in-flight layout finishes, preferring
    /// the freshest location of the element.
    async fn stabilized(&mut self, center: Point, text: &str) -> Point {
        if !self.settle(self.config.track_settle).await {
            return center;
        }
        match self.capture().await {
            Some(snapshot) => self.find_text(&snapshot, text).unwrap_or(center),
            None => center,
        }
    }

    /// Claims the next step. Some(true) to proceed, Some(false) when the
    /// budget is spent, None when cancelled. Step boundaries are the safe
    /// cancellation points; nothing external is half-done here.
    fn take_step(&mut self) -> Option<bool> {
        if self.cancel.is_cancelled() {
            debug!(steps = self.steps_taken, "reveal cancelled at step boundary");
            return None;
        }
        if self.steps_taken >= self.config.max_steps {
            return Some(false);
        }
        self.steps_taken += 1;
        Some(true)
    }

    fn scroll(&self, units: f64) {
        let at = Point::new(self.target.x, self.viewport.mid_y());
        if let Err(err) = self
            .backend
            .post_scroll(at, self.direction.signed(units), 0.0)
        {
            debug!("scroll event failed: {err}");
        }
    }

    /// Returns false when cancelled mid-delay.
    async fn settle(&self, delay: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(delay) => true,
            _ = self.cancel.cancelled() => {
                debug!("reveal cancelled during settle");
                false
            }
        }
    }

    async fn capture(&self) -> Option<TraversalSnapshot> {
        match self.backend.capture_traversal(self.pid, false).await {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                debug!("traversal capture failed mid-scroll: {err}");
                None
            }
        }
    }

    fn find_text(&self, snapshot: &TraversalSnapshot, text: &str) -> Option<Point> {
        locate::point_for_text(
            snapshot,
            text,
            self.viewport,
            self.resolver,
            self.config.max_depth,
        )
    }

    /// Probe near the edge new content enters from. Purely diagnostic; keeps
    /// the trace useful when a scan never converges.
    fn trace_leading_edge(&self, snapshot: &TraversalSnapshot) {
        let y = match self.direction {
            ScrollDirection::Forward => self.viewport.bottom() - self.config.edge_probe_inset,
            ScrollDirection::Backward => self.viewport.top() + self.config.edge_probe_inset,
        };
        let probe = Point::new(self.target.x, y);
        if let Some(index) = locate::node_at_point(snapshot, probe, self.config.max_depth) {
            let node = &snapshot.nodes[index];
            debug!(
                role = %node.role,
                text = node.text.as_deref().unwrap_or(""),
                "leading-edge probe"
            );
        }
    }
}
