//! Caller-facing entry point.
//!
//! The driver owns the backend seam and the tuning configuration, and
//! serializes all work per target process: interleaved scroll/click
//! sequences against the same application corrupt each other's viewport
//! assumptions, so one action runs end to end before the next starts.
//! Requests against different processes proceed independently.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::backend::{CursorGuard, UiBackend};
use crate::enrich::{self, EnrichedDiff, EnrichedElement};
use crate::errors::AutomationError;
use crate::geometry::{Frame, Point};
use crate::reveal::{self, RevealConfig};
use crate::text::ResolverConfig;
use crate::tree::{RawDiff, TraversalSnapshot};
use crate::viewport::resolve_viewport;

/// All tuning in one place; `Default` is the production calibration.
#[derive(Debug, Clone, Default)]
pub struct DriverConfig {
    pub reveal: RevealConfig,
    pub resolver: ResolverConfig,
}

/// What a pointer action ended up doing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickOutcome {
    /// Where the click was actually posted.
    pub point: Point,
    /// True when scrolling moved the click away from the requested point.
    pub scroll_adjusted: bool,
}

pub struct Driver {
    backend: Arc<dyn UiBackend>,
    config: DriverConfig,
    locks: Mutex<HashMap<u32, Arc<Mutex<()>>>>,
}

impl Driver {
    pub fn new(backend: Arc<dyn UiBackend>) -> Self {
        Self::with_config(backend, DriverConfig::default())
    }

    pub fn with_config(backend: Arc<dyn UiBackend>, config: DriverConfig) -> Self {
        Self {
            backend,
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// One guard per target process. The map only ever grows; pids are few
    /// and the guards are tiny.
    async fn process_lock(&self, pid: u32) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(pid)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Scroll-aware point adjustment. Returns the input point unchanged when
    /// it is already inside the viewport or when no viewport can be resolved.
    #[instrument(skip(self))]
    pub async fn resolve_click_point(&self, pid: u32, target: Point) -> Point {
        self.resolve_click_point_cancellable(pid, target, CancellationToken::new())
            .await
    }

    /// Same as [`Self::resolve_click_point`] with a caller-owned token.
    /// Cancellation lands at the next step boundary and yields the last
    /// known point.
    pub async fn resolve_click_point_cancellable(
        &self,
        pid: u32,
        target: Point,
        cancel: CancellationToken,
    ) -> Point {
        let lock = self.process_lock(pid).await;
        let _guard = lock.lock().await;
        reveal::resolve_click_point(
            self.backend.as_ref(),
            pid,
            target,
            &self.config.reveal,
            &self.config.resolver,
            &cancel,
        )
        .await
    }

    /// Resolve the point, then click it with the cursor saved and restored
    /// around the action.
    #[instrument(skip(self))]
    pub async fn click(&self, pid: u32, target: Point) -> Result<ClickOutcome, AutomationError> {
        let lock = self.process_lock(pid).await;
        let _guard = lock.lock().await;

        let cancel = CancellationToken::new();
        let point = reveal::resolve_click_point(
            self.backend.as_ref(),
            pid,
            target,
            &self.config.reveal,
            &self.config.resolver,
            &cancel,
        )
        .await;

        {
            let _cursor = CursorGuard::acquire(self.backend.as_ref());
            self.backend.post_click(point)?;
        }

        let outcome = ClickOutcome {
            point,
            scroll_adjusted: point != target,
        };
        info!(
            x = point.x,
            y = point.y,
            adjusted = outcome.scroll_adjusted,
            "click posted"
        );
        Ok(outcome)
    }

    /// Serialized key injection against the process.
    #[instrument(skip(self))]
    pub async fn press_key(&self, pid: u32, key: &str) -> Result<(), AutomationError> {
        let lock = self.process_lock(pid).await;
        let _guard = lock.lock().await;
        self.backend.post_key(key)
    }

    /// Capture the current tree and report it enriched: noise stripped, text
    /// recovered, viewport membership tagged.
    #[instrument(skip(self))]
    pub async fn observe(&self, pid: u32) -> Result<Vec<EnrichedElement>, AutomationError> {
        let lock = self.process_lock(pid).await;
        let _guard = lock.lock().await;

        let snapshot = self.backend.capture_traversal(pid, false).await?;
        let viewport = resolve_viewport(self.backend.as_ref(), pid, Some(&snapshot), None);
        Ok(enrich::enrich_traversal(
            &snapshot,
            viewport,
            &self.config.resolver,
        ))
    }

    /// Enrich an externally computed diff with this driver's configuration.
    pub fn enrich_diff(
        &self,
        raw: &RawDiff,
        before: &TraversalSnapshot,
        after: &TraversalSnapshot,
        viewport: Option<Frame>,
    ) -> EnrichedDiff {
        enrich::enrich_diff(raw, before, after, viewport, &self.config.resolver)
    }

    /// Enrich a full traversal with this driver's configuration.
    pub fn enrich_traversal(
        &self,
        snapshot: &TraversalSnapshot,
        viewport: Option<Frame>,
    ) -> Vec<EnrichedElement> {
        enrich::enrich_traversal(snapshot, viewport, &self.config.resolver)
    }
}
