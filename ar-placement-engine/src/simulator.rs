//! In-process stand-ins for the browser substrate.
//!
//! Used by the native demo binary and by tests. Every handle is a plain
//! counter so assertions can compare them directly.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bevy_math::Mat4;
use futures::channel::oneshot;

use crate::engine::render::{FrameRenderer, FrameView, MarkerStyle};
use crate::engine::xr::substrate::{
    HitTestResult, HitTestSource, Pose, ReferenceSpace, ReferenceSpaceKind, SessionInit,
    SharedSession, XrError, XrFrame, XrRuntime, XrSession,
};
use crate::persistence::{PersistError, PlacementRecord, PlacementSink};
use crate::support::{CapabilityProbe, SupportStatus};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Which requests a simulated session turns down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionBehavior {
    pub reject_viewer: bool,
    pub reject_local_floor: bool,
    pub reject_local: bool,
    pub reject_hit_test: bool,
    /// Hold hit-test source requests until [`SimulatedSession::resume_deferred`].
    pub defer_hit_test: bool,
    pub fail_end: bool,
}

#[derive(Debug, Default)]
pub struct SimulatedSession {
    behavior: SessionBehavior,
    next_id: AtomicU64,
    cancelled: Mutex<Vec<HitTestSource>>,
    deferred: Mutex<Vec<oneshot::Sender<()>>>,
    ended: AtomicBool,
    end_calls: AtomicUsize,
}

impl SimulatedSession {
    pub fn new(behavior: SessionBehavior) -> Self {
        Self {
            behavior,
            ..Default::default()
        }
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Let every held hit-test request complete.
    pub fn resume_deferred(&self) {
        for waiter in lock(&self.deferred).drain(..) {
            let _ = waiter.send(());
        }
    }

    pub fn cancelled_sources(&self) -> Vec<HitTestSource> {
        lock(&self.cancelled).clone()
    }

    pub fn is_ended(&self) -> bool {
        self.ended.load(Ordering::Relaxed)
    }

    /// Number of times `end()` was called on this session.
    pub fn end_requests(&self) -> usize {
        self.end_calls.load(Ordering::Relaxed)
    }
}

#[async_trait(?Send)]
impl XrSession for SimulatedSession {
    async fn request_reference_space(
        &self,
        kind: ReferenceSpaceKind,
    ) -> Result<ReferenceSpace, XrError> {
        let rejected = match kind {
            ReferenceSpaceKind::Viewer => self.behavior.reject_viewer,
            ReferenceSpaceKind::LocalFloor => self.behavior.reject_local_floor,
            ReferenceSpaceKind::Local => self.behavior.reject_local,
        };

        if rejected {
            return Err(XrError::ReferenceSpaceRejected {
                kind: kind.as_str(),
                reason: "not supported by this device".to_string(),
            });
        }

        Ok(ReferenceSpace {
            id: self.next_id(),
            kind,
        })
    }

    async fn request_hit_test_source(
        &self,
        _space: ReferenceSpace,
    ) -> Result<HitTestSource, XrError> {
        if self.behavior.defer_hit_test {
            let (sender, receiver) = oneshot::channel();
            lock(&self.deferred).push(sender);
            receiver
                .await
                .map_err(|_| XrError::HitTestSourceRejected("request dropped".to_string()))?;
        }

        if self.behavior.reject_hit_test {
            return Err(XrError::HitTestSourceRejected(
                "hit-test feature not granted".to_string(),
            ));
        }

        Ok(HitTestSource { id: self.next_id() })
    }

    fn cancel_hit_test_source(&self, source: HitTestSource) {
        lock(&self.cancelled).push(source);
    }

    async fn end(&self) -> Result<(), XrError> {
        self.end_calls.fetch_add(1, Ordering::Relaxed);
        if self.behavior.fail_end {
            return Err(XrError::SessionEndFailed("session is busy".to_string()));
        }
        self.ended.store(true, Ordering::Relaxed);
        Ok(())
    }
}

/// Runtime handing out [`SimulatedSession`]s.
#[derive(Debug, Default)]
pub struct SimulatedXr {
    pub behavior: SessionBehavior,
    pub reject_sessions: bool,
    sessions: Mutex<Vec<Arc<SimulatedSession>>>,
}

impl SimulatedXr {
    pub fn new(behavior: SessionBehavior) -> Self {
        Self {
            behavior,
            ..Default::default()
        }
    }

    /// Runtime that turns down every session request.
    pub fn rejecting_sessions() -> Self {
        Self {
            reject_sessions: true,
            ..Default::default()
        }
    }

    pub fn sessions(&self) -> Vec<Arc<SimulatedSession>> {
        lock(&self.sessions).clone()
    }

    pub fn last_session(&self) -> Option<Arc<SimulatedSession>> {
        lock(&self.sessions).last().cloned()
    }
}

#[async_trait(?Send)]
impl XrRuntime for SimulatedXr {
    async fn request_session(&self, init: SessionInit) -> Result<SharedSession, XrError> {
        if self.reject_sessions {
            return Err(XrError::SessionRequestFailed(format!(
                "{} not available",
                init.mode
            )));
        }

        let session = Arc::new(SimulatedSession::new(self.behavior));
        lock(&self.sessions).push(session.clone());
        Ok(session)
    }
}

/// Frame whose hit-test results resolve to fixed transforms, in the given order.
#[derive(Debug, Clone, Default)]
pub struct SimulatedFrame {
    hits: Vec<Mat4>,
}

impl SimulatedFrame {
    pub fn with_hits(hits: Vec<Mat4>) -> Self {
        Self { hits }
    }

    pub fn hit(transform: Mat4) -> Self {
        Self::with_hits(vec![transform])
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn boxed(self) -> Option<Box<dyn XrFrame>> {
        Some(Box::new(self))
    }
}

impl XrFrame for SimulatedFrame {
    fn hit_test_results(&self, _source: HitTestSource) -> Vec<HitTestResult> {
        (0..self.hits.len() as u64)
            .map(|id| HitTestResult { id })
            .collect()
    }

    fn resolve_pose(&self, result: HitTestResult, _space: ReferenceSpace) -> Option<Pose> {
        self.hits.get(result.id as usize).copied().map(Pose::new)
    }
}

/// Probe with fixed answers.
#[derive(Debug, Default)]
pub struct StaticProbe {
    status: SupportStatus,
    fail_query: bool,
    queries: AtomicUsize,
}

impl StaticProbe {
    pub fn new(status: SupportStatus) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn supported() -> Self {
        Self::new(SupportStatus {
            secure_context: true,
            has_xr: true,
            immersive_ar_supported: true,
        })
    }

    /// Secure context with an XR API whose immersive query errors.
    pub fn failing_query() -> Self {
        Self {
            fail_query: true,
            ..Self::supported()
        }
    }

    pub fn immersive_queries(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

#[async_trait(?Send)]
impl CapabilityProbe for StaticProbe {
    fn is_secure_context(&self) -> bool {
        self.status.secure_context
    }

    fn has_xr(&self) -> bool {
        self.status.has_xr
    }

    async fn is_immersive_ar_supported(&self) -> Result<bool, XrError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        if self.fail_query {
            return Err(XrError::ProbeFailed("isSessionSupported threw".to_string()));
        }
        Ok(self.status.immersive_ar_supported)
    }
}

/// Keeps every frame it is asked to draw.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    style: Arc<Mutex<Option<MarkerStyle>>>,
    frames: Arc<Mutex<Vec<FrameView>>>,
}

impl RecordingRenderer {
    pub fn style(&self) -> Option<MarkerStyle> {
        *lock(&self.style)
    }

    pub fn frames(&self) -> Vec<FrameView> {
        lock(&self.frames).clone()
    }

    pub fn last(&self) -> Option<FrameView> {
        lock(&self.frames).last().cloned()
    }
}

impl FrameRenderer for RecordingRenderer {
    fn configure(&mut self, style: &MarkerStyle) {
        *lock(&self.style) = Some(*style);
    }

    fn render(&mut self, view: &FrameView) {
        lock(&self.frames).push(view.clone());
    }
}

/// Keeps every submitted record.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<PlacementRecord>>>,
}

impl RecordingSink {
    pub fn records(&self) -> Vec<PlacementRecord> {
        lock(&self.records).clone()
    }
}

impl PlacementSink for RecordingSink {
    fn submit(&self, record: PlacementRecord) -> Result<(), PersistError> {
        lock(&self.records).push(record);
        Ok(())
    }
}

/// Refuses every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingSink;

impl PlacementSink for FailingSink {
    fn submit(&self, _record: PlacementRecord) -> Result<(), PersistError> {
        Err(PersistError::Dispatch("sink offline".to_string()))
    }
}
