use std::sync::Arc;

use bevy_ecs::prelude::*;
use bevy_log::{debug, error, info};

use super::substrate::{
    HitTestSource, ReferenceSpace, ReferenceSpaceKind, SharedSession, XrError, XrSession,
};
use super::tasks::{XrInbox, XrMessage, XrTaskPool};

/// Handles acquired for one immersive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquiredHitTest {
    pub source: HitTestSource,
    pub local_space: ReferenceSpace,
    pub viewer_space: ReferenceSpace,
}

/// Hit-test capability of the active session.
///
/// All three handles are either present together or absent together; the
/// frame loop treats any absent handle as "no pose".
#[derive(Resource, Default)]
pub struct HitTestResources {
    source: Option<HitTestSource>,
    local_space: Option<ReferenceSpace>,
    viewer_space: Option<ReferenceSpace>,
    owner: Option<SharedSession>,
}

impl HitTestResources {
    pub fn source(&self) -> Option<HitTestSource> {
        self.source
    }

    pub fn local_space(&self) -> Option<ReferenceSpace> {
        self.local_space
    }

    pub fn viewer_space(&self) -> Option<ReferenceSpace> {
        self.viewer_space
    }

    pub fn is_held(&self) -> bool {
        self.source.is_some() || self.local_space.is_some() || self.viewer_space.is_some()
    }

    /// Source and local space, when both are available for sampling.
    pub fn sampling_handles(&self) -> Option<(HitTestSource, ReferenceSpace)> {
        Some((self.source?, self.local_space?))
    }

    /// Install handles acquired for `session` if it is still the active one.
    ///
    /// Late results for a session that already ended are cancelled instead.
    pub fn accept(
        &mut self,
        active: Option<&SharedSession>,
        session: SharedSession,
        acquired: AcquiredHitTest,
    ) -> bool {
        let current = active.is_some_and(|active| Arc::ptr_eq(active, &session));
        if !current {
            debug!("Discarding hit-test source acquired for an inactive session");
            session.cancel_hit_test_source(acquired.source);
            return false;
        }

        self.release();
        self.source = Some(acquired.source);
        self.local_space = Some(acquired.local_space);
        self.viewer_space = Some(acquired.viewer_space);
        self.owner = Some(session);
        info!(
            "Hit-test source ready (local space: {})",
            acquired.local_space.kind.as_str()
        );
        true
    }

    /// Cancel the source if present and forget every handle. Safe to repeat.
    pub fn release(&mut self) {
        if let Some(source) = self.source.take() {
            if let Some(owner) = self.owner.as_ref() {
                owner.cancel_hit_test_source(source);
            }
        }
        self.source = None;
        self.local_space = None;
        self.viewer_space = None;
        self.owner = None;
    }
}

/// Request viewer space, floor space (falling back to local), then a viewer-anchored source.
pub async fn acquire(session: &dyn XrSession) -> Result<AcquiredHitTest, XrError> {
    let viewer_space = session
        .request_reference_space(ReferenceSpaceKind::Viewer)
        .await?;

    let local_space = match session
        .request_reference_space(ReferenceSpaceKind::LocalFloor)
        .await
    {
        Ok(space) => space,
        Err(e) => {
            debug!("{}; falling back to local space", e);
            session
                .request_reference_space(ReferenceSpaceKind::Local)
                .await?
        }
    };

    let source = session.request_hit_test_source(viewer_space).await?;

    Ok(AcquiredHitTest {
        source,
        local_space,
        viewer_space,
    })
}

/// Start acquisition in the background; failures are logged and leave the session without a reticle.
pub fn spawn_acquisition(pool: &XrTaskPool, inbox: &XrInbox, session: SharedSession) {
    let inbox = inbox.clone();
    pool.spawn(async move {
        let outcome = acquire(session.as_ref()).await;
        match outcome {
            Ok(acquired) => inbox.push(XrMessage::HitTestAcquired { session, acquired }),
            Err(e) => error!("Failed to set up hit-test source: {}", e),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::{SessionBehavior, SimulatedSession};
    use futures::executor::block_on;

    fn session(behavior: SessionBehavior) -> Arc<SimulatedSession> {
        Arc::new(SimulatedSession::new(behavior))
    }

    #[test]
    fn acquire_prefers_floor_space() {
        let sim = session(SessionBehavior::default());
        let acquired = block_on(acquire(sim.as_ref())).unwrap();

        assert_eq!(acquired.viewer_space.kind, ReferenceSpaceKind::Viewer);
        assert_eq!(acquired.local_space.kind, ReferenceSpaceKind::LocalFloor);
    }

    #[test]
    fn acquire_falls_back_to_local_space() {
        let sim = session(SessionBehavior {
            reject_local_floor: true,
            ..Default::default()
        });
        let acquired = block_on(acquire(sim.as_ref())).unwrap();

        assert_eq!(acquired.local_space.kind, ReferenceSpaceKind::Local);
    }

    #[test]
    fn acquire_fails_when_viewer_space_rejected() {
        let sim = session(SessionBehavior {
            reject_viewer: true,
            ..Default::default()
        });
        let err = block_on(acquire(sim.as_ref())).unwrap_err();

        assert!(matches!(err, XrError::ReferenceSpaceRejected { kind: "viewer", .. }));
    }

    #[test]
    fn acquire_fails_when_both_local_spaces_rejected() {
        let sim = session(SessionBehavior {
            reject_local_floor: true,
            reject_local: true,
            ..Default::default()
        });

        assert!(block_on(acquire(sim.as_ref())).is_err());
    }

    #[test]
    fn release_is_idempotent_and_cancels_once() {
        let sim = session(SessionBehavior::default());
        let shared: SharedSession = sim.clone();
        let acquired = block_on(acquire(sim.as_ref())).unwrap();

        let mut resources = HitTestResources::default();
        assert!(resources.accept(Some(&shared), shared.clone(), acquired));
        assert!(resources.is_held());
        assert_eq!(
            resources.sampling_handles(),
            Some((acquired.source, acquired.local_space))
        );

        resources.release();
        resources.release();

        assert!(!resources.is_held());
        assert!(resources.source().is_none());
        assert!(resources.local_space().is_none());
        assert!(resources.viewer_space().is_none());
        assert_eq!(sim.cancelled_sources(), vec![acquired.source]);
    }

    #[test]
    fn accept_rejects_results_for_inactive_session() {
        let sim = session(SessionBehavior::default());
        let shared: SharedSession = sim.clone();
        let acquired = block_on(acquire(sim.as_ref())).unwrap();

        let mut resources = HitTestResources::default();
        assert!(!resources.accept(None, shared, acquired));

        assert!(!resources.is_held());
        assert_eq!(sim.cancelled_sources(), vec![acquired.source]);
    }

    #[test]
    fn accept_rejects_results_for_a_replaced_session() {
        let old = session(SessionBehavior::default());
        let new: SharedSession = session(SessionBehavior::default());
        let acquired = block_on(acquire(old.as_ref())).unwrap();

        let mut resources = HitTestResources::default();
        assert!(!resources.accept(Some(&new), old.clone(), acquired));
        assert!(!resources.is_held());
    }
}
