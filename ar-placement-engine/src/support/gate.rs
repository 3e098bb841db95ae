use std::sync::Arc;

use bevy_ecs::prelude::*;
use bevy_log::{info, warn};

use super::guidance::{SupportGuidance, guidance};
use super::probe::{CapabilityProbe, evaluate};
use crate::engine::xr::lifecycle::ActiveSession;
use crate::engine::xr::tasks::{XrInbox, XrMessage, XrTaskPool};
use crate::tools::placement::state::PlacementGuards;
use crate::ui::controls::ControlPanel;

#[derive(Resource, Clone)]
pub struct CapabilityProbeHandle(pub Arc<dyn CapabilityProbe>);

/// A finished capability evaluation.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SupportEvaluated {
    pub guidance: SupportGuidance,
}

/// Run the probe in the background. A probe that never answers leaves the
/// gate closed.
pub fn spawn_support_evaluation(
    pool: &XrTaskPool,
    inbox: &XrInbox,
    probe: Arc<dyn CapabilityProbe>,
) {
    let inbox = inbox.clone();
    pool.spawn(async move {
        let status = evaluate(probe.as_ref()).await;
        inbox.push(XrMessage::SupportEvaluated(guidance(status)));
    });
}

pub fn request_initial_support_check(
    probe: Option<Res<CapabilityProbeHandle>>,
    inbox: Res<XrInbox>,
    pool: NonSend<XrTaskPool>,
) {
    match probe {
        Some(probe) => spawn_support_evaluation(&pool, &inbox, probe.0.clone()),
        None => warn!("No capability probe configured; placement stays disabled"),
    }
}

pub fn apply_support_evaluation(
    mut events: EventReader<SupportEvaluated>,
    mut guards: ResMut<PlacementGuards>,
    mut controls: ResMut<ControlPanel>,
    active: Res<ActiveSession>,
) {
    let Some(event) = events.read().last() else {
        return;
    };

    guards.support_ready = event.guidance.supported;
    if event.guidance.supported {
        controls.show_supported(active.is_active());
        info!("Immersive AR available");
    } else {
        controls.show_unsupported(&event.guidance);
        warn!("Immersive AR unavailable: {}", event.guidance.message);
    }
}
