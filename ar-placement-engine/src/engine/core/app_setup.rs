use std::sync::Arc;

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;

use crate::engine::render::{
    FrameRenderer, MarkerStyle, RendererHandle, configure_renderer, render_frame,
};
use crate::engine::scene::placed_objects::PlacedObjects;
use crate::engine::scene::reticle::Reticle;
use crate::engine::xr::frame_loop::{CurrentXrFrame, FrameSampled, XrFrameSet, sample_hit_test};
use crate::engine::xr::hit_test::HitTestResources;
use crate::engine::xr::lifecycle::{
    ActiveSession, PageVisibility, SessionToggleRequested, SessionTransition, XrRuntimeHandle,
    drain_xr_inbox, handle_page_visibility, handle_session_toggle, handle_session_transitions,
};
use crate::engine::xr::substrate::XrRuntime;
use crate::engine::xr::tasks::{XrInbox, XrTaskPool, drive_xr_tasks};
use crate::persistence::{PlacementSink, PlacementSinkHandle};
use crate::support::CapabilityProbe;
use crate::support::gate::{
    CapabilityProbeHandle, SupportEvaluated, apply_support_evaluation,
    request_initial_support_check,
};
use crate::tools::placement::requests::{commit_placement, handle_place_requests, track_hit_pose};
use crate::tools::placement::{PendingPlacement, PlaceRequest, PlacementGuards};
use crate::ui::controls::{ControlPanel, UiAction, route_ui_actions};

/// Substrate implementations the pipeline runs against.
pub struct PlacementBackends {
    /// `None` when the host exposes no immersive runtime binding.
    pub runtime: Option<Arc<dyn XrRuntime>>,
    pub probe: Arc<dyn CapabilityProbe>,
    pub sink: Arc<dyn PlacementSink>,
    pub renderer: Box<dyn FrameRenderer>,
}

/// Surface detection and placement pipeline.
///
/// Backends are optional at the plugin level; a missing probe keeps the
/// pipeline locked and a missing sink only skips persistence.
pub struct ArPlacementPlugin;

impl Plugin for ArPlacementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<XrInbox>()
            .insert_non_send_resource(XrTaskPool::default())
            .init_resource::<ActiveSession>()
            .init_resource::<HitTestResources>()
            .init_resource::<CurrentXrFrame>()
            .init_resource::<Reticle>()
            .init_resource::<PlacementGuards>()
            .init_resource::<PendingPlacement>()
            .init_resource::<PlacedObjects>()
            .init_resource::<ControlPanel>()
            .init_resource::<MarkerStyle>()
            .add_event::<SessionTransition>()
            .add_event::<SessionToggleRequested>()
            .add_event::<PageVisibility>()
            .add_event::<SupportEvaluated>()
            .add_event::<UiAction>()
            .add_event::<FrameSampled>()
            .add_event::<PlaceRequest>();

        app.configure_sets(
            Update,
            (
                XrFrameSet::Lifecycle,
                XrFrameSet::Place,
                XrFrameSet::Sample,
                XrFrameSet::Consume,
            )
                .chain(),
        );

        app.add_systems(Startup, (configure_renderer, request_initial_support_check))
            .add_systems(First, drive_xr_tasks)
            .add_systems(PreUpdate, drain_xr_inbox)
            .add_systems(
                Update,
                (
                    apply_support_evaluation,
                    route_ui_actions,
                    handle_session_transitions,
                    handle_page_visibility,
                    handle_session_toggle,
                )
                    .chain()
                    .in_set(XrFrameSet::Lifecycle),
            )
            .add_systems(Update, sample_hit_test.in_set(XrFrameSet::Sample))
            .add_systems(Update, track_hit_pose.in_set(XrFrameSet::Consume))
            .add_systems(
                Update,
                (handle_place_requests, commit_placement)
                    .chain()
                    .in_set(XrFrameSet::Place),
            )
            .add_systems(Last, render_frame);
    }
}

pub fn create_app(backends: PlacementBackends) -> App {
    let mut app = App::new();

    app.add_plugins(ArPlacementPlugin)
        .insert_resource(CapabilityProbeHandle(backends.probe))
        .insert_resource(PlacementSinkHandle(backends.sink))
        .insert_resource(RendererHandle(backends.renderer));

    if let Some(runtime) = backends.runtime {
        app.insert_resource(XrRuntimeHandle(runtime));
    }

    app
}
