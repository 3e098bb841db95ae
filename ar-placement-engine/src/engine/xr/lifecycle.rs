use std::sync::Arc;

use bevy_app::App;
use bevy_ecs::prelude::*;
use bevy_log::{debug, info, warn};

use super::hit_test::{HitTestResources, spawn_acquisition};
use super::substrate::{SessionInit, SharedSession, XrRuntime};
use super::tasks::{XrInbox, XrMessage, XrTaskPool};
use crate::engine::scene::reticle::Reticle;
use crate::support::gate::{CapabilityProbeHandle, SupportEvaluated, spawn_support_evaluation};
use crate::tools::placement::state::PlacementGuards;
use crate::ui::controls::ControlPanel;

/// Transitions of the immersive session, as reported by the substrate.
///
/// Implemented for [`App`] so a substrate (or a test) can drive the pipeline
/// without any browser event system.
pub trait SessionLifecycle {
    fn on_start(&mut self, session: SharedSession);
    fn on_end(&mut self);
}

impl SessionLifecycle for App {
    fn on_start(&mut self, session: SharedSession) {
        self.world_mut()
            .send_event(SessionTransition::Started(session));
    }

    fn on_end(&mut self) {
        self.world_mut()
            .send_event(SessionTransition::Ended(None));
    }
}

/// Session start or end, applied strictly in the order they were reported.
#[derive(Event, Clone)]
pub enum SessionTransition {
    Started(SharedSession),
    /// `None` ends whichever session is active; `Some` only ends that session.
    Ended(Option<SharedSession>),
}

/// Start/stop toggle pressed.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToggleRequested;

/// Host page going away; either one ends the active session.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageVisibility {
    Hidden,
    Unloaded,
}

#[derive(Resource, Clone)]
pub struct XrRuntimeHandle(pub Arc<dyn XrRuntime>);

#[derive(Resource, Default)]
pub struct ActiveSession {
    session: Option<SharedSession>,
    requesting: bool,
    ending: bool,
}

impl ActiveSession {
    pub fn get(&self) -> Option<&SharedSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_requesting(&self) -> bool {
        self.requesting
    }

    /// An `end()` call is in flight for the active session.
    pub fn is_ending(&self) -> bool {
        self.ending
    }

    fn is_current(&self, session: &SharedSession) -> bool {
        self.session
            .as_ref()
            .is_some_and(|active| Arc::ptr_eq(active, session))
    }
}

/// Apply completed XR task results to the world.
pub fn drain_xr_inbox(
    inbox: Res<XrInbox>,
    mut active: ResMut<ActiveSession>,
    mut hit_test: ResMut<HitTestResources>,
    mut transitions: EventWriter<SessionTransition>,
    mut support: EventWriter<SupportEvaluated>,
) {
    for message in inbox.drain() {
        match message {
            XrMessage::SessionStarted(session) => {
                active.requesting = false;
                transitions.write(SessionTransition::Started(session));
            }
            XrMessage::SessionRequestFailed(e) => {
                active.requesting = false;
                warn!("Failed to start XR session: {}", e);
            }
            XrMessage::SessionEnded(session) => {
                transitions.write(SessionTransition::Ended(Some(session)));
            }
            XrMessage::SessionEndFailed { session, error } => {
                if active.is_current(&session) {
                    active.ending = false;
                }
                warn!("Failed to gracefully end XR session: {}", error);
            }
            XrMessage::HitTestAcquired { session, acquired } => {
                hit_test.accept(active.get(), session, acquired);
            }
            XrMessage::SupportEvaluated(guidance) => {
                support.write(SupportEvaluated { guidance });
            }
        }
    }
}

/// Apply session starts and ends in arrival order.
///
/// An end tears down everything tied to the session and re-checks support.
/// It leaves no transform that could be placed afterwards. Ends for a
/// session that is no longer active are ignored.
pub fn handle_session_transitions(
    mut events: EventReader<SessionTransition>,
    mut active: ResMut<ActiveSession>,
    mut hit_test: ResMut<HitTestResources>,
    mut guards: ResMut<PlacementGuards>,
    mut reticle: ResMut<Reticle>,
    mut controls: ResMut<ControlPanel>,
    probe: Option<Res<CapabilityProbeHandle>>,
    inbox: Res<XrInbox>,
    pool: NonSend<XrTaskPool>,
) {
    for event in events.read() {
        match event {
            SessionTransition::Started(session) => {
                if hit_test.is_held() {
                    warn!("Releasing hit-test resources still held from a previous session");
                }
                hit_test.release();

                active.session = Some(session.clone());
                active.requesting = false;
                active.ending = false;
                if guards.support_ready {
                    controls.show_session_started();
                }
                info!("XR session started");

                spawn_acquisition(&pool, &inbox, session.clone());
            }
            SessionTransition::Ended(ended) => {
                let current = match ended {
                    Some(session) => active.is_current(session),
                    None => active.is_active(),
                };
                if !current {
                    debug!("Ignoring end of a session that is not active");
                    continue;
                }

                hit_test.release();
                guards.reset_for_session_end();
                reticle.reset();
                controls.show_session_ended(guards.support_ready);
                active.session = None;
                active.ending = false;
                info!("XR session ended");

                if let Some(probe) = probe.as_ref() {
                    spawn_support_evaluation(&pool, &inbox, probe.0.clone());
                }
            }
        }
    }
}

pub fn handle_page_visibility(
    mut events: EventReader<PageVisibility>,
    mut active: ResMut<ActiveSession>,
    inbox: Res<XrInbox>,
    pool: NonSend<XrTaskPool>,
) {
    let Some(event) = events.read().last() else {
        return;
    };

    info!("Page {:?}", event);
    request_end(&mut active, &pool, &inbox);
}

pub fn handle_session_toggle(
    mut events: EventReader<SessionToggleRequested>,
    mut active: ResMut<ActiveSession>,
    guards: Res<PlacementGuards>,
    runtime: Option<Res<XrRuntimeHandle>>,
    inbox: Res<XrInbox>,
    pool: NonSend<XrTaskPool>,
) {
    for _ in events.read() {
        if !guards.support_ready {
            continue;
        }

        if active.is_active() {
            request_end(&mut active, &pool, &inbox);
        } else if active.requesting {
            continue;
        } else if let Some(runtime) = runtime.as_ref() {
            active.requesting = true;
            spawn_session_request(&pool, &inbox, runtime.0.clone());
        } else {
            warn!("No XR runtime available to start a session");
        }
    }
}

/// End the active session unless an end is already in flight.
fn request_end(active: &mut ActiveSession, pool: &XrTaskPool, inbox: &XrInbox) {
    let Some(session) = active.get().cloned() else {
        return;
    };
    if active.ending {
        debug!("XR session is already ending");
        return;
    }

    active.ending = true;
    info!("Ending XR session");
    spawn_session_end(pool, inbox, session);
}

fn spawn_session_request(pool: &XrTaskPool, inbox: &XrInbox, runtime: Arc<dyn XrRuntime>) {
    let inbox = inbox.clone();
    pool.spawn(async move {
        let outcome = runtime.request_session(SessionInit::immersive_ar()).await;
        match outcome {
            Ok(session) => inbox.push(XrMessage::SessionStarted(session)),
            Err(e) => inbox.push(XrMessage::SessionRequestFailed(e)),
        }
    });
}

fn spawn_session_end(pool: &XrTaskPool, inbox: &XrInbox, session: SharedSession) {
    let inbox = inbox.clone();
    pool.spawn(async move {
        match session.end().await {
            Ok(()) => inbox.push(XrMessage::SessionEnded(session)),
            Err(error) => inbox.push(XrMessage::SessionEndFailed { session, error }),
        }
    });
}
