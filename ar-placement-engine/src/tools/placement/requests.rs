use bevy_ecs::prelude::*;
use bevy_log::{debug, info, warn};
use bevy_math::Mat4;

use super::state::PlacementGuards;
use crate::engine::scene::placed_objects::PlacedObjects;
use crate::engine::scene::reticle::Reticle;
use crate::engine::xr::frame_loop::FrameSampled;
use crate::persistence::{PersistError, PlacementRecord, PlacementSinkHandle};
use crate::ui::controls::ControlPanel;
use constants::ui::{READY_TO_PLACE_TEXT, SEARCHING_TEXT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceTrigger {
    /// Screen tap or XR `select`.
    Tap,
    Button,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceRequest {
    pub trigger: PlaceTrigger,
}

/// Transform snapshot of the placement currently in flight.
#[derive(Resource, Debug, Default)]
pub struct PendingPlacement(Option<Mat4>);

impl PendingPlacement {
    pub fn is_pending(&self) -> bool {
        self.0.is_some()
    }
}

/// Frame consumer: moves the reticle and keeps the placement guards in step with it.
pub fn track_hit_pose(
    mut samples: EventReader<FrameSampled>,
    mut reticle: ResMut<Reticle>,
    mut guards: ResMut<PlacementGuards>,
    mut controls: ResMut<ControlPanel>,
) {
    for sample in samples.read() {
        if !guards.support_ready {
            reticle.hide();
            guards.clear_hit();
            continue;
        }

        if reticle.update(sample.pose) {
            guards.record_hit(reticle.transform);
            controls.set_instruction(READY_TO_PLACE_TEXT);
        } else {
            guards.clear_hit();
            controls.set_instruction(SEARCHING_TEXT);
        }
    }
}

/// Admit at most one placement per pass; everything else is a silent no-op.
pub fn handle_place_requests(
    mut requests: EventReader<PlaceRequest>,
    mut guards: ResMut<PlacementGuards>,
    mut pending: ResMut<PendingPlacement>,
) {
    for request in requests.read() {
        match guards.try_begin() {
            Some(snapshot) => {
                debug!("Placement started via {:?}", request.trigger);
                pending.0 = Some(snapshot);
            }
            None => debug!("Ignoring {:?} placement trigger", request.trigger),
        }
    }
}

/// Spawn the pending cube, dispatch its transform, then return to `Idle`.
pub fn commit_placement(
    mut commands: Commands,
    mut pending: ResMut<PendingPlacement>,
    mut guards: ResMut<PlacementGuards>,
    mut placed: ResMut<PlacedObjects>,
    sink: Option<Res<PlacementSinkHandle>>,
) {
    let Some(transform) = pending.0.take() else {
        return;
    };

    let outcome = place_object(&mut commands, &mut placed, transform, sink.as_deref());
    guards.finish();

    match outcome {
        Ok(entity) => info!("Placed {:?} ({} total)", entity, placed.len()),
        Err(e) => warn!("Placed cube but could not dispatch save: {}", e),
    }
}

fn place_object(
    commands: &mut Commands,
    placed: &mut PlacedObjects,
    transform: Mat4,
    sink: Option<&PlacementSinkHandle>,
) -> Result<Entity, PersistError> {
    let entity = placed.spawn(commands, transform);

    let record = PlacementRecord::from_matrix(&transform);
    if let Some(sink) = sink {
        sink.0.submit(record)?;
    }

    Ok(entity)
}
