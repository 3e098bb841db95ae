use bevy_app::prelude::*;
use bevy_ecs::prelude::*;

use super::hit_test::HitTestResources;
use super::substrate::{HitTestSource, Pose, ReferenceSpace, XrFrame};

/// Ordering of the per-frame pipeline inside `Update`.
///
/// Triggers queued between frames N-1 and N are judged against the state
/// left by frame N-1, before frame N is sampled. Rendering happens in
/// `Last`, so everything the consumer writes for frame N is visible to the
/// render of frame N.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum XrFrameSet {
    Lifecycle,
    Place,
    Sample,
    Consume,
}

/// Frame data supplied by the substrate for the current tick.
#[derive(Resource, Default)]
pub struct CurrentXrFrame(Option<Box<dyn XrFrame>>);

impl CurrentXrFrame {
    pub fn set(&mut self, frame: Option<Box<dyn XrFrame>>) {
        self.0 = frame;
    }

    pub fn take(&mut self) -> Option<Box<dyn XrFrame>> {
        self.0.take()
    }

    pub fn is_pending(&self) -> bool {
        self.0.is_some()
    }
}

/// Per-frame hit-test outcome. `None` means no surface under the viewer ray.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct FrameSampled {
    pub pose: Option<Pose>,
}

/// Pose of the first result in substrate order, resolved in `space`.
pub fn first_hit_pose(
    frame: &dyn XrFrame,
    source: HitTestSource,
    space: ReferenceSpace,
) -> Option<Pose> {
    let results = frame.hit_test_results(source);
    let first = results.first()?;
    frame.resolve_pose(*first, space)
}

/// Samples the hit-test source once per frame.
///
/// No frame data: nothing is emitted and the tick is a pure render pass.
/// Frame without hit-test resources: an explicit `None` pose so consumers
/// always get a deterministic update.
pub fn sample_hit_test(
    mut current: ResMut<CurrentXrFrame>,
    hit_test: Res<HitTestResources>,
    mut samples: EventWriter<FrameSampled>,
) {
    let Some(frame) = current.take() else {
        return;
    };

    let pose = hit_test
        .sampling_handles()
        .and_then(|(source, space)| first_hit_pose(frame.as_ref(), source, space));

    samples.write(FrameSampled { pose });
}

/// Hand one display frame to the app and run it to completion.
pub fn tick(app: &mut App, frame: Option<Box<dyn XrFrame>>) {
    app.world_mut().resource_mut::<CurrentXrFrame>().set(frame);
    app.update();
}

/// Runner driving the app from a substrate animation loop.
///
/// `next_frame` is called before every tick and may queue input or lifecycle
/// events on the app; returning `None` ends the loop.
pub fn animation_loop_runner<F>(mut next_frame: F) -> impl FnOnce(App) -> AppExit + 'static
where
    F: FnMut(&mut App) -> Option<Option<Box<dyn XrFrame>>> + 'static,
{
    move |mut app: App| {
        app.finish();
        app.cleanup();

        while let Some(frame) = next_frame(&mut app) {
            tick(&mut app, frame);
            if let Some(exit) = app.should_exit() {
                return exit;
            }
        }

        AppExit::Success
    }
}
