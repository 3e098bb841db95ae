//! Hand-off of the finished frame to the rendering substrate.
//!
//! The substrate only needs a snapshot of what to draw: the reticle (when
//! visible) and every placed cube. `render_frame` runs in `Last` on every
//! tick, whether or not the tick carried XR frame data.

use bevy_ecs::prelude::*;
use bevy_log::{debug, info};
use bevy_math::Mat4;

use crate::engine::scene::placed_objects::PlacedObject;
use crate::engine::scene::reticle::Reticle;
use constants::placement::{CUBE_COLOR, CUBE_METALNESS, CUBE_ROUGHNESS, CUBE_SIZE};
use constants::reticle::{
    RETICLE_COLOR, RETICLE_INNER_RADIUS, RETICLE_OPACITY, RETICLE_OUTER_RADIUS, RETICLE_SEGMENTS,
    RETICLE_TILT_X,
};

/// Flat ring drawn at the reticle transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingStyle {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub segments: u32,
    pub color: u32,
    pub opacity: f32,
    /// Rotation about X applied to the ring geometry before the reticle transform.
    pub tilt_x: f32,
}

/// Marker cube drawn at each placed transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeStyle {
    pub size: f32,
    pub color: u32,
    pub metalness: f32,
    pub roughness: f32,
}

/// Appearance of everything the pipeline asks the substrate to draw.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub reticle: RingStyle,
    pub cube: CubeStyle,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            reticle: RingStyle {
                inner_radius: RETICLE_INNER_RADIUS,
                outer_radius: RETICLE_OUTER_RADIUS,
                segments: RETICLE_SEGMENTS,
                color: RETICLE_COLOR,
                opacity: RETICLE_OPACITY,
                tilt_x: RETICLE_TILT_X,
            },
            cube: CubeStyle {
                size: CUBE_SIZE,
                color: CUBE_COLOR,
                metalness: CUBE_METALNESS,
                roughness: CUBE_ROUGHNESS,
            },
        }
    }
}

/// What the substrate draws for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameView {
    pub reticle: Option<Mat4>,
    pub placed: Vec<Mat4>,
}

/// Renders one frame of the scene.
pub trait FrameRenderer: Send + Sync {
    /// Called once at startup, before the first frame.
    fn configure(&mut self, _style: &MarkerStyle) {}

    fn render(&mut self, view: &FrameView);
}

#[derive(Resource)]
pub struct RendererHandle(pub Box<dyn FrameRenderer>);

/// Renderer that only reports what it would draw.
#[derive(Debug, Default)]
pub struct LoggingRenderer {
    frames: u64,
    last: FrameView,
}

impl FrameRenderer for LoggingRenderer {
    fn configure(&mut self, style: &MarkerStyle) {
        info!(
            "Reticle ring {}-{} m (#{:06x}), cube {} m (#{:06x})",
            style.reticle.inner_radius,
            style.reticle.outer_radius,
            style.reticle.color,
            style.cube.size,
            style.cube.color
        );
    }

    fn render(&mut self, view: &FrameView) {
        self.frames += 1;
        if *view != self.last {
            debug!(
                "frame {}: reticle {}, {} placed",
                self.frames,
                if view.reticle.is_some() { "visible" } else { "hidden" },
                view.placed.len()
            );
            self.last = view.clone();
        }
    }
}

pub fn configure_renderer(renderer: Option<ResMut<RendererHandle>>, style: Res<MarkerStyle>) {
    if let Some(mut renderer) = renderer {
        renderer.0.configure(&style);
    }
}

pub fn render_frame(
    renderer: Option<ResMut<RendererHandle>>,
    reticle: Res<Reticle>,
    placed: Query<&PlacedObject>,
) {
    let Some(mut renderer) = renderer else {
        return;
    };

    let view = FrameView {
        reticle: reticle.visible.then_some(reticle.transform),
        placed: placed.iter().map(|object| object.transform).collect(),
    };
    renderer.0.render(&view);
}
