use std::sync::Arc;

use async_trait::async_trait;
use bevy_math::Mat4;
use thiserror::Error;

use constants::placement::{
    IMMERSIVE_AR_MODE, LOCAL_FLOOR_SPACE, LOCAL_SPACE, OPTIONAL_FEATURES, REQUIRED_FEATURES,
    VIEWER_SPACE,
};

/// Session shared between the ECS world and in-flight XR tasks.
pub type SharedSession = Arc<dyn XrSession>;

/// Coordinate frames the pipeline asks the session for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceSpaceKind {
    Viewer,
    LocalFloor,
    Local,
}

impl ReferenceSpaceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => VIEWER_SPACE,
            Self::LocalFloor => LOCAL_FLOOR_SPACE,
            Self::Local => LOCAL_SPACE,
        }
    }
}

/// Opaque reference space handle issued by the substrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReferenceSpace {
    pub id: u64,
    pub kind: ReferenceSpaceKind,
}

/// Opaque hit-test source handle issued by the substrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HitTestSource {
    pub id: u64,
}

/// One entry of a frame's ordered hit-test result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HitTestResult {
    pub id: u64,
}

/// Resolved transform of a hit-test result. Only valid for the frame that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub transform: Mat4,
}

impl Pose {
    pub fn new(transform: Mat4) -> Self {
        Self { transform }
    }
}

/// Parameters of an immersive session request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInit {
    pub mode: String,
    pub required_features: Vec<String>,
    pub optional_features: Vec<String>,
}

impl SessionInit {
    /// Immersive AR with hit testing required and DOM overlay requested.
    pub fn immersive_ar() -> Self {
        Self {
            mode: IMMERSIVE_AR_MODE.to_string(),
            required_features: REQUIRED_FEATURES.iter().map(|f| f.to_string()).collect(),
            optional_features: OPTIONAL_FEATURES.iter().map(|f| f.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum XrError {
    #[error("reference space '{kind}' rejected: {reason}")]
    ReferenceSpaceRejected { kind: &'static str, reason: String },
    #[error("hit-test source rejected: {0}")]
    HitTestSourceRejected(String),
    #[error("session request failed: {0}")]
    SessionRequestFailed(String),
    #[error("session end failed: {0}")]
    SessionEndFailed(String),
    #[error("capability probe failed: {0}")]
    ProbeFailed(String),
}

/// Device-level entry point for immersive sessions.
#[async_trait(?Send)]
pub trait XrRuntime: Send + Sync {
    async fn request_session(&self, init: SessionInit) -> Result<SharedSession, XrError>;
}

/// An active immersive session.
#[async_trait(?Send)]
pub trait XrSession: Send + Sync {
    async fn request_reference_space(
        &self,
        kind: ReferenceSpaceKind,
    ) -> Result<ReferenceSpace, XrError>;

    /// Hit-test source casting rays from the origin of `space`.
    async fn request_hit_test_source(&self, space: ReferenceSpace)
    -> Result<HitTestSource, XrError>;

    fn cancel_hit_test_source(&self, source: HitTestSource);

    async fn end(&self) -> Result<(), XrError>;
}

/// Per-display-refresh frame data handed over by the substrate.
pub trait XrFrame: Send + Sync {
    /// Results ordered by the substrate, nearest first.
    fn hit_test_results(&self, source: HitTestSource) -> Vec<HitTestResult>;

    fn resolve_pose(&self, result: HitTestResult, space: ReferenceSpace) -> Option<Pose>;
}
