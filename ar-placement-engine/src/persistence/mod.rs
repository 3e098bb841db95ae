//! Persistence of placement transforms to the placement API.
//!
//! ## Contract
//!
//! `PlacementSink::submit` only reports whether the save could be
//! dispatched. The HTTP outcome is observed through logging alone:
//!
//! ```text
//! commit_placement
//!   ├─> spawn PlacedObject           (committed, never rolled back)
//!   └─> sink.submit(record)          (returns immediately)
//!         └─> POST {base}/api/save   (2xx -> info!, otherwise warn!)
//! ```
//!
//! Base URL resolution: an explicit override wins, otherwise
//! `http://{current host}:5000`.

/// HTTP sink and base URL resolution.
pub mod api_client;

/// Wire format of a saved placement.
pub mod record;

use std::sync::Arc;

use bevy_ecs::prelude::*;
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
pub use api_client::page_api_base_url;
pub use api_client::{HttpPlacementSink, resolve_api_base_url};
pub use record::{PlacementRecord, Vector3Payload};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("no async runtime available to dispatch the request")]
    NoRuntime,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected response {0}")]
    UnexpectedStatus(u16),
    #[error("dispatch failed: {0}")]
    Dispatch(String),
}

/// Receiver of placement records. Fire-and-forget.
pub trait PlacementSink: Send + Sync {
    fn submit(&self, record: PlacementRecord) -> Result<(), PersistError>;
}

#[derive(Resource, Clone)]
pub struct PlacementSinkHandle(pub Arc<dyn PlacementSink>);
