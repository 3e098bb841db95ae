use std::future::Future;
use std::sync::{Arc, Mutex};

use bevy_ecs::prelude::*;
use bevy_log::error;
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;

use super::hit_test::AcquiredHitTest;
use super::substrate::{SharedSession, XrError};
use crate::support::SupportGuidance;

/// Cooperative executor for substrate futures.
///
/// Lives on the main thread as a non-send resource and is polled once per
/// frame; a task that never resolves simply stays parked here.
pub struct XrTaskPool {
    pool: LocalPool,
}

impl Default for XrTaskPool {
    fn default() -> Self {
        Self {
            pool: LocalPool::new(),
        }
    }
}

impl XrTaskPool {
    pub fn spawn(&self, task: impl Future<Output = ()> + 'static) {
        if let Err(e) = self.pool.spawner().spawn_local(task) {
            error!("Failed to spawn XR task: {}", e);
        }
    }

    pub fn run_until_stalled(&mut self) {
        self.pool.run_until_stalled();
    }
}

/// Results of completed XR tasks waiting to be applied to the world.
pub enum XrMessage {
    SessionStarted(SharedSession),
    SessionRequestFailed(XrError),
    SessionEnded(SharedSession),
    SessionEndFailed {
        session: SharedSession,
        error: XrError,
    },
    HitTestAcquired {
        session: SharedSession,
        acquired: AcquiredHitTest,
    },
    SupportEvaluated(SupportGuidance),
}

/// Thread-safe queue bridging task completions into the frame loop.
#[derive(Resource, Clone, Default)]
pub struct XrInbox(Arc<Mutex<Vec<XrMessage>>>);

impl XrInbox {
    pub fn push(&self, message: XrMessage) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push(message);
        }
    }

    pub fn drain(&self) -> Vec<XrMessage> {
        if let Ok(mut queue) = self.0.lock() {
            std::mem::take(&mut *queue)
        } else {
            Vec::new()
        }
    }
}

pub fn drive_xr_tasks(mut pool: NonSendMut<XrTaskPool>) {
    pool.run_until_stalled();
}
