//! WebXR substrate backed by `navigator.xr`.
//!
//! WebXR objects are not `Send`, so they are kept in a thread-local table and
//! the substrate handles only carry table ids. Each session keeps a WebGL
//! base layer so the browser delivers animation frames, and every frame of a
//! presenting session is handed to the callback registered with
//! [`set_session_frame_callback`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use async_trait::async_trait;
use bevy_log::{debug, warn};
use bevy_math::Mat4;
use js_sys::{Array, Float32Array, Function, Object, Promise, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use super::substrate::{
    HitTestResult, HitTestSource, Pose, ReferenceSpace, ReferenceSpaceKind, SessionInit,
    SharedSession, XrError, XrFrame, XrRuntime, XrSession,
};

thread_local! {
    static OBJECTS: RefCell<ObjectTable> = RefCell::new(ObjectTable::default());
    static SESSION_FRAME_CALLBACK: RefCell<Option<Function>> = const { RefCell::new(None) };
}

#[derive(Default)]
struct ObjectTable {
    next_id: u64,
    objects: HashMap<u64, JsValue>,
}

fn store(value: JsValue) -> u64 {
    OBJECTS.with(|table| {
        let mut table = table.borrow_mut();
        table.next_id += 1;
        let id = table.next_id;
        table.objects.insert(id, value);
        id
    })
}

fn lookup(id: u64) -> Option<JsValue> {
    OBJECTS.with(|table| table.borrow().objects.get(&id).cloned())
}

fn forget(id: u64) {
    OBJECTS.with(|table| {
        table.borrow_mut().objects.remove(&id);
    });
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Best-effort text of a thrown JS value.
pub(crate) fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

pub(crate) fn navigator_xr() -> Option<JsValue> {
    let navigator = web_sys::window()?.navigator();
    let xr = Reflect::get(&navigator, &JsValue::from_str("xr")).ok()?;
    (!xr.is_undefined() && !xr.is_null()).then_some(xr)
}

/// `target[name](...args)`.
pub(crate) fn call_method(
    target: &JsValue,
    name: &str,
    args: &[JsValue],
) -> Result<JsValue, JsValue> {
    let method: Function = Reflect::get(target, &JsValue::from_str(name))?.dyn_into()?;
    let args: Array = args.iter().collect();
    method.apply(target, &args)
}

/// `await target[name](...args)`.
pub(crate) async fn call_async(
    target: &JsValue,
    name: &str,
    args: &[JsValue],
) -> Result<JsValue, JsValue> {
    let promise: Promise = call_method(target, name, args)?.dyn_into()?;
    JsFuture::from(promise).await
}

/// Register the callback run for every animation frame of a presenting session.
///
/// It is called as `callback(time, xrFrame)` and should finish by calling
/// [`BrowserXrRuntime::request_session_frame`] to keep the loop going.
pub fn set_session_frame_callback(callback: Function) {
    SESSION_FRAME_CALLBACK.with(|slot| *slot.borrow_mut() = Some(callback));
}

fn request_frame_for(session_id: u64) -> bool {
    let Some(session) = lookup(session_id) else {
        return false;
    };

    SESSION_FRAME_CALLBACK.with(|slot| {
        let Some(callback) = slot.borrow().clone() else {
            return false;
        };
        match call_method(&session, "requestAnimationFrame", &[JsValue::from(callback)]) {
            Ok(_) => true,
            Err(e) => {
                warn!("XRSession.requestAnimationFrame failed: {}", js_message(&e));
                false
            }
        }
    })
}

fn session_options(init: &SessionInit, overlay_root: Option<&str>) -> Result<Object, JsValue> {
    let options = Object::new();
    let required: Array = init
        .required_features
        .iter()
        .map(|feature| JsValue::from_str(feature))
        .collect();
    let optional: Array = init
        .optional_features
        .iter()
        .map(|feature| JsValue::from_str(feature))
        .collect();

    Reflect::set(&options, &"requiredFeatures".into(), &required)?;
    Reflect::set(&options, &"optionalFeatures".into(), &optional)?;

    let root = overlay_root
        .and_then(|id| web_sys::window()?.document()?.get_element_by_id(id));
    if let Some(root) = root {
        let overlay = Object::new();
        Reflect::set(&overlay, &"root".into(), &root)?;
        Reflect::set(&options, &"domOverlay".into(), &overlay)?;
    }

    Ok(options)
}

/// Give the session an `XRWebGLLayer` on the page canvas. Without a base
/// layer the browser never runs session animation frames.
fn attach_base_layer(session: &JsValue, canvas_id: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let canvas = window
        .document()
        .and_then(|document| document.get_element_by_id(canvas_id))
        .ok_or_else(|| JsValue::from_str("canvas not found"))?;

    let attributes = Object::new();
    Reflect::set(&attributes, &"xrCompatible".into(), &JsValue::TRUE)?;
    let context = call_method(
        &canvas,
        "getContext",
        &[JsValue::from_str("webgl2"), attributes.into()],
    )?;
    if context.is_null() || context.is_undefined() {
        return Err(JsValue::from_str("WebGL2 unavailable"));
    }

    let layer_type: Function = Reflect::get(&window, &"XRWebGLLayer".into())?.dyn_into()?;
    let layer = Reflect::construct(&layer_type, &Array::of2(session, &context))?;

    let render_state = Object::new();
    Reflect::set(&render_state, &"baseLayer".into(), &layer)?;
    call_method(session, "updateRenderState", &[JsValue::from(render_state)])?;
    Ok(())
}

#[derive(Debug, Default)]
struct PresentationState {
    presenting: Option<u64>,
    ended: Vec<Weak<BrowserXrSession>>,
    selects: usize,
}

/// `navigator.xr` as an [`XrRuntime`].
#[derive(Debug, Clone)]
pub struct BrowserXrRuntime {
    canvas_id: String,
    overlay_root: Option<String>,
    state: Arc<Mutex<PresentationState>>,
}

impl BrowserXrRuntime {
    /// Sessions render into the canvas `canvas_id`; `overlay_root` is the
    /// element offered as the DOM overlay.
    pub fn new(canvas_id: &str, overlay_root: Option<&str>) -> Self {
        Self {
            canvas_id: canvas_id.to_string(),
            overlay_root: overlay_root.map(str::to_string),
            state: Arc::default(),
        }
    }

    pub fn is_presenting(&self) -> bool {
        lock(&self.state).presenting.is_some()
    }

    /// Schedule the next session animation frame; false when nothing presents.
    pub fn request_session_frame(&self) -> bool {
        let presenting = lock(&self.state).presenting;
        presenting.is_some_and(request_frame_for)
    }

    /// Sessions the browser reported as ended since the last call.
    pub fn take_ended(&self) -> Vec<SharedSession> {
        lock(&self.state)
            .ended
            .drain(..)
            .filter_map(|session| session.upgrade())
            .map(|session| session as SharedSession)
            .collect()
    }

    /// Number of XR `select` events since the last call.
    pub fn take_selects(&self) -> usize {
        std::mem::take(&mut lock(&self.state).selects)
    }

    fn listen(&self, js: &JsValue, session: &Arc<BrowserXrSession>) {
        let id = session.id;
        let weak = Arc::downgrade(session);
        let state = self.state.clone();
        let on_end = Closure::<dyn FnMut()>::new(move || {
            let mut state = lock(&state);
            if state.presenting == Some(id) {
                state.presenting = None;
            }
            state.ended.push(weak.clone());
        });

        let state = self.state.clone();
        let on_select = Closure::<dyn FnMut()>::new(move || {
            lock(&state).selects += 1;
        });

        for (event, callback) in [("end", &on_end), ("select", &on_select)] {
            let args = [JsValue::from_str(event), callback.as_ref().clone()];
            if let Err(e) = call_method(js, "addEventListener", &args) {
                warn!("Failed to listen for XR {}: {}", event, js_message(&e));
            }
        }

        on_end.forget();
        on_select.forget();
    }
}

#[async_trait(?Send)]
impl XrRuntime for BrowserXrRuntime {
    async fn request_session(&self, init: SessionInit) -> Result<SharedSession, XrError> {
        let failed = |e: JsValue| XrError::SessionRequestFailed(js_message(&e));

        let xr = navigator_xr()
            .ok_or_else(|| XrError::SessionRequestFailed("navigator.xr missing".to_string()))?;
        let options = session_options(&init, self.overlay_root.as_deref()).map_err(failed)?;
        let js = call_async(
            &xr,
            "requestSession",
            &[JsValue::from_str(&init.mode), options.into()],
        )
        .await
        .map_err(failed)?;

        if let Err(e) = attach_base_layer(&js, &self.canvas_id) {
            if let Err(end) = call_method(&js, "end", &[]) {
                debug!("Ending unusable XR session failed: {}", js_message(&end));
            }
            return Err(failed(e));
        }

        let session = Arc::new(BrowserXrSession {
            id: store(js.clone()),
            handles: Mutex::default(),
        });
        self.listen(&js, &session);

        lock(&self.state).presenting = Some(session.id);
        if !request_frame_for(session.id) {
            warn!("No session frame callback registered; hit tests will not run");
        }

        Ok(session)
    }
}

/// A live `XRSession`.
#[derive(Debug)]
pub struct BrowserXrSession {
    id: u64,
    handles: Mutex<Vec<u64>>,
}

impl BrowserXrSession {
    fn js(&self) -> Option<JsValue> {
        lookup(self.id)
    }

    fn keep(&self, value: JsValue) -> u64 {
        let id = store(value);
        lock(&self.handles).push(id);
        id
    }
}

impl Drop for BrowserXrSession {
    fn drop(&mut self) {
        for id in lock(&self.handles).drain(..) {
            forget(id);
        }
        forget(self.id);
    }
}

#[async_trait(?Send)]
impl XrSession for BrowserXrSession {
    async fn request_reference_space(
        &self,
        kind: ReferenceSpaceKind,
    ) -> Result<ReferenceSpace, XrError> {
        let rejected = |reason: String| XrError::ReferenceSpaceRejected {
            kind: kind.as_str(),
            reason,
        };

        let session = self.js().ok_or_else(|| rejected("session released".to_string()))?;
        let space = call_async(
            &session,
            "requestReferenceSpace",
            &[JsValue::from_str(kind.as_str())],
        )
        .await
        .map_err(|e| rejected(js_message(&e)))?;

        Ok(ReferenceSpace {
            id: self.keep(space),
            kind,
        })
    }

    async fn request_hit_test_source(
        &self,
        space: ReferenceSpace,
    ) -> Result<HitTestSource, XrError> {
        let rejected = XrError::HitTestSourceRejected;

        let session = self.js().ok_or_else(|| rejected("session released".to_string()))?;
        let space = lookup(space.id).ok_or_else(|| rejected("unknown reference space".to_string()))?;

        let options = Object::new();
        Reflect::set(&options, &"space".into(), &space).map_err(|e| rejected(js_message(&e)))?;
        let source = call_async(&session, "requestHitTestSource", &[JsValue::from(options)])
            .await
            .map_err(|e| rejected(js_message(&e)))?;

        Ok(HitTestSource {
            id: self.keep(source),
        })
    }

    fn cancel_hit_test_source(&self, source: HitTestSource) {
        if let Some(js) = lookup(source.id) {
            if let Err(e) = call_method(&js, "cancel", &[]) {
                debug!("XRHitTestSource.cancel failed: {}", js_message(&e));
            }
        }
        lock(&self.handles).retain(|id| *id != source.id);
        forget(source.id);
    }

    async fn end(&self) -> Result<(), XrError> {
        let session = self
            .js()
            .ok_or_else(|| XrError::SessionEndFailed("session released".to_string()))?;
        call_async(&session, "end", &[])
            .await
            .map(|_| ())
            .map_err(|e| XrError::SessionEndFailed(js_message(&e)))
    }
}

/// The `XRFrame` of one session animation frame.
///
/// Only valid inside the callback that produced it; its table entries are
/// dropped with it.
#[derive(Debug)]
pub struct BrowserXrFrame {
    id: u64,
    results: Mutex<Vec<u64>>,
}

impl BrowserXrFrame {
    /// `None` for a window animation frame, which carries no `XRFrame`.
    pub fn from_js(frame: JsValue) -> Option<Self> {
        frame.is_object().then(|| Self {
            id: store(frame),
            results: Mutex::default(),
        })
    }
}

impl Drop for BrowserXrFrame {
    fn drop(&mut self) {
        for id in lock(&self.results).drain(..) {
            forget(id);
        }
        forget(self.id);
    }
}

impl XrFrame for BrowserXrFrame {
    fn hit_test_results(&self, source: HitTestSource) -> Vec<HitTestResult> {
        let (Some(frame), Some(source)) = (lookup(self.id), lookup(source.id)) else {
            return Vec::new();
        };

        match call_method(&frame, "getHitTestResults", &[source]) {
            Ok(results) => Array::from(&results)
                .iter()
                .map(|result| {
                    let id = store(result);
                    lock(&self.results).push(id);
                    HitTestResult { id }
                })
                .collect(),
            Err(e) => {
                warn!("XRFrame.getHitTestResults failed: {}", js_message(&e));
                Vec::new()
            }
        }
    }

    fn resolve_pose(&self, result: HitTestResult, space: ReferenceSpace) -> Option<Pose> {
        let result = lookup(result.id)?;
        let space = lookup(space.id)?;

        let pose = call_method(&result, "getPose", &[space]).ok()?;
        if pose.is_null() || pose.is_undefined() {
            return None;
        }

        let transform = Reflect::get(&pose, &"transform".into()).ok()?;
        let matrix: Float32Array = Reflect::get(&transform, &"matrix".into())
            .ok()?
            .dyn_into()
            .ok()?;
        if matrix.length() != 16 {
            return None;
        }

        let mut columns = [0.0f32; 16];
        matrix.copy_to(&mut columns);
        Some(Pose::new(Mat4::from_cols_array(&columns)))
    }
}
