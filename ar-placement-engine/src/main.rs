use std::sync::Arc;

use ar_placement_engine::engine::render::LoggingRenderer;
use ar_placement_engine::persistence::HttpPlacementSink;
use ar_placement_engine::{PlacementBackends, create_app};
use bevy_log::LogPlugin;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    web::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::Duration;

    use ar_placement_engine::config::PlacementConfig;
    use ar_placement_engine::engine::scene::placed_objects::PlacedObjects;
    use ar_placement_engine::engine::xr::frame_loop::animation_loop_runner;
    use ar_placement_engine::engine::xr::lifecycle::{ActiveSession, PageVisibility};
    use ar_placement_engine::engine::xr::substrate::XrFrame;
    use ar_placement_engine::simulator::{SimulatedFrame, SimulatedXr, StaticProbe};
    use ar_placement_engine::ui::controls::UiAction;
    use bevy_app::App;
    use bevy_log::info;
    use bevy_math::{Mat4, Quat, Vec3};
    use clap::Parser;

    use super::*;

    const FRAME_INTERVAL: Duration = Duration::from_millis(16);

    /// Drives the placement pipeline against a simulated device.
    #[derive(Parser, Debug)]
    #[command(name = "ar-placement-demo", version)]
    struct Args {
        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Placement API base URL, overrides the configuration
        #[arg(long)]
        api_base_url: Option<String>,

        /// Number of display frames to simulate
        #[arg(long, default_value_t = 120)]
        frames: u32,

        #[arg(long, default_value = "info,ar_placement_engine=debug")]
        log_filter: String,
    }

    /// Surface under the viewer, slowly turning as the device moves.
    fn surface_pose(index: u32) -> Mat4 {
        Mat4::from_rotation_translation(
            Quat::from_rotation_y(index as f32 * 0.05),
            Vec3::new(0.0, -1.2, -1.5),
        )
    }

    pub fn run() -> anyhow::Result<()> {
        let args = Args::parse();

        let config = PlacementConfig::load(args.config.as_deref())?
            .with_base_url_override(args.api_base_url.clone());

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let guard = runtime.enter();

        let backends = PlacementBackends {
            runtime: Some(Arc::new(SimulatedXr::default())),
            probe: Arc::new(StaticProbe::supported()),
            sink: Arc::new(HttpPlacementSink::new(&config.api_base_url())),
            renderer: Box::new(LoggingRenderer::default()),
        };

        let mut app = create_app(backends);
        app.add_plugins(LogPlugin {
            filter: args.log_filter.clone(),
            ..Default::default()
        });

        let frames = args.frames;
        let (tap_at, click_at, hide_at) = (frames / 3, frames / 2, frames.saturating_sub(10));
        let mut index = 0;

        app.set_runner(animation_loop_runner(move |app: &mut App| {
            if index >= frames {
                let placed = app.world().resource::<PlacedObjects>().len();
                info!("Demo finished after {} frames with {} placed cubes", frames, placed);
                return None;
            }
            std::thread::sleep(FRAME_INTERVAL);

            match index {
                1 => {
                    app.world_mut().send_event(UiAction::StartToggleClicked);
                }
                n if n == tap_at => {
                    app.world_mut().send_event(UiAction::CanvasTapped);
                }
                n if n == click_at => {
                    app.world_mut().send_event(UiAction::PlaceClicked);
                }
                n if n == hide_at => {
                    app.world_mut().send_event(PageVisibility::Hidden);
                }
                _ => {}
            }

            let frame: Option<Box<dyn XrFrame>> =
                if app.world().resource::<ActiveSession>().is_active() {
                    if index % 40 >= 30 {
                        SimulatedFrame::empty().boxed()
                    } else {
                        SimulatedFrame::hit(surface_pose(index)).boxed()
                    }
                } else {
                    None
                };

            index += 1;
            Some(frame)
        }));

        let exit = app.run();
        drop(guard);
        runtime.shutdown_timeout(Duration::from_secs(1));

        if exit.is_error() {
            anyhow::bail!("demo exited with {:?}", exit);
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use ar_placement_engine::engine::xr::browser::{
        BrowserXrFrame, BrowserXrRuntime, set_session_frame_callback,
    };
    use ar_placement_engine::engine::xr::frame_loop::tick;
    use ar_placement_engine::engine::xr::lifecycle::{PageVisibility, SessionTransition};
    use ar_placement_engine::engine::xr::substrate::XrFrame;
    use ar_placement_engine::persistence::page_api_base_url;
    use ar_placement_engine::support::probe::BrowserCapabilityProbe;
    use ar_placement_engine::ui::controls::{ControlPanel, UiAction};
    use ar_placement_engine::ui::page::PageControls;
    use bevy_app::App;
    use bevy_log::{error, info};
    use constants::ui::{APP_MOUNT_ID, CANVAS_ID};
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};

    use super::*;

    /// Owns the app and feeds it page input, one display frame at a time.
    struct PageDriver {
        app: RefCell<App>,
        controls: RefCell<PageControls>,
        runtime: BrowserXrRuntime,
        visibility: RefCell<Vec<PageVisibility>>,
        window_frame: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    }

    impl PageDriver {
        fn step(&self, frame: Option<BrowserXrFrame>) {
            let Ok(mut app) = self.app.try_borrow_mut() else {
                return;
            };

            let world = app.world_mut();
            for event in self.visibility.borrow_mut().drain(..) {
                world.send_event(event);
            }
            for session in self.runtime.take_ended() {
                world.send_event(SessionTransition::Ended(Some(session)));
            }
            for action in self.controls.borrow().take_actions() {
                world.send_event(action);
            }
            for _ in 0..self.runtime.take_selects() {
                world.send_event(UiAction::CanvasTapped);
            }

            tick(&mut app, frame.map(|frame| Box::new(frame) as Box<dyn XrFrame>));

            self.controls
                .borrow_mut()
                .sync(app.world().resource::<ControlPanel>());
        }

        /// Page loop while no session presents; session frames drive the app otherwise.
        fn on_window_frame(&self) {
            if !self.runtime.is_presenting() {
                self.step(None);
            }
            self.request_window_frame();
        }

        fn on_session_frame(&self, frame: JsValue) {
            self.step(BrowserXrFrame::from_js(frame));
            self.runtime.request_session_frame();
        }

        fn request_window_frame(&self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            if let Some(callback) = self.window_frame.borrow().as_ref() {
                if let Err(e) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    error!("requestAnimationFrame failed: {:?}", e);
                }
            }
        }

        fn queue_visibility(&self, event: PageVisibility) {
            self.visibility.borrow_mut().push(event);
            // Hidden pages get no animation frames. The first tick queues the
            // end, the second polls it into `XRSession.end()`.
            self.step(None);
            self.step(None);
        }
    }

    /// `visibilitychange` (to hidden) and `pagehide` end the active session.
    fn listen_for_page_visibility(driver: &Rc<PageDriver>) -> Result<(), JsValue> {
        let Some(window) = web_sys::window() else {
            return Ok(());
        };

        let hidden = driver.clone();
        let on_visibility = Closure::<dyn FnMut()>::new(move || {
            let is_hidden = web_sys::window()
                .and_then(|window| window.document())
                .is_some_and(|document| document.hidden());
            if is_hidden {
                hidden.queue_visibility(PageVisibility::Hidden);
            }
        });

        let unloaded = driver.clone();
        let on_pagehide = Closure::<dyn FnMut()>::new(move || {
            unloaded.queue_visibility(PageVisibility::Unloaded);
        });

        if let Some(document) = window.document() {
            document.add_event_listener_with_callback(
                "visibilitychange",
                on_visibility.as_ref().unchecked_ref(),
            )?;
        }
        window.add_event_listener_with_callback("pagehide", on_pagehide.as_ref().unchecked_ref())?;

        on_visibility.forget();
        on_pagehide.forget();
        Ok(())
    }

    fn start_frame_loops(driver: &Rc<PageDriver>) {
        let window_driver = driver.clone();
        *driver.window_frame.borrow_mut() = Some(Closure::new(move |_time: f64| {
            window_driver.on_window_frame();
        }));

        let session_driver = driver.clone();
        let on_session_frame = Closure::<dyn FnMut(f64, JsValue)>::new(
            move |_time: f64, frame: JsValue| session_driver.on_session_frame(frame),
        );
        let callback: &js_sys::Function = on_session_frame.as_ref().unchecked_ref();
        set_session_frame_callback(callback.clone());
        on_session_frame.forget();

        driver.request_window_frame();
    }

    pub fn run() {
        let runtime = BrowserXrRuntime::new(CANVAS_ID, Some(APP_MOUNT_ID));
        let backends = PlacementBackends {
            runtime: Some(Arc::new(runtime.clone())),
            probe: Arc::new(BrowserCapabilityProbe),
            sink: Arc::new(HttpPlacementSink::new(&page_api_base_url(None))),
            renderer: Box::new(LoggingRenderer::default()),
        };

        let mut app = create_app(backends);
        app.add_plugins(LogPlugin::default());
        app.finish();
        app.cleanup();

        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            error!("No document to mount the placement page in");
            return;
        };
        let Some(root) = document.get_element_by_id(APP_MOUNT_ID) else {
            error!("Mount node #{} not found", APP_MOUNT_ID);
            return;
        };
        let controls = match PageControls::mount(&document, &root) {
            Ok(controls) => controls,
            Err(e) => {
                error!("Failed to build page controls: {:?}", e);
                return;
            }
        };

        let driver = Rc::new(PageDriver {
            app: RefCell::new(app),
            controls: RefCell::new(controls),
            runtime,
            visibility: RefCell::default(),
            window_frame: RefCell::default(),
        });

        if let Err(e) = listen_for_page_visibility(&driver) {
            error!("Failed to listen for page visibility: {:?}", e);
        }
        start_frame_loops(&driver);

        info!(
            "Ready for AR. Move your device to detect a plane, then tap the screen or \"Place Object\" to add cubes."
        );
    }
}
