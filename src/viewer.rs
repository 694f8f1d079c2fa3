//! Standalone window backed by winit.
//!
//! ```no_run
//! # use nebula::Viewer;
//! Viewer::builder()
//!     .with_title("Galaxy")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use web_time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Fullscreen, Window, WindowId},
};

use crate::{
    engine::WindowRequest, error::NebulaError, options::Options, InputEvent,
    MouseButton, NebulaEngine,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Options,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            options: Options::default(),
            title: "Nebula".into(),
        }
    }

    /// Override the default options (scene, galaxy shape, camera...).
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            options: self.options,
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A window showing one of the demo scenes.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`NebulaError::Viewer`] if the event loop cannot start, and
    /// the engine's error if it fails to initialize.
    pub fn run(self) -> Result<(), NebulaError> {
        let event_loop =
            EventLoop::new().map_err(|e| NebulaError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            last_frame_time: Instant::now(),
            options: Some(self.options),
            title: self.title,
            init_error: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| NebulaError::Viewer(e.to_string()))?;
        app.init_error.map_or(Ok(()), Err)
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<NebulaEngine>,
    last_frame_time: Instant,
    options: Option<Options>,
    title: String,
    init_error: Option<NebulaError>,
}

fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ViewerApp {
    fn apply(&self, request: Option<WindowRequest>) {
        let (Some(request), Some(window)) = (request, &self.window) else {
            return;
        };
        match request {
            WindowRequest::ToggleFullscreen => {
                let next = if window.fullscreen().is_some() {
                    None
                } else {
                    Some(Fullscreen::Borderless(None))
                };
                log::debug!("fullscreen: {}", next.is_some());
                window.set_fullscreen(next);
            }
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: NebulaError) {
        log::error!("failed to initialize engine: {error}");
        self.init_error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let attrs = if let Some(mon) = &monitor {
            let mon_size = mon.size();
            let scale = mon.scale_factor();
            #[allow(clippy::cast_possible_truncation)]
            let logical_w = (f64::from(mon_size.width) / scale * 0.75) as u32;
            #[allow(clippy::cast_possible_truncation)]
            let logical_h = (f64::from(mon_size.height) / scale * 0.75) as u32;
            Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    logical_w, logical_h,
                ))
        } else {
            Window::default_attributes().with_title(&self.title)
        };

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, NebulaError::Viewer(e.to_string()));
                return;
            }
        };

        let options = self.options.take().unwrap_or_default();
        let engine = pollster::block_on(NebulaEngine::new(
            window.clone(),
            viewport_size(window.inner_size()),
            window.scale_factor(),
            options,
        ));
        match engine {
            Ok(engine) => {
                window.request_redraw();
                self.window = Some(window);
                self.engine = Some(engine);
                self.last_frame_time = Instant::now();
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        let (Some(window), Some(engine)) = (&self.window, &mut self.engine)
        else {
            return;
        };

        let request = match event {
            WindowEvent::Resized(size) => {
                let (w, h) = viewport_size(size);
                engine.resize(w, h);
                None
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                engine.set_scale_factor(scale_factor);
                None
            }

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now.duration_since(self.last_frame_time).as_secs_f32();
                self.last_frame_time = now;

                engine.update(dt);
                match engine.render() {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                        let (w, h) = viewport_size(window.inner_size());
                        engine.resize(w, h);
                    }
                    Err(e) => log::error!("render error: {e:?}"),
                }
                window.request_redraw();
                None
            }

            WindowEvent::MouseInput { button, state, .. } => {
                engine.handle_input(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                })
            }

            #[allow(clippy::cast_possible_truncation)]
            WindowEvent::CursorMoved { position, .. } => {
                engine.handle_input(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                })
            }

            WindowEvent::MouseWheel { delta, .. } => {
                #[allow(clippy::cast_possible_truncation)]
                let scroll_delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                engine.handle_input(InputEvent::Scroll {
                    delta: scroll_delta,
                })
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                engine.handle_input(InputEvent::ModifiersChanged {
                    shift: modifiers.state().shift_key(),
                })
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                engine.handle_key(&format!("{code:?}"))
            }

            _ => None,
        };

        self.apply(request);
    }
}
