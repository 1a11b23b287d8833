use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use glam::Vec2;
use log::{info, warn};
use pollster::block_on;
use thiserror::Error;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{Event, Touch, TouchPhase as WinitTouchPhase, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget};
use winit::platform::run_on_demand::EventLoopExtRunOnDemand;
use winit::window::{Window, WindowBuilder};

use crate::clock::SystemClock;
use crate::config::PreviewConfig;
use crate::dispatch::EventDispatcher;
use crate::input::TouchPhase;
use crate::params::ParameterStore;
use crate::render::QuadRenderer;
use crate::render_loop::{DrawError, FrameScheduler, RenderLoop, TickOutcome};

/// Raised when no window can be opened, e.g. on a machine without a display.
#[derive(Debug, Error)]
#[error("failed to initialize {stage}: {message}")]
pub struct WindowInitError {
    stage: &'static str,
    message: String,
}

impl WindowInitError {
    fn from_panic(stage: &'static str, panic: Box<dyn Any + Send>) -> Self {
        Self {
            stage,
            message: panic_message(panic),
        }
    }

    fn from_error(stage: &'static str, err: impl std::fmt::Display) -> Self {
        Self {
            stage,
            message: err.to_string(),
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}

/// Requests redraws of the preview window.
pub struct WindowScheduler {
    window: Arc<Window>,
}

impl FrameScheduler for WindowScheduler {
    fn request_frame(&mut self) {
        self.window.request_redraw();
    }
}

/// Opens the preview window and runs until it is closed.
pub fn run_interactive(config: &PreviewConfig, store: ParameterStore) -> Result<()> {
    store.require(config.variant.parameters())?;

    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let event_loop = event_loop
        .map_err(|panic| WindowInitError::from_panic("event loop", panic))?
        .map_err(|err| WindowInitError::from_error("event loop", err))?;

    let window = Arc::new(
        WindowBuilder::new()
            .with_title(format!("Shader Preview - {}", config.variant))
            .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64))
            .build(&event_loop)
            .map_err(|err| WindowInitError::from_error("window", err))?,
    );

    let renderer = block_on(QuadRenderer::new(Arc::clone(&window), config.variant))?;
    let strategy = config.input.resolve();
    info!("input strategy: {strategy:?}");

    let mut app = PreviewApp {
        renderer,
        scheduler: WindowScheduler { window },
        dispatcher: EventDispatcher::new(strategy, store.clone()),
        render_loop: RenderLoop::new(SystemClock::new(), store, config.time_ordering),
        last_error: None,
    };
    app.start()?;

    let mut event_loop = event_loop;
    event_loop.run_on_demand(|event, elwt| {
        elwt.set_control_flow(ControlFlow::Wait);
        if let Err(err) = app.process_event(&event, elwt) {
            app.last_error = Some(err);
            elwt.exit();
        }
    })?;

    info!(
        "preview closed after {} frame(s)",
        app.render_loop.frames()
    );
    match app.last_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct PreviewApp {
    renderer: QuadRenderer,
    scheduler: WindowScheduler,
    dispatcher: EventDispatcher,
    render_loop: RenderLoop<SystemClock>,
    last_error: Option<anyhow::Error>,
}

impl PreviewApp {
    fn start(&mut self) -> Result<()> {
        let size = self.renderer.size();
        self.dispatcher.fit(size.width, size.height)?;
        self.render_loop.start(&mut self.scheduler)?;
        Ok(())
    }

    fn process_event(&mut self, event: &Event<()>, elwt: &EventLoopWindowTarget<()>) -> Result<()> {
        let Event::WindowEvent { event, window_id } = event else {
            return Ok(());
        };
        if *window_id != self.renderer.window_id() {
            return Ok(());
        }
        match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => self.on_resize(*size)?,
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = self.renderer.window().inner_size();
                self.on_resize(size)?;
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                self.dispatcher.on_cursor_moved(position)?;
            }
            WindowEvent::Touch(touch) => self.on_touch(touch)?,
            WindowEvent::RedrawRequested => self.on_frame()?,
            _ => {}
        }
        Ok(())
    }

    fn on_resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        // The swap chain always follows the window; the framing only follows
        // it when resizes are subscribed.
        self.renderer.resize(size);
        self.dispatcher.on_resize(size.width, size.height)?;
        Ok(())
    }

    fn on_touch(&mut self, touch: &Touch) -> Result<()> {
        let phase = match touch.phase {
            WinitTouchPhase::Started => TouchPhase::Started,
            WinitTouchPhase::Moved => TouchPhase::Moved,
            WinitTouchPhase::Ended => TouchPhase::Ended,
            WinitTouchPhase::Cancelled => TouchPhase::Cancelled,
        };
        let position = Vec2::new(touch.location.x as f32, touch.location.y as f32);
        self.dispatcher.on_touch(touch.id, phase, position)?;
        Ok(())
    }

    fn on_frame(&mut self) -> Result<()> {
        let outcome = self.render_loop.tick(
            &mut self.scheduler,
            &mut self.renderer,
            self.dispatcher.camera(),
        )?;
        match outcome {
            TickOutcome::DrawFailed(DrawError::SurfaceLost) => {
                let size = self.renderer.window().inner_size();
                self.renderer.resize(size);
            }
            TickOutcome::DrawFailed(DrawError::OutOfMemory) => {
                return Err(anyhow!("GPU is out of memory"));
            }
            TickOutcome::DrawFailed(DrawError::Timeout) => {
                warn!("Surface timeout; retrying next frame");
            }
            TickOutcome::DrawFailed(DrawError::Other(_))
            | TickOutcome::Drawn
            | TickOutcome::Skipped => {}
        }
        Ok(())
    }
}
