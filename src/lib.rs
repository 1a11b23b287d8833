//! Real-time shader preview core.
//!
//! A full-viewport quad is drawn by a small WGSL program that receives the
//! elapsed time, the pointer position and the viewport size every frame. The
//! framing, input and frame-scheduling pieces are plain types that can be
//! driven without a window; `app` wires them to winit and `render` to wgpu.

pub mod app;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod headless;
pub mod input;
pub mod params;
pub mod render;
pub mod render_loop;
pub mod viewport;

pub use app::{run_interactive, WindowInitError};
pub use clock::{Clock, SteppedClock, SystemClock};
pub use config::{ConfigError, PreviewConfig};
pub use dispatch::EventDispatcher;
pub use input::{InputMode, InputStrategy, PointerChannel, PointerEvent, TouchTracker};
pub use params::{ParamName, ParamValue, ParameterLayout, ParameterStore};
pub use render::{QuadRenderer, ShaderVariant};
pub use render_loop::{FrameRenderer, FrameScheduler, RenderLoop, TickOutcome, TimeOrdering};
pub use viewport::{Frustum, OrthographicCamera, ViewportFitter};
