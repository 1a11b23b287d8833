//! Frame scheduling: re-request, draw, then advance `u_time`.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::Clock;
use crate::params::{ParamError, ParamName, ParamValue, ParameterStore};
use crate::viewport::OrthographicCamera;

/// Requests the next display-refresh callback from the host.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Draws the quad with the camera and the current parameter values.
pub trait FrameRenderer {
    fn draw(&mut self, camera: &OrthographicCamera, params: &ParameterStore)
        -> Result<(), DrawError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("surface is lost or outdated")]
    SurfaceLost,
    #[error("timed out acquiring the next frame")]
    Timeout,
    #[error("GPU is out of memory")]
    OutOfMemory,
    #[error("draw failed: {0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoopError {
    #[error("render loop was already started")]
    AlreadyStarted,
    #[error("render loop was stopped")]
    Stopped,
    #[error(transparent)]
    Param(#[from] ParamError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

/// When `u_time` is advanced relative to the draw of the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeOrdering {
    /// The draw sees the previous tick's time; frame 0 renders with time 0.
    #[default]
    DrawThenAdvance,
    AdvanceThenDraw,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The loop is not running; nothing was drawn or requested.
    Skipped,
    Drawn,
    /// The next frame is already requested, the host decides how to recover.
    DrawFailed(DrawError),
}

pub struct RenderLoop<C> {
    state: LoopState,
    clock: C,
    store: ParameterStore,
    ordering: TimeOrdering,
    frames: u64,
}

impl<C: Clock> RenderLoop<C> {
    pub fn new(clock: C, store: ParameterStore, ordering: TimeOrdering) -> Self {
        Self {
            state: LoopState::Idle,
            clock,
            store,
            ordering,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of ticks that attempted a draw.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Moves from idle to running and requests the first frame.
    pub fn start<S: FrameScheduler>(&mut self, scheduler: &mut S) -> Result<(), LoopError> {
        match self.state {
            LoopState::Idle => {
                self.state = LoopState::Running;
                info!("render loop started ({:?})", self.ordering);
                scheduler.request_frame();
                Ok(())
            }
            LoopState::Running => Err(LoopError::AlreadyStarted),
            LoopState::Stopped => Err(LoopError::Stopped),
        }
    }

    /// Stops requesting frames. Later ticks are skipped.
    pub fn stop(&mut self) {
        if self.state != LoopState::Stopped {
            info!("render loop stopped after {} frame(s)", self.frames);
        }
        self.state = LoopState::Stopped;
    }

    /// Runs one frame. The next frame is requested before drawing, so a
    /// failed draw never ends the loop.
    pub fn tick<S, R>(
        &mut self,
        scheduler: &mut S,
        renderer: &mut R,
        camera: &OrthographicCamera,
    ) -> Result<TickOutcome, LoopError>
    where
        S: FrameScheduler,
        R: FrameRenderer,
    {
        if self.state != LoopState::Running {
            return Ok(TickOutcome::Skipped);
        }
        scheduler.request_frame();

        if self.ordering == TimeOrdering::AdvanceThenDraw {
            self.advance_time()?;
        }
        self.frames += 1;
        let outcome = match renderer.draw(camera, &self.store) {
            Ok(()) => TickOutcome::Drawn,
            Err(err) => {
                warn!("frame {} failed: {err}", self.frames);
                TickOutcome::DrawFailed(err)
            }
        };
        if self.ordering == TimeOrdering::DrawThenAdvance {
            self.advance_time()?;
        }
        Ok(outcome)
    }

    fn advance_time(&mut self) -> Result<(), ParamError> {
        let elapsed = self.clock.elapsed_since_start();
        self.store
            .set_if_present(ParamName::Time, ParamValue::Float(elapsed))
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{SteppedClock, SystemClock};
    use crate::input::{PointerChannel, PointerEvent};
    use crate::viewport::ViewportFitter;
    use glam::Vec2;

    #[derive(Default)]
    struct CountingScheduler {
        requests: u32,
    }

    impl FrameScheduler for CountingScheduler {
        fn request_frame(&mut self) {
            self.requests += 1;
        }
    }

    /// Records the time visible to each draw and fails on request.
    #[derive(Default)]
    struct TimeRecordingRenderer {
        seen_times: Vec<f32>,
        fail_next: bool,
    }

    impl FrameRenderer for TimeRecordingRenderer {
        fn draw(
            &mut self,
            _camera: &OrthographicCamera,
            params: &ParameterStore,
        ) -> Result<(), DrawError> {
            self.seen_times.push(params.time().unwrap_or(f32::NAN));
            if std::mem::take(&mut self.fail_next) {
                return Err(DrawError::Timeout);
            }
            Ok(())
        }
    }

    fn running_loop(ordering: TimeOrdering) -> (RenderLoop<SteppedClock>, ParameterStore) {
        let store = ParameterStore::default();
        let render_loop = RenderLoop::new(SteppedClock::new(0.25), store.clone(), ordering);
        (render_loop, store)
    }

    #[test]
    fn start_only_once() {
        let (mut render_loop, _) = running_loop(TimeOrdering::default());
        let mut scheduler = CountingScheduler::default();
        assert_eq!(render_loop.state(), LoopState::Idle);
        render_loop.start(&mut scheduler).unwrap();
        assert_eq!(render_loop.state(), LoopState::Running);
        assert_eq!(scheduler.requests, 1);
        assert_eq!(render_loop.start(&mut scheduler), Err(LoopError::AlreadyStarted));
    }

    #[test]
    fn idle_loop_skips_ticks() {
        let (mut render_loop, _) = running_loop(TimeOrdering::default());
        let mut scheduler = CountingScheduler::default();
        let mut renderer = TimeRecordingRenderer::default();
        let camera = OrthographicCamera::new();
        let outcome = render_loop
            .tick(&mut scheduler, &mut renderer, &camera)
            .unwrap();
        assert_eq!(outcome, TickOutcome::Skipped);
        assert_eq!(scheduler.requests, 0);
        assert!(renderer.seen_times.is_empty());
    }

    #[test]
    fn draw_then_advance_lags_one_frame() {
        let (mut render_loop, store) = running_loop(TimeOrdering::DrawThenAdvance);
        let mut scheduler = CountingScheduler::default();
        let mut renderer = TimeRecordingRenderer::default();
        let camera = OrthographicCamera::new();
        render_loop.start(&mut scheduler).unwrap();
        for _ in 0..3 {
            render_loop
                .tick(&mut scheduler, &mut renderer, &camera)
                .unwrap();
        }
        assert_eq!(renderer.seen_times, vec![0.0, 0.25, 0.5]);
        assert_eq!(store.time(), Some(0.75));
        assert_eq!(scheduler.requests, 4);
    }

    #[test]
    fn advance_then_draw_sees_current_time() {
        let (mut render_loop, _) = running_loop(TimeOrdering::AdvanceThenDraw);
        let mut scheduler = CountingScheduler::default();
        let mut renderer = TimeRecordingRenderer::default();
        let camera = OrthographicCamera::new();
        render_loop.start(&mut scheduler).unwrap();
        for _ in 0..3 {
            render_loop
                .tick(&mut scheduler, &mut renderer, &camera)
                .unwrap();
        }
        assert_eq!(renderer.seen_times, vec![0.25, 0.5, 0.75]);
    }

    #[test]
    fn failed_draw_keeps_loop_alive() {
        let (mut render_loop, store) = running_loop(TimeOrdering::default());
        let mut scheduler = CountingScheduler::default();
        let mut renderer = TimeRecordingRenderer {
            fail_next: true,
            ..TimeRecordingRenderer::default()
        };
        let camera = OrthographicCamera::new();
        render_loop.start(&mut scheduler).unwrap();
        let outcome = render_loop
            .tick(&mut scheduler, &mut renderer, &camera)
            .unwrap();
        assert_eq!(outcome, TickOutcome::DrawFailed(DrawError::Timeout));
        assert_eq!(scheduler.requests, 2);
        assert_eq!(store.time(), Some(0.25));
        let outcome = render_loop
            .tick(&mut scheduler, &mut renderer, &camera)
            .unwrap();
        assert_eq!(outcome, TickOutcome::Drawn);
    }

    #[test]
    fn stop_ends_requests() {
        let (mut render_loop, _) = running_loop(TimeOrdering::default());
        let mut scheduler = CountingScheduler::default();
        let mut renderer = TimeRecordingRenderer::default();
        let camera = OrthographicCamera::new();
        render_loop.start(&mut scheduler).unwrap();
        render_loop.stop();
        let outcome = render_loop
            .tick(&mut scheduler, &mut renderer, &camera)
            .unwrap();
        assert_eq!(outcome, TickOutcome::Skipped);
        assert_eq!(scheduler.requests, 1);
        assert_eq!(render_loop.start(&mut scheduler), Err(LoopError::Stopped));
    }

    #[test]
    fn time_is_monotonic_with_wall_clock() {
        let store = ParameterStore::default();
        let mut render_loop =
            RenderLoop::new(SystemClock::new(), store.clone(), TimeOrdering::default());
        let mut scheduler = CountingScheduler::default();
        let mut renderer = TimeRecordingRenderer::default();
        let camera = OrthographicCamera::new();
        render_loop.start(&mut scheduler).unwrap();
        let mut last = 0.0;
        for _ in 0..200 {
            render_loop
                .tick(&mut scheduler, &mut renderer, &camera)
                .unwrap();
            let now = store.time().unwrap();
            assert!(now >= last);
            last = now;
        }
        assert_eq!(render_loop.frames(), 200);
    }

    #[derive(Clone, Copy, Debug)]
    enum Step {
        Resize,
        Move,
        Tick,
    }

    fn run_interleaving(order: [Step; 3]) -> Vec<(ParamName, ParamValue)> {
        let store = ParameterStore::default();
        let fitter = ViewportFitter::new(store.clone());
        let channel = PointerChannel::new(store.clone());
        let mut render_loop =
            RenderLoop::new(SteppedClock::new(0.5), store.clone(), TimeOrdering::default());
        let mut scheduler = CountingScheduler::default();
        let mut renderer = TimeRecordingRenderer::default();
        let mut camera = OrthographicCamera::new();
        render_loop.start(&mut scheduler).unwrap();
        for step in order {
            match step {
                Step::Resize => {
                    fitter.apply(&mut camera, 1600, 800).unwrap();
                }
                Step::Move => {
                    channel
                        .on_move(&PointerEvent::Mouse(Vec2::new(12.0, 34.0)))
                        .unwrap();
                }
                Step::Tick => {
                    render_loop
                        .tick(&mut scheduler, &mut renderer, &camera)
                        .unwrap();
                }
            }
        }
        store.snapshot()
    }

    #[test]
    fn producer_interleavings_converge() {
        use Step::*;
        let orders = [
            [Resize, Move, Tick],
            [Resize, Tick, Move],
            [Move, Resize, Tick],
            [Move, Tick, Resize],
            [Tick, Resize, Move],
            [Tick, Move, Resize],
        ];
        let expected = run_interleaving(orders[0]);
        for order in orders {
            assert_eq!(run_interleaving(order), expected, "order {order:?}");
        }
    }
}
