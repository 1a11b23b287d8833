//! Window-less driver for the render loop.

use log::info;

use crate::clock::SteppedClock;
use crate::config::PreviewConfig;
use crate::params::{ParamName, ParamValue, ParameterStore};
use crate::render_loop::{
    DrawError, FrameRenderer, FrameScheduler, LoopError, RenderLoop, TickOutcome,
};
use crate::viewport::{Frustum, OrthographicCamera, ViewportFitter};

/// Scheduler that queues frame requests until the caller drains them.
#[derive(Debug, Default)]
pub struct QueuedScheduler {
    pending: u64,
}

impl QueuedScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one pending request, if any.
    pub fn take(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        self.pending -= 1;
        true
    }

    pub fn pending(&self) -> u64 {
        self.pending
    }
}

impl FrameScheduler for QueuedScheduler {
    fn request_frame(&mut self) {
        self.pending += 1;
    }
}

/// Renderer that counts draws and keeps only the parameter values the most
/// recent draw would have uploaded.
#[derive(Debug, Default)]
pub struct LatestFrameRenderer {
    draws: u64,
    last: Option<Vec<(ParamName, ParamValue)>>,
}

impl LatestFrameRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn last_frame(&self) -> Option<&[(ParamName, ParamValue)]> {
        self.last.as_deref()
    }
}

impl FrameRenderer for LatestFrameRenderer {
    fn draw(
        &mut self,
        _camera: &OrthographicCamera,
        params: &ParameterStore,
    ) -> Result<(), DrawError> {
        self.draws += 1;
        self.last = Some(params.snapshot());
        Ok(())
    }
}

/// Result of a headless run.
#[derive(Debug)]
pub struct HeadlessReport {
    pub frustum: Frustum,
    pub frames_drawn: u64,
    pub failed_frames: u64,
    pub final_state: Vec<(ParamName, ParamValue)>,
}

/// Fits the configured window size, then runs `config.frames` ticks at a
/// fixed 60 Hz step.
pub fn run(config: &PreviewConfig, store: &ParameterStore) -> Result<HeadlessReport, LoopError> {
    let fitter = ViewportFitter::new(store.clone());
    let mut camera = OrthographicCamera::new();
    let frustum = fitter.apply(&mut camera, config.width, config.height)?;

    let mut render_loop = RenderLoop::new(
        SteppedClock::per_frame(60.0),
        store.clone(),
        config.time_ordering,
    );
    let mut scheduler = QueuedScheduler::new();
    let mut renderer = LatestFrameRenderer::new();
    render_loop.start(&mut scheduler)?;

    let mut failed_frames = 0;
    while render_loop.frames() < config.frames && scheduler.take() {
        if let TickOutcome::DrawFailed(_) =
            render_loop.tick(&mut scheduler, &mut renderer, &camera)?
        {
            failed_frames += 1;
        }
    }
    info!(
        "headless run finished after {} frame(s)",
        render_loop.frames()
    );

    Ok(HeadlessReport {
        frustum,
        frames_drawn: render_loop.frames(),
        failed_frames,
        final_state: store.snapshot(),
    })
}

pub fn print_report(report: &HeadlessReport) {
    let frustum = report.frustum;
    println!(
        "Frustum: left={:.3} right={:.3} top={:.3} bottom={:.3}",
        frustum.left, frustum.right, frustum.top, frustum.bottom
    );
    println!("Rendered {} frame(s)", report.frames_drawn);
    if report.failed_frames > 0 {
        println!("Failed {} frame(s)", report.failed_frames);
    }
    println!("Final parameter state:");
    for (name, value) in &report.final_state {
        println!(" - {name} = {value}");
    }
}
