use std::sync::Arc;
use std::time::Instant;

use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::SimulationConfig;
use crate::error::{LifeError, Result};
use crate::gfx::{FrameTarget, GpuContext, SurfaceTarget};
use crate::simulation::{StepScheduler, TickCadence};

const WINDOW_TITLE: &str = "GPU Game of Life";

/// Windowed application driving a [`StepScheduler`] on a fixed cadence.
pub struct LifeApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    config: SimulationConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    target: Option<SurfaceTarget>,
    scheduler: Option<StepScheduler>,
    cadence: Option<TickCadence>,
    error: Option<LifeError>,
}

impl LifeApp {
    /// Create the application; fails on an invalid configuration.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let event_loop = EventLoop::new().map_err(|err| LifeError::EventLoop(err.to_string()))?;

        Ok(Self {
            event_loop,
            app_state: AppState {
                config,
                window: None,
                gpu: None,
                target: None,
                scheduler: None,
                cadence: None,
                error: None,
            },
        })
    }

    /// Run until the window is closed or a tick fails.
    pub fn run(self) -> Result<()> {
        let LifeApp {
            event_loop,
            mut app_state,
        } = self;

        event_loop.set_control_flow(ControlFlow::Wait);
        event_loop
            .run_app(&mut app_state)
            .map_err(|err| LifeError::EventLoop(err.to_string()))?;

        match app_state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let size = self.config.window_size;
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(WINDOW_TITLE)
                    .with_inner_size(LogicalSize::new(size, size)),
            )
            .map_err(|err| LifeError::Window(err.to_string()))?;
        let window_handle = Arc::new(window);

        let PhysicalSize { width, height } = window_handle.inner_size();

        let instance = GpuContext::instance();
        let surface = instance.create_surface(window_handle.clone())?;
        let gpu = pollster::block_on(GpuContext::for_surface(&instance, &surface))?;
        let target = SurfaceTarget::new(surface, &gpu, width, height)?;
        let scheduler = StepScheduler::new(&gpu, &self.config, target.format())?;

        info!(
            "Ticking every {}ms; close the window to stop",
            self.config.tick_interval_ms
        );

        self.cadence = Some(TickCadence::new(self.config.tick_interval(), Instant::now()));
        self.window = Some(window_handle);
        self.gpu = Some(gpu);
        self.target = Some(target);
        self.scheduler = Some(scheduler);
        Ok(())
    }

    fn run_tick(&mut self) -> Result<()> {
        let (Some(gpu), Some(target), Some(scheduler)) = (
            self.gpu.as_ref(),
            self.target.as_mut(),
            self.scheduler.as_mut(),
        ) else {
            return Ok(());
        };
        scheduler.tick(gpu, target)
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: LifeError) {
        error!("Stopping simulation: {}", err);
        self.error = Some(err);
        self.cadence = None;
        event_loop.exit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.init(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let (Some(gpu), Some(target)) = (self.gpu.as_ref(), self.target.as_mut()) {
                    target.resize(gpu, width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if !self.cadence.is_some_and(|cadence| cadence.is_due(now)) {
            if let Some(cadence) = self.cadence {
                event_loop.set_control_flow(ControlFlow::WaitUntil(cadence.next_deadline()));
            }
            return;
        }

        if let Err(err) = self.run_tick() {
            self.fail(event_loop, err);
            return;
        }

        if let Some(cadence) = self.cadence.as_mut() {
            if cadence.complete(Instant::now()) {
                warn!(
                    "Tick overran the {:?} interval; next tick fires immediately",
                    cadence.interval()
                );
            }
            event_loop.set_control_flow(ControlFlow::WaitUntil(cadence.next_deadline()));
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(scheduler) = self.scheduler.as_ref() {
            info!("Exiting after {} generations", scheduler.tick_count());
        }
    }
}
